//! Sub Sift - Subscription Merger and Node Latency Sifter
//!
//! Aggregates proxy nodes from multiple subscription lists, removes
//! duplicates and blocked regions, probes each node's TCP reachability,
//! ranks survivors by latency, and emits a Clash-Meta-style routing config.

pub mod catalog;
pub mod fetch;
pub mod output;
pub mod pipeline;

pub use pipeline::*;

/// Application result type
pub type Result<T> = anyhow::Result<T>;
