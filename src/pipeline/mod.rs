//! Node processing pipeline
//!
//! This module provides the stages between raw decoded descriptors and the
//! final routing configuration:
//! - Normalizing and deduplicating raw node descriptors
//! - Removing nodes from blocked regions
//! - Probing reachability and ranking by connect latency
//! - Classifying survivors into region groups
//! - Assembling the output model

pub mod assembler;
pub mod classifier;
pub mod filter;
pub mod models;
pub mod normalizer;
pub mod prober;

pub use models::{ProbeOutcome, ProxyGroup, ProxyNode, RegionGroup, RoutingConfig};
pub use prober::{ProbeReport, Prober, ProberConfig};

use crate::catalog::{self, GroupTemplate};
use crate::Result;
use anyhow::ensure;
use serde_yaml::Value;
use tracing::info;

/// Run the full pipeline: normalize, filter, probe, classify, assemble.
///
/// Individual bad descriptors and dead nodes are dropped along the way, but
/// an empty node set at any stage boundary fails the whole run — a partial
/// or empty configuration is never produced.
pub async fn run(
    raw: Vec<Value>,
    prober: &Prober,
    rules: Vec<String>,
    template: &GroupTemplate,
) -> Result<RoutingConfig> {
    ensure!(!raw.is_empty(), "no node descriptors to process");
    let total = raw.len();

    let (nodes, skipped) = normalizer::normalize(raw);
    info!(total, kept = nodes.len(), skipped, "normalized node descriptors");
    ensure!(!nodes.is_empty(), "no valid nodes after deduplication");

    let (nodes, blocked) = filter::filter_blocked(nodes, &catalog::BLOCKED_REGION_PATTERN);
    if blocked > 0 {
        info!(blocked, remaining = nodes.len(), "removed blocked-region nodes");
    }
    ensure!(!nodes.is_empty(), "no nodes left after region filtering");

    let report = prober.probe_and_rank(nodes).await;
    ensure!(
        !report.nodes.is_empty(),
        "all {} nodes were unreachable within the timeout",
        report.dropped
    );

    let region_groups = classifier::classify(&report.nodes, &catalog::REGION_CATALOG);
    for group in &region_groups {
        info!(label = %group.label, members = group.members.len(), "region group");
    }
    let classified: usize = region_groups.iter().map(|g| g.members.len()).sum();
    let unclassified = report.nodes.len() - classified;
    if unclassified > 0 {
        info!(unclassified, "nodes without a region group");
    }

    Ok(assembler::assemble(&report.nodes, &region_groups, rules, template))
}
