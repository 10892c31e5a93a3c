//! Reachability probing and latency ranking
//!
//! Each node is probed with a plain TCP connect to its advertised
//! `server:port`; the connect wall time is the latency signal. No protocol
//! handshake is attempted and no request is routed through the node, so this
//! is a reachability heuristic, not a correctness check for the node's
//! declared protocol. That limitation is inherited from the source design
//! and kept on purpose.

use crate::pipeline::models::{ProbeOutcome, ProxyNode};
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Default per-node connect timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Default number of concurrent probes
const DEFAULT_CONCURRENCY: usize = 50;

/// Log a progress line every this many completed probes
const PROGRESS_EVERY: usize = 20;

/// Configuration for the reachability prober
#[derive(Debug, Clone)]
pub struct ProberConfig {
    /// Timeout for each node's connect attempt
    pub timeout: Duration,
    /// Number of probes in flight at once
    pub concurrency: usize,
    /// Host:port naming the availability context; logged, never dialed
    pub probe_context: String,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            probe_context: crate::catalog::PROBE_CONTEXT.to_string(),
        }
    }
}

impl ProberConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_probe_context(mut self, context: String) -> Self {
        self.probe_context = context;
        self
    }
}

/// Aggregated probe result: ranked survivors plus the counts the reporting
/// layer surfaces.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Survivors, ascending by latency, names prefixed with `[<ms>ms]`
    pub nodes: Vec<ProxyNode>,
    pub alive: usize,
    pub dropped: usize,
}

/// Probes nodes and ranks the reachable ones by connect latency.
#[derive(Debug, Clone)]
pub struct Prober {
    config: ProberConfig,
}

impl Prober {
    pub fn new() -> Self {
        Self {
            config: ProberConfig::default(),
        }
    }

    pub fn with_config(config: ProberConfig) -> Self {
        Self { config }
    }

    /// Probe a single node. Missing or malformed server/port, a connect
    /// error, or the timeout all classify the node as unreachable; there is
    /// no retry at this layer.
    pub async fn probe_one(&self, node: ProxyNode) -> ProbeOutcome {
        let Some(server) = node.server().map(str::to_string) else {
            return ProbeOutcome::unreachable(node);
        };
        let Some(port) = node.port() else {
            return ProbeOutcome::unreachable(node);
        };

        let addr = format!("{server}:{port}");
        let start = Instant::now();
        match tokio::time::timeout(self.config.timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(_stream)) => ProbeOutcome::reachable(node, start.elapsed()),
            Ok(Err(_)) | Err(_) => ProbeOutcome::unreachable(node),
        }
    }

    /// Probe all nodes with bounded concurrency, then rank survivors by
    /// latency (ascending, ties by input order) and prefix each surviving
    /// name with its truncated millisecond latency.
    ///
    /// Ranking starts only after every probe has resolved; a slow node never
    /// cancels its siblings, so worst-case wall clock is
    /// `ceil(n / concurrency) * timeout`.
    pub async fn probe_and_rank(&self, nodes: Vec<ProxyNode>) -> ProbeReport {
        let total = nodes.len();
        info!(
            total,
            timeout_secs = self.config.timeout.as_secs(),
            concurrency = self.config.concurrency,
            context = %self.config.probe_context,
            "starting reachability probes"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let done = Arc::new(AtomicUsize::new(0));

        let outcomes: Vec<(usize, ProbeOutcome)> = stream::iter(nodes.into_iter().enumerate())
            .map(|(index, node)| {
                let sem = Arc::clone(&semaphore);
                let done = Arc::clone(&done);
                let prober = self.clone();
                async move {
                    // Acquire only fails if the semaphore is closed, which
                    // cannot happen while we hold the Arc.
                    let _permit = sem.acquire().await.expect("semaphore closed unexpectedly");
                    let outcome = prober.probe_one(node).await;
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if finished % PROGRESS_EVERY == 0 || finished == total {
                        debug!(finished, total, "probe progress");
                    }
                    (index, outcome)
                }
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let ranked = rank(outcomes);
        let alive = ranked.len();
        let dropped = total - alive;

        if alive > 0 {
            let best = ranked.first().map(|(_, l)| l.as_millis()).unwrap_or(0);
            let worst = ranked.last().map(|(_, l)| l.as_millis()).unwrap_or(0);
            let sum: u128 = ranked.iter().map(|(_, l)| l.as_millis()).sum();
            info!(
                alive,
                dropped,
                best_ms = best,
                worst_ms = worst,
                mean_ms = sum / alive as u128,
                "reachability probes finished"
            );
        } else {
            info!(alive, dropped, "reachability probes finished");
        }

        // Rewrite names only now that ranking is final.
        let nodes = ranked
            .into_iter()
            .map(|(mut node, latency)| {
                let name = format!("[{}ms] {}", latency.as_millis(), node.name());
                node.set_name(name);
                node
            })
            .collect();

        ProbeReport {
            nodes,
            alive,
            dropped,
        }
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the reachable outcomes and sort them ascending by latency, breaking
/// ties by input position. Pure so the ordering rules are testable without
/// sockets.
fn rank(outcomes: Vec<(usize, ProbeOutcome)>) -> Vec<(ProxyNode, Duration)> {
    let mut alive: Vec<(usize, ProxyNode, Duration)> = outcomes
        .into_iter()
        .filter_map(|(index, outcome)| {
            let latency = outcome.latency?;
            Some((index, outcome.node, latency))
        })
        .collect();
    alive.sort_by_key(|&(index, _, latency)| (latency, index));
    alive.into_iter().map(|(_, node, latency)| (node, latency)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::{Mapping, Value};
    use tokio::net::TcpListener;

    fn node(name: &str, server: &str, port: Option<u16>) -> ProxyNode {
        let mut map = Mapping::new();
        map.insert(Value::from("name"), Value::from(name));
        map.insert(Value::from("type"), Value::from("ss"));
        map.insert(Value::from("server"), Value::from(server));
        if let Some(port) = port {
            map.insert(Value::from("port"), Value::from(port));
        }
        ProxyNode::from_mapping(map)
    }

    fn outcome(index: usize, name: &str, latency_ms: Option<u64>) -> (usize, ProbeOutcome) {
        let node = node(name, "10.0.0.1", Some(1));
        let outcome = match latency_ms {
            Some(ms) => ProbeOutcome::reachable(node, Duration::from_millis(ms)),
            None => ProbeOutcome::unreachable(node),
        };
        (index, outcome)
    }

    #[test]
    fn test_rank_sorts_ascending_and_drops_unreachable() {
        let ranked = rank(vec![
            outcome(0, "slow", Some(200)),
            outcome(1, "dead", None),
            outcome(2, "fast", Some(10)),
            outcome(3, "mid", Some(50)),
        ]);
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.name()).collect();
        assert_eq!(names, vec!["fast", "mid", "slow"]);
    }

    #[test]
    fn test_rank_breaks_ties_by_input_order() {
        let ranked = rank(vec![
            outcome(0, "first", Some(30)),
            outcome(1, "second", Some(30)),
            outcome(2, "third", Some(30)),
        ]);
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.name()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_unordered_completion_still_deterministic() {
        // completion order (the vec order here) differs from input index order
        let ranked = rank(vec![
            outcome(2, "c", Some(20)),
            outcome(0, "a", Some(20)),
            outcome(1, "b", Some(5)),
        ]);
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.name()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_probe_one_reachable_via_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let prober = Prober::new();
        let outcome = prober.probe_one(node("local", "127.0.0.1", Some(port))).await;
        assert!(outcome.is_reachable());
        assert!(outcome.latency.unwrap() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_probe_one_refused_port_is_unreachable() {
        // bind then drop so the port is closed
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let prober = Prober::new();
        let outcome = prober.probe_one(node("gone", "127.0.0.1", Some(port))).await;
        assert!(!outcome.is_reachable());
    }

    #[tokio::test]
    async fn test_probe_one_missing_port_is_unreachable() {
        let prober = Prober::new();
        let outcome = prober.probe_one(node("no-port", "127.0.0.1", None)).await;
        assert!(!outcome.is_reachable());
    }

    #[tokio::test]
    async fn test_probe_and_rank_prefixes_latency_and_counts() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed_port = closed.local_addr().unwrap().port();
        drop(closed);

        let config = ProberConfig::new()
            .with_timeout(Duration::from_secs(1))
            .with_concurrency(4);
        let prober = Prober::with_config(config);
        let report = prober
            .probe_and_rank(vec![
                node("up", "127.0.0.1", Some(port)),
                node("down", "127.0.0.1", Some(closed_port)),
            ])
            .await;

        assert_eq!(report.alive, 1);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.nodes.len(), 1);
        let name = report.nodes[0].name();
        assert!(name.starts_with('['), "{name}");
        assert!(name.ends_with("ms] up"), "{name}");
    }

    #[test]
    fn test_config_builder() {
        let config = ProberConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_concurrency(8)
            .with_probe_context("example.com:443".to_string());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.probe_context, "example.com:443");
    }
}
