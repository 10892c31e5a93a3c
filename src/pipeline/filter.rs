//! Blocked-region filtering

use crate::pipeline::models::ProxyNode;
use regex::Regex;

/// Drop every node whose name matches the blocked-region pattern.
///
/// Survivors keep their input order. Returns the survivors and the number of
/// removed nodes.
pub fn filter_blocked(nodes: Vec<ProxyNode>, pattern: &Regex) -> (Vec<ProxyNode>, usize) {
    let total = nodes.len();
    let kept: Vec<ProxyNode> = nodes
        .into_iter()
        .filter(|node| !pattern.is_match(node.name()))
        .collect();
    let blocked = total - kept.len();
    (kept, blocked)
}
