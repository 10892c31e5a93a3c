//! Region classification
//!
//! Buckets nodes by the first catalog pattern their name matches. The
//! catalog is an ordered list, so precedence is exactly list order.

use crate::catalog::RegionRule;
use crate::pipeline::models::{ProxyNode, RegionGroup};

/// Assign each node to at most one region group.
///
/// Patterns are tried in catalog order against the node name; the first hit
/// wins. Nodes matching nothing are left out of every group (they still live
/// in the full node list the assembler receives separately). Returned groups
/// follow catalog order and only labels with members are present.
pub fn classify(nodes: &[ProxyNode], catalog: &[RegionRule]) -> Vec<RegionGroup> {
    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); catalog.len()];

    for node in nodes {
        for (slot, rule) in catalog.iter().enumerate() {
            if rule.pattern.is_match(node.name()) {
                buckets[slot].push(node.name().to_string());
                break;
            }
        }
    }

    catalog
        .iter()
        .zip(buckets)
        .filter(|(_, members)| !members.is_empty())
        .map(|(rule, members)| RegionGroup {
            label: rule.label.to_string(),
            members,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::REGION_CATALOG;
    use serde_yaml::{Mapping, Value};

    fn node(name: &str) -> ProxyNode {
        let mut map = Mapping::new();
        map.insert(Value::from("name"), Value::from(name));
        map.insert(Value::from("type"), Value::from("ss"));
        map.insert(Value::from("server"), Value::from("example.net"));
        ProxyNode::from_mapping(map)
    }

    #[test]
    fn test_first_match_wins() {
        // "JP-Tokyo" also contains no later-catalog token, while a name like
        // "JP via US" matches both Japan and US; Japan is first in the catalog.
        let nodes = vec![node("JP-Tokyo"), node("JP via US relay")];
        let groups = classify(&nodes, &REGION_CATALOG);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "🇯🇵 日本");
        assert_eq!(groups[0].members, vec!["JP-Tokyo", "JP via US relay"]);
    }

    #[test]
    fn test_unmatched_nodes_appear_nowhere() {
        // name chosen to avoid every ISO code substring in the catalog
        let nodes = vec![node("myry-01"), node("SG-1")];
        let groups = classify(&nodes, &REGION_CATALOG);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "🇸🇬 新加坡");
        assert_eq!(groups[0].members, vec!["SG-1"]);
    }

    #[test]
    fn test_groups_follow_catalog_order() {
        // input order deliberately reversed relative to catalog order
        let nodes = vec![node("BR-1"), node("US-1"), node("🇯🇵 Osaka")];
        let groups = classify(&nodes, &REGION_CATALOG);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["🇯🇵 日本", "🇺🇸 美国", "🇧🇷 巴西"]);
    }

    #[test]
    fn test_latency_prefix_does_not_change_grouping() {
        let plain = classify(&[node("JP-Tokyo")], &REGION_CATALOG);
        let prefixed = classify(&[node("[123ms] JP-Tokyo")], &REGION_CATALOG);
        assert_eq!(plain[0].label, prefixed[0].label);
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let nodes = vec![node("KR Seoul"), node("DE-1"), node("KR-2")];
        let a = classify(&nodes, &REGION_CATALOG);
        let b = classify(&nodes, &REGION_CATALOG);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(classify(&[], &REGION_CATALOG).is_empty());
    }
}
