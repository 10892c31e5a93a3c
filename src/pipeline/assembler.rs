//! Routing config assembly
//!
//! Purely structural: combines the ranked node list, the region groups and
//! the static rule list into the final output model. Group order and region
//! order must match the fixed catalog exactly, since clients rely on
//! positional stability.

use crate::catalog::GroupTemplate;
use crate::pipeline::models::{ProxyGroup, ProxyNode, RegionGroup, RoutingConfig};

const DIRECT: &str = "DIRECT";
const REJECT: &str = "REJECT";

/// Compose the final routing configuration.
///
/// `nodes` must already be latency-ranked; `region_groups` come from the
/// classifier (non-empty labels only). Every label in the template's region
/// catalog still gets a group: empty ones hold a single REJECT entry so the
/// group list keeps the same shape run over run.
pub fn assemble(
    nodes: &[ProxyNode],
    region_groups: &[RegionGroup],
    rules: Vec<String>,
    template: &GroupTemplate,
) -> RoutingConfig {
    let all_names: Vec<String> = nodes.iter().map(|n| n.name().to_string()).collect();

    let mut groups = Vec::with_capacity(10 + template.region_labels.len());

    groups.push(ProxyGroup::select(
        &template.entry,
        vec![
            template.auto.clone(),
            template.fastest.clone(),
            template.manual.clone(),
            template.region_selector.clone(),
        ],
    ));
    groups.push(ProxyGroup::fallback(
        &template.auto,
        &template.health_check_url,
        template.interval,
        all_names.clone(),
    ));
    groups.push(ProxyGroup::url_test(
        &template.fastest,
        &template.health_check_url,
        template.interval,
        template.tolerance,
        all_names.clone(),
    ));
    groups.push(ProxyGroup::select(&template.manual, all_names));
    groups.push(ProxyGroup::select(
        &template.unlock,
        vec![DIRECT.to_string(), template.entry.clone()],
    ));
    groups.push(ProxyGroup::select(
        &template.suspect_cn,
        vec![DIRECT.to_string(), template.entry.clone(), REJECT.to_string()],
    ));
    groups.push(ProxyGroup::select(
        &template.final_catch,
        vec![DIRECT.to_string(), template.entry.clone()],
    ));
    groups.push(ProxyGroup::select(
        &template.malware,
        vec![REJECT.to_string(), DIRECT.to_string()],
    ));
    groups.push(ProxyGroup::select(
        &template.adblock,
        vec![REJECT.to_string(), DIRECT.to_string(), template.entry.clone()],
    ));

    // Region selector lists only the labels that actually have members.
    let active: Vec<String> = region_groups.iter().map(|g| g.label.clone()).collect();
    groups.push(ProxyGroup::select(
        &template.region_selector,
        if active.is_empty() {
            vec![REJECT.to_string()]
        } else {
            active
        },
    ));

    // One group per catalog label, populated or REJECT-only.
    for label in &template.region_labels {
        let members = region_groups
            .iter()
            .find(|g| &g.label == label)
            .map(|g| g.members.clone());
        groups.push(ProxyGroup::select(
            label,
            members.unwrap_or_else(|| vec![REJECT.to_string()]),
        ));
    }

    RoutingConfig {
        proxies: nodes.to_vec(),
        proxy_groups: groups,
        rules,
        ..RoutingConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, GroupTemplate};
    use serde_yaml::{Mapping, Value};

    fn node(name: &str) -> ProxyNode {
        let mut map = Mapping::new();
        map.insert(Value::from("name"), Value::from(name));
        map.insert(Value::from("type"), Value::from("ss"));
        map.insert(Value::from("server"), Value::from("example.net"));
        ProxyNode::from_mapping(map)
    }

    fn region(label: &str, members: &[&str]) -> RegionGroup {
        RegionGroup {
            label: label.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_group_list_shape_is_fixed() {
        let template = GroupTemplate::default();
        let config = assemble(&[node("[10ms] JP-1")], &[], Vec::new(), &template);

        // 10 fixed groups plus one per catalog label, regardless of hits
        assert_eq!(config.proxy_groups.len(), 10 + template.region_labels.len());
        assert_eq!(config.proxy_groups[0].name, catalog::GROUP_ENTRY);
        assert_eq!(config.proxy_groups[9].name, catalog::GROUP_REGION);
        assert_eq!(config.proxy_groups[10].name, template.region_labels[0]);
    }

    #[test]
    fn test_all_names_feed_auto_fastest_manual_in_rank_order() {
        let template = GroupTemplate::default();
        let nodes = vec![node("[10ms] fast"), node("[50ms] mid"), node("[200ms] slow")];
        let config = assemble(&nodes, &[], Vec::new(), &template);

        let expected = vec![
            "[10ms] fast".to_string(),
            "[50ms] mid".to_string(),
            "[200ms] slow".to_string(),
        ];
        assert_eq!(config.proxy_groups[1].proxies, expected);
        assert_eq!(config.proxy_groups[2].proxies, expected);
        assert_eq!(config.proxy_groups[3].proxies, expected);
    }

    #[test]
    fn test_empty_regions_get_reject_placeholder() {
        let template = GroupTemplate::default();
        let japan = region("🇯🇵 日本", &["[10ms] JP-1"]);
        let config = assemble(&[node("[10ms] JP-1")], &[japan], Vec::new(), &template);

        let jp_group = &config.proxy_groups[10];
        assert_eq!(jp_group.name, "🇯🇵 日本");
        assert_eq!(jp_group.proxies, vec!["[10ms] JP-1"]);

        // every other region group is a REJECT sentinel
        for group in &config.proxy_groups[11..] {
            assert_eq!(group.proxies, vec!["REJECT"]);
        }
    }

    #[test]
    fn test_region_selector_lists_active_labels_or_reject() {
        let template = GroupTemplate::default();

        let config = assemble(&[node("a")], &[], Vec::new(), &template);
        assert_eq!(config.proxy_groups[9].proxies, vec!["REJECT"]);

        let groups = vec![
            region("🇯🇵 日本", &["a"]),
            region("🇸🇬 新加坡", &["b"]),
        ];
        let config = assemble(&[node("a"), node("b")], &groups, Vec::new(), &template);
        assert_eq!(config.proxy_groups[9].proxies, vec!["🇯🇵 日本", "🇸🇬 新加坡"]);
    }

    #[test]
    fn test_rules_and_nodes_pass_through() {
        let template = GroupTemplate::default();
        let rules = catalog::default_rules();
        let config = assemble(&[node("a")], &[], rules.clone(), &template);
        assert_eq!(config.rules, rules);
        assert_eq!(config.proxies.len(), 1);
        assert_eq!(config.proxies[0].name(), "a");
    }
}
