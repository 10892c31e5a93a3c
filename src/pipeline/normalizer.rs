//! Node normalization: validity filtering and name deduplication

use crate::pipeline::models::ProxyNode;
use serde_yaml::Value;
use std::collections::HashMap;

/// Validate raw descriptors and make every surviving name unique.
///
/// Entries that are not mappings, lack `name`/`type`/`server`, or have an
/// empty trimmed name are skipped without error. A repeated name gets a
/// `_N` suffix; the counter is scoped to the original name and increases
/// monotonically across the whole input.
///
/// Returns the surviving nodes (input order) and the skipped-entry count.
pub fn normalize(raw: Vec<Value>) -> (Vec<ProxyNode>, usize) {
    let mut seen: HashMap<String, u32> = HashMap::new();
    let mut nodes = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for value in raw {
        let Some(mut node) = ProxyNode::from_value(value) else {
            skipped += 1;
            continue;
        };

        let name = node.name().to_string();
        match seen.get_mut(&name) {
            Some(count) => {
                *count += 1;
                node.set_name(format!("{}_{}", name, count));
            }
            None => {
                seen.insert(name, 0);
            }
        }
        nodes.push(node);
    }

    (nodes, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Mapping;

    fn raw(name: &str) -> Value {
        let mut map = Mapping::new();
        map.insert(Value::from("name"), Value::from(name));
        map.insert(Value::from("type"), Value::from("vmess"));
        map.insert(Value::from("server"), Value::from("example.net"));
        map.insert(Value::from("port"), Value::from(443));
        Value::Mapping(map)
    }

    fn names(nodes: &[ProxyNode]) -> Vec<&str> {
        nodes.iter().map(ProxyNode::name).collect()
    }

    #[test]
    fn test_duplicate_names_get_suffixes() {
        let (nodes, skipped) = normalize(vec![raw("A"), raw("A"), raw("B"), raw("A")]);
        assert_eq!(names(&nodes), vec!["A", "A_1", "B", "A_2"]);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_counter_is_per_name() {
        let (nodes, _) = normalize(vec![raw("A"), raw("B"), raw("A"), raw("B")]);
        assert_eq!(names(&nodes), vec!["A", "B", "A_1", "B_1"]);
    }

    #[test]
    fn test_invalid_entries_are_skipped_and_counted() {
        let mut no_server = Mapping::new();
        no_server.insert(Value::from("name"), Value::from("x"));
        no_server.insert(Value::from("type"), Value::from("ss"));

        let input = vec![
            Value::from("just a string"),
            Value::Mapping(no_server),
            raw("   "),
            raw("ok"),
        ];
        let (nodes, skipped) = normalize(input);
        assert_eq!(names(&nodes), vec!["ok"]);
        assert_eq!(skipped, 3);
    }

    #[test]
    fn test_names_are_trimmed_before_dedup() {
        let (nodes, _) = normalize(vec![raw(" A "), raw("A")]);
        assert_eq!(names(&nodes), vec!["A", "A_1"]);
    }

    #[test]
    fn test_output_names_are_unique() {
        let input: Vec<Value> = (0..20).map(|i| raw(if i % 3 == 0 { "A" } else { "B" })).collect();
        let (nodes, _) = normalize(input);
        let mut seen = std::collections::HashSet::new();
        for node in &nodes {
            assert!(seen.insert(node.name().to_string()), "dup: {}", node.name());
        }
    }

    #[test]
    fn test_empty_input() {
        let (nodes, skipped) = normalize(Vec::new());
        assert!(nodes.is_empty());
        assert_eq!(skipped, 0);
    }
}
