//! Pipeline data models

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::time::Duration;

/// A single proxy node descriptor.
///
/// Wraps the raw YAML mapping so protocol-specific fields pass through to the
/// output untouched and in their original order. `name`, `type` and `server`
/// are required; `port` is only needed once the node is probed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyNode(Mapping);

impl ProxyNode {
    /// Validate a raw descriptor and turn it into a node.
    ///
    /// Returns `None` when the value is not a mapping, lacks `name`, `type`
    /// or `server`, or has a name that is empty after trimming. The stored
    /// name is the trimmed one.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Mapping(mut map) = value else {
            return None;
        };
        if !map.contains_key("type") || !map.contains_key("server") {
            return None;
        }

        let name = scalar_to_string(map.get("name")?)?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        map.insert(Value::from("name"), Value::from(name));

        Some(Self(map))
    }

    /// Build a node from an existing mapping without validation.
    pub fn from_mapping(map: Mapping) -> Self {
        Self(map)
    }

    pub fn name(&self) -> &str {
        self.0.get("name").and_then(Value::as_str).unwrap_or("")
    }

    pub fn set_name(&mut self, name: String) {
        self.0.insert(Value::from("name"), Value::from(name));
    }

    pub fn server(&self) -> Option<&str> {
        self.0.get("server").and_then(Value::as_str)
    }

    /// The advertised port, tolerating both numeric and string forms.
    /// Zero and out-of-range values count as missing.
    pub fn port(&self) -> Option<u16> {
        let port = match self.0.get("port")? {
            Value::Number(n) => u16::try_from(n.as_u64()?).ok()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        (port != 0).then_some(port)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }
}

impl fmt::Display for ProxyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.server(), self.port()) {
            (Some(server), Some(port)) => write!(f, "{} ({}:{})", self.name(), server, port),
            _ => write!(f, "{}", self.name()),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Outcome of probing one node: the node plus its connect latency,
/// or `None` when it was unreachable within the timeout.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub node: ProxyNode,
    pub latency: Option<Duration>,
}

impl ProbeOutcome {
    pub fn reachable(node: ProxyNode, latency: Duration) -> Self {
        Self {
            node,
            latency: Some(latency),
        }
    }

    pub fn unreachable(node: ProxyNode) -> Self {
        Self {
            node,
            latency: None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.latency.is_some()
    }
}

/// One region bucket: a fixed label and the member node names, in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGroup {
    pub label: String,
    pub members: Vec<String>,
}

/// Selection group kinds understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKind {
    Select,
    Fallback,
    UrlTest,
}

/// A named selection group exposed to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<u32>,
    pub proxies: Vec<String>,
}

impl ProxyGroup {
    pub fn select(name: impl Into<String>, proxies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: GroupKind::Select,
            url: None,
            interval: None,
            tolerance: None,
            proxies,
        }
    }

    pub fn fallback(name: impl Into<String>, url: &str, interval: u32, proxies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: GroupKind::Fallback,
            url: Some(url.to_string()),
            interval: Some(interval),
            tolerance: None,
            proxies,
        }
    }

    pub fn url_test(
        name: impl Into<String>,
        url: &str,
        interval: u32,
        tolerance: u32,
        proxies: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: GroupKind::UrlTest,
            url: Some(url.to_string()),
            interval: Some(interval),
            tolerance: Some(tolerance),
            proxies,
        }
    }
}

/// DNS section of the output config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsConfig {
    pub enable: bool,
    #[serde(rename = "enhanced-mode")]
    pub enhanced_mode: String,
    pub fallback: Vec<String>,
    pub ipv6: bool,
    pub listen: String,
    pub nameserver: Vec<String>,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            enhanced_mode: "redir-host".to_string(),
            fallback: vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()],
            ipv6: true,
            listen: ":1053".to_string(),
            nameserver: vec!["223.5.5.5".to_string(), "114.114.114.114".to_string()],
        }
    }
}

/// A sniffable port entry, either a plain port or a range string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SniffPort {
    Number(u16),
    Range(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SniffHttp {
    #[serde(rename = "override-destination")]
    pub override_destination: bool,
    pub ports: Vec<SniffPort>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SniffTls {
    pub ports: Vec<SniffPort>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SniffRules {
    #[serde(rename = "HTTP")]
    pub http: SniffHttp,
    #[serde(rename = "TLS")]
    pub tls: SniffTls,
}

/// Sniffer section of the output config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnifferConfig {
    pub enable: bool,
    #[serde(rename = "skip-domain")]
    pub skip_domain: Vec<String>,
    pub sniff: SniffRules,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            enable: true,
            skip_domain: vec![
                "Mijia Cloud".to_string(),
                "dlg.io.mi.com".to_string(),
                "+.apple.com".to_string(),
            ],
            sniff: SniffRules {
                http: SniffHttp {
                    override_destination: true,
                    ports: vec![SniffPort::Number(80), SniffPort::Range("8080-8880".to_string())],
                },
                tls: SniffTls {
                    ports: vec![SniffPort::Number(443), SniffPort::Number(8443)],
                },
            },
        }
    }
}

/// The assembled routing configuration, ready for serialization.
///
/// Field order matches the rendered key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(rename = "allow-lan")]
    pub allow_lan: bool,
    pub dns: DnsConfig,
    #[serde(rename = "external-controller")]
    pub external_controller: String,
    #[serde(rename = "global-client-fingerprint")]
    pub global_client_fingerprint: String,
    pub ipv6: bool,
    #[serde(rename = "log-level")]
    pub log_level: String,
    #[serde(rename = "mixed-port")]
    pub mixed_port: u16,
    pub mode: String,
    pub proxies: Vec<ProxyNode>,
    #[serde(rename = "proxy-groups")]
    pub proxy_groups: Vec<ProxyGroup>,
    pub rules: Vec<String>,
    pub sniffer: SnifferConfig,
    #[serde(rename = "tcp-concurrent")]
    pub tcp_concurrent: bool,
    #[serde(rename = "unified-delay")]
    pub unified_delay: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            allow_lan: false,
            dns: DnsConfig::default(),
            external_controller: "0.0.0.0:9090".to_string(),
            global_client_fingerprint: "chrome".to_string(),
            ipv6: true,
            log_level: "warning".to_string(),
            mixed_port: 7890,
            mode: "rule".to_string(),
            proxies: Vec::new(),
            proxy_groups: Vec::new(),
            rules: Vec::new(),
            sniffer: SnifferConfig::default(),
            tcp_concurrent: true,
            unified_delay: true,
        }
    }
}
