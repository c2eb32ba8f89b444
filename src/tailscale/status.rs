use serde::Deserialize;

/// The parts of `tailscale status --json` the checks read. Unknown fields
/// are ignored and every field may be absent.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    #[serde(rename = "BackendState")]
    pub backend_state: Option<String>,
    #[serde(rename = "Self")]
    pub self_node: Option<Node>,
    #[serde(rename = "MagicDNSSuffix")]
    pub magic_dns_suffix: Option<String>,
    #[serde(rename = "ExitNodeStatus")]
    pub exit_node_status: Option<ExitNodeStatus>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Node {
    #[serde(rename = "HostName", default)]
    pub host_name: String,
    #[serde(rename = "TailscaleIPs", default)]
    pub tailscale_ips: Vec<String>,
    // null for nodes without approved routes.
    #[serde(rename = "AllowedIPs", default)]
    pub allowed_ips: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ExitNodeStatus {
    #[serde(rename = "Online", default)]
    pub online: bool,
    #[serde(rename = "TailscaleIPs", default)]
    pub tailscale_ips: Vec<String>,
}

impl Status {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn allowed_ips(&self) -> &[String] {
        self.self_node
            .as_ref()
            .and_then(|node| node.allowed_ips.as_deref())
            .unwrap_or_default()
    }
}

impl ExitNodeStatus {
    pub fn first_ip(&self) -> &str {
        self.tailscale_ips.first().map_or("Unknown", String::as_str)
    }
}
