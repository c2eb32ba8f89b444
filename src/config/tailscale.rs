use serde::Deserialize;

// Options passed to `tailscale up`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TailscaleConfig {
    hostname: Option<String>,
    operator: Option<String>,
    accept_routes: Option<bool>,
    accept_dns: Option<bool>,
    shields_up: Option<bool>,
    advertise_exit_node: Option<bool>,
    ssh_enabled: Option<bool>,
    advertise_routes: Option<Vec<String>>,
}

impl TailscaleConfig {
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref().filter(|s| !s.is_empty())
    }
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref().filter(|s| !s.is_empty())
    }
    pub fn accept_routes(&self) -> bool {
        self.accept_routes.unwrap_or(false)
    }
    pub fn accept_dns(&self) -> bool {
        self.accept_dns.unwrap_or(false)
    }
    pub fn shields_up(&self) -> bool {
        self.shields_up.unwrap_or(false)
    }
    pub fn advertise_exit_node(&self) -> bool {
        self.advertise_exit_node.unwrap_or(false)
    }
    pub fn ssh_enabled(&self) -> bool {
        self.ssh_enabled.unwrap_or(false)
    }
    pub fn advertise_routes(&self) -> &[String] {
        self.advertise_routes.as_deref().unwrap_or(&[])
    }

    /// Forwarding is needed as soon as this node routes traffic for others.
    pub fn needs_forwarding(&self) -> bool {
        self.advertise_exit_node() || !self.advertise_routes().is_empty()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NetworkConfig {
    // Peer to route all traffic through.
    exit_node: Option<String>,
    exit_node_allow_lan_access: Option<bool>,
    ipv4_enabled: Option<bool>,
    ipv6_enabled: Option<bool>,
}

impl NetworkConfig {
    pub fn exit_node(&self) -> Option<&str> {
        self.exit_node.as_deref().filter(|s| !s.is_empty())
    }
    pub fn exit_node_allow_lan_access(&self) -> bool {
        self.exit_node_allow_lan_access.unwrap_or(false)
    }
    pub fn ipv4_enabled(&self) -> bool {
        self.ipv4_enabled.unwrap_or(true)
    }
    pub fn ipv6_enabled(&self) -> bool {
        self.ipv6_enabled.unwrap_or(false)
    }
}
