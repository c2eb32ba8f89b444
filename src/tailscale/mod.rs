//! Tailscale installation, diagnostics and log viewing.

pub mod debug;
pub mod logs;
pub mod setup;
pub mod status;

pub use debug::TailscaleDebugger;
pub use logs::TailscaleLogViewer;
pub use setup::{Step, TailscaleSetup};
pub use status::Status;

pub const CONTROL_PLANE: &str = "controlplane.tailscale.com";
pub const INSTALL_SCRIPT_URL: &str = "https://tailscale.com/install.sh";
pub const MAGIC_DNS_RESOLVER: &str = "100.100.100.100";
pub const WIREGUARD_PORT: u16 = 41641;
