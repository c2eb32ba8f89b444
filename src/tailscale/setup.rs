use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::command::{Executor, Invocation};
use crate::common::{info, Result};
use crate::config::{filepath, Config, NetworkConfig, TailscaleConfig};
use crate::report::{self, logscan, Status};
use crate::tailscale::INSTALL_SCRIPT_URL;

/// Time given to the tunnel to come up after `tailscale up`.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(2);

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Install,
    IpForwarding,
    Authenticate,
    ExitNode,
    Verify,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Install,
        Step::IpForwarding,
        Step::Authenticate,
        Step::ExitNode,
        Step::Verify,
    ];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Step::Install => "Installing Tailscale",
            Step::IpForwarding => "Enabling IP forwarding",
            Step::Authenticate => "Authenticating Tailscale",
            Step::ExitNode => "Configuring exit node",
            Step::Verify => "Verifying installation",
        };
        f.write_str(s)
    }
}

/// `tailscale up` with the flags enabled in the configuration.
pub fn up_invocation(config: &TailscaleConfig) -> Invocation {
    let mut up = Invocation::new("tailscale").arg("up");
    for (on, flag) in [
        (config.accept_routes(), "--accept-routes"),
        (config.accept_dns(), "--accept-dns"),
        (config.shields_up(), "--shields-up"),
        (config.advertise_exit_node(), "--advertise-exit-node"),
        (config.ssh_enabled(), "--ssh"),
    ] {
        if on {
            up = up.arg(flag);
        }
    }
    if let Some(hostname) = config.hostname() {
        up = up.args(["--hostname", hostname]);
    }
    if let Some(operator) = config.operator() {
        up = up.args(["--operator", operator]);
    }
    if !config.advertise_routes().is_empty() {
        up = up
            .arg("--advertise-routes")
            .arg(config.advertise_routes().join(","));
    }
    up
}

/// `tailscale set --exit-node ...`, `None` when no exit node is configured.
pub fn exit_node_invocation(network: &NetworkConfig) -> Option<Invocation> {
    let exit_node = network.exit_node()?;
    let mut set = Invocation::new("tailscale").args(["set", "--exit-node", exit_node]);
    if network.exit_node_allow_lan_access() {
        set = set.arg("--exit-node-allow-lan-access");
    }
    Some(set)
}

/// Content persisted to the sysctl drop-in.
pub fn forwarding_conf(network: &NetworkConfig) -> String {
    let mut conf = String::new();
    if network.ipv4_enabled() {
        conf.push_str("net.ipv4.ip_forward = 1\n");
    }
    if network.ipv6_enabled() {
        conf.push_str("net.ipv6.conf.all.forwarding = 1\n");
    }
    conf
}

/// Installs, authenticates and configures Tailscale.
pub struct TailscaleSetup<E> {
    executor: E,
    tailscale: TailscaleConfig,
    network: NetworkConfig,
    sysctl_conf: PathBuf,
    settle: Duration,
}

impl<E> TailscaleSetup<E>
where
    E: Executor,
{
    pub fn new(config: &Config, executor: E) -> Self {
        Self {
            executor,
            tailscale: config.tailscale_config.clone(),
            network: config.network_config.clone(),
            sysctl_conf: PathBuf::from(filepath::SYSCTL_TAILSCALE),
            settle: DEFAULT_SETTLE,
        }
    }

    pub fn with_sysctl_conf(mut self, path: impl Into<PathBuf>) -> Self {
        self.sysctl_conf = path.into();
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run every step, continuing past failures, then print the summary.
    /// Returns the steps that failed.
    pub async fn run(&self) -> Vec<Step> {
        report::title("TAILSCALE SETUP");

        let mut failed = Vec::new();
        for step in Step::ALL {
            let ok = match step {
                Step::Install => self.install().await,
                Step::IpForwarding => self.enable_ip_forwarding().await,
                Step::Authenticate => self.login().await,
                Step::ExitNode => self.configure_exit_node().await,
                Step::Verify => self.verify().await,
            };
            if !ok {
                println!("\n⚠ Warning at step: {}", step);
                if step == Step::Authenticate {
                    println!("\n  You can complete authentication later by running:");
                    println!("  sudo tailscale up");
                }
                failed.push(step);
            }
        }

        self.print_summary().await;
        info!(?failed, "Setup finished");
        failed
    }

    pub async fn is_installed(&self) -> bool {
        self.executor
            .succeeds(&Invocation::new("which").arg("tailscale"))
            .await
    }

    pub async fn is_logged_in(&self) -> bool {
        let out = self
            .executor
            .output(&Invocation::new("tailscale").arg("status"))
            .await;
        out.success() && !logscan::contains_term(&out.stdout, "not logged in")
    }

    pub async fn install(&self) -> bool {
        println!("\n📦 Installing Tailscale...");

        if self.is_installed().await {
            report::line(Status::Pass, "Tailscale is already installed");
            let version = self
                .executor
                .output(&Invocation::new("tailscale").arg("version"))
                .await;
            if version.success() {
                println!("  Version: {}", version.stdout_trimmed());
            }
            return true;
        }

        match self.download_and_install().await {
            Ok(()) => {
                report::line(Status::Pass, "Tailscale installed successfully");
                true
            }
            Err(err) => {
                report::line(Status::Fail, format!("Failed to install Tailscale: {}", err));
                false
            }
        }
    }

    async fn download_and_install(&self) -> Result<()> {
        println!("  Downloading Tailscale installer...");
        let script = self
            .executor
            .checked(
                &Invocation::new("curl")
                    .args(["-fsSL", INSTALL_SCRIPT_URL])
                    .timeout(DOWNLOAD_TIMEOUT),
            )
            .await?;

        println!("  Running installer...");
        self.executor
            .checked_with_input(
                &Invocation::new("sh").timeout(INSTALL_TIMEOUT),
                &script.stdout,
            )
            .await?;
        Ok(())
    }

    /// Only runs when routes or an exit node are advertised.
    pub async fn enable_ip_forwarding(&self) -> bool {
        if !self.tailscale.needs_forwarding() {
            return true;
        }

        println!("\n🔀 Enabling IP forwarding...");
        match self.write_forwarding().await {
            Ok(()) => {
                report::line(
                    Status::Pass,
                    format!(
                        "IP forwarding persistence configured in {}",
                        self.sysctl_conf.display()
                    ),
                );
                true
            }
            Err(err) => {
                report::line(Status::Fail, format!("Failed to enable IP forwarding: {}", err));
                false
            }
        }
    }

    async fn write_forwarding(&self) -> Result<()> {
        if self.network.ipv4_enabled() {
            self.executor
                .checked(&Invocation::new("sysctl").args(["-w", "net.ipv4.ip_forward=1"]))
                .await?;
            report::line(Status::Pass, "IPv4 forwarding enabled");
        }
        if self.network.ipv6_enabled() {
            self.executor
                .checked(
                    &Invocation::new("sysctl").args(["-w", "net.ipv6.conf.all.forwarding=1"]),
                )
                .await?;
            report::line(Status::Pass, "IPv6 forwarding enabled");
        }

        tokio::fs::write(&self.sysctl_conf, forwarding_conf(&self.network)).await?;
        Ok(())
    }

    pub async fn login(&self) -> bool {
        println!("\n🔐 Authenticating Tailscale...");

        if self.is_logged_in().await {
            report::line(Status::Pass, "Already logged in");
            return true;
        }

        let up = up_invocation(&self.tailscale);
        println!("  Running: {}", up);
        println!("\n  ⚠ A browser window will open for authentication");
        println!("  ⚠ Complete the authentication in your browser\n");

        if self.executor.attached(&up).await == 0 {
            println!();
            report::line(Status::Pass, "Tailscale authenticated successfully");
            tokio::time::sleep(self.settle).await;
            true
        } else {
            println!();
            report::line(Status::Fail, "Authentication failed");
            false
        }
    }

    pub async fn configure_exit_node(&self) -> bool {
        let Some(set) = exit_node_invocation(&self.network) else {
            return true;
        };

        println!(
            "\n🌐 Configuring exit node: {}",
            self.network.exit_node().unwrap_or_default()
        );
        match self.executor.checked(&set).await {
            Ok(_) => {
                report::line(Status::Pass, "Exit node configured");
                true
            }
            Err(err) => {
                report::line(Status::Fail, format!("Failed to configure exit node: {}", err));
                false
            }
        }
    }

    /// Binary present, service active and logged in.
    pub async fn verify(&self) -> bool {
        println!("\n✅ Verifying installation...");

        let installed = self.is_installed().await;
        if installed {
            report::line(Status::Pass, "Tailscale binary installed");
        } else {
            report::line(Status::Fail, "Tailscale binary not found");
        }

        let active = self
            .executor
            .output(&Invocation::new("systemctl").args(["is-active", "tailscaled"]))
            .await
            .stdout_trimmed()
            == "active";
        if active {
            report::line(Status::Pass, "Tailscaled service is running");
        } else {
            report::line(Status::Fail, "Tailscaled service is not running");
        }

        let logged_in = self.is_logged_in().await;
        if logged_in {
            report::line(Status::Pass, "Tailscale is authenticated");
        } else {
            report::line(Status::Warn, "Tailscale is not authenticated");
        }

        installed && active && logged_in
    }

    async fn print_summary(&self) {
        report::title("SETUP COMPLETE");

        println!("\n🌐 Tailscale IP Addresses...");
        for (flag, label) in [("-4", "IPv4"), ("-6", "IPv6")] {
            let out = self
                .executor
                .output(&Invocation::new("tailscale").args(["ip", flag]))
                .await;
            if out.success() && !out.stdout_trimmed().is_empty() {
                println!("  {}: {}", label, out.stdout_trimmed());
            }
        }

        println!("\n📊 Tailscale Status...");
        let status = self
            .executor
            .output(&Invocation::new("tailscale").arg("status"))
            .await;
        if status.success() {
            println!("{}", status.stdout);
        } else {
            report::line(Status::Fail, "Failed to get status");
        }

        let ts = &self.tailscale;
        println!("\n📝 Configuration:");
        println!("   Hostname: {}", ts.hostname().unwrap_or("default"));
        println!("   Accept routes: {}", ts.accept_routes());
        println!("   Accept DNS: {}", ts.accept_dns());
        println!("   SSH enabled: {}", ts.ssh_enabled());
        println!("   Exit node: {}", ts.advertise_exit_node());
        if !ts.advertise_routes().is_empty() {
            println!("   Advertised routes: {}", ts.advertise_routes().join(", "));
        }

        println!("\n📋 Useful Commands:");
        println!("   Show status:    tailscale status");
        println!("   Show IP:        tailscale ip");
        println!("   Show peers:     tailscale status --peers");
        println!("   Logout:         sudo tailscale logout");
        println!("   Debug:          sudo tailscale-debug");
        println!("   View logs:      sudo tailscale-logs");

        println!("\n🌐 Admin Console:");
        println!("   https://login.tailscale.com/admin/machines");

        println!("\n{}\n", report::rule());
    }
}
