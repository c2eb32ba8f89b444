use std::path::PathBuf;

use tokio::fs;

use crate::command::{Executor, Invocation};
use crate::common::debug;
use crate::config::{filepath, Config, NetworkConfig, TailscaleConfig};
use crate::report::{self, logscan, Report, Status as Mark};
use crate::tailscale::status::Status;
use crate::tailscale::{CONTROL_PLANE, MAGIC_DNS_RESOLVER, WIREGUARD_PORT};

const STATUS_EXCERPT_CHARS: usize = 500;
const PEER_DISPLAY: usize = 10;
const LOG_ERROR_WORDS: [&str; 3] = ["error", "fail", "warning"];

const HINTS: [&str; 3] = [
    "Check your Tailscale admin console: https://login.tailscale.com/admin/machines",
    "Review logs: sudo journalctl -u tailscaled -f",
    "Try restarting: sudo systemctl restart tailscaled",
];

/// Runs the Tailscale checklist and collects the outcome in a [`Report`].
pub struct TailscaleDebugger<E> {
    executor: E,
    tailscale: TailscaleConfig,
    network: NetworkConfig,
    resolv_conf: PathBuf,
    report: Report,
    // `tailscale status --json`, fetched once on first use.
    status: Option<Option<Status>>,
}

impl<E> TailscaleDebugger<E>
where
    E: Executor,
{
    pub fn new(config: &Config, executor: E) -> Self {
        Self {
            executor,
            tailscale: config.tailscale_config.clone(),
            network: config.network_config.clone(),
            resolv_conf: PathBuf::from(filepath::RESOLV_CONF),
            report: Report::new(),
            status: None,
        }
    }

    pub fn with_resolv_conf(mut self, path: impl Into<PathBuf>) -> Self {
        self.resolv_conf = path.into();
        self
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub async fn run(&mut self) -> &Report {
        report::banner("TAILSCALE DIAGNOSTICS");

        self.check_installation().await;
        self.check_service().await;
        self.check_authentication().await;
        self.check_ip_addresses().await;
        self.check_connectivity().await;
        self.check_routes().await;
        self.check_exit_node().await;
        self.check_dns().await;
        self.check_ssh();
        self.check_firewall().await;
        self.test_control_plane().await;
        self.check_logs().await;

        print!("{}", self.report.summary(&HINTS));
        println!();
        &self.report
    }

    async fn status_json(&mut self) -> Option<Status> {
        if self.status.is_none() {
            let out = self
                .executor
                .output(&Invocation::new("tailscale").args(["status", "--json"]))
                .await;
            let parsed = if out.success() {
                Status::parse(&out.stdout)
                    .map_err(|err| debug!(%err, "Parse tailscale status"))
                    .ok()
            } else {
                None
            };
            self.status = Some(parsed);
        }
        self.status.clone().flatten()
    }

    pub async fn check_installation(&mut self) {
        report::header("INSTALLATION CHECK");

        let which = self
            .executor
            .output(&Invocation::new("which").arg("tailscale"))
            .await;
        if !which.success() {
            report::line(Mark::Fail, "Tailscale is not installed");
            self.report
                .fail_with("Tailscale is not installed", ["sudo tailscale-setup"]);
            return;
        }

        report::line(
            Mark::Pass,
            format!("Tailscale binary found: {}", which.stdout_trimmed()),
        );
        self.report.pass("Tailscale is installed");

        let version = self
            .executor
            .output(&Invocation::new("tailscale").arg("version"))
            .await;
        if version.success() {
            println!("  Version: {}", version.stdout_trimmed());
        }
    }

    pub async fn check_service(&mut self) {
        report::header("SERVICE STATUS");

        let active = self
            .executor
            .output(&Invocation::new("systemctl").args(["is-active", "tailscaled"]))
            .await;
        if active.stdout_trimmed() == "active" {
            report::line(Mark::Pass, "Tailscaled service: RUNNING");
            self.report.pass("Tailscaled service is running");
        } else {
            report::line(Mark::Fail, "Tailscaled service: NOT RUNNING");
            self.report.fail_with(
                "Tailscaled service is not running",
                [
                    "sudo systemctl start tailscaled",
                    "sudo systemctl enable tailscaled",
                ],
            );

            let status = self
                .executor
                .output(&Invocation::new("systemctl").args(["status", "tailscaled"]))
                .await;
            let excerpt: String = status.stdout.chars().take(STATUS_EXCERPT_CHARS).collect();
            println!("\n  Service status:\n{}", excerpt);
        }

        let enabled = self
            .executor
            .output(&Invocation::new("systemctl").args(["is-enabled", "tailscaled"]))
            .await;
        if enabled.stdout_trimmed() == "enabled" {
            report::line(Mark::Pass, "Tailscaled service: ENABLED at boot");
        } else {
            report::line(Mark::Warn, "Tailscaled service: NOT ENABLED at boot");
            self.report.warn("Tailscaled service not enabled at boot");
        }
    }

    pub async fn check_authentication(&mut self) {
        report::header("AUTHENTICATION STATUS");

        let out = self
            .executor
            .output(&Invocation::new("tailscale").arg("status"))
            .await;
        if !out.success() {
            report::line(Mark::Fail, "Could not check authentication status");
            self.report.fail("Cannot check authentication status");
            return;
        }

        if logscan::contains_any(&out.stdout, &["not logged in", "logged out"]) {
            report::line(Mark::Fail, "Tailscale: NOT AUTHENTICATED");
            self.report
                .fail_with("Tailscale is not authenticated", ["sudo tailscale up"]);
            println!("\n  To authenticate, run: sudo tailscale up");
        } else {
            report::line(Mark::Pass, "Tailscale: AUTHENTICATED");
            self.report.pass("Tailscale is authenticated");
        }
    }

    pub async fn check_ip_addresses(&mut self) {
        report::header("IP ADDRESS CHECK");

        let v4 = self
            .executor
            .output(&Invocation::new("tailscale").args(["ip", "-4"]))
            .await;
        if v4.success() && !v4.stdout_trimmed().is_empty() {
            report::line(Mark::Pass, format!("IPv4 address: {}", v4.stdout_trimmed()));
            self.report
                .pass(format!("Has IPv4 address: {}", v4.stdout_trimmed()));
        } else {
            report::line(Mark::Fail, "No IPv4 address assigned");
            self.report.fail_with(
                "No IPv4 address",
                ["Check authentication and connection", "sudo tailscale status"],
            );
        }

        // IPv6 is informational only.
        let v6 = self
            .executor
            .output(&Invocation::new("tailscale").args(["ip", "-6"]))
            .await;
        if v6.success() && !v6.stdout_trimmed().is_empty() {
            report::line(Mark::Pass, format!("IPv6 address: {}", v6.stdout_trimmed()));
        } else {
            report::line(Mark::Warn, "No IPv6 address assigned");
        }
    }

    /// Every status line after the first is counted as a peer.
    pub async fn check_connectivity(&mut self) {
        report::header("CONNECTIVITY STATUS");

        let out = self
            .executor
            .output(&Invocation::new("tailscale").arg("status"))
            .await;
        if !out.success() {
            report::line(Mark::Fail, "Could not get Tailscale status");
            return;
        }

        let lines: Vec<&str> = out.stdout_trimmed().lines().collect();
        if lines.len() <= 1 {
            report::line(Mark::Warn, "No peers found");
            self.report.warn("No Tailscale peers connected");
            return;
        }

        let peers = lines.len() - 1;
        report::line(Mark::Pass, format!("Connected to {} peer(s)\n", peers));
        for line in lines.iter().take(PEER_DISPLAY) {
            println!("  {}", line);
        }
        if lines.len() > PEER_DISPLAY {
            println!("\n  ... and {} more peer(s)", lines.len() - PEER_DISPLAY);
        }
    }

    pub async fn check_routes(&mut self) {
        report::header("ROUTE CONFIGURATION");

        let advertised = self.tailscale.advertise_routes();
        if advertised.is_empty() {
            println!("No routes configured for advertisement");
        } else {
            println!("Configured advertised routes: {}", advertised.join(", "));
        }
        println!(
            "\nAccepting routes: {}",
            enabled_label(self.tailscale.accept_routes())
        );

        if let Some(status) = self.status_json().await {
            let allowed = status.allowed_ips();
            if !allowed.is_empty() {
                println!("\nAllowed IPs: {}", allowed.join(", "));
            }
        }
    }

    pub async fn check_exit_node(&mut self) {
        report::header("EXIT NODE STATUS");

        if let Some(exit_node) = self.network.exit_node() {
            println!("Configured exit node: {}", exit_node);
        }

        if self.tailscale.advertise_exit_node() {
            report::line(Mark::Pass, "Advertising as exit node");

            let sysctl = self
                .executor
                .output(&Invocation::new("sysctl").arg("net.ipv4.ip_forward"))
                .await;
            if sysctl.stdout.contains("= 1") {
                report::line(Mark::Pass, "IP forwarding enabled");
            } else {
                report::line(Mark::Fail, "IP forwarding disabled");
                self.report.fail_with(
                    "IP forwarding disabled (required for exit node)",
                    [
                        "sudo sysctl -w net.ipv4.ip_forward=1".to_owned(),
                        format!(
                            "echo 'net.ipv4.ip_forward = 1' | sudo tee {}",
                            filepath::SYSCTL_TAILSCALE
                        ),
                    ],
                );
            }
        } else {
            println!("Not advertising as exit node");
        }

        if let Some(exit) = self.status_json().await.and_then(|s| s.exit_node_status) {
            println!();
            if exit.online {
                report::line(Mark::Pass, format!("Using exit node: {}", exit.first_ip()));
            } else {
                report::line(Mark::Warn, "Exit node offline");
            }
        }
    }

    pub async fn check_dns(&mut self) {
        report::header("DNS CONFIGURATION");

        println!(
            "Accepting DNS: {}",
            enabled_label(self.tailscale.accept_dns())
        );

        if let Some(status) = self.status_json().await {
            match status.magic_dns_suffix.filter(|s| !s.is_empty()) {
                Some(suffix) => {
                    report::line(Mark::Pass, format!("MagicDNS suffix: {}", suffix));
                    self.report.pass(format!("MagicDNS enabled: {}", suffix));
                }
                None => report::line(Mark::Warn, "MagicDNS not configured"),
            }
        }

        if let Ok(content) = fs::read_to_string(&self.resolv_conf).await {
            if content.contains(MAGIC_DNS_RESOLVER) {
                report::line(
                    Mark::Pass,
                    format!("Tailscale DNS configured in {}", self.resolv_conf.display()),
                );
            } else {
                report::line(
                    Mark::Warn,
                    format!("Tailscale DNS not in {}", self.resolv_conf.display()),
                );
            }
        }
    }

    pub fn check_ssh(&mut self) {
        report::header("SSH CONFIGURATION");

        if self.tailscale.ssh_enabled() {
            report::line(Mark::Pass, "Tailscale SSH enabled in config");
            println!("\n  Connect from other devices: ssh user@hostname");
            println!("  (hostname is the Tailscale machine name)");
        } else {
            report::line(Mark::Warn, "Tailscale SSH not enabled");
        }
    }

    /// Informational only; Tailscale does not need inbound rules.
    pub async fn check_firewall(&mut self) {
        report::header("FIREWALL STATUS");

        if !self.executor.succeeds(&Invocation::new("which").arg("ufw")).await {
            report::line(Mark::Warn, "UFW not installed");
            return;
        }

        let status = self
            .executor
            .output(&Invocation::new("ufw").arg("status"))
            .await;
        if logscan::contains_term(&status.stdout, "inactive") {
            report::line(
                Mark::Pass,
                "UFW is inactive (Tailscale doesn't require firewall rules)",
            );
            return;
        }

        println!("UFW is active");
        if logscan::contains_term(&status.stdout, "tailscale")
            || status.stdout.contains(&WIREGUARD_PORT.to_string())
        {
            report::line(Mark::Pass, "Tailscale port allowed");
        } else {
            report::line(
                Mark::Warn,
                format!("Tailscale port ({}/udp) not explicitly allowed", WIREGUARD_PORT),
            );
            println!("  (This is usually fine - Tailscale can work without explicit rules)");
        }
    }

    pub async fn test_control_plane(&mut self) {
        report::header("CONNECTIVITY TEST");

        println!("Testing connection to Tailscale coordination server...");

        let reach_fixes = [
            "Check internet connectivity",
            "Check firewall settings",
            "Verify no proxy blocking connections",
        ];

        if self.executor.resolve(CONTROL_PLANE).await {
            report::line(Mark::Pass, format!("Can resolve {}", CONTROL_PLANE));
        } else {
            report::line(Mark::Fail, format!("Cannot resolve {}", CONTROL_PLANE));
            self.report.fail_with(
                "Cannot resolve Tailscale coordination server",
                ["Check DNS settings in /etc/resolv.conf"]
                    .into_iter()
                    .chain(reach_fixes),
            );
        }

        let curl = self
            .executor
            .output(
                &Invocation::new("curl")
                    .args(["-s", "-o", "/dev/null", "-w", "%{http_code}"])
                    .arg(format!("https://{}", CONTROL_PLANE))
                    .args(["--max-time", "5"]),
            )
            .await;
        if curl.success() && curl.stdout.contains("200") {
            report::line(Mark::Pass, format!("Can reach {} via HTTPS", CONTROL_PLANE));
        } else {
            report::line(Mark::Fail, format!("Cannot reach {}", CONTROL_PLANE));
            self.report
                .fail_with("Cannot reach Tailscale coordination server", reach_fixes);
        }
    }

    /// Prints the recent error count. Never changes the report.
    pub async fn check_logs(&mut self) {
        report::header("LOG ANALYSIS");

        let out = self
            .executor
            .output(&Invocation::new("journalctl").args([
                "-u",
                "tailscaled",
                "-n",
                "50",
                "--no-pager",
            ]))
            .await;
        if !out.success() {
            report::line(Mark::Warn, "Could not read logs");
            return;
        }

        let errors = logscan::count_matching(out.stdout_trimmed().lines(), &LOG_ERROR_WORDS);
        if errors > 0 {
            report::line(
                Mark::Warn,
                format!("Found {} error/warning entries in recent logs", errors),
            );
            println!("  Run: sudo journalctl -u tailscaled -f");
        } else {
            report::line(Mark::Pass, "No obvious errors in recent logs");
        }
    }
}

fn enabled_label(on: bool) -> &'static str {
    if on {
        "Enabled"
    } else {
        "Disabled"
    }
}
