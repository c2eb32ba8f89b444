use std::collections::HashMap;
use std::path::PathBuf;

use tokio::fs;

use crate::account::{self, AllowList, PasswdEntry};
use crate::command::{Executor, Invocation};
use crate::common::debug;
use crate::config::{filepath, Config, FtpConfig};
use crate::report::{self, logscan, Report, Status};
use crate::sys;

const SERVICES: [Service; 3] = [
    Service {
        unit: "vsftpd",
        description: "vsftpd (FTP Server)",
        optional: false,
    },
    Service {
        unit: "ssh",
        description: "SSH/SFTP Server",
        optional: false,
    },
    Service {
        unit: "fail2ban",
        description: "fail2ban (optional)",
        optional: true,
    },
];

const REQUIRED_DIRECTIVES: [(&str, &str, &str); 6] = [
    ("listen", "YES", "IPv4 listening"),
    ("local_enable", "YES", "Local users enabled"),
    ("write_enable", "YES", "Write permissions"),
    ("pasv_enable", "YES", "Passive mode"),
    ("userlist_enable", "YES", "User list enabled"),
    (
        "chroot_local_user",
        "NO",
        "Chroot disabled (correct for this setup)",
    ),
];

const ERROR_WORDS: [&str; 4] = ["error", "fail", "denied", "refused"];

const STATUS_EXCERPT_CHARS: usize = 500;
const RECENT_LOG_LINES: usize = 20;
const PERMISSION_SAMPLE: usize = 5;

const HINTS: [&str; 3] = [
    "Check firewall rules on router/network",
    "Verify user passwords are correct",
    "Review logs: sudo tail -f /var/log/vsftpd.log",
];

struct Service {
    unit: &'static str,
    description: &'static str,
    optional: bool,
}

/// Runs the FTP server checklist and collects the outcome in a [`Report`].
pub struct FtpDebugger<E> {
    executor: E,
    ftp: FtpConfig,
    files_dir: String,
    log_files: Vec<PathBuf>,
    report: Report,
}

impl<E> FtpDebugger<E>
where
    E: Executor,
{
    pub fn new(config: &Config, executor: E) -> Self {
        Self {
            executor,
            ftp: config.ftp_config.clone(),
            files_dir: config.user_defaults.files_dir().to_owned(),
            log_files: vec![
                PathBuf::from(filepath::VSFTPD_LOG),
                PathBuf::from(filepath::SYSLOG),
                PathBuf::from(filepath::AUTH_LOG),
            ],
            report: Report::new(),
        }
    }

    pub fn with_log_files(mut self, log_files: Vec<PathBuf>) -> Self {
        self.log_files = log_files;
        self
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Every check in order, then the summary. `username` adds the
    /// connection test instructions.
    pub async fn run(&mut self, username: Option<&str>) -> &Report {
        report::banner("FTP SERVER DIAGNOSTICS");

        self.check_services().await;
        self.check_ports().await;
        self.check_firewall().await;
        self.check_configuration().await;
        self.check_user_list().await;
        self.check_permissions().await;
        self.check_network().await;
        self.check_logs().await;

        if let Some(username) = username {
            connection_test(username);
        }

        print!("{}", self.report.summary(&HINTS));
        println!();
        &self.report
    }

    pub async fn check_services(&mut self) {
        report::header("SERVICE STATUS");

        for service in &SERVICES {
            let out = self
                .executor
                .output(&Invocation::new("systemctl").args(["is-active", service.unit]))
                .await;

            if out.stdout_trimmed() == "active" {
                report::line(Status::Pass, format!("{}: RUNNING", service.description));
                self.report.pass(format!("{} is running", service.description));
            } else if service.optional {
                report::line(
                    Status::Warn,
                    format!("{}: NOT RUNNING (optional)", service.description),
                );
                self.report.warn(format!("{} is not running", service.description));
            } else {
                report::line(Status::Fail, format!("{}: NOT RUNNING", service.description));
                self.report.fail_with(
                    format!("{} is not running", service.description),
                    [
                        format!("sudo systemctl start {}", service.unit),
                        format!("sudo systemctl enable {}", service.unit),
                    ],
                );

                let status = self
                    .executor
                    .output(&Invocation::new("systemctl").args(["status", service.unit]))
                    .await;
                let excerpt: String = status.stdout.chars().take(STATUS_EXCERPT_CHARS).collect();
                println!("   Status output:\n{}", excerpt);
            }
        }
    }

    pub async fn check_ports(&mut self) {
        report::header("PORT LISTENING STATUS");

        let mut table = self
            .executor
            .output(&Invocation::new("netstat").arg("-tuln"))
            .await;
        if !table.success() {
            debug!("netstat unavailable, falling back to ss");
            table = self.executor.output(&Invocation::new("ss").arg("-tuln")).await;
        }

        for (port, description) in [(21, "FTP Control"), (22, "SSH/SFTP"), (20, "FTP Data (may not always show)")] {
            if is_listening(&table.stdout, port) {
                report::line(Status::Pass, format!("Port {} ({}): LISTENING", port, description));
                self.report.pass(format!("Port {} is listening", port));
            } else if port == 20 {
                report::line(
                    Status::Warn,
                    format!("Port {} ({}): NOT LISTENING (may be normal)", port, description),
                );
                self.report.warn(format!("Port {} not listening", port));
            } else {
                report::line(Status::Fail, format!("Port {} ({}): NOT LISTENING", port, description));
                self.report.fail_with(
                    format!("Port {} is not listening", port),
                    [
                        "Check if service is running".to_owned(),
                        format!("Check {} for listen settings", self.ftp.vsftpd_config().display()),
                    ],
                );
            }
        }
    }

    pub async fn check_firewall(&mut self) {
        report::header("FIREWALL STATUS");

        if !self.executor.succeeds(&Invocation::new("which").arg("ufw")).await {
            report::line(Status::Warn, "UFW not installed");
            self.report.warn("UFW firewall not installed");
            return;
        }

        let status = self
            .executor
            .output(&Invocation::new("ufw").arg("status"))
            .await;
        if status.stdout.to_lowercase().contains("inactive") {
            report::line(Status::Warn, "UFW is inactive");
            self.report.warn("UFW firewall is inactive");
            return;
        }

        report::line(Status::Pass, "UFW is active\n");

        let passive = self.ftp.passive_ports().to_owned();
        for port in ["21", "22", passive.as_str()] {
            if status.stdout.contains(port) {
                report::line(Status::Pass, format!("Port {}: ALLOWED", port));
                self.report.pass(format!("Firewall allows port {}", port));
            } else {
                report::line(Status::Fail, format!("Port {}: NOT ALLOWED", port));
                self.report.fail_with(
                    format!("Firewall does not allow port {}", port),
                    [format!("sudo ufw allow {}/tcp", port)],
                );
            }
        }
    }

    pub async fn check_configuration(&mut self) {
        report::header("CONFIGURATION CHECKS");

        let path = self.ftp.vsftpd_config().to_path_buf();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) => {
                debug!(%err, path=%path.display(), "Read vsftpd config");
                report::line(Status::Fail, format!("{} not found", path.display()));
                self.report.fail_with(
                    "vsftpd.conf file missing",
                    ["sudo apt install vsftpd", "Or point ftp_config.vsftpd_config at the file"],
                );
                return;
            }
        };

        report::line(Status::Pass, format!("Configuration file exists: {}\n", path.display()));

        let directives = directives(&content);
        let enabled = |key: &str, value: &str| {
            directives
                .get(key)
                .map_or(false, |v| v.eq_ignore_ascii_case(value))
        };

        for (key, value, description) in REQUIRED_DIRECTIVES {
            let setting = format!("{}={}", key, value);
            if enabled(key, value) {
                report::line(Status::Pass, format!("{}: {}", description, setting));
                self.report.pass(format!("Config has {}", description));
            } else {
                report::line(Status::Fail, format!("{}: NOT FOUND ({})", description, setting));
                self.report.fail_with(
                    format!("Config missing {}", description),
                    [format!("Set {} in {}", setting, path.display())],
                );
            }
        }

        if enabled("listen_ipv6", "YES") && enabled("listen", "YES") {
            println!();
            report::line(Status::Fail, "WARNING: Both IPv4 and IPv6 listen enabled (conflict)");
            self.report.fail_with(
                "IPv4 and IPv6 both enabled",
                [format!("Set listen_ipv6=NO in {}", path.display())],
            );
        }

        if enabled("chroot_local_user", "YES") {
            println!();
            report::line(
                Status::Warn,
                "WARNING: chroot is enabled - this may cause issues with the current setup",
            );
            self.report.warn("Chroot enabled (should be disabled)");
        }
    }

    pub async fn check_user_list(&mut self) {
        report::header("USER LIST CHECKS");

        let allow_list = AllowList::new(self.ftp.allowed_users_file());
        let users = match allow_list.entries().await {
            Ok(users) => users,
            Err(err) if err.io_kind() == Some(std::io::ErrorKind::NotFound) => {
                debug!(%err, "Read allow-list");
                report::line(
                    Status::Warn,
                    format!("User list file not found: {}", allow_list.path().display()),
                );
                self.report.warn("User list file does not exist");
                return;
            }
            Err(err) => {
                report::line(
                    Status::Warn,
                    format!("Cannot read user list {}: {}", allow_list.path().display(), err),
                );
                if !sys::is_root() {
                    println!("  Run with: sudo ftp-debug");
                }
                self.report.warn("User list file is not readable");
                return;
            }
        };

        report::line(
            Status::Pass,
            format!("User list file exists: {}\n", allow_list.path().display()),
        );

        if users.is_empty() {
            report::line(Status::Warn, "No users defined in user list");
            self.report.warn("User list is empty");
            return;
        }

        println!("Found {} user(s) in list:\n", users.len());

        for username in &users {
            self.check_listed_user(username, &allow_list).await;
            println!();
        }
    }

    async fn check_listed_user(&mut self, username: &str, allow_list: &AllowList) {
        if !account::user_exists(&self.executor, username).await {
            report::line(Status::Fail, format!("User '{}' does not exist in system", username));
            self.report.fail_with(
                format!("User {} in list but not in system", username),
                [
                    format!("sudo ftp-users (create the account '{}')", username),
                    format!("Or remove '{}' from {}", username, allow_list.path().display()),
                ],
            );
            return;
        }
        report::line(Status::Pass, format!("User '{}' exists", username));

        let home = self.ftp.user_home(username);
        let files = home.join(&self.files_dir);
        let Ok(home_meta) = fs::metadata(&home).await else {
            println!("  ✗ Directory missing: {}", home.display());
            self.report.fail_with(
                format!("User {} directory missing", username),
                [
                    format!("sudo mkdir -p {}", files.display()),
                    format!("sudo chown {}:{} {}", username, self.ftp.ftp_group(), files.display()),
                    format!("sudo chmod 755 {} {}", home.display(), files.display()),
                ],
            );
            return;
        };
        println!("  ✓ Directory: {}", home.display());
        println!(
            "  Owner: UID {}, Permissions: {}",
            sys::owner_uid(&home_meta),
            sys::mode_string(&home_meta)
        );

        // The writable files directory is the one the user must own.
        let entry = match PasswdEntry::lookup(&self.executor, username).await {
            Ok(Some(entry)) => entry,
            _ => {
                println!("  ⚠ Could not verify ownership");
                return;
            }
        };
        match fs::metadata(&files).await {
            Ok(meta) if sys::owner_uid(&meta) == entry.uid => {
                println!("  ✓ {} owned by user (UID {})", files.display(), entry.uid);
            }
            Ok(meta) => {
                println!(
                    "  ⚠ {} owned by UID {}, expected {}",
                    files.display(),
                    sys::owner_uid(&meta),
                    entry.uid
                );
                self.report
                    .warn(format!("User {} directory ownership mismatch", username));
            }
            Err(_) => {
                println!("  ⚠ Files directory missing: {}", files.display());
                self.report
                    .warn(format!("User {} files directory missing", username));
            }
        }
    }

    pub async fn check_permissions(&mut self) {
        report::header("PERMISSION CHECKS");

        let root = self.ftp.ftp_root().to_path_buf();
        let Ok(meta) = fs::metadata(&root).await else {
            report::line(Status::Fail, format!("FTP root does not exist: {}", root.display()));
            self.report.fail_with(
                "FTP root directory missing",
                [
                    format!("sudo mkdir -p {}", root.display()),
                    format!("sudo chmod 755 {}", root.display()),
                ],
            );
            return;
        };

        report::line(Status::Pass, format!("FTP root exists: {}", root.display()));
        println!("  Permissions: {}", sys::mode_string(&meta));
        println!("  Owner: UID {}", sys::owner_uid(&meta));

        if sys::owner_uid(&meta) == 0 {
            println!("  ✓ Owned by root");
            self.report.pass("FTP root owned by root");
        } else {
            println!("  ⚠ Not owned by root");
            self.report.warn("FTP root not owned by root");
        }

        println!("\nChecking user directories...");
        let users = AllowList::new(self.ftp.allowed_users_file())
            .entries()
            .await
            .unwrap_or_default();
        for username in users.iter().take(PERMISSION_SAMPLE) {
            if let Ok(meta) = fs::metadata(root.join(username)).await {
                println!(
                    "  {}: UID {}, Permissions {}",
                    username,
                    sys::owner_uid(&meta),
                    sys::mode_string(&meta)
                );
            }
        }
    }

    pub async fn check_network(&mut self) {
        report::header("NETWORK CHECKS");

        let hostname = self
            .executor
            .output(&Invocation::new("hostname").arg("-I"))
            .await;
        if hostname.success() {
            report::line(Status::Pass, "Server IP addresses:");
            for ip in hostname.stdout.split_whitespace() {
                println!("  - {}", ip);
            }
            println!();
        }

        let nc = self
            .executor
            .output(&Invocation::new("nc").args(["-zv", "localhost", "21"]))
            .await;
        let succeeded = nc.success()
            || logscan::contains_term(&nc.stdout, "succeeded")
            || logscan::contains_term(&nc.stderr, "succeeded");

        if succeeded {
            report::line(Status::Pass, "Port 21 is reachable on localhost");
            self.report.pass("Port 21 reachable on localhost");
        } else {
            report::line(Status::Fail, "Port 21 is NOT reachable on localhost");
            self.report.fail_with(
                "Port 21 not reachable",
                [
                    "sudo systemctl status vsftpd".to_owned(),
                    format!("Check {} for listen settings", self.ftp.vsftpd_config().display()),
                ],
            );
        }
    }

    /// Prints recent error counts per log. Never changes the report.
    pub async fn check_logs(&mut self) {
        report::header("LOG FILE ANALYSIS");

        for path in &self.log_files {
            if fs::metadata(path).await.is_err() {
                report::line(Status::Warn, format!("Log file not found: {}", path.display()));
                continue;
            }

            println!("\n📄 Checking {}...", path.display());

            let out = self
                .executor
                .output(
                    &Invocation::new("grep")
                        .args(["-i", "-e", "vsftpd", "-e", "ftp"])
                        .arg(path.to_string_lossy()),
                )
                .await;
            let matched: Vec<&str> = out.stdout.lines().collect();
            if matched.is_empty() {
                continue;
            }

            let recent = logscan::last_lines(&matched, RECENT_LOG_LINES);
            let errors = logscan::count_matching(recent, &ERROR_WORDS);
            if errors > 0 {
                println!("  ⚠ Found {} error/warning entries in recent logs", errors);
                println!("  Run: sudo tail -50 {} | grep -i error", path.display());
            } else {
                println!("  ✓ No obvious errors in recent logs");
            }
        }
    }
}

fn connection_test(username: &str) {
    report::header(&format!("CONNECTION TEST FOR USER: {}", username));

    println!("Testing FTP connection...");
    println!("Note: This requires the user's password\n");
    println!("To test manually, run:");
    println!("  ftp localhost");
    println!("  Username: {}", username);
    println!("  Password: <enter password>");
    println!("  Commands: ls, pwd, quit");
}

/// Whether a `netstat -tuln` / `ss -tuln` table has a socket on `port`.
/// Matches address columns ending in `:<port>`, so `:2121` is not `:21`.
fn is_listening(table: &str, port: u16) -> bool {
    let port = port.to_string();
    table
        .split_whitespace()
        .filter_map(|token| token.rsplit_once(':'))
        .any(|(_, p)| p == port)
}

/// Active `key=value` directives of a vsftpd.conf. Later lines win.
fn directives(content: &str) -> HashMap<&str, &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::command::{Output, ScriptedExecutor};

    const NETSTAT: &str = "\
Active Internet connections (only servers)
Proto Recv-Q Send-Q Local Address           Foreign Address         State
tcp        0      0 0.0.0.0:2121            0.0.0.0:*               LISTEN
tcp        0      0 0.0.0.0:22              0.0.0.0:*               LISTEN
tcp6       0      0 :::22                   :::*                    LISTEN
";

    fn config(dir: &Path) -> Config {
        Config::from_json(&format!(
            r#"{{"ftp_config": {{
                "ftp_root": "{root}/srv",
                "allowed_users_file": "{root}/vsftpd.userlist",
                "vsftpd_config": "{root}/vsftpd.conf"
            }}}}"#,
            root = dir.display()
        ))
        .unwrap()
    }

    #[test]
    fn listening_matches_whole_port() {
        assert!(is_listening(NETSTAT, 22));
        assert!(!is_listening(NETSTAT, 21));
        assert!(is_listening("tcp LISTEN 0 32 *:21 *:*", 21));
        assert!(is_listening("tcp LISTEN 0 32 [::]:21 [::]:*", 21));
    }

    #[test]
    fn commented_directives_are_ignored() {
        let parsed = directives("#listen=YES\nlisten_ipv6 = NO\nlisten=NO\nlisten=YES\n");
        assert_eq!(parsed.get("listen"), Some(&"YES"));
        assert_eq!(parsed.get("listen_ipv6"), Some(&"NO"));
    }

    #[tokio::test]
    async fn required_service_down_is_an_issue_with_fix() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ScriptedExecutor::new()
            .on("systemctl is-active vsftpd", Output::new(3, "inactive\n", ""))
            .on("systemctl is-active ssh", Output::ok("active\n"))
            .on("systemctl is-active fail2ban", Output::new(3, "inactive\n", ""));
        let mut debugger = FtpDebugger::new(&config(dir.path()), executor);

        debugger.check_services().await;

        let report = debugger.report();
        assert_eq!(report.passed(), ["SSH/SFTP Server is running"]);
        assert_eq!(report.warnings(), ["fail2ban (optional) is not running"]);
        assert_eq!(report.issues().len(), 1);
        assert_eq!(report.issues()[0].fixes[0], "sudo systemctl start vsftpd");
        assert!(debugger.executor().was_called("systemctl status vsftpd"));
    }

    #[tokio::test]
    async fn unreadable_user_list_is_not_reported_missing() {
        let dir = tempfile::tempdir().unwrap();
        // a directory in place of the file fails to read even as root.
        std::fs::create_dir(dir.path().join("vsftpd.userlist")).unwrap();
        let mut debugger = FtpDebugger::new(&config(dir.path()), ScriptedExecutor::new());

        debugger.check_user_list().await;

        assert_eq!(debugger.report().warnings(), ["User list file is not readable"]);
    }

    #[tokio::test]
    async fn missing_user_list_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut debugger = FtpDebugger::new(&config(dir.path()), ScriptedExecutor::new());

        debugger.check_user_list().await;

        assert_eq!(debugger.report().warnings(), ["User list file does not exist"]);
    }

    #[tokio::test]
    async fn ports_fall_back_to_ss() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ScriptedExecutor::new()
            .on("netstat -tuln", Output::failed("No such file or directory"))
            .on("ss -tuln", Output::ok("tcp LISTEN 0 32 *:21 *:*\ntcp LISTEN 0 128 0.0.0.0:22 0.0.0.0:*\n"));
        let mut debugger = FtpDebugger::new(&config(dir.path()), executor);

        debugger.check_ports().await;

        let report = debugger.report();
        assert_eq!(report.passed().len(), 2);
        assert_eq!(report.warnings(), ["Port 20 not listening"]);
        assert!(!report.has_issues());
    }

    #[tokio::test]
    async fn firewall_missing_passive_range() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ScriptedExecutor::new()
            .on("which ufw", Output::ok("/usr/sbin/ufw\n"))
            .on(
                "ufw status",
                Output::ok("Status: active\n\nTo Action From\n21/tcp ALLOW Anywhere\n22/tcp ALLOW Anywhere\n"),
            );
        let mut debugger = FtpDebugger::new(&config(dir.path()), executor);

        debugger.check_firewall().await;

        let issues = debugger.report().issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Firewall does not allow port 40000:40100");
        assert_eq!(issues[0].fixes, ["sudo ufw allow 40000:40100/tcp"]);
    }

    #[tokio::test]
    async fn inactive_firewall_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ScriptedExecutor::new()
            .on("which ufw", Output::ok("/usr/sbin/ufw\n"))
            .on("ufw status", Output::ok("Status: inactive\n"));
        let mut debugger = FtpDebugger::new(&config(dir.path()), executor);

        debugger.check_firewall().await;

        assert_eq!(debugger.report().warnings(), ["UFW firewall is inactive"]);
        assert!(!debugger.report().has_issues());
    }

    #[tokio::test]
    async fn configuration_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::write(
            config.ftp_config.vsftpd_config(),
            "listen=YES\nlisten_ipv6=YES\nlocal_enable=YES\nwrite_enable=YES\n\
             pasv_enable=YES\nuserlist_enable=YES\nchroot_local_user=YES\n",
        )
        .unwrap();
        let mut debugger = FtpDebugger::new(&config, ScriptedExecutor::new());

        debugger.check_configuration().await;

        let report = debugger.report();
        let issues: Vec<_> = report.issues().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            issues,
            [
                "Config missing Chroot disabled (correct for this setup)",
                "IPv4 and IPv6 both enabled"
            ]
        );
        assert_eq!(report.warnings(), ["Chroot enabled (should be disabled)"]);
        assert_eq!(report.passed().len(), 5);
    }

    #[tokio::test]
    async fn missing_config_file_is_an_issue() {
        let dir = tempfile::tempdir().unwrap();
        let mut debugger = FtpDebugger::new(&config(dir.path()), ScriptedExecutor::new());

        debugger.check_configuration().await;

        assert_eq!(debugger.report().issues()[0].message, "vsftpd.conf file missing");
    }

    #[tokio::test]
    async fn listed_users_are_checked() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::write(config.ftp_config.allowed_users_file(), "alice\nghost\nbob\n").unwrap();
        std::fs::create_dir_all(config.ftp_config.user_home("alice")).unwrap();
        let executor = ScriptedExecutor::new()
            .on("id alice", Output::ok("uid=1001(alice)"))
            .on("id bob", Output::ok("uid=1002(bob)"));
        let mut debugger = FtpDebugger::new(&config, executor);

        debugger.check_user_list().await;

        let issues: Vec<_> = debugger
            .report()
            .issues()
            .iter()
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(
            issues,
            ["User ghost in list but not in system", "User bob directory missing"]
        );
    }

    #[tokio::test]
    async fn empty_user_list_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::write(config.ftp_config.allowed_users_file(), "# nobody yet\n\n").unwrap();
        let mut debugger = FtpDebugger::new(&config, ScriptedExecutor::new());

        debugger.check_user_list().await;

        assert_eq!(debugger.report().warnings(), ["User list is empty"]);
    }

    #[tokio::test]
    async fn nc_success_reported_on_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ScriptedExecutor::new()
            .on("hostname -I", Output::ok("10.0.0.5 100.64.0.3\n"))
            .on(
                "nc -zv localhost 21",
                Output::new(1, "", "Connection to localhost 21 port [tcp/ftp] succeeded!\n"),
            );
        let mut debugger = FtpDebugger::new(&config(dir.path()), executor);

        debugger.check_network().await;

        assert_eq!(debugger.report().passed(), ["Port 21 reachable on localhost"]);
    }

    #[tokio::test]
    async fn log_analysis_does_not_touch_report() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("vsftpd.log");
        std::fs::write(&log, "").unwrap();
        let line = format!("grep -i -e vsftpd -e ftp {}", log.display());
        let executor = ScriptedExecutor::new()
            .on(&line, Output::ok("vsftpd: FAIL LOGIN: Client \"1.2.3.4\"\n"));
        let mut debugger = FtpDebugger::new(&config(dir.path()), executor)
            .with_log_files(vec![log, dir.path().join("missing.log")]);

        debugger.check_logs().await;

        assert!(debugger.executor().was_called(&line));
        assert_eq!(debugger.report().total(), 0);
    }
}
