mod config;
pub use config::{Config, Loaded, MissingFile};

mod account;
pub use account::{LoggingConfig, PasswordPolicy, UserDefaults};

mod ftp;
pub use ftp::FtpConfig;

mod tailscale;
pub use tailscale::{NetworkConfig, TailscaleConfig};

pub mod env {
    /// tracing-subscriber directive, e.g. `OPSKIT_LOG=opskit=debug`.
    pub const LOG_DIRECTIVE: &str = "OPSKIT_LOG";
}

pub mod filepath {
    pub const VSFTPD_LOG: &str = "/var/log/vsftpd.log";
    pub const SYSLOG: &str = "/var/log/syslog";
    pub const AUTH_LOG: &str = "/var/log/auth.log";
    pub const FAIL2BAN_LOG: &str = "/var/log/fail2ban.log";
    pub const TAILSCALE_LOG_DIR: &str = "/var/log/tailscale";
    pub const RESOLV_CONF: &str = "/etc/resolv.conf";
    pub const SYSCTL_TAILSCALE: &str = "/etc/sysctl.d/99-tailscale.conf";
}
