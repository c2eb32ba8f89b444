use std::path::{Path, PathBuf};

use serde::Deserialize;

// vsftpd host layout.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FtpConfig {
    // Directory containing one chroot home per user.
    ftp_root: Option<PathBuf>,
    // Supplementary group every ftp user joins.
    ftp_group: Option<String>,
    // Login shell given to new accounts.
    default_shell: Option<String>,
    // vsftpd userlist file.
    allowed_users_file: Option<PathBuf>,
    // vsftpd configuration file.
    vsftpd_config: Option<PathBuf>,
    // Passive data port range as written in ufw rules.
    passive_ports: Option<String>,
}

impl FtpConfig {
    const DEFAULT_FTP_ROOT: &'static str = "/srv/ftp";
    const DEFAULT_FTP_GROUP: &'static str = "ftpusers";
    const DEFAULT_SHELL: &'static str = "/bin/bash";
    const DEFAULT_ALLOWED_USERS_FILE: &'static str = "/etc/vsftpd.userlist";
    const DEFAULT_VSFTPD_CONFIG: &'static str = "/etc/vsftpd.conf";
    const DEFAULT_PASSIVE_PORTS: &'static str = "40000:40100";

    pub fn set_ftp_root(&mut self, val: &mut Option<PathBuf>) {
        if let Some(val) = val.take() {
            self.ftp_root = Some(val)
        }
    }
    pub fn set_allowed_users_file(&mut self, val: &mut Option<PathBuf>) {
        if let Some(val) = val.take() {
            self.allowed_users_file = Some(val)
        }
    }
    pub fn set_vsftpd_config(&mut self, val: &mut Option<PathBuf>) {
        if let Some(val) = val.take() {
            self.vsftpd_config = Some(val)
        }
    }

    pub fn ftp_root(&self) -> &Path {
        self.ftp_root
            .as_deref()
            .unwrap_or_else(|| Path::new(FtpConfig::DEFAULT_FTP_ROOT))
    }

    pub fn ftp_group(&self) -> &str {
        self.ftp_group
            .as_deref()
            .unwrap_or(FtpConfig::DEFAULT_FTP_GROUP)
    }

    pub fn default_shell(&self) -> &str {
        self.default_shell
            .as_deref()
            .unwrap_or(FtpConfig::DEFAULT_SHELL)
    }

    pub fn allowed_users_file(&self) -> &Path {
        self.allowed_users_file
            .as_deref()
            .unwrap_or_else(|| Path::new(FtpConfig::DEFAULT_ALLOWED_USERS_FILE))
    }

    pub fn vsftpd_config(&self) -> &Path {
        self.vsftpd_config
            .as_deref()
            .unwrap_or_else(|| Path::new(FtpConfig::DEFAULT_VSFTPD_CONFIG))
    }

    pub fn passive_ports(&self) -> &str {
        self.passive_ports
            .as_deref()
            .unwrap_or(FtpConfig::DEFAULT_PASSIVE_PORTS)
    }

    pub fn user_home(&self, username: &str) -> PathBuf {
        self.ftp_root().join(username)
    }
}
