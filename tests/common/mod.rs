#![allow(dead_code)]

use std::path::Path;

use opskit::config::Config;

pub fn temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Configuration whose every host path lives under `root`.
pub fn config(root: &Path, extra: &str) -> Config {
    let json = format!(
        r#"{{
            "ftp_config": {{
                "ftp_root": "{root}/srv/ftp",
                "allowed_users_file": "{root}/etc/vsftpd.userlist",
                "vsftpd_config": "{root}/etc/vsftpd.conf"
            }},
            "logging": {{ "credentials_file": "{root}/root/ftp_credentials.csv" }}
            {extra}
        }}"#,
        root = root.display(),
        extra = extra,
    );
    Config::from_json(&json).unwrap()
}
