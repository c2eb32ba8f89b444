use std::path::PathBuf;

use clap::{Args, Parser};

use crate::command::SystemExecutor;
use crate::config::{Config, FtpConfig, MissingFile};
use crate::ftp::FtpDebugger;
use crate::Result;

/// Diagnose a vsftpd/SFTP server
#[derive(Parser, Debug)]
#[command(name = "ftp-debug", version)]
pub struct FtpDebugCommand {
    /// Configuration file path
    #[arg(default_value = Config::DEFAULT_PATH)]
    config: PathBuf,
    /// Print connection test instructions for this user
    username: Option<String>,
    #[command(flatten)]
    overrides: FtpOverrides,
}

/// Overrides for `ftp_config` values
#[derive(Args, Debug, Default)]
pub struct FtpOverrides {
    /// Root directory holding user homes
    #[arg(long, env = "OPSKIT_FTP_ROOT")]
    ftp_root: Option<PathBuf>,
    /// vsftpd allow-list file
    #[arg(long, env = "OPSKIT_FTP_USERLIST")]
    allowed_users_file: Option<PathBuf>,
    /// vsftpd configuration file
    #[arg(long, env = "OPSKIT_VSFTPD_CONFIG")]
    vsftpd_config: Option<PathBuf>,
}

impl FtpOverrides {
    pub(crate) fn apply(self, ftp: &mut FtpConfig) {
        let FtpOverrides {
            mut ftp_root,
            mut allowed_users_file,
            mut vsftpd_config,
        } = self;

        ftp.set_ftp_root(&mut ftp_root);
        ftp.set_allowed_users_file(&mut allowed_users_file);
        ftp.set_vsftpd_config(&mut vsftpd_config);
    }
}

impl FtpDebugCommand {
    pub async fn run(self) -> Result<()> {
        let FtpDebugCommand {
            config,
            username,
            overrides,
        } = self;

        let mut config = super::load_config(&config, MissingFile::UseDefaults).await?;
        overrides.apply(&mut config.ftp_config);

        FtpDebugger::new(&config, SystemExecutor::default())
            .run(username.as_deref())
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_config_and_username() {
        let cmd = FtpDebugCommand::try_parse_from(["ftp-debug", "site.json", "alice"]).unwrap();
        assert_eq!(cmd.config, PathBuf::from("site.json"));
        assert_eq!(cmd.username.as_deref(), Some("alice"));
    }

    #[test]
    fn overrides_replace_configured_values() {
        let cmd = FtpDebugCommand::try_parse_from([
            "ftp-debug",
            "--ftp-root",
            "/data/ftp",
        ])
        .unwrap();
        assert_eq!(cmd.config, PathBuf::from("settings.json"));

        let mut ftp = FtpConfig::default();
        cmd.overrides.apply(&mut ftp);
        assert_eq!(ftp.ftp_root(), std::path::Path::new("/data/ftp"));
        assert_eq!(ftp.allowed_users_file(), std::path::Path::new("/etc/vsftpd.userlist"));
    }
}
