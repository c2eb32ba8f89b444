use std::path::PathBuf;

use clap::Parser;

use crate::command::SystemExecutor;
use crate::config::{Config, MissingFile};
use crate::sys;
use crate::tailscale::TailscaleSetup;
use crate::{OpskitError, Result};

/// Install and configure Tailscale (requires root)
#[derive(Parser, Debug)]
#[command(name = "tailscale-setup", version)]
pub struct TailscaleSetupCommand {
    /// Configuration file path
    #[arg(default_value = Config::DEFAULT_PATH)]
    config: PathBuf,
}

impl TailscaleSetupCommand {
    /// Failed steps are warnings; only a missing root privilege is an error.
    pub async fn run(self) -> Result<()> {
        let config = super::load_config(&self.config, MissingFile::UseDefaults).await?;

        if !sys::is_root() {
            return Err(OpskitError::NotRoot);
        }

        TailscaleSetup::new(&config, SystemExecutor::default())
            .run()
            .await;

        Ok(())
    }
}
