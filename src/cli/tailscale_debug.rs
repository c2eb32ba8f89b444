use std::path::PathBuf;

use clap::Parser;

use crate::command::SystemExecutor;
use crate::config::{Config, MissingFile};
use crate::tailscale::TailscaleDebugger;
use crate::Result;

/// Diagnose the local Tailscale node
#[derive(Parser, Debug)]
#[command(name = "tailscale-debug", version)]
pub struct TailscaleDebugCommand {
    /// Configuration file path
    #[arg(default_value = Config::DEFAULT_PATH)]
    config: PathBuf,
}

impl TailscaleDebugCommand {
    pub async fn run(self) -> Result<()> {
        let config = super::load_config(&self.config, MissingFile::UseDefaults).await?;

        TailscaleDebugger::new(&config, SystemExecutor::default())
            .run()
            .await;

        Ok(())
    }
}
