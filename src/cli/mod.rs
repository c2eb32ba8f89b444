//! Command line entry points. Each binary under `src/bin` parses one of
//! these commands and calls its `run`.

pub mod ftp_debug;
pub mod ftp_logs;
pub mod ftp_users;
pub mod tailscale_debug;
pub mod tailscale_logs;
pub mod tailscale_setup;

use std::path::Path;

use crate::common::debug;
use crate::config::{Config, MissingFile};
use crate::logview;
use crate::report::{self, Status};
use crate::sys;

/// Install the global subscriber. Events go to stderr so they never mix
/// with report output.
#[cfg(feature = "cli")]
pub fn init_tracing() {
    use tracing_subscriber::{
        filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt as _, Registry,
    };

    let filter = EnvFilter::try_from_env(crate::config::env::LOG_DIRECTIVE)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    Registry::default()
        .with(
            fmt::Layer::new()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_file(false)
                .with_line_number(false)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::rfc_3339()),
        )
        .with(filter)
        .init();
}

/// Print an error the way every tool reports fatal failures and exit 1.
pub fn exit_with(err: crate::OpskitError) -> ! {
    tracing::error!("{err}");
    eprintln!("{} {}", Status::Fail, err);
    std::process::exit(1)
}

/// Load the configuration, printing a notice when defaults are used.
pub(crate) async fn load_config(path: &Path, missing: MissingFile) -> crate::Result<Config> {
    let loaded = Config::load(path, missing).await?;
    if !loaded.from_file {
        report::line(
            Status::Warn,
            format!("Configuration file not found: {}", path.display()),
        );
        println!("  Using default settings");
    }
    debug!(path=%path.display(), from_file=loaded.from_file, "Config loaded");
    Ok(loaded.config)
}

/// Viewers still work for readable logs when not root.
pub(crate) fn warn_unless_root(binary: &str) {
    if !sys::is_root() {
        report::line(Status::Warn, "Some log files may require root access");
        println!("  Run with: sudo {}", binary);
    }
}

/// Line count argument; anything that is not a number falls back to the
/// default.
pub(crate) fn line_count(arg: Option<&str>) -> usize {
    arg.and_then(|n| n.parse().ok())
        .unwrap_or(logview::DEFAULT_LINES)
}

/// Blank answers mean no filter.
pub(crate) fn non_empty(answer: Option<String>) -> Option<String> {
    answer.filter(|a| !a.is_empty())
}
