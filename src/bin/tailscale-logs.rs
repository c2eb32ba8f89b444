use clap::Parser;
use opskit::cli::{self, tailscale_logs::TailscaleLogsCommand};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    cli::init_tracing();

    let command = TailscaleLogsCommand::parse();

    if let Err(err) = command.run().await {
        cli::exit_with(err);
    }
}
