use clap::Parser;
use opskit::cli::{self, tailscale_debug::TailscaleDebugCommand};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    cli::init_tracing();

    let command = TailscaleDebugCommand::parse();

    if let Err(err) = command.run().await {
        cli::exit_with(err);
    }
}
