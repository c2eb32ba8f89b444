use clap::Parser;
use opskit::cli::{self, ftp_debug::FtpDebugCommand};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    cli::init_tracing();

    let command = FtpDebugCommand::parse();

    if let Err(err) = command.run().await {
        cli::exit_with(err);
    }
}
