use clap::Parser;
use opskit::cli::{self, ftp_logs::FtpLogsCommand};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    cli::init_tracing();

    let command = FtpLogsCommand::parse();

    if let Err(err) = command.run().await {
        cli::exit_with(err);
    }
}
