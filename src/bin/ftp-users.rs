use clap::Parser;
use opskit::cli::{self, ftp_users::FtpUsersCommand};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    cli::init_tracing();

    let command = FtpUsersCommand::parse();

    if let Err(err) = command.run().await {
        cli::exit_with(err);
    }
}
