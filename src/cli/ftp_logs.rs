use std::path::PathBuf;

use clap::Parser;
use tokio::io::AsyncBufRead;

use crate::command::{Executor, SystemExecutor};
use crate::ftp::logs::{FtpLogViewer, LOGIN_LINES};
use crate::logview::{self, DEFAULT_LINES};
use crate::report::{self, Status};
use crate::term::Prompt;
use crate::Result;

/// View vsftpd related logs. Starts an interactive menu without arguments
#[derive(Parser, Debug)]
#[command(name = "ftp-logs", version)]
pub struct FtpLogsCommand {
    /// Log file to show
    log_file: Option<PathBuf>,
    /// Only show lines containing this term (case-insensitive)
    filter: Option<String>,
    /// Number of lines, 50 when missing or not a number
    lines: Option<String>,
}

impl FtpLogsCommand {
    pub async fn run(self) -> Result<()> {
        super::warn_unless_root("ftp-logs");

        let viewer = FtpLogViewer::new(SystemExecutor::default());
        match self.log_file {
            Some(path) => {
                let lines = super::line_count(self.lines.as_deref());
                viewer
                    .filter_logs(&path, self.filter.as_deref(), lines)
                    .await;
                Ok(())
            }
            None => menu(&viewer, &mut Prompt::stdin()).await,
        }
    }
}

pub async fn menu<E, R>(viewer: &FtpLogViewer<E>, prompt: &mut Prompt<R>) -> Result<()>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
{
    loop {
        report::title("FTP LOG VIEWER");
        println!("\n📋 Available Logs:");
        for source in viewer.sources() {
            let mark = if tokio::fs::metadata(&source.path).await.is_ok() {
                Status::Pass
            } else {
                Status::Fail
            };
            println!("  {}. {} {}", source.key, mark, source.description);
        }
        println!("\n🔍 Quick Views:");
        println!("  5. Show recent successful logins");
        println!("  6. Show recent failed logins");
        println!("  7. Show errors only");
        println!("  8. Show user activity");
        println!("  9. Live tail log");
        println!("  0. Exit");

        let Some(choice) = prompt.ask("\nSelect option: ").await? else {
            return Ok(());
        };

        if let Some(source) = logview::find(viewer.sources(), &choice) {
            let filter = super::non_empty(prompt.ask("Filter term (Enter for none): ").await?);
            let lines = prompt
                .ask_count("Number of lines (default 50): ", DEFAULT_LINES)
                .await?;
            viewer
                .filter_logs(&source.path, filter.as_deref(), lines)
                .await;
            prompt.pause().await?;
            continue;
        }

        match choice.as_str() {
            "0" => {
                println!("\nGoodbye!");
                return Ok(());
            }
            "5" => {
                viewer.show_recent_logins(LOGIN_LINES).await;
                prompt.pause().await?;
            }
            "6" => {
                viewer.show_failed_logins(LOGIN_LINES).await;
                prompt.pause().await?;
            }
            "7" => {
                let answer = prompt.ask("Which log? (1-4): ").await?.unwrap_or_default();
                if let Some(source) = logview::find(viewer.sources(), &answer) {
                    viewer.show_errors_only(&source.path, DEFAULT_LINES).await;
                }
                prompt.pause().await?;
            }
            "8" => {
                if let Some(username) = super::non_empty(prompt.ask("Username: ").await?) {
                    viewer.show_user_activity(&username, DEFAULT_LINES).await;
                }
                prompt.pause().await?;
            }
            "9" => {
                let answer = prompt
                    .ask("Which log to tail? (1-4): ")
                    .await?
                    .unwrap_or_default();
                if let Some(source) = logview::find(viewer.sources(), &answer) {
                    let filter =
                        super::non_empty(prompt.ask("Filter term (Enter for none): ").await?);
                    viewer.follow(&source.path, filter.as_deref()).await;
                }
            }
            _ => println!("Invalid option"),
        }
    }
}
