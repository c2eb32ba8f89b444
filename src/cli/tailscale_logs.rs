use clap::Parser;
use tokio::io::AsyncBufRead;

use crate::command::{Executor, SystemExecutor};
use crate::logview::DEFAULT_LINES;
use crate::report::{self, Status};
use crate::tailscale::logs::{TailscaleLogViewer, AUTH_LINES};
use crate::term::Prompt;
use crate::Result;

/// View tailscaled logs. Starts an interactive menu without arguments
#[derive(Parser, Debug)]
#[command(name = "tailscale-logs", version)]
pub struct TailscaleLogsCommand {
    /// Only show lines containing this term (case-insensitive)
    filter: Option<String>,
    /// Number of lines, 50 when missing or not a number
    lines: Option<String>,
}

impl TailscaleLogsCommand {
    pub async fn run(self) -> Result<()> {
        super::warn_unless_root("tailscale-logs");

        let viewer = TailscaleLogViewer::new(SystemExecutor::default());
        match self.filter {
            Some(filter) => {
                let lines = super::line_count(self.lines.as_deref());
                viewer.view_journal(Some(&filter), lines).await;
                Ok(())
            }
            None => menu(&viewer, &mut Prompt::stdin()).await,
        }
    }
}

pub async fn menu<E, R>(viewer: &TailscaleLogViewer<E>, prompt: &mut Prompt<R>) -> Result<()>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
{
    loop {
        report::title("TAILSCALE LOG VIEWER");
        println!("\n📋 Log Sources:");
        println!("  1. Tailscaled service logs (journalctl)");
        println!("  2. System log (Tailscale entries)");
        println!("  3. Tailscale log directory");
        println!("\n🔍 Quick Views:");
        println!("  4. Connection logs");
        println!("  5. Error and warning logs");
        println!("  6. Authentication logs");
        println!("  7. Live tail");
        println!("  0. Exit");

        let Some(choice) = prompt.ask("\nSelect option: ").await? else {
            return Ok(());
        };

        match choice.as_str() {
            "0" => {
                println!("\nGoodbye!");
                return Ok(());
            }
            "1" => {
                let filter = super::non_empty(prompt.ask("Filter term (Enter for none): ").await?);
                let lines = prompt
                    .ask_count("Number of lines (default 50): ", DEFAULT_LINES)
                    .await?;
                viewer.view_journal(filter.as_deref(), lines).await;
                prompt.pause().await?;
            }
            "2" => {
                let lines = prompt
                    .ask_count("Number of lines (default 50): ", DEFAULT_LINES)
                    .await?;
                viewer.view_syslog(lines).await;
                prompt.pause().await?;
            }
            "3" => {
                pick_log_file(viewer, prompt).await?;
                prompt.pause().await?;
            }
            "4" => {
                viewer.show_connection_logs(DEFAULT_LINES).await;
                prompt.pause().await?;
            }
            "5" => {
                viewer.show_error_logs(DEFAULT_LINES).await;
                prompt.pause().await?;
            }
            "6" => {
                viewer.show_auth_logs(AUTH_LINES).await;
                prompt.pause().await?;
            }
            "7" => {
                let filter = super::non_empty(prompt.ask("Filter term (Enter for none): ").await?);
                viewer.follow_journal(filter.as_deref()).await;
            }
            _ => println!("Invalid option"),
        }
    }
}

async fn pick_log_file<E, R>(viewer: &TailscaleLogViewer<E>, prompt: &mut Prompt<R>) -> Result<()>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
{
    let dir = viewer.log_dir().display();
    let listed = match viewer.log_files().await {
        Ok(listed) => listed,
        Err(err) => {
            println!();
            report::line(Status::Fail, format!("Error reading {}: {}", dir, err));
            return Ok(());
        }
    };
    let files = match listed {
        Some(files) if files.is_empty() => {
            println!();
            report::line(Status::Warn, format!("No log files found in {}", dir));
            return Ok(());
        }
        Some(files) => files,
        None => {
            println!();
            report::line(Status::Fail, format!("Log directory not found: {}", dir));
            return Ok(());
        }
    };

    println!("\nLog files in {}:", dir);
    for (i, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  {}. {}", i + 1, name);
    }

    let selected = prompt
        .ask("\nSelect file (or Enter to cancel): ")
        .await?
        .and_then(|a| a.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| files.get(i));
    let Some(file) = selected else {
        return Ok(());
    };

    let filter = super::non_empty(prompt.ask("Filter term (Enter for none): ").await?);
    let lines = prompt
        .ask_count("Number of lines (default 50): ", DEFAULT_LINES)
        .await?;
    viewer.view_file(file, filter.as_deref(), lines).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Output, ScriptedExecutor};

    #[test]
    fn filter_then_lines() {
        let cmd = TailscaleLogsCommand::try_parse_from(["tailscale-logs", "derp", "200"]).unwrap();
        assert_eq!(cmd.filter.as_deref(), Some("derp"));
        assert_eq!(crate::cli::line_count(cmd.lines.as_deref()), 200);
    }

    #[tokio::test]
    async fn picker_cancels_on_blank_answer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tailscaled.log"), "").unwrap();
        let viewer = TailscaleLogViewer::new(ScriptedExecutor::new()).with_log_dir(dir.path());

        menu(&viewer, &mut Prompt::new("3\n\n\n0\n".as_bytes()))
            .await
            .unwrap();

        assert!(viewer.executor().calls().is_empty());
    }

    #[tokio::test]
    async fn failed_journal_keeps_menu_running() {
        let viewer = TailscaleLogViewer::new(
            ScriptedExecutor::new().otherwise(Output::new(1, "", "Failed to get journal access")),
        );

        menu(&viewer, &mut Prompt::new("4\n\n5\n\n6\n\n0\n".as_bytes()))
            .await
            .unwrap();

        assert_eq!(
            viewer.executor().calls(),
            [
                "journalctl -u tailscaled --no-pager -n 50",
                "journalctl -u tailscaled --no-pager -n 50",
                "journalctl -u tailscaled --no-pager -n 30",
            ]
        );
    }
}
