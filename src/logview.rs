//! Reading, filtering and following log sources. Shared by the ftp and
//! tailscale log viewers.

use std::path::{Path, PathBuf};

use crate::command::{self, Executor, Invocation};
use crate::common::{debug, Result};
use crate::report::{self, logscan, Status};

pub const DEFAULT_LINES: usize = 50;

/// A selectable entry in a viewer menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    pub key: &'static str,
    pub path: PathBuf,
    pub description: &'static str,
}

impl LogSource {
    pub fn new(key: &'static str, path: impl Into<PathBuf>, description: &'static str) -> Self {
        Self {
            key,
            path: path.into(),
            description,
        }
    }
}

pub fn find<'a>(sources: &'a [LogSource], key: &str) -> Option<&'a LogSource> {
    sources.iter().find(|s| s.key == key)
}

/// `tail -n <lines> <path>` output, `None` when the file does not exist.
pub async fn tail<E>(executor: &E, path: &Path, lines: usize) -> Result<Option<String>>
where
    E: Executor + ?Sized,
{
    if tokio::fs::metadata(path).await.is_err() {
        return Ok(None);
    }
    let out = executor
        .checked(
            &Invocation::new("tail")
                .arg("-n")
                .arg(lines.to_string())
                .arg(path.to_string_lossy()),
        )
        .await?;
    Ok(Some(out.stdout))
}

pub fn print_lines<'a>(lines: impl IntoIterator<Item = &'a str>) {
    for line in lines {
        println!("{}", line);
    }
}

/// Title block used by every log view.
pub fn print_title(title: &str, filter: Option<&str>) {
    println!("\n{}", report::rule());
    println!("{:^width$}", title, width = report::WIDTH);
    if let Some(filter) = filter {
        println!("{:^width$}", format!("FILTER: {}", filter), width = report::WIDTH);
    }
    println!("{}\n", report::rule());
}

/// Show the last `lines` lines of a file, optionally filtered.
/// Returns false when the file is missing or unreadable.
pub async fn view_file<E>(executor: &E, path: &Path, filter: Option<&str>, lines: usize) -> bool
where
    E: Executor + ?Sized,
{
    if tokio::fs::metadata(path).await.is_err() {
        report::line(Status::Fail, format!("Log file not found: {}", path.display()));
        return false;
    }

    print_title(&format!("LOG: {}", path.display()), filter);

    match tail(executor, path, lines).await {
        Ok(Some(text)) => {
            print_lines(logscan::filter_lines(&text, filter));
            true
        }
        Ok(None) => false,
        Err(err) => {
            report::line(Status::Fail, format!("Error reading log: {}", err));
            false
        }
    }
}

/// Stream `invocation` until it exits or Ctrl-C is pressed.
pub async fn follow_until_interrupted(invocation: &Invocation, filter: Option<&str>) -> Result<()> {
    println!("\nPress Ctrl+C to stop...\n");
    let interrupted = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            debug!(%err, "Listen ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    command::follow(invocation, filter, tokio::io::stdout(), interrupted).await?;
    println!("\n\nStopped viewing logs");
    Ok(())
}

/// Follow a file with `tail -f`.
pub fn tail_follow(path: &Path) -> Invocation {
    Invocation::new("tail").arg("-f").arg(path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Output, ScriptedExecutor};

    #[tokio::test]
    async fn tail_of_missing_file_is_none() {
        let executor = ScriptedExecutor::new();
        let got = tail(&executor, Path::new("/nonexistent/opskit.log"), 10)
            .await
            .unwrap();

        assert!(got.is_none());
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn tail_runs_tail_with_line_count() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let line = format!("tail -n 20 {}", file.path().display());
        let executor = ScriptedExecutor::new().on(&line, Output::ok("a\nb\n"));

        let got = tail(&executor, file.path(), 20).await.unwrap();

        assert_eq!(got.as_deref(), Some("a\nb\n"));
        assert!(executor.was_called(&line));
    }

    #[test]
    fn find_by_key() {
        let sources = vec![
            LogSource::new("1", "/var/log/vsftpd.log", "vsftpd main log"),
            LogSource::new("2", "/var/log/syslog", "System log"),
        ];
        assert_eq!(find(&sources, "2").unwrap().description, "System log");
        assert!(find(&sources, "9").is_none());
    }
}
