use std::path::{Path, PathBuf};

use tokio::fs;

use crate::command::{Executor, Invocation};
use crate::common::Result;
use crate::config::filepath;
use crate::logview;
use crate::report::{self, logscan, Status};

pub const CONNECTION_TERMS: [&str; 5] = ["connect", "disconnect", "peer", "established", "lost"];
pub const ERROR_TERMS: [&str; 4] = ["error", "fail", "warning", "critical"];
pub const AUTH_TERMS: [&str; 5] = ["auth", "login", "logout", "key", "token"];

pub const AUTH_LINES: usize = 30;
const SYSLOG_FILTER: &str = "tailscale";

/// Views over the `tailscaled` journal and Tailscale log files.
pub struct TailscaleLogViewer<E> {
    executor: E,
    syslog: PathBuf,
    log_dir: PathBuf,
}

impl<E> TailscaleLogViewer<E>
where
    E: Executor,
{
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            syslog: PathBuf::from(filepath::SYSLOG),
            log_dir: PathBuf::from(filepath::TAILSCALE_LOG_DIR),
        }
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Last `lines` journal entries of `tailscaled`.
    pub async fn journal(&self, lines: usize) -> Result<String> {
        let out = self
            .executor
            .checked(&journal_invocation().args(["-n".to_owned(), lines.to_string()]))
            .await?;
        Ok(out.stdout)
    }

    /// Journal lines containing any of `keywords`.
    pub async fn journal_matching(&self, keywords: &[&str], lines: usize) -> Result<Vec<String>> {
        let text = self.journal(lines).await?;
        Ok(logscan::filter_any(&text, keywords)
            .into_iter()
            .map(str::to_owned)
            .collect())
    }

    pub async fn view_journal(&self, filter: Option<&str>, lines: usize) -> bool {
        logview::print_title("TAILSCALED SERVICE LOGS", filter);
        match self.journal(lines).await {
            Ok(text) => {
                logview::print_lines(logscan::filter_lines(&text, filter));
                true
            }
            Err(err) => {
                report::line(Status::Fail, format!("Error reading logs: {}", err));
                false
            }
        }
    }

    pub async fn view_syslog(&self, lines: usize) -> bool {
        logview::view_file(&self.executor, &self.syslog, Some(SYSLOG_FILTER), lines).await
    }

    pub async fn view_file(&self, path: &Path, filter: Option<&str>, lines: usize) -> bool {
        logview::view_file(&self.executor, path, filter, lines).await
    }

    /// `*.log` files in the log directory, sorted by name. `None` when the
    /// directory does not exist.
    pub async fn log_files(&self) -> Result<Option<Vec<PathBuf>>> {
        let mut entries = match fs::read_dir(&self.log_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "log") {
                files.push(path);
            }
        }
        files.sort();
        Ok(Some(files))
    }

    pub async fn show_connection_logs(&self, lines: usize) -> bool {
        self.show_matching("CONNECTION LOGS", &CONNECTION_TERMS, lines).await
    }

    pub async fn show_error_logs(&self, lines: usize) -> bool {
        self.show_matching("ERRORS AND WARNINGS", &ERROR_TERMS, lines).await
    }

    pub async fn show_auth_logs(&self, lines: usize) -> bool {
        self.show_matching("AUTHENTICATION LOGS", &AUTH_TERMS, lines).await
    }

    // A failed journal read is printed and reported as false.
    async fn show_matching(&self, title: &str, keywords: &[&str], lines: usize) -> bool {
        report::header(title);
        match self.journal_matching(keywords, lines).await {
            Ok(matched) => {
                logview::print_lines(matched.iter().map(String::as_str));
                true
            }
            Err(err) => {
                report::line(Status::Fail, format!("Error reading logs: {}", err));
                false
            }
        }
    }

    /// `journalctl -f` with an optional filter until Ctrl-C.
    pub async fn follow_journal(&self, filter: Option<&str>) -> bool {
        logview::print_title("TAILSCALED SERVICE LOGS", filter);
        match logview::follow_until_interrupted(&journal_invocation().arg("-f"), filter).await {
            Ok(()) => true,
            Err(err) => {
                report::line(Status::Fail, format!("Error reading logs: {}", err));
                false
            }
        }
    }
}

fn journal_invocation() -> Invocation {
    Invocation::new("journalctl").args(["-u", "tailscaled", "--no-pager"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Output, ScriptedExecutor};

    const JOURNAL: &str = "\
Oct 06 10:00:00 files tailscaled[1]: magicsock: disco: node [abc] now using 10.0.0.4:41641
Oct 06 10:00:01 files tailscaled[1]: wgengine: Reconfig: configuring router
Oct 06 10:00:02 files tailscaled[1]: peer [xyz] connection established
Oct 06 10:00:03 files tailscaled[1]: control: authRoutine: state:authenticated
Oct 06 10:00:04 files tailscaled[1]: health: warning: dns unreachable
";

    fn viewer(lines: usize) -> TailscaleLogViewer<ScriptedExecutor> {
        TailscaleLogViewer::new(ScriptedExecutor::new().on(
            &format!("journalctl -u tailscaled --no-pager -n {}", lines),
            Output::ok(JOURNAL),
        ))
    }

    #[tokio::test]
    async fn keyword_views() {
        let viewer = viewer(50);

        let connections = viewer.journal_matching(&CONNECTION_TERMS, 50).await.unwrap();
        assert_eq!(connections.len(), 1);
        assert!(connections[0].contains("established"));

        let errors = viewer.journal_matching(&ERROR_TERMS, 50).await.unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn auth_view_uses_thirty_lines() {
        let viewer = viewer(AUTH_LINES);

        let auth = viewer.journal_matching(&AUTH_TERMS, AUTH_LINES).await.unwrap();

        assert_eq!(auth.len(), 1);
        assert!(auth[0].contains("authRoutine"));
    }

    #[tokio::test]
    async fn journal_failure_is_an_error() {
        let viewer = TailscaleLogViewer::new(ScriptedExecutor::new());
        assert!(viewer.journal(50).await.is_err());
    }

    #[tokio::test]
    async fn keyword_views_report_journal_failure() {
        let viewer = TailscaleLogViewer::new(
            ScriptedExecutor::new().otherwise(Output::new(1, "", "No journal files were found.")),
        );

        assert!(!viewer.show_connection_logs(50).await);
        assert!(!viewer.show_error_logs(50).await);
        assert!(!viewer.show_auth_logs(AUTH_LINES).await);
    }

    #[tokio::test]
    async fn log_files_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["tailscaled.log", "b.txt", "a.log"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let viewer = TailscaleLogViewer::new(ScriptedExecutor::new()).with_log_dir(dir.path());

        let files = viewer.log_files().await.unwrap().unwrap();

        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();
        assert_eq!(names, ["a.log", "tailscaled.log"]);
    }

    #[tokio::test]
    async fn missing_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let viewer =
            TailscaleLogViewer::new(ScriptedExecutor::new()).with_log_dir(dir.path().join("none"));

        assert_eq!(viewer.log_files().await.unwrap(), None);
    }
}
