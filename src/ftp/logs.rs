use std::path::{Path, PathBuf};

use crate::command::Executor;
use crate::common::Result;
use crate::config::filepath;
use crate::logview::{self, LogSource};
use crate::report::{self, logscan, Status};

pub const ERROR_TERMS: [&str; 6] = ["error", "fail", "denied", "refused", "warning", "critical"];
const FAILED_LOGIN_TERMS: [&str; 2] = ["fail", "denied"];
const SUCCESSFUL_LOGIN: &str = "ok login";

/// Lines scanned for the login views.
const LOGIN_WINDOW: usize = 100;
pub const LOGIN_LINES: usize = 20;

/// Views over the vsftpd related logs.
pub struct FtpLogViewer<E> {
    executor: E,
    sources: Vec<LogSource>,
    vsftpd_log: PathBuf,
    syslog: PathBuf,
}

impl<E> FtpLogViewer<E>
where
    E: Executor,
{
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            sources: vec![
                LogSource::new("1", filepath::VSFTPD_LOG, "vsftpd main log"),
                LogSource::new("2", filepath::SYSLOG, "System log (vsftpd entries)"),
                LogSource::new("3", filepath::AUTH_LOG, "Authentication log"),
                LogSource::new("4", filepath::FAIL2BAN_LOG, "fail2ban log"),
            ],
            vsftpd_log: PathBuf::from(filepath::VSFTPD_LOG),
            syslog: PathBuf::from(filepath::SYSLOG),
        }
    }

    /// Point the login and activity views at other files.
    pub fn with_logs(mut self, vsftpd_log: impl Into<PathBuf>, syslog: impl Into<PathBuf>) -> Self {
        self.vsftpd_log = vsftpd_log.into();
        self.syslog = syslog.into();
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn sources(&self) -> &[LogSource] {
        &self.sources
    }

    /// Last `lines` lines of `path`, keeping those containing `filter`.
    pub async fn filter_logs(&self, path: &Path, filter: Option<&str>, lines: usize) -> bool {
        logview::view_file(&self.executor, path, filter, lines).await
    }

    /// Lines among the last `lines` with an error keyword. `None` when the
    /// file does not exist.
    pub async fn errors(&self, path: &Path, lines: usize) -> Result<Option<Vec<String>>> {
        Ok(logview::tail(&self.executor, path, lines)
            .await?
            .map(|text| owned(logscan::filter_any(&text, &ERROR_TERMS))))
    }

    /// Lines mentioning `username` in the vsftpd log, or in syslog when
    /// the vsftpd log does not exist.
    pub async fn user_activity(&self, username: &str, lines: usize) -> Result<Vec<String>> {
        let text = match logview::tail(&self.executor, &self.vsftpd_log, lines).await? {
            Some(text) => text,
            None => logview::tail(&self.executor, &self.syslog, lines)
                .await?
                .unwrap_or_default(),
        };
        Ok(owned(logscan::filter_lines(&text, Some(username))))
    }

    /// Successful logins among the last 100 vsftpd log lines, newest `n`.
    pub async fn recent_logins(&self, n: usize) -> Result<Vec<String>> {
        let text = self.login_window().await?;
        let matched = logscan::filter_lines(&text, Some(SUCCESSFUL_LOGIN));
        Ok(owned(logscan::last_lines(&matched, n)))
    }

    pub async fn failed_logins(&self, n: usize) -> Result<Vec<String>> {
        let text = self.login_window().await?;
        let matched = logscan::filter_any(&text, &FAILED_LOGIN_TERMS);
        Ok(owned(logscan::last_lines(&matched, n)))
    }

    async fn login_window(&self) -> Result<String> {
        Ok(logview::tail(&self.executor, &self.vsftpd_log, LOGIN_WINDOW)
            .await?
            .unwrap_or_default())
    }

    /// Returns false when the log could not be read. Read failures are
    /// printed, never returned.
    pub async fn show_errors_only(&self, path: &Path, lines: usize) -> bool {
        report::header(&format!("ERRORS FROM: {}", path.display()));
        match self.errors(path, lines).await {
            Ok(Some(found)) => {
                print_owned(&found);
                true
            }
            Ok(None) => {
                report::line(Status::Fail, format!("Log file not found: {}", path.display()));
                false
            }
            Err(err) => read_failed(err),
        }
    }

    pub async fn show_user_activity(&self, username: &str, lines: usize) -> bool {
        report::header(&format!("ACTIVITY FOR USER: {}", username));
        show(self.user_activity(username, lines).await)
    }

    pub async fn show_recent_logins(&self, n: usize) -> bool {
        report::header("RECENT SUCCESSFUL LOGINS");
        show(self.recent_logins(n).await)
    }

    pub async fn show_failed_logins(&self, n: usize) -> bool {
        report::header("RECENT FAILED LOGINS");
        show(self.failed_logins(n).await)
    }

    /// `tail -f` with an optional filter until Ctrl-C.
    pub async fn follow(&self, path: &Path, filter: Option<&str>) -> bool {
        if tokio::fs::metadata(path).await.is_err() {
            report::line(Status::Fail, format!("Log file not found: {}", path.display()));
            return false;
        }
        logview::print_title(&format!("LOG: {}", path.display()), filter);
        match logview::follow_until_interrupted(&logview::tail_follow(path), filter).await {
            Ok(()) => true,
            Err(err) => read_failed(err),
        }
    }
}

fn show(lines: Result<Vec<String>>) -> bool {
    match lines {
        Ok(lines) => {
            print_owned(&lines);
            true
        }
        Err(err) => read_failed(err),
    }
}

fn read_failed(err: crate::common::Error) -> bool {
    report::line(Status::Fail, format!("Error reading log: {}", err));
    false
}

fn owned(lines: Vec<&str>) -> Vec<String> {
    lines.into_iter().map(str::to_owned).collect()
}

fn print_owned(lines: &[String]) {
    logview::print_lines(lines.iter().map(String::as_str));
}
