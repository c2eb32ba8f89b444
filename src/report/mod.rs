//! Console report formatting shared by every tool.

pub mod logscan;

use std::fmt::{self, Write as _};

use chrono::Local;

pub const WIDTH: usize = 80;

pub fn rule() -> String {
    "=".repeat(WIDTH)
}

/// Section header: blank line, rule, centered title, rule, blank line.
pub fn header(title: &str) {
    println!("\n{}", rule());
    println!("{:^width$}", title, width = WIDTH);
    println!("{}\n", rule());
}

/// Opening banner with a start timestamp.
pub fn banner(title: &str) {
    println!("\n{}", rule());
    println!("{:^width$}", title, width = WIDTH);
    let started = format!("Started: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{:^width$}", started, width = WIDTH);
    println!("{}", rule());
}

/// Title between two rules, no trailing blank line. Used by menus.
pub fn title(title: &str) {
    println!("\n{}", rule());
    println!("{:^width$}", title, width = WIDTH);
    println!("{}", rule());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl Status {
    pub fn symbol(self) -> &'static str {
        match self {
            Status::Pass => "✓",
            Status::Warn => "⚠",
            Status::Fail => "✗",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Print a single status line, e.g. `✓ vsftpd (FTP Server): RUNNING`.
pub fn line(status: Status, text: impl fmt::Display) {
    println!("{} {}", status, text);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub message: String,
    // Remediation shown under "SUGGESTED FIXES", first line prefixed `Fix:`.
    pub fixes: Vec<String>,
}

/// Three buckets filled while checks run.
#[derive(Debug, Default)]
pub struct Report {
    passed: Vec<String>,
    warnings: Vec<String>,
    issues: Vec<Issue>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(&mut self, message: impl Into<String>) {
        self.passed.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.fail_with(message, std::iter::empty::<String>());
    }

    pub fn fail_with<I, S>(&mut self, message: impl Into<String>, fixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issues.push(Issue {
            message: message.into(),
            fixes: fixes.into_iter().map(Into::into).collect(),
        });
    }

    pub fn passed(&self) -> &[String] {
        &self.passed
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.warnings.len() + self.issues.len()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Render the closing summary. `hints` is shown when no issue was found.
    pub fn summary(&self, hints: &[&str]) -> String {
        let mut s = String::new();
        let rule = rule();

        let _ = writeln!(s, "\n{}\n{:^width$}\n{}\n", rule, "DIAGNOSTIC SUMMARY", rule, width = WIDTH);
        let _ = writeln!(s, "Total Checks: {}", self.total());
        let _ = writeln!(s, "{} Passed: {}", Status::Pass, self.passed.len());
        let _ = writeln!(s, "{} Warnings: {}", Status::Warn, self.warnings.len());
        let _ = writeln!(s, "{} Issues: {}\n", Status::Fail, self.issues.len());

        if !self.warnings.is_empty() {
            let _ = writeln!(s, "Warnings:");
            for warning in &self.warnings {
                let _ = writeln!(s, "  {} {}", Status::Warn, warning);
            }
            let _ = writeln!(s);
        }

        if self.issues.is_empty() {
            let _ = writeln!(s, "{} No critical issues found!", Status::Pass);
            if !hints.is_empty() {
                let _ = writeln!(s, "\nIf you're still experiencing problems:");
                for (i, hint) in hints.iter().enumerate() {
                    let _ = writeln!(s, "  {}. {}", i + 1, hint);
                }
            }
        } else {
            let _ = writeln!(s, "Critical Issues Found:");
            for issue in &self.issues {
                let _ = writeln!(s, "  {} {}", Status::Fail, issue.message);
            }
            let _ = writeln!(s);

            let _ = writeln!(s, "\n{}\n{:^width$}\n{}\n", rule, "SUGGESTED FIXES", rule, width = WIDTH);
            for (i, issue) in self.issues.iter().enumerate() {
                let _ = writeln!(s, "{}. {}", i + 1, issue.message);
                for (n, fix) in issue.fixes.iter().enumerate() {
                    if n == 0 {
                        let _ = writeln!(s, "   Fix: {}", fix);
                    } else {
                        let _ = writeln!(s, "        {}", fix);
                    }
                }
                let _ = writeln!(s);
            }
        }

        let _ = writeln!(s, "\n{}", rule);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_bucket() {
        let mut report = Report::new();
        report.pass("vsftpd is running");
        report.warn("fail2ban is not running");
        report.fail("Port 21 is not listening");

        assert_eq!(report.total(), 3);
        assert!(report.has_issues());
    }

    #[test]
    fn summary_lists_fixes_under_their_issue() {
        let mut report = Report::new();
        report.pass("Port 22 is listening");
        report.fail_with(
            "vsftpd (FTP Server) is not running",
            ["sudo systemctl start vsftpd", "sudo systemctl enable vsftpd"],
        );

        let summary = report.summary(&["unused hint"]);

        assert!(summary.contains("Total Checks: 2"));
        assert!(summary.contains("✗ Issues: 1"));
        assert!(summary.contains("SUGGESTED FIXES"));
        assert!(summary.contains("1. vsftpd (FTP Server) is not running\n   Fix: sudo systemctl start vsftpd\n        sudo systemctl enable vsftpd\n"));
        assert!(!summary.contains("unused hint"));
    }

    #[test]
    fn clean_summary_shows_hints() {
        let mut report = Report::new();
        report.pass("Tailscale is installed");

        let summary = report.summary(&["Review logs"]);

        assert!(summary.contains("No critical issues found!"));
        assert!(summary.contains("  1. Review logs"));
        assert!(!summary.contains("SUGGESTED FIXES"));
    }
}
