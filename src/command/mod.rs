//! External command execution.
//!
//! Every tool talks to the host through [`Executor`], so checks can be run
//! against [`ScriptedExecutor`] in tests and [`SystemExecutor`] otherwise.

mod follow;
pub use follow::follow;

mod scripted;
pub use scripted::ScriptedExecutor;

mod system;
pub use system::SystemExecutor;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::internal::{Error, ErrorKind};

/// A program and its arguments. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Override the executor's default timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished (or abandoned) command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl Output {
    pub const TIMEOUT_MESSAGE: &'static str = "Command timed out";

    pub fn new(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            timed_out: false,
        }
    }

    pub fn ok(stdout: impl Into<String>) -> Self {
        Output::new(0, stdout, "")
    }

    /// The command never produced an exit status (spawn error and the like).
    pub fn failed(reason: impl Into<String>) -> Self {
        Output::new(-1, "", reason)
    }

    pub fn timeout() -> Self {
        Self {
            timed_out: true,
            ..Output::failed(Output::TIMEOUT_MESSAGE)
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0 && !self.timed_out
    }

    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    fn into_result(self, invocation: &Invocation, timeout: Duration) -> Result<Output, Error> {
        if self.timed_out {
            Err(ErrorKind::CommandTimeout {
                command: invocation.to_string(),
                timeout,
            }
            .into())
        } else if self.code != 0 {
            Err(ErrorKind::CommandFailed {
                command: invocation.to_string(),
                code: self.code,
                stderr: self.stderr,
            }
            .into())
        } else {
            Ok(self)
        }
    }
}

#[async_trait]
pub trait Executor: Send + Sync {
    /// Run to completion, capturing stdout and stderr.
    async fn output(&self, invocation: &Invocation) -> Output;

    /// Like [`Executor::output`] but feeding `input` on stdin.
    async fn output_with_input(&self, invocation: &Invocation, input: &str) -> Output;

    /// Run with the terminal attached. Returns the exit code, -1 if none.
    async fn attached(&self, invocation: &Invocation) -> i32;

    /// Whether `host` resolves to at least one address.
    async fn resolve(&self, host: &str) -> bool;

    /// Timeout applied when the invocation does not carry its own.
    fn default_timeout(&self) -> Duration {
        SystemExecutor::DEFAULT_TIMEOUT
    }

    async fn succeeds(&self, invocation: &Invocation) -> bool {
        self.output(invocation).await.success()
    }

    /// Non-zero exit status and timeouts become errors.
    async fn checked(&self, invocation: &Invocation) -> Result<Output, Error> {
        let timeout = invocation
            .timeout_override()
            .unwrap_or_else(|| self.default_timeout());
        self.output(invocation)
            .await
            .into_result(invocation, timeout)
    }

    async fn checked_with_input(
        &self,
        invocation: &Invocation,
        input: &str,
    ) -> Result<Output, Error> {
        let timeout = invocation
            .timeout_override()
            .unwrap_or_else(|| self.default_timeout());
        self.output_with_input(invocation, input)
            .await
            .into_result(invocation, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_display() {
        let inv = Invocation::new("systemctl").args(["is-active", "vsftpd"]);
        assert_eq!(inv.to_string(), "systemctl is-active vsftpd");
    }

    #[tokio::test]
    async fn checked_maps_exit_status() {
        let executor = ScriptedExecutor::new()
            .on("id alice", Output::ok("uid=1001(alice)"))
            .on("id bob", Output::new(1, "", "id: 'bob': no such user"));

        assert!(executor
            .checked(&Invocation::new("id").arg("alice"))
            .await
            .is_ok());

        let err = executor
            .checked(&Invocation::new("id").arg("bob"))
            .await
            .unwrap_err();
        assert!(err.is_command());
        assert!(err.to_string().contains("no such user"));
    }

    #[tokio::test]
    async fn timeout_is_not_success() {
        let executor = ScriptedExecutor::new().on("sleep 60", Output::timeout());
        let inv = Invocation::new("sleep").arg("60");

        assert!(!executor.succeeds(&inv).await);
        let err = executor.checked(&inv).await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::CommandTimeout { .. }));
    }
}
