use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::command::{Executor, Invocation, Output};
use crate::common::{debug, trace, warn};

/// Runs commands on the local host with tokio.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    timeout: Duration,
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self {
            timeout: SystemExecutor::DEFAULT_TIMEOUT,
        }
    }
}

impl SystemExecutor {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.arguments())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // a timed out child is dropped together with its future.
            .kill_on_drop(true);
        cmd
    }

    async fn collect(
        &self,
        invocation: &Invocation,
        mut cmd: Command,
        input: Option<&str>,
    ) -> Output {
        let limit = invocation.timeout_override().unwrap_or(self.timeout);
        trace!(command=%invocation, ?limit, "Spawn");

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                debug!(command=%invocation, %err, "Spawn failed");
                return Output::failed(err.to_string());
            }
        };

        if let Some(input) = input {
            if let Some(mut stdin) = child.stdin.take() {
                if let Err(err) = stdin.write_all(input.as_bytes()).await {
                    debug!(command=%invocation, %err, "Write stdin");
                }
                // closing stdin signals EOF to the child.
                drop(stdin);
            }
        }

        match timeout(limit, child.wait_with_output()).await {
            Err(_) => {
                warn!(command=%invocation, ?limit, "Command timed out");
                Output::timeout()
            }
            Ok(Err(err)) => Output::failed(err.to_string()),
            Ok(Ok(out)) => {
                let output = Output::new(
                    out.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&out.stdout),
                    String::from_utf8_lossy(&out.stderr),
                );
                debug!(command=%invocation, code=output.code, "Command done");
                output
            }
        }
    }
}

#[async_trait]
impl Executor for SystemExecutor {
    async fn output(&self, invocation: &Invocation) -> Output {
        let mut cmd = SystemExecutor::command(invocation);
        cmd.stdin(Stdio::null());
        self.collect(invocation, cmd, None).await
    }

    async fn output_with_input(&self, invocation: &Invocation, input: &str) -> Output {
        let mut cmd = SystemExecutor::command(invocation);
        cmd.stdin(Stdio::piped());
        self.collect(invocation, cmd, Some(input)).await
    }

    async fn attached(&self, invocation: &Invocation) -> i32 {
        debug!(command=%invocation, "Run attached");
        match Command::new(invocation.program())
            .args(invocation.arguments())
            .status()
            .await
        {
            Ok(status) => status.code().unwrap_or(-1),
            Err(err) => {
                warn!(command=%invocation, %err, "Spawn failed");
                -1
            }
        }
    }

    async fn resolve(&self, host: &str) -> bool {
        match timeout(self.timeout, tokio::net::lookup_host((host, 443))).await {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(err)) => {
                debug!(host, %err, "Lookup failed");
                false
            }
            Err(_) => false,
        }
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }
}
