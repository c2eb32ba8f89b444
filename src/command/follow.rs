use std::future::Future;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::command::Invocation;
use crate::common::{debug, Result};
use crate::report::logscan;

/// Stream a long running command (`tail -f`, `journalctl -f`) into `out`,
/// keeping only lines that contain `filter` case-insensitively, until the
/// command exits or `shutdown` completes.
pub async fn follow<W>(
    invocation: &Invocation,
    filter: Option<&str>,
    mut out: W,
    shutdown: impl Future,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut child = Command::new(invocation.program())
        .args(invocation.arguments())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;
    debug!(command=%invocation, ?filter, "Following");

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => return Ok(()),
    };
    let mut lines = BufReader::new(stdout).lines();

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!(command=%invocation, "Follow interrupted");
                break;
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if filter.map_or(true, |term| logscan::contains_term(&line, term)) {
                            out.write_all(line.as_bytes()).await?;
                            out.write_all(b"\n").await?;
                            out.flush().await?;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    child.start_kill().ok();
    child.wait().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_streamed_lines() {
        let inv = Invocation::new("printf").arg("vsftpd OK LOGIN\nkernel noise\nVSFTPD FAIL LOGIN\n");
        let mut out = Vec::new();

        follow(&inv, Some("vsftpd"), &mut out, std::future::pending::<()>())
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "vsftpd OK LOGIN\nVSFTPD FAIL LOGIN\n");
    }

    #[tokio::test]
    async fn shutdown_stops_an_endless_stream() {
        let inv = Invocation::new("sh").args(["-c", "while true; do echo tick; sleep 0.05; done"]);
        let mut out = Vec::new();

        follow(
            &inv,
            None,
            &mut out,
            tokio::time::sleep(std::time::Duration::from_millis(200)),
        )
        .await
        .unwrap();

        assert!(String::from_utf8(out).unwrap().contains("tick"));
    }
}
