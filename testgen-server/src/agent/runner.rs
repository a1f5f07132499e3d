//! Run the agent subprocess with a deadline and an output cap

use super::{AgentConfig, AgentError};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

/// Stderr kept in `AgentError::Exit`
const STDERR_EXCERPT: usize = 500;

/// Run `<program> <args..> <prompt>` in `cwd` and return its stdout.
///
/// The child is killed when the deadline passes or stdout/stderr grows past
/// `max_buffer` bytes.
pub async fn run(config: &AgentConfig, cwd: &Path, prompt: &str) -> Result<String, AgentError> {
    debug!(program = %config.program, cwd = %cwd.display(), "spawning agent");
    let mut child = Command::new(&config.program)
        .args(&config.args)
        .arg(prompt)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(AgentError::Spawn)?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let limit = config.max_buffer;

    let collect = async {
        let (out, err) = tokio::try_join!(read_bounded(stdout, limit), read_bounded(stderr, limit))?;
        let status = child.wait().await.map_err(AgentError::Pipe)?;
        Ok::<(ExitStatus, Vec<u8>, Vec<u8>), AgentError>((status, out, err))
    };

    let finished = tokio::time::timeout(config.timeout, collect).await;
    let (status, out, err) = match finished {
        Ok(Ok(done)) => done,
        Ok(Err(e)) => {
            let _ = child.kill().await;
            return Err(e);
        }
        Err(_) => {
            let _ = child.kill().await;
            return Err(AgentError::Timeout(config.timeout));
        }
    };

    if !status.success() {
        let stderr = String::from_utf8_lossy(&err);
        return Err(AgentError::Exit {
            code: status.code(),
            stderr: stderr.trim().chars().take(STDERR_EXCERPT).collect(),
        });
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Read a pipe to EOF, failing once more than `limit` bytes arrive
async fn read_bounded<R: AsyncRead + Unpin>(
    reader: Option<R>,
    limit: usize,
) -> Result<Vec<u8>, AgentError> {
    let mut buf = Vec::new();
    let Some(reader) = reader else {
        return Ok(buf);
    };
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut buf)
        .await
        .map_err(AgentError::Pipe)?;
    if buf.len() > limit {
        return Err(AgentError::OutputOverflow { limit });
    }
    Ok(buf)
}
