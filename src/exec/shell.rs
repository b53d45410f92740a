// src/exec/shell.rs

//! Run a single shell instruction and capture its output.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// Captured result of one shell instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// Stdout, one entry per line.
    pub stdout: Vec<String>,
    /// Exit code, or -1 if the process was terminated by a signal.
    pub code: i32,
    pub success: bool,
}

/// Run `line` through the platform shell on behalf of step `step`.
///
/// Stdout is captured line by line; stderr is forwarded to the log at
/// debug level.
pub async fn run_shell_line(step: &str, line: &str) -> Result<ShellOutput> {
    info!(step = %step, cmd = %line, "starting shell instruction");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for step '{step}'"))?;

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let step_name = step.to_string();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(step = %step_name, "stderr: {}", line);
            }
        });
    }

    let mut stdout = Vec::new();
    if let Some(out) = child.stdout.take() {
        let mut lines = BufReader::new(out).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("reading stdout of step '{step}'"))?
        {
            debug!(step = %step, "stdout: {}", line);
            stdout.push(line);
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of step '{step}'"))?;
    let code = status.code().unwrap_or(-1);

    info!(
        step = %step,
        exit_code = code,
        success = status.success(),
        "shell instruction exited"
    );

    Ok(ShellOutput {
        stdout,
        code,
        success: status.success(),
    })
}
