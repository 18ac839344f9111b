//! Shell command execution.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::{ResolveError, ResolveResult};

const MAX_OUTPUT_CHARS: usize = 10_000;

/// Command patterns that are never run, with a suggestion for the caller.
const DANGEROUS_PATTERNS: &[(&str, &str)] = &[
    ("rm -rf /", "Deleting the filesystem root is blocked"),
    ("rm -rf /*", "Deleting the filesystem root is blocked"),
    ("mkfs", "Formatting filesystems is blocked"),
    ("dd if=/dev/", "Raw device access is blocked"),
    ("> /dev/", "Writing to device nodes is blocked"),
    ("shutdown", "Power management is blocked"),
    ("reboot", "Power management is blocked"),
    (":(){", "Fork bombs are blocked"),
];

/// Validate a command against the blocklist, including behind common
/// wrapper prefixes.
fn validate(command: &str) -> ResolveResult<()> {
    let trimmed = command.trim();
    let prefixes = ["sudo ", "time ", "nice ", "nohup "];

    for (pattern, suggestion) in DANGEROUS_PATTERNS {
        let blocked = trimmed.starts_with(pattern)
            || prefixes.iter().any(|prefix| {
                trimmed
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.trim_start().starts_with(pattern))
            });
        if blocked {
            return Err(ResolveError::Parameter(format!(
                "command matches blocked pattern '{}': {}",
                pattern, suggestion
            )));
        }
    }
    Ok(())
}

/// Strip binary garbage from command output while keeping valid text.
fn sanitize_output(bytes: &[u8]) -> String {
    let non_printable = bytes
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();
    if bytes.len() > 100 && non_printable > bytes.len() / 10 {
        return format!("[binary output: {} bytes]", bytes.len());
    }

    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c == '\n' || c == '\r' || c == '\t' || (c >= ' ' && c != '\u{FFFD}'))
        .collect()
}

fn clip(mut text: String) -> String {
    if text.len() > MAX_OUTPUT_CHARS {
        let mut cut = MAX_OUTPUT_CHARS;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("\n... [output truncated]");
    }
    text
}

/// Run a shell command in `cwd` and return its trimmed stdout.
///
/// The child is spawned with `kill_on_drop`, so hitting the deadline kills
/// it instead of leaving it running past the request.
pub async fn run(command: &str, cwd: &Path, deadline: Duration) -> ResolveResult<String> {
    validate(command)?;

    tracing::info!(cwd = %cwd.display(), command, "executing command");

    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c")
        .arg(command)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|err| ResolveError::Execution(format!("failed to execute command: {}", err)))?;

    let output = tokio::time::timeout(deadline, child.wait_with_output())
        .await
        .map_err(|_| {
            ResolveError::Execution(format!(
                "command timed out after {} seconds",
                deadline.as_secs_f64()
            ))
        })?
        .map_err(|err| ResolveError::Execution(format!("failed to execute command: {}", err)))?;

    let stdout = sanitize_output(&output.stdout);
    let stderr = sanitize_output(&output.stderr);
    let exit_code = output.status.code().unwrap_or(-1);

    tracing::debug!(
        exit_code,
        stdout_len = stdout.len(),
        stderr_len = stderr.len(),
        "command completed"
    );

    if !output.status.success() {
        let detail = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        return Err(ResolveError::Execution(clip(format!(
            "command exited with status {}: {}",
            exit_code, detail
        ))));
    }

    Ok(clip(stdout.trim().to_string()))
}
