//! Service configuration.
//!
//! All knobs come from environment variables with working defaults, so the
//! binary runs with no configuration at all.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host for the HTTP server.
    pub host: String,
    /// Bind port for the HTTP server.
    pub port: u16,
    /// Directory for per-request scratch files (uploads, extracted members).
    pub scratch_dir: PathBuf,
    /// Deadline applied to each network fetch and command execution.
    pub adapter_timeout: Duration,
    /// Upper bound on the multipart request body.
    pub max_upload_bytes: usize,
}

impl Config {
    /// Build a config from the environment:
    /// - `ANSWERBOX_HOST` (default `0.0.0.0`)
    /// - `ANSWERBOX_PORT` (default `3000`)
    /// - `ANSWERBOX_SCRATCH_DIR` (default `{tmp}/answerbox`)
    /// - `ANSWERBOX_ADAPTER_TIMEOUT_SECS` (default `30`)
    /// - `ANSWERBOX_MAX_UPLOAD_MB` (default `50`)
    pub fn from_env() -> Self {
        let host = env::var("ANSWERBOX_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parsed_var("ANSWERBOX_PORT", 3000u16);
        let scratch_dir = env::var("ANSWERBOX_SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join("answerbox"));
        let adapter_timeout =
            Duration::from_secs(parsed_var("ANSWERBOX_ADAPTER_TIMEOUT_SECS", 30u64));
        let max_upload_bytes = parsed_var("ANSWERBOX_MAX_UPLOAD_MB", 50usize) * 1024 * 1024;

        Self {
            host,
            port,
            scratch_dir,
            adapter_timeout,
            max_upload_bytes,
        }
    }

    /// Config pointed at a caller-provided scratch directory. Used by tests.
    #[cfg(test)]
    pub fn for_tests(scratch_dir: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            scratch_dir,
            adapter_timeout: Duration::from_secs(10),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Read and parse an env var, falling back to `default` (with a warning) when
/// the value is present but unparseable.
fn parsed_var<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
