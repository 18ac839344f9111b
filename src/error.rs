//! Error kinds for question resolution.
//!
//! Every kind is recovered at the engine boundary and rendered as an
//! `Error: <message>` answer; none crash the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request itself was malformed (missing question). No handler runs.
    #[error("invalid request: {0}")]
    Request(String),

    /// A required parameter was absent from the question or unparseable.
    #[error("parameter error: {0}")]
    Parameter(String),

    /// File content did not match the structure the task expects.
    #[error("format error: {0}")]
    Format(String),

    /// A network, archive, or database dependency failed.
    #[error("external resource error: {0}")]
    ExternalResource(String),

    /// An external command failed to spawn or exited non-zero.
    #[error("execution error: {0}")]
    Execution(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

impl ResolveError {
    /// Short label for logging and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Parameter(_) => "parameter",
            Self::Format(_) => "format",
            Self::ExternalResource(_) => "external_resource",
            Self::Execution(_) => "execution",
        }
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(e: serde_json::Error) -> Self {
        ResolveError::Format(format!("invalid JSON: {}", e))
    }
}
