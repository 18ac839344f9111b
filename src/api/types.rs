//! API request/response types.

use serde::{Deserialize, Serialize};

/// Envelope for every resolution outcome. Failures carry their message in
/// `answer` too, prefixed with `Error:`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
