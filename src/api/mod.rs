//! HTTP surface: the resolution endpoint and health check.

mod routes;
mod types;

pub use routes::{router, serve, AppState};
pub use types::{AnswerResponse, HealthResponse};
