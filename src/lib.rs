//! # answerbox
//!
//! A single-endpoint service that answers data-extraction questions.
//!
//! `POST /` takes a multipart form with a free-text `question` and an
//! optional `file`; the response is always `{"answer": "..."}`. Questions
//! are matched against an ordered rule table, parameters are pulled out
//! with per-kind capture schemas, and a handler produces the answer using
//! the format adapters.
//!
//! ## Resolution flow
//!
//! ```text
//!   question ──▶ classify ──▶ extract params ──▶ handler ──▶ answer
//!                                 │                 │
//!                                 ▼                 ▼
//!                          release scope ◀──── adapters
//!                        (always, both exits)
//! ```
//!
//! ## Modules
//! - `classify`: ordered keyword rules mapping questions to task kinds
//! - `params`: per-kind capture schemas and the extractor
//! - `handlers`: one handler per implemented task kind
//! - `adapters`: archives, spreadsheets, charsets, HTML, HTTP, shell, SQL
//! - `engine`: orchestration and scratch-scope lifecycle
//! - `api`: the HTTP surface

pub mod adapters;
pub mod api;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod params;
pub mod scope;

pub use classify::TaskKind;
pub use config::Config;
pub use engine::{Engine, SharedEngine};
pub use error::{ResolveError, ResolveResult};
