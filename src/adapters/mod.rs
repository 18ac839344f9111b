//! Format and transport adapters.
//!
//! Handlers stay thin by delegating every interaction with the outside world
//! (archives, spreadsheets, charsets, HTML, HTTP, shell commands, SQL) to
//! the adapters here. Adapters translate their library errors into
//! [`crate::error::ResolveError`] kinds so handlers never see a raw I/O or
//! parser error.

pub mod archive;
pub mod command;
pub mod encoding;
pub mod html;
pub mod http;
pub mod sql;
pub mod tabular;
