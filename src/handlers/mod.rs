//! Task handlers.
//!
//! One handler per implemented task kind. Handlers receive a [`TaskContext`]
//! with the extracted parameters, the optional upload, and the request's
//! release scope; they return the answer text or a
//! [`crate::error::ResolveError`]. Everything format- or transport-specific
//! lives in [`crate::adapters`].

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::adapters::http::Fetcher;
use crate::classify::TaskKind;
use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::params::ParameterSet;
use crate::scope::ReleaseScope;

mod archive;
mod command;
mod dates;
mod json;
mod spreadsheet;
mod sql;
mod text;
mod web;

/// A file that arrived with the request, already streamed to scratch space.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Scratch path the body was written to.
    pub path: PathBuf,
    /// Client-side file name, kept for extension sniffing.
    pub file_name: String,
}

/// Everything a handler may touch while resolving one question.
pub struct TaskContext<'a> {
    pub question: &'a str,
    pub params: &'a ParameterSet,
    pub upload: Option<&'a Upload>,
    pub scope: &'a ReleaseScope,
    pub config: &'a Config,
    pub fetcher: &'a Fetcher,
}

impl TaskContext<'_> {
    /// The request's upload, or a request error when the question needs one.
    fn upload(&self) -> ResolveResult<&Upload> {
        self.upload.ok_or_else(|| {
            ResolveError::Request("this question needs an uploaded file".to_string())
        })
    }

    /// Backstop for required parameters; the engine checks these before
    /// dispatch, so hitting the error here means a schema bug.
    fn require(&self, name: &str) -> ResolveResult<&str> {
        self.params
            .get(name)
            .ok_or_else(|| ResolveError::Parameter(format!("missing parameter '{}'", name)))
    }
}

#[async_trait]
pub trait Handler: Send + Sync {
    fn kind(&self) -> TaskKind;

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String>;
}

/// Answer for kinds the service recognizes but does not carry out.
struct DeclaredUnimplemented {
    kind: TaskKind,
}

#[async_trait]
impl Handler for DeclaredUnimplemented {
    fn kind(&self) -> TaskKind {
        self.kind
    }

    async fn run(&self, _ctx: &TaskContext<'_>) -> ResolveResult<String> {
        Ok(format!("Not implemented: {}", self.kind.label()))
    }
}

/// Answer for questions no classification rule recognized.
struct Unsupported;

#[async_trait]
impl Handler for Unsupported {
    fn kind(&self) -> TaskKind {
        TaskKind::Unsupported
    }

    async fn run(&self, _ctx: &TaskContext<'_>) -> ResolveResult<String> {
        Ok("Unsupported question type".to_string())
    }
}

/// Registry mapping every task kind to its handler.
pub struct HandlerSet {
    handlers: HashMap<TaskKind, Box<dyn Handler>>,
}

impl HandlerSet {
    pub fn with_defaults() -> Self {
        let mut set = Self {
            handlers: HashMap::new(),
        };

        set.register(Box::new(web::HeadStatus));
        set.register(Box::new(web::CssCount));
        set.register(Box::new(command::RunShell));
        set.register(Box::new(archive::ArchiveCsv));
        set.register(Box::new(spreadsheet::SheetSum));
        set.register(Box::new(dates::WeekdaySpan));
        set.register(Box::new(json::KeyLookup));
        set.register(Box::new(json::ListBuild));
        set.register(Box::new(text::DecodeUpload));
        set.register(Box::new(sql::GoldTickets));
        set.register(Box::new(Unsupported));

        // The remaining kinds classify cleanly but answer that they
        // are not implemented.
        for &kind in TaskKind::ALL {
            if !set.handlers.contains_key(&kind) {
                set.register(Box::new(DeclaredUnimplemented { kind }));
            }
        }
        set
    }

    fn register(&mut self, handler: Box<dyn Handler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    /// Every kind has a handler; `with_defaults` backfills the rest.
    pub fn get(&self, kind: TaskKind) -> &dyn Handler {
        self.handlers
            .get(&kind)
            .expect("every task kind has a handler")
            .as_ref()
    }
}

/// Render a sum the way people write it: integers without a decimal point,
/// everything else with one.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_handler() {
        let set = HandlerSet::with_defaults();
        for &kind in TaskKind::ALL {
            assert_eq!(set.get(kind).kind(), kind, "{}", kind.as_str());
        }
    }

    #[test]
    fn unimplemented_kinds_declare_themselves() {
        let set = HandlerSet::with_defaults();
        for &kind in TaskKind::ALL {
            if !kind.is_implemented() && kind != TaskKind::Unsupported {
                // Identity check only; answers are exercised in engine tests.
                assert_eq!(set.get(kind).kind(), kind);
            }
        }
    }

    #[test]
    fn numbers_render_like_answers() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(9500.0), "9500");
        assert_eq!(format_number(30.5), "30.5");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.0), "0");
    }
}
