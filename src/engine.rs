//! The resolution engine.
//!
//! One call: a question plus an optional upload in, an answer out. The
//! engine classifies the question, extracts parameters, checks required ones
//! before dispatch, runs the handler, and releases the request's scratch
//! scope on both the success and the failure path.

use std::sync::Arc;

use crate::adapters::http::Fetcher;
use crate::classify::classify;
use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::handlers::{HandlerSet, TaskContext, Upload};
use crate::params::Extractor;
use crate::scope::ReleaseScope;

pub type SharedEngine = Arc<Engine>;

/// A request being assembled: the scratch scope exists before any body
/// bytes are read, so whatever gets streamed in is already covered by
/// release. Consumed by [`Engine::resolve`].
pub struct PreparedRequest {
    scope: ReleaseScope,
    question: Option<String>,
    upload: Option<Upload>,
}

impl PreparedRequest {
    pub fn set_question(&mut self, question: String) {
        self.question = Some(question);
    }

    /// Mint a scratch path for an incoming file; see
    /// [`ReleaseScope::scratch_path`].
    pub fn scratch_path(&self, hint: &str) -> std::path::PathBuf {
        self.scope.scratch_path(hint)
    }

    /// Attach the streamed upload. The path is registered with the scope
    /// even when it lies outside the scope directory.
    pub fn attach_upload(&mut self, path: std::path::PathBuf, file_name: String) {
        self.scope.register(path.clone());
        self.upload = Some(Upload { path, file_name });
    }
}

pub struct Engine {
    config: Config,
    extractor: Extractor,
    handlers: HandlerSet,
    fetcher: Fetcher,
}

impl Engine {
    pub fn new(config: Config) -> ResolveResult<Self> {
        let fetcher = Fetcher::new(config.adapter_timeout)?;
        Ok(Self {
            config,
            extractor: Extractor::new(),
            handlers: HandlerSet::with_defaults(),
            fetcher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open the scratch scope for a new request.
    pub fn begin(&self) -> ResolveResult<PreparedRequest> {
        let scope = ReleaseScope::new(&self.config.scratch_dir).map_err(|err| {
            ResolveError::Execution(format!("cannot open scratch scope: {}", err))
        })?;
        Ok(PreparedRequest {
            scope,
            question: None,
            upload: None,
        })
    }

    /// Resolve a prepared request. The scope is released before this
    /// returns, whatever the outcome.
    pub async fn resolve(&self, request: PreparedRequest) -> ResolveResult<String> {
        let PreparedRequest {
            scope,
            question,
            upload,
        } = request;

        let result = self
            .resolve_in(&scope, question.as_deref(), upload.as_ref())
            .await;
        scope.release();
        result
    }

    async fn resolve_in(
        &self,
        scope: &ReleaseScope,
        question: Option<&str>,
        upload: Option<&Upload>,
    ) -> ResolveResult<String> {
        let question = question
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ResolveError::Request("missing question".to_string()))?;

        let kind = classify(question);
        tracing::info!(kind = kind.as_str(), has_upload = upload.is_some(), "classified question");

        let params = self.extractor.extract(kind, question);
        let missing = self.extractor.missing_required(kind, &params);
        if !missing.is_empty() {
            return Err(ResolveError::Parameter(format!(
                "missing required parameter(s) {} for {}",
                missing.join(", "),
                kind.as_str()
            )));
        }

        let ctx = TaskContext {
            question,
            params: &params,
            upload,
            scope,
            config: &self.config,
            fetcher: &self.fetcher,
        };
        self.handlers.get(kind).run(&ctx).await
    }
}
