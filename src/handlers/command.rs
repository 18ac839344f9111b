//! Shell command handler.

use async_trait::async_trait;

use crate::adapters::command;
use crate::classify::TaskKind;
use crate::error::ResolveResult;

use super::{Handler, TaskContext};

/// Run the captured command inside the request's scratch directory and
/// answer with its stdout.
pub struct RunShell;

#[async_trait]
impl Handler for RunShell {
    fn kind(&self) -> TaskKind {
        TaskKind::RunCommand
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let cmd = ctx.require("command")?;
        command::run(cmd, ctx.scope.dir(), ctx.config.adapter_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use crate::adapters::http::Fetcher;
    use crate::config::Config;
    use crate::params::Extractor;
    use crate::scope::ReleaseScope;

    use super::*;

    async fn run_question(question: &str) -> ResolveResult<String> {
        let root = tempfile::tempdir().unwrap();
        let config = Config::for_tests(root.path().to_path_buf());
        let scope = ReleaseScope::new(&config.scratch_dir).unwrap();
        let fetcher = Fetcher::new(config.adapter_timeout).unwrap();
        let params = Extractor::new().extract(TaskKind::RunCommand, question);
        let ctx = TaskContext {
            question,
            params: &params,
            upload: None,
            scope: &scope,
            config: &config,
            fetcher: &fetcher,
        };
        let out = RunShell.run(&ctx).await;
        scope.release();
        out
    }

    #[tokio::test]
    async fn answers_with_command_stdout() {
        let answer = run_question("What is the output of the command `echo 42`?")
            .await
            .unwrap();
        assert_eq!(answer, "42");
    }

    #[tokio::test]
    async fn missing_command_is_a_parameter_error() {
        let err = run_question("no captures here").await.unwrap_err();
        assert!(
            matches!(err, crate::error::ResolveError::Parameter(_)),
            "{err}"
        );
    }
}
