//! JSON handlers: key lookup in an upload, list building from the question.

use async_trait::async_trait;
use serde_json::Value;

use crate::classify::TaskKind;
use crate::error::{ResolveError, ResolveResult};

use super::{Handler, TaskContext};

/// Render a JSON value the way an answer reads: strings without their
/// quotes, everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Answer with the value of one top-level key in the uploaded JSON document.
pub struct KeyLookup;

#[async_trait]
impl Handler for KeyLookup {
    fn kind(&self) -> TaskKind {
        TaskKind::JsonKeyLookup
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let upload = ctx.upload()?;
        let key = ctx.require("key")?;

        let bytes = tokio::fs::read(&upload.path).await.map_err(|err| {
            ResolveError::Execution(format!("cannot read upload: {}", err))
        })?;
        let document: Value = serde_json::from_slice(&bytes)?;

        let object = document.as_object().ok_or_else(|| {
            ResolveError::Format("uploaded JSON is not an object".to_string())
        })?;
        let value = object
            .get(key)
            .ok_or_else(|| ResolveError::Format(format!("json has no key '{}'", key)))?;
        Ok(render(value))
    }
}

/// Build a JSON array of strings from the comma-separated items in the
/// question. Needs no upload.
pub struct ListBuild;

#[async_trait]
impl Handler for ListBuild {
    fn kind(&self) -> TaskKind {
        TaskKind::JsonListBuild
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let raw = ctx.require("items")?;
        let items: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect();
        if items.is_empty() {
            return Err(ResolveError::Parameter(
                "no list items found in the question".to_string(),
            ));
        }
        Ok(serde_json::to_string(&items)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::adapters::http::Fetcher;
    use crate::config::Config;
    use crate::params::Extractor;
    use crate::scope::ReleaseScope;

    use super::super::Upload;
    use super::*;

    async fn answer(
        kind: TaskKind,
        handler: &dyn Handler,
        question: &str,
        json_body: Option<&str>,
    ) -> ResolveResult<String> {
        let root = tempfile::tempdir().unwrap();
        let config = Config::for_tests(root.path().to_path_buf());
        let scope = ReleaseScope::new(&config.scratch_dir).unwrap();
        let fetcher = Fetcher::new(config.adapter_timeout).unwrap();

        let upload = json_body.map(|body| {
            let path = scope.scratch_path("data.json");
            std::fs::write(&path, body).unwrap();
            Upload {
                path,
                file_name: "data.json".to_string(),
            }
        });

        let params = Extractor::new().extract(kind, question);
        let ctx = TaskContext {
            question,
            params: &params,
            upload: upload.as_ref(),
            scope: &scope,
            config: &config,
            fetcher: &fetcher,
        };
        let out = handler.run(&ctx).await;
        scope.release();
        out
    }

    #[tokio::test]
    async fn string_values_come_back_unquoted() {
        let out = answer(
            TaskKind::JsonKeyLookup,
            &KeyLookup,
            "In the uploaded JSON, what is the value of the key 'color'?",
            Some(r#"{"color": "blue", "size": 4}"#),
        )
        .await
        .unwrap();
        assert_eq!(out, "blue");
    }

    #[tokio::test]
    async fn non_string_values_render_as_json() {
        let body = r#"{"size": 4, "tags": ["a", "b"]}"#;
        let size = answer(
            TaskKind::JsonKeyLookup,
            &KeyLookup,
            "what is the value of key 'size' in the JSON?",
            Some(body),
        )
        .await
        .unwrap();
        assert_eq!(size, "4");

        let tags = answer(
            TaskKind::JsonKeyLookup,
            &KeyLookup,
            "what is the value of key 'tags' in the JSON?",
            Some(body),
        )
        .await
        .unwrap();
        assert_eq!(tags, r#"["a","b"]"#);
    }

    #[tokio::test]
    async fn missing_key_is_a_format_error() {
        let err = answer(
            TaskKind::JsonKeyLookup,
            &KeyLookup,
            "what is the value of key 'absent' in the JSON?",
            Some(r#"{"color": "blue"}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)), "{err}");
    }

    #[tokio::test]
    async fn invalid_json_is_a_format_error() {
        let err = answer(
            TaskKind::JsonKeyLookup,
            &KeyLookup,
            "what is the value of key 'color' in the JSON?",
            Some("{not json"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)), "{err}");
    }

    #[tokio::test]
    async fn builds_a_json_list_from_the_question() {
        let out = answer(
            TaskKind::JsonListBuild,
            &ListBuild,
            "Turn this into a JSON list: apples, oranges, pears",
            None,
        )
        .await
        .unwrap();
        assert_eq!(out, r#"["apples","oranges","pears"]"#);
    }

    #[tokio::test]
    async fn list_without_items_is_a_parameter_error() {
        let err = answer(
            TaskKind::JsonListBuild,
            &ListBuild,
            "Turn this into a JSON list: , ,",
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ResolveError::Parameter(_)), "{err}");
    }
}
