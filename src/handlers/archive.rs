//! Zip-archive CSV lookup handler.

use async_trait::async_trait;

use crate::adapters::{archive, tabular};
use crate::classify::TaskKind;
use crate::error::{ResolveError, ResolveResult};

use super::{Handler, TaskContext};

const DEFAULT_MEMBER: &str = "extract.csv";
const DEFAULT_COLUMN: &str = "answer";

/// Extract a CSV member from the uploaded archive and answer with the value
/// of one column in its first data row.
pub struct ArchiveCsv;

impl ArchiveCsv {
    /// The member to extract: the captured name, else the single `.csv`
    /// entry when the archive has exactly one, else `extract.csv`.
    fn member_name(ctx: &TaskContext<'_>, members: &[String]) -> String {
        if let Some(name) = ctx.params.get("csv_filename") {
            return name.to_string();
        }
        let mut csv_members = members
            .iter()
            .filter(|name| name.to_ascii_lowercase().ends_with(".csv"));
        match (csv_members.next(), csv_members.next()) {
            (Some(only), None) => only.clone(),
            _ => DEFAULT_MEMBER.to_string(),
        }
    }
}

#[async_trait]
impl Handler for ArchiveCsv {
    fn kind(&self) -> TaskKind {
        TaskKind::ArchiveCsvLookup
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let upload = ctx.upload()?;

        // The zip and csv reads are synchronous; keep them off the async
        // runtime.
        let archive_path = upload.path.clone();
        let members = tokio::task::spawn_blocking(move || archive::list_members(&archive_path))
            .await
            .map_err(|err| ResolveError::Execution(format!("worker task failed: {}", err)))??;

        let member = Self::member_name(ctx, &members);
        tracing::debug!(member, archive = %upload.file_name, "extracting archive member");

        let extracted = ctx.scope.scratch_path(&member);
        let column = ctx.params.get_or("column", DEFAULT_COLUMN).to_string();
        let archive_path = upload.path.clone();
        tokio::task::spawn_blocking(move || {
            archive::extract_member(&archive_path, &member, &extracted)?;
            tabular::csv_lookup(&extracted, &column)
        })
        .await
        .map_err(|err| ResolveError::Execution(format!("worker task failed: {}", err)))?
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use zip::write::SimpleFileOptions;

    use crate::adapters::http::Fetcher;
    use crate::config::Config;
    use crate::error::ResolveError;
    use crate::params::Extractor;
    use crate::scope::ReleaseScope;

    use super::super::Upload;
    use super::*;

    fn write_zip(dir: &Path, entries: &[(&str, &str)]) -> std::path::PathBuf {
        let path = dir.join("q.zip");
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        for (name, body) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    async fn answer(question: &str, upload: Option<Upload>) -> ResolveResult<String> {
        let root = tempfile::tempdir().unwrap();
        let config = Config::for_tests(root.path().to_path_buf());
        let scope = ReleaseScope::new(&config.scratch_dir).unwrap();
        let fetcher = Fetcher::new(config.adapter_timeout).unwrap();
        let params = Extractor::new().extract(TaskKind::ArchiveCsvLookup, question);
        let ctx = TaskContext {
            question,
            params: &params,
            upload: upload.as_ref(),
            scope: &scope,
            config: &config,
            fetcher: &fetcher,
        };
        let out = ArchiveCsv.run(&ctx).await;
        scope.release();
        out
    }

    #[tokio::test]
    async fn answers_from_the_named_member() {
        let dir = tempfile::tempdir().unwrap();
        let zip = write_zip(dir.path(), &[("extract.csv", "id,answer\n1,42\n")]);
        let upload = Upload {
            path: zip,
            file_name: "q.zip".to_string(),
        };
        let out = answer(
            "Download and unzip file q.zip which has a single extract.csv. \
             What is the value in the answer column of the CSV file?",
            Some(upload),
        )
        .await
        .unwrap();
        assert_eq!(out, "42");
    }

    #[tokio::test]
    async fn falls_back_to_the_single_csv_member() {
        let dir = tempfile::tempdir().unwrap();
        let zip = write_zip(
            dir.path(),
            &[("notes.txt", "n"), ("data/results.csv", "answer\n7\n")],
        );
        let upload = Upload {
            path: zip,
            file_name: "q.zip".to_string(),
        };
        let out = answer("Unzip the attachment and read it.", Some(upload))
            .await
            .unwrap();
        assert_eq!(out, "7");
    }

    #[tokio::test]
    async fn missing_upload_is_a_request_error() {
        let err = answer("unzip the file", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::Request(_)), "{err}");
    }
}
