//! Encoded-upload decoding handler.

use async_trait::async_trait;

use crate::adapters::encoding;
use crate::classify::TaskKind;
use crate::error::{ResolveError, ResolveResult};

use super::{Handler, TaskContext};

/// Decode the uploaded bytes with the charset named in the question and
/// answer with the text, surrounding whitespace trimmed.
pub struct DecodeUpload;

#[async_trait]
impl Handler for DecodeUpload {
    fn kind(&self) -> TaskKind {
        TaskKind::EncodedTextDecode
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let upload = ctx.upload()?;
        let label = ctx.require("encoding")?;

        let bytes = tokio::fs::read(&upload.path).await.map_err(|err| {
            ResolveError::Execution(format!("cannot read upload: {}", err))
        })?;
        let text = encoding::decode_bytes(&bytes, label)?;
        Ok(text.trim().to_string())
    }
}
