//! Handlers that reach the network.

use async_trait::async_trait;

use crate::adapters::html;
use crate::classify::TaskKind;
use crate::error::ResolveResult;

use super::{Handler, TaskContext};

/// Answer with the status code of a HEAD request to the captured URL.
pub struct HeadStatus;

#[async_trait]
impl Handler for HeadStatus {
    fn kind(&self) -> TaskKind {
        TaskKind::HttpHeadStatus
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let url = ctx.require("url")?;
        let status = ctx.fetcher.head_status(url).await?;
        Ok(status.to_string())
    }
}

/// Fetch a page and count elements matching the captured CSS selector.
///
/// The selector is compiled before the fetch so an invalid selector fails as
/// a parameter problem without touching the network.
pub struct CssCount;

#[async_trait]
impl Handler for CssCount {
    fn kind(&self) -> TaskKind {
        TaskKind::CssSelectorCount
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let url = ctx.require("url")?;
        let selector = ctx.require("selector")?;

        html::count_matches("", selector)?;

        let body = ctx.fetcher.get_text(url).await?;
        let count = html::count_matches(&body, selector)?;
        Ok(count.to_string())
    }
}
