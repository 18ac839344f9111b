//! HTML parsing and CSS selector matching.
//!
//! `scraper`'s parsed documents are not `Send`, so everything here is
//! synchronous and operates on an already-fetched body. Callers in async
//! code fetch first, then call in.

use scraper::{Html, Selector};

use crate::error::{ResolveError, ResolveResult};

/// Number of elements in `html` matching the CSS selector.
pub fn count_matches(html: &str, selector: &str) -> ResolveResult<usize> {
    let compiled = Selector::parse(selector).map_err(|err| {
        ResolveError::Parameter(format!("invalid CSS selector '{}': {}", selector, err))
    })?;
    let document = Html::parse_document(html);
    Ok(document.select(&compiled).count())
}
