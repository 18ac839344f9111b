//! Outbound HTTP.

use std::time::Duration;

use crate::error::{ResolveError, ResolveResult};

const USER_AGENT: &str = concat!("answerbox/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for handlers that reach the network. Holds one
/// `reqwest::Client` so connection pools survive across requests.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> ResolveResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| {
                ResolveError::Execution(format!("cannot build HTTP client: {}", err))
            })?;
        Ok(Self { client })
    }

    /// Status code of a HEAD request. Non-2xx statuses are an answer here,
    /// not an error.
    pub async fn head_status(&self, url: &str) -> ResolveResult<u16> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|err| ResolveError::ExternalResource(format!("HEAD {} failed: {}", url, err)))?;
        Ok(response.status().as_u16())
    }

    /// Body of a GET request. Fails on transport errors and on non-success
    /// statuses, since callers need the page content.
    pub async fn get_text(&self, url: &str) -> ResolveResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ResolveError::ExternalResource(format!("GET {} failed: {}", url, err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::ExternalResource(format!(
                "GET {} returned {}",
                url, status
            )));
        }
        response
            .text()
            .await
            .map_err(|err| ResolveError::ExternalResource(format!("cannot read body: {}", err)))
    }
}
