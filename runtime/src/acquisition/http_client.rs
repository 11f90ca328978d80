// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Async HTTP client wrapping reqwest.
//!
//! Not a browser — just HTTP requests with a persistent cookie jar, so a
//! session cookie set by one response is sent on every later request.
//! There is no retry: a failed request fails the run.

use crate::error::ScrapeError;
use std::time::Duration;

/// User agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/131.0.0.0 Safari/537.36";

/// A successful response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// HTTP client for the building-control pipeline.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client with a cookie store and the given request timeout.
    pub fn new(timeout_ms: u64) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url`. Non-2xx statuses are errors.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, ScrapeError> {
        tracing::debug!("GET {url}");
        let r = self.client.get(url).send().await?;
        into_response(url, r).await
    }

    /// POST url-encoded `form_fields` to `url`. Non-2xx statuses are errors.
    pub async fn post_form(
        &self,
        url: &str,
        form_fields: &[(String, String)],
    ) -> Result<HttpResponse, ScrapeError> {
        tracing::debug!("POST {url} ({} field(s))", form_fields.len());
        let r = self.client.post(url).form(form_fields).send().await?;
        into_response(url, r).await
    }
}

async fn into_response(url: &str, r: reqwest::Response) -> Result<HttpResponse, ScrapeError> {
    let status = r.status().as_u16();

    if !r.status().is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = r.text().await?;

    Ok(HttpResponse { status, body })
}
