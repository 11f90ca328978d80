// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by the scraping pipelines.

use crate::dom::DomError;

/// Failures that end a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Disclaimer form not found on {url}")]
    DisclaimerFormMissing { url: String },

    #[error("Disclaimer form on {url} has no action")]
    DisclaimerActionMissing { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
