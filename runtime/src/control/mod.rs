// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Building-control pipeline for planning-register portals.
//!
//! The application page is server-rendered but sits behind a disclaimer.
//! Accepting the disclaimer once sets a session cookie; the cookie-aware
//! [`HttpClient`] then fetches the application page, which is parsed in a
//! single pass.

pub mod application;
pub mod disclaimer;

pub use application::{parse_application, ApplicationRecord, PlotRow, SiteHistoryRow};
pub use disclaimer::{accept_disclaimer, parse_disclaimer_form, DisclaimerForm};

use crate::acquisition::http_client::HttpClient;
use crate::config::ControlConfig;
use crate::error::ScrapeError;
use tracing::info;

/// Accept the disclaimer, then fetch and parse the application page.
pub async fn scrape_building_control(
    config: &ControlConfig,
) -> Result<ApplicationRecord, ScrapeError> {
    let client = HttpClient::new(config.timeout_ms)?;

    info!("Accepting disclaimer...");
    accept_disclaimer(&client, config).await?;

    info!("Fetching application page...");
    fetch_application(&client, config).await
}

/// Fetch the application page with an already accepted session.
pub async fn fetch_application(
    client: &HttpClient,
    config: &ControlConfig,
) -> Result<ApplicationRecord, ScrapeError> {
    let url = config.application_url();
    let resp = client.get(&url).await?;
    Ok(parse_application(&resp.body, &url)?)
}
