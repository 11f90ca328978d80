// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run configuration for both pipelines.
//!
//! Defaults point at the two portal cases this tool was written for. The CLI
//! overrides individual fields, so the same extractors run against any case
//! on the same portals.

use std::path::PathBuf;
use url::Url;

/// Building-warrant case on the Edinburgh IDOX portal.
pub const DEFAULT_WARRANT_CASE_URL: &str =
    "https://citydev-portal.edinburgh.gov.uk/idoxpa-web/scottishBuildingWarrantDetails.do?keyVal=T1A67ZEWK0T00";

/// Planning-register portal hosting the building-control application.
pub const DEFAULT_CONTROL_BASE_URL: &str = "https://wnc.planning-register.co.uk";

/// Disclaimer page that sets the session cookie.
pub const DEFAULT_DISCLAIMER_PATH: &str =
    "Disclaimer?returnUrl=%2FBuildingControl%2FDisplay%2FFP%2F2025%2F0159";

/// Application page fetched after the disclaimer is accepted.
pub const DEFAULT_APPLICATION_PATH: &str = "BuildingControl/Display/FP/2025/0159";

/// Output file of the warrant pipeline.
pub const DEFAULT_WARRANT_OUTPUT: &str = "result.json";

/// Output file of the building-control pipeline.
pub const DEFAULT_CONTROL_OUTPUT: &str = "result_task2.json";

/// Certificate subtab whose links list the plots a certificate applies to.
pub const DEFAULT_PLOT_LINKS_SUBTAB: &str = "certificates_of_design";

/// Settings for the browser-driven warrant pipeline.
#[derive(Debug, Clone)]
pub struct WarrantConfig {
    /// Case URL; tabs are selected by appending `activeTab=<tab>`.
    pub case_url: Url,
    /// Where the JSON result is written.
    pub output: PathBuf,
    /// Timeout for ordinary tab navigations and selector waits.
    pub navigation_timeout_ms: u64,
    /// Page-load timeout for the map tab.
    pub map_timeout_ms: u64,
    /// How long to wait for the embedded map frame.
    pub frame_timeout_ms: u64,
    /// Normalized subtab key that triggers plot-link collection.
    pub plot_links_subtab: String,
    /// Run Chromium without a window.
    pub headless: bool,
}

impl WarrantConfig {
    /// URL of one portal tab for this case.
    pub fn tab_url(&self, tab: &str) -> String {
        let mut url = self.case_url.clone();
        url.query_pairs_mut().append_pair("activeTab", tab);
        url.to_string()
    }
}

impl Default for WarrantConfig {
    fn default() -> Self {
        Self {
            case_url: Url::parse(DEFAULT_WARRANT_CASE_URL).expect("default case URL is valid"),
            output: PathBuf::from(DEFAULT_WARRANT_OUTPUT),
            navigation_timeout_ms: 30_000,
            map_timeout_ms: 60_000,
            frame_timeout_ms: 10_000,
            plot_links_subtab: DEFAULT_PLOT_LINKS_SUBTAB.to_string(),
            headless: true,
        }
    }
}

/// Settings for the HTTP building-control pipeline.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Portal origin, e.g. `https://wnc.planning-register.co.uk`.
    pub base_url: String,
    /// Disclaimer page path relative to `base_url`.
    pub disclaimer_path: String,
    /// Application page path relative to `base_url`.
    pub application_path: String,
    /// Where the JSON result is written.
    pub output: PathBuf,
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl ControlConfig {
    pub fn disclaimer_url(&self) -> String {
        join_path(&self.base_url, &self.disclaimer_path)
    }

    pub fn application_url(&self) -> String {
        join_path(&self.base_url, &self.application_path)
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CONTROL_BASE_URL.to_string(),
            disclaimer_path: DEFAULT_DISCLAIMER_PATH.to_string(),
            application_path: DEFAULT_APPLICATION_PATH.to_string(),
            output: PathBuf::from(DEFAULT_CONTROL_OUTPUT),
            timeout_ms: 30_000,
        }
    }
}

fn join_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
