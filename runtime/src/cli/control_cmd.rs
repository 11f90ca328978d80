// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! `planscrape control`: scrape a building-control application over HTTP.

use crate::config::ControlConfig;
use crate::control::scrape_building_control;
use crate::sink::write_json;
use anyhow::{Context, Result};

/// Run the control command.
pub async fn run(config: &ControlConfig) -> Result<()> {
    let record = scrape_building_control(config)
        .await
        .with_context(|| format!("scraping {}", config.application_url()))?;
    write_json(&record, &config.output).context("writing building-control result")?;
    Ok(())
}
