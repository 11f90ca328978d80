// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! `planscrape warrant`: scrape a building-warrant case through Chromium.

use crate::config::WarrantConfig;
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use crate::sink::write_json;
use crate::warrant::{scrape_building_warrant, WarrantRecord};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Run the warrant command.
pub async fn run(config: &WarrantConfig) -> Result<()> {
    info!("Launching Chromium");
    let renderer = ChromiumRenderer::new(config.headless).await?;
    let record = scrape_with(&renderer, config).await?;
    write_json(&record, &config.output).context("writing warrant result")?;
    Ok(())
}

/// Scrape one case with `renderer`, then shut it down whatever the outcome.
pub async fn scrape_with(renderer: &dyn Renderer, config: &WarrantConfig) -> Result<WarrantRecord> {
    let result = scrape_in_context(renderer, config).await;
    if let Err(e) = renderer.shutdown().await {
        warn!("browser shutdown failed: {e:#}");
    }
    result
}

async fn scrape_in_context(renderer: &dyn Renderer, config: &WarrantConfig) -> Result<WarrantRecord> {
    let mut ctx = renderer.new_context().await?;
    info!("Opening case {}", config.case_url);
    let result = scrape_building_warrant(ctx.as_mut(), config).await;
    if let Err(e) = ctx.close().await {
        warn!("failed to close page: {e:#}");
    }
    result
}
