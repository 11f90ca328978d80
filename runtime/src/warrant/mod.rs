// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Building-warrant pipeline for IDOX "scottishBuildingWarrantDetails" cases.
//!
//! Every tab is a variant of the case URL with an `activeTab` query
//! parameter. Tabs are visited strictly in sequence through one browser
//! context: the page is loaded, an HTML snapshot is taken, and a synchronous
//! parser turns the snapshot into part of the [`WarrantRecord`].

pub mod certificates;
pub mod map;
pub mod plots;
pub mod related;
pub mod summary;
pub mod types;

pub use types::*;

use crate::config::WarrantConfig;
use crate::dom::{read_key_value_table, DocumentReader, DomError, HtmlDocument, KeyValueRecord};
use crate::normalize::resolve_url;
use crate::renderer::{LoadState, RenderContext};
use anyhow::{Context, Result};
use tracing::info;

/// Details table on the summary and important-dates tabs.
pub const SUMMARY_TABLE: &str = "#simpleDetailsTable";
/// Details table on the further-information tab.
pub const DETAILS_TABLE: &str = "#buildingStandardsDetails";

/// Scrape every tab of the configured case.
///
/// The summary tab runs first because the case banner is read from it. Any
/// tab failure except the map tab aborts the run.
pub async fn scrape_building_warrant(
    ctx: &mut dyn RenderContext,
    config: &WarrantConfig,
) -> Result<WarrantRecord> {
    info!("Scraping summary tab");
    let summary_url = config.tab_url("summary");
    let html = load_tab_with(ctx, &summary_url, SUMMARY_TABLE, config).await?;
    let summary = summary::parse_summary(&html, &summary_url).context("summary tab")?;

    info!("Scraping further information tab");
    let further_information = scrape_table_tab(ctx, config, "details", DETAILS_TABLE)
        .await
        .context("further information tab")?;

    info!("Scraping plots tab");
    let plots = plots::scrape_plots(ctx, config)
        .await
        .context("plots tab")?;

    info!("Scraping important dates tab");
    let important_dates = scrape_table_tab(ctx, config, "dates", SUMMARY_TABLE)
        .await
        .context("important dates tab")?;

    info!("Scraping certificates tab");
    let certificates = certificates::scrape_certificates(ctx, config)
        .await
        .context("certificates tab")?;

    info!("Scraping related items tab");
    let related_url = config.tab_url("relatedCases");
    let html = load_tab(ctx, &related_url, config)
        .await
        .context("related items tab")?;
    let related_items = RelatedItems {
        sections: related::parse_related_items(&html, &related_url),
        url: related_url,
    };

    info!("Scraping map tab");
    let map = map::scrape_map(ctx, config).await;

    Ok(WarrantRecord {
        header: summary.header,
        summary: summary.summary,
        cases: summary.cases,
        properties: summary.properties,
        further_information,
        plots,
        important_dates,
        certificates,
        related_items,
        map,
    })
}

/// Load a tab until the network is idle and return its HTML.
pub(crate) async fn load_tab(
    ctx: &mut dyn RenderContext,
    url: &str,
    config: &WarrantConfig,
) -> Result<String> {
    ctx.navigate(url, LoadState::NetworkIdle, config.navigation_timeout_ms)
        .await?;
    ctx.get_html().await
}

/// Like [`load_tab`], but also waits for `selector` to appear.
pub(crate) async fn load_tab_with(
    ctx: &mut dyn RenderContext,
    url: &str,
    selector: &str,
    config: &WarrantConfig,
) -> Result<String> {
    ctx.navigate(url, LoadState::NetworkIdle, config.navigation_timeout_ms)
        .await?;
    ctx.wait_for_selector(selector, config.navigation_timeout_ms)
        .await?;
    ctx.get_html().await
}

async fn scrape_table_tab(
    ctx: &mut dyn RenderContext,
    config: &WarrantConfig,
    tab: &str,
    table: &str,
) -> Result<KeyValueRecord> {
    let url = config.tab_url(tab);
    let html = load_tab_with(ctx, &url, table, config).await?;
    Ok(parse_table_tab(&html, table)?)
}

/// Parse a tab that is a single label/value table.
pub fn parse_table_tab(html: &str, table: &str) -> Result<KeyValueRecord, DomError> {
    read_key_value_table(&HtmlDocument::parse(html), table)
}

/// Link text plus its `href` resolved against `base_url`.
pub(crate) fn link_item<'a, D: DocumentReader>(
    doc: &'a D,
    a: D::Element<'a>,
    base_url: &str,
) -> LinkItem {
    LinkItem {
        text: doc.text(a),
        href: doc
            .attribute(a, "href")
            .map(|href| resolve_url(base_url, &href)),
    }
}
