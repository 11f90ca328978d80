// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Map tab: best-effort capture of the embedded map's configuration.
//!
//! Map pages keep loading tiles and analytics long after the markup is
//! ready, so this tab waits for DOM content only and never fails the run:
//! any error becomes a [`MapSection`] carrying an `error` string.

use super::types::MapSection;
use crate::config::WarrantConfig;
use crate::dom::{DocumentReader, DomError, HtmlDocument, Presence};
use crate::renderer::{LoadState, RenderContext};
use anyhow::Result;
use std::collections::BTreeMap;

pub const MAP_FORM: &str = "#mapForm";
pub const MAP_HIDDEN_INPUTS: &str = "#mapForm input[type=\"hidden\"]";
pub const MAP_FRAME: &str = "mapiframe";
pub const MAP_COPYRIGHT: &str = "#mapCopyright";

/// Scrape the map tab. Never returns an error.
pub async fn scrape_map(ctx: &mut dyn RenderContext, config: &WarrantConfig) -> MapSection {
    let tab_url = config.tab_url("map");
    match try_scrape_map(ctx, config, &tab_url).await {
        Ok(section) => section,
        Err(e) => {
            tracing::error!("Error while scraping map tab: {e:#}");
            MapSection::failed(tab_url, format!("{e:#}"))
        }
    }
}

async fn try_scrape_map(
    ctx: &mut dyn RenderContext,
    config: &WarrantConfig,
    tab_url: &str,
) -> Result<MapSection> {
    ctx.navigate(tab_url, LoadState::DomContentLoaded, config.map_timeout_ms)
        .await?;

    let iframe_url = ctx
        .frame_url(MAP_FRAME, config.frame_timeout_ms)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("map frame URL unavailable: {e:#}");
            None
        });

    let html = ctx.get_html().await?;
    Ok(parse_map(&html, tab_url, iframe_url))
}

/// Build the map section from a snapshot. Each field is read on its own;
/// a missing element leaves that field `None`.
pub fn parse_map(html: &str, tab_url: &str, iframe_url: Option<String>) -> MapSection {
    let doc = HtmlDocument::parse(html);

    let form_action = best_effort("form action", doc.attribute_of(MAP_FORM, "action"));
    let form_params = best_effort("form parameters", hidden_params(&doc));
    let copyright = best_effort("copyright", doc.text_of(MAP_COPYRIGHT));

    MapSection {
        tab_url: tab_url.to_string(),
        iframe_url,
        form_action,
        form_params,
        copyright,
        error: None,
    }
}

/// Named hidden inputs of the map form; `None` when there is no form.
fn hidden_params<D: DocumentReader>(
    doc: &D,
) -> Result<Option<BTreeMap<String, String>>, DomError> {
    if doc.query_one(MAP_FORM).found()?.is_none() {
        return Ok(None);
    }
    let mut params = BTreeMap::new();
    for input in doc.query_all(MAP_HIDDEN_INPUTS)? {
        if let Some(name) = doc.attribute(input, "name").filter(|n| !n.is_empty()) {
            params.insert(name, doc.attribute(input, "value").unwrap_or_default());
        }
    }
    Ok(Some(params))
}

fn best_effort<T>(what: &str, read: Result<Option<T>, DomError>) -> Option<T> {
    read.unwrap_or_else(|e| {
        tracing::warn!("map {what} not readable: {e}");
        None
    })
}
