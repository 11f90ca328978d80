// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Plots tab.
//!
//! The tab shows one plot at a time, chosen with the `#plotDesc` dropdown
//! and a form submit. Every non-empty option is visited in turn; the empty
//! "All" option is never treated as a plot.

use super::types::{PlotDetail, PlotOption, PlotsSection};
use super::load_tab;
use crate::config::WarrantConfig;
use crate::dom::{read_key_value_table, DocumentReader, DomError, HtmlDocument, KeyValueRecord};
use crate::renderer::{LoadState, RenderContext};
use anyhow::{Context, Result};
use std::collections::BTreeMap;

pub const PLOT_SELECT: &str = "#plotDesc";
pub const PLOT_SUBMIT: &str = "#bsPlotsDesc input[type=\"submit\"]";
pub const PLOT_DESCRIPTION: &str = ".tabcontainer p b";
pub const PLOT_TABLE: &str = ".tabcontainer table[summary*=\"Building Standards Application Plots\"]";

/// Visit every plot of the case and collect its details.
pub async fn scrape_plots(
    ctx: &mut dyn RenderContext,
    config: &WarrantConfig,
) -> Result<PlotsSection> {
    let url = config.tab_url("plots");
    let html = load_tab(ctx, &url, config).await?;
    let options = parse_plot_options(&html)?;

    // Value of the plot currently rendered; changes with every submit.
    let mut shown = options
        .iter()
        .find(|o| o.selected)
        .map(|o| o.value.clone());

    let mut plots = BTreeMap::new();
    for opt in options.iter().filter(|o| !o.value.is_empty()) {
        if shown.as_deref() != Some(opt.value.as_str()) {
            tracing::info!("Selecting plot {}", opt.value);
            ctx.select_option(PLOT_SELECT, &opt.value).await?;
            ctx.submit_and_wait(PLOT_SUBMIT, LoadState::NetworkIdle, config.navigation_timeout_ms)
                .await
                .with_context(|| format!("submitting plot {}", opt.value))?;
            shown = Some(opt.value.clone());
        }

        ctx.wait_for_selector(PLOT_TABLE, config.navigation_timeout_ms)
            .await?;
        let html = ctx.get_html().await?;
        let (description, details) = parse_plot_page(&html)?;

        plots.insert(
            opt.value.clone(),
            PlotDetail {
                label: opt.label.clone(),
                description,
                details,
            },
        );
    }

    Ok(PlotsSection { options, plots })
}

/// Read the plot dropdown.
///
/// An option without a `value` attribute takes its text as value, and when
/// no option is marked `selected` the first one is, as browsers do.
pub fn parse_plot_options(html: &str) -> Result<Vec<PlotOption>, DomError> {
    let doc = HtmlDocument::parse(html);
    let mut options: Vec<PlotOption> = doc
        .query_all(&format!("{PLOT_SELECT} option"))?
        .into_iter()
        .map(|el| {
            let label = doc.text(el);
            PlotOption {
                value: doc.attribute(el, "value").unwrap_or_else(|| label.clone()),
                selected: doc.attribute(el, "selected").is_some(),
                label,
            }
        })
        .collect();

    if !options.iter().any(|o| o.selected) {
        if let Some(first) = options.first_mut() {
            first.selected = true;
        }
    }
    Ok(options)
}

/// Description and details table of the plot currently shown.
pub fn parse_plot_page(html: &str) -> Result<(Option<String>, KeyValueRecord), DomError> {
    let doc = HtmlDocument::parse(html);
    let description = doc.text_of(PLOT_DESCRIPTION)?;
    let details = read_key_value_table(&doc, PLOT_TABLE)?;
    Ok((description, details))
}
