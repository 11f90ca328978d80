// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Certificates tab and its subtabs (design, construction, energy
//! performance, completion).

use super::types::{Certificate, LinkItem};
use super::{link_item, load_tab};
use crate::config::WarrantConfig;
use crate::dom::{read_key_value_table, DocumentReader, DomError, HtmlDocument, Presence};
use crate::normalize::{normalize_key, resolve_url};
use crate::renderer::RenderContext;
use anyhow::Result;
use std::collections::BTreeMap;

pub const SUBTAB_LINKS: &str = ".subtabs a";
pub const CONTAINER: &str = ".tabcontainer";
pub const CONTAINER_TABLE: &str = ".tabcontainer table";
pub const CONTAINER_LINKS: &str = ".tabcontainer a";

/// A certificate subtab discovered from the submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtabLink {
    pub title: String,
    pub url: String,
}

/// Visit every certificate subtab, keyed by the normalized subtab title.
pub async fn scrape_certificates(
    ctx: &mut dyn RenderContext,
    config: &WarrantConfig,
) -> Result<BTreeMap<String, Certificate>> {
    let url = config.tab_url("designCertificate");
    let html = load_tab(ctx, &url, config).await?;
    let subtabs = parse_subtab_links(&html, config.case_url.as_str())?;

    let mut certificates = BTreeMap::new();
    for link in subtabs {
        let key = normalize_key(&link.title);
        tracing::info!("Scraping certificate subtab {key}");
        let html = load_tab(ctx, &link.url, config).await?;
        let collect_plots = key == config.plot_links_subtab;
        let certificate = parse_certificate(&html, &link, collect_plots)?;
        certificates.insert(key, certificate);
    }
    Ok(certificates)
}

/// Subtab links, with hrefs resolved against `base_url`.
pub fn parse_subtab_links(html: &str, base_url: &str) -> Result<Vec<SubtabLink>, DomError> {
    let doc = HtmlDocument::parse(html);
    let mut links = Vec::new();
    for a in doc.query_all(SUBTAB_LINKS)? {
        let title = doc.text(a);
        match doc.attribute(a, "href") {
            Some(href) => links.push(SubtabLink {
                title,
                url: resolve_url(base_url, &href),
            }),
            None => tracing::warn!("certificate subtab `{title}` has no link, skipped"),
        }
    }
    Ok(links)
}

/// Parse one certificate subtab.
///
/// `table` is `None` when the container holds no table; `message` carries the
/// container text either way. Plot links are collected only when
/// `collect_plots` is set.
pub fn parse_certificate(
    html: &str,
    link: &SubtabLink,
    collect_plots: bool,
) -> Result<Certificate, DomError> {
    let doc = HtmlDocument::parse(html);

    let table = match doc.query_one(CONTAINER_TABLE).found()? {
        Some(_) => Some(read_key_value_table(&doc, CONTAINER_TABLE)?),
        None => None,
    };

    let message = doc.query_one(CONTAINER).found()?.map(|el| doc.text(el));

    let applies_to_plots = if collect_plots {
        Some(
            doc.query_all(CONTAINER_LINKS)?
                .into_iter()
                .map(|a| link_item(&doc, a, &link.url))
                .collect::<Vec<LinkItem>>(),
        )
    } else {
        None
    };

    Ok(Certificate {
        title: link.title.clone(),
        url: link.url.clone(),
        table,
        message,
        applies_to_plots,
    })
}
