// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Related items tab: content split into sections by `h2` headings.

use super::link_item;
use super::types::{LinkItem, RelatedSection};
use crate::dom::{DocumentReader, DomError, HtmlDocument};

pub const SECTION_HEADINGS: &str = ".tabcontainer h2";

/// Sections of the related items tab loaded from `tab_url`.
///
/// Never fails: a page that does not have the expected structure yields no
/// sections.
pub fn parse_related_items(html: &str, tab_url: &str) -> Vec<RelatedSection> {
    let doc = HtmlDocument::parse(html);
    collect_sections(&doc, tab_url).unwrap_or_else(|e| {
        tracing::warn!("related items not readable: {e}");
        Vec::new()
    })
}

fn collect_sections<D: DocumentReader>(
    doc: &D,
    base_url: &str,
) -> Result<Vec<RelatedSection>, DomError> {
    let mut sections = Vec::new();

    for heading in doc.query_all(SECTION_HEADINGS)? {
        let mut items = Vec::new();
        let mut node = doc.next_element_sibling(heading);

        while let Some(el) = node {
            let tag = doc.tag_name(el);
            if tag == "h2" {
                break;
            }

            let links = if tag == "a" {
                vec![el]
            } else {
                doc.query_all_in(el, "a")?
            };

            if links.is_empty() {
                let text = doc.text(el);
                if !text.is_empty() {
                    items.push(LinkItem { text, href: None });
                }
            } else {
                items.extend(links.into_iter().map(|a| link_item(doc, a, base_url)));
            }

            node = doc.next_element_sibling(el);
        }

        sections.push(RelatedSection {
            title: doc.text(heading),
            items,
        });
    }

    Ok(sections)
}
