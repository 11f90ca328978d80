// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Summary tab: case banner, details table and associated-record counts.

use super::types::{AssociatedCases, AssociatedProperties, CaseHeader, SummaryTab};
use super::SUMMARY_TABLE;
use crate::dom::{read_key_value_table, DocumentReader, DomError, HtmlDocument, Presence};
use crate::normalize::{first_number, resolve_url};

/// Parse a snapshot of the summary tab loaded from `tab_url`.
///
/// Only the details table is mandatory; every other field is `None` when
/// its element is missing.
pub fn parse_summary(html: &str, tab_url: &str) -> Result<SummaryTab, DomError> {
    let doc = HtmlDocument::parse(html);

    let header = parse_header(&doc)?;
    let summary = read_key_value_table(&doc, SUMMARY_TABLE)?;

    let cases_raw = doc.text_of("p.associatedcase")?;
    let cases = AssociatedCases {
        count: cases_raw.as_deref().and_then(first_number),
        raw_text: cases_raw,
    };

    let properties_raw = doc.text_of("p.associatedproperty")?;
    let mut properties = AssociatedProperties {
        count: properties_raw.as_deref().and_then(first_number),
        ..Default::default()
    };
    if properties_raw.is_some() {
        properties.url = doc
            .attribute_of("p.associatedproperty a", "href")?
            .filter(|href| !href.is_empty())
            .map(|href| resolve_url(tab_url, &href));
    }
    properties.raw_text = properties_raw;

    Ok(SummaryTab {
        header,
        summary,
        cases,
        properties,
    })
}

fn parse_header<D: DocumentReader>(doc: &D) -> Result<CaseHeader, DomError> {
    let Some(crumb) = doc.query_one(".addressCrumb").found()? else {
        tracing::warn!("case banner `.addressCrumb` not found");
        return Ok(CaseHeader::default());
    };

    let field = |selector: &str| -> Result<Option<String>, DomError> {
        Ok(doc
            .query_one_in(crumb, selector)
            .found()?
            .map(|el| doc.text(el))
            .filter(|t| !t.is_empty()))
    };

    Ok(CaseHeader {
        case_number: field(".caseNumber")?,
        description: field(".description")?,
        address: field(".address")?,
    })
}
