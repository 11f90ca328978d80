// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Output shapes of the building-warrant pipeline.
//!
//! Field names are the JSON keys written to `result.json`.

use crate::dom::KeyValueRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything scraped from one building-warrant case.
#[derive(Debug, Clone, Serialize)]
pub struct WarrantRecord {
    pub header: CaseHeader,
    pub summary: KeyValueRecord,
    pub cases: AssociatedCases,
    pub properties: AssociatedProperties,
    pub further_information: KeyValueRecord,
    pub plots: PlotsSection,
    pub important_dates: KeyValueRecord,
    pub certificates: BTreeMap<String, Certificate>,
    pub related_items: RelatedItems,
    pub map: MapSection,
}

/// Case banner shown above every tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseHeader {
    #[serde(rename = "caseNumber")]
    pub case_number: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

/// "There are N cases associated with this application" line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssociatedCases {
    pub raw_text: Option<String>,
    pub count: Option<u64>,
}

/// Associated-property line plus its link.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssociatedProperties {
    pub raw_text: Option<String>,
    pub count: Option<u64>,
    pub url: Option<String>,
}

/// Summary tab contents.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTab {
    pub header: CaseHeader,
    pub summary: KeyValueRecord,
    pub cases: AssociatedCases,
    pub properties: AssociatedProperties,
}

/// One entry of the plot dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotOption {
    pub value: String,
    pub label: String,
    /// Selected when the tab was first loaded.
    pub selected: bool,
}

/// Details shown for one selected plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotDetail {
    pub label: String,
    pub description: Option<String>,
    pub details: KeyValueRecord,
}

/// Plots tab: the dropdown and one detail block per plot value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotsSection {
    pub options: Vec<PlotOption>,
    pub plots: BTreeMap<String, PlotDetail>,
}

/// A hyperlink; `href` is absolute when it could be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkItem {
    pub text: String,
    pub href: Option<String>,
}

/// One certificate subtab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certificate {
    pub title: String,
    pub url: String,
    pub table: Option<KeyValueRecord>,
    /// Container text, e.g. "There are no certificates of construction".
    pub message: Option<String>,
    pub applies_to_plots: Option<Vec<LinkItem>>,
}

/// Related items tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelatedItems {
    pub url: String,
    pub sections: Vec<RelatedSection>,
}

/// Items listed under one `h2` heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedSection {
    pub title: String,
    pub items: Vec<LinkItem>,
}

/// Map tab configuration. `error` is present only when the tab failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapSection {
    pub tab_url: String,
    pub iframe_url: Option<String>,
    pub form_action: Option<String>,
    pub form_params: Option<BTreeMap<String, String>>,
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MapSection {
    /// Placeholder for a map tab that could not be scraped.
    pub fn failed(tab_url: String, error: String) -> Self {
        Self {
            tab_url,
            error: Some(error),
            ..Self::default()
        }
    }
}
