// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Application page extraction: main details, plots and site history.

use crate::dom::{DocumentReader, DomError, HtmlDocument, KeyValueRecord, Presence};
use crate::normalize::normalize_key;
use serde::Serialize;

pub const MAIN_DETAILS_ROWS: &str = "#Main-Details table.summaryTbl tr";
pub const MAIN_DETAILS_CELLS: &str = "td.halfwidth, td.fullwidth";
pub const PLOT_ROWS: &str = "#Plots table.summaryTbl tr";
pub const SITE_HISTORY_ROWS: &str = "#Site-history table.tblResults tr";

/// Header row of the plots table.
const PLOT_HEADER_ROWS: usize = 1;
/// Title row plus header row of the site history table.
const SITE_HISTORY_HEADER_ROWS: usize = 2;

/// Everything extracted from one building-control application page.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationRecord {
    pub url: String,
    pub title: String,
    pub main_details: KeyValueRecord,
    pub plots: Vec<PlotRow>,
    pub site_history: Vec<SiteHistoryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotRow {
    pub plot_number: String,
    pub plot_address: String,
    pub plot_status: String,
    pub commencement_date: String,
    pub completion_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteHistoryRow {
    pub application_number: String,
    pub received_date: String,
    pub validated_date: String,
    pub application_type: String,
    pub location: String,
    pub proposal: String,
}

/// Parse the application page fetched from `url`.
///
/// Missing sections yield empty collections and a missing `h1` an empty
/// title; only an unparseable selector is an error.
pub fn parse_application(html: &str, url: &str) -> Result<ApplicationRecord, DomError> {
    let doc = HtmlDocument::parse(html);

    let title = doc.query_one("h1").found()?.map(|h| doc.text(h)).unwrap_or_default();

    Ok(ApplicationRecord {
        url: url.to_string(),
        title,
        main_details: parse_main_details(&doc)?,
        plots: parse_plots(&doc)?,
        site_history: parse_site_history(&doc)?,
    })
}

/// Label/value cells of the main details tab.
///
/// Each cell starts with its label as a bare text node, followed by the
/// value wrapped in one or more `span`s.
pub fn parse_main_details<D: DocumentReader>(doc: &D) -> Result<KeyValueRecord, DomError> {
    let mut details = KeyValueRecord::new();

    for row in doc.query_all(MAIN_DETAILS_ROWS)? {
        for cell in doc.query_all_in(row, MAIN_DETAILS_CELLS)? {
            let label = doc.leading_text(cell);
            let value = doc
                .query_all_in(cell, "span")?
                .into_iter()
                .map(|span| doc.text(span))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            if label.is_empty() || value.is_empty() {
                continue;
            }
            let key = normalize_key(&label);
            if !key.is_empty() {
                details.insert(key, value);
            }
        }
    }

    Ok(details)
}

pub fn parse_plots<D: DocumentReader>(doc: &D) -> Result<Vec<PlotRow>, DomError> {
    Ok(data_rows(doc, PLOT_ROWS, PLOT_HEADER_ROWS)?
        .into_iter()
        .map(|mut cols| PlotRow {
            plot_number: take(&mut cols, 0),
            plot_address: take(&mut cols, 1),
            plot_status: take(&mut cols, 2),
            commencement_date: take(&mut cols, 3),
            completion_date: take(&mut cols, 4),
        })
        .collect())
}

pub fn parse_site_history<D: DocumentReader>(doc: &D) -> Result<Vec<SiteHistoryRow>, DomError> {
    Ok(data_rows(doc, SITE_HISTORY_ROWS, SITE_HISTORY_HEADER_ROWS)?
        .into_iter()
        .map(|mut cols| SiteHistoryRow {
            application_number: take(&mut cols, 0),
            received_date: take(&mut cols, 1),
            validated_date: take(&mut cols, 2),
            application_type: take(&mut cols, 3),
            location: take(&mut cols, 4),
            proposal: take(&mut cols, 5),
        })
        .collect())
}

/// Cell texts of every row after the first `skip`, dropping rows with no
/// `td` cells.
fn data_rows<D: DocumentReader>(
    doc: &D,
    rows: &str,
    skip: usize,
) -> Result<Vec<Vec<String>>, DomError> {
    let mut out = Vec::new();
    for row in doc.query_all(rows)?.into_iter().skip(skip) {
        let cols: Vec<String> = doc
            .query_all_in(row, "td")?
            .into_iter()
            .map(|td| doc.text(td))
            .collect();
        if !cols.is_empty() {
            out.push(cols);
        }
    }
    Ok(out)
}

fn take(cols: &mut [String], i: usize) -> String {
    cols.get_mut(i).map(std::mem::take).unwrap_or_default()
}
