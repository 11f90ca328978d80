// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text normalization shared by both pipelines.
//!
//! Portal labels such as `"Reference Number:"` become object keys like
//! `reference_number`; counts are pulled out of prose like
//! `"There are 3 associated cases"`; relative links are made absolute.

use regex::Regex;
use std::sync::OnceLock;

fn non_alnum_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"))
}

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static pattern"))
}

/// Convert a label into a machine-friendly key.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `_` and strips leading/trailing underscores. The result is either
/// empty or matches `^[a-z0-9]+(_[a-z0-9]+)*$`, and applying it twice gives
/// the same output as applying it once.
pub fn normalize_key(label: &str) -> String {
    let lower = label.to_lowercase();
    non_alnum_runs()
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// First run of ASCII digits in `text`, parsed as a number.
pub fn first_number(text: &str) -> Option<u64> {
    digit_run()
        .find(text)
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Resolve `href` against `base`. Unparseable input is returned verbatim.
pub fn resolve_url(base: &str, href: &str) -> String {
    url::Url::parse(base)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
