// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON output for finished scrape results.

use crate::error::ScrapeError;
use serde::Serialize;
use std::path::Path;

/// Pretty-print `value` to stdout and write it to `path`, replacing any
/// existing file.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ScrapeError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    std::fs::write(path, &json)?;
    tracing::info!("Saved to {}", path.display());
    Ok(())
}
