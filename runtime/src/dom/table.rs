// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Two-column "label → value" tables.

use super::{DocumentReader, DomError, KeyValueRecord};
use crate::normalize::normalize_key;

/// Read a label/value table into a [`KeyValueRecord`].
///
/// Every `tr` below an element matching `table_selector` that has at least
/// two `th`/`td` cells contributes one entry: the first cell is the label
/// (a trailing `:` is dropped, then the label is normalized) and the second
/// cell is the value. Rows whose label normalizes to an empty key are
/// skipped. Later rows overwrite earlier ones with the same key.
///
/// Fails with [`DomError::NotFound`] when the table itself is absent.
pub fn read_key_value_table<D: DocumentReader>(
    doc: &D,
    table_selector: &str,
) -> Result<KeyValueRecord, DomError> {
    doc.query_one(table_selector)?;

    let mut record = KeyValueRecord::new();
    for row in doc.query_all(&format!("{table_selector} tr"))? {
        let cells = doc.query_all_in(row, "th, td")?;
        if cells.len() < 2 {
            continue;
        }
        let label = doc.text(cells[0]);
        let key = normalize_key(label.strip_suffix(':').unwrap_or(&label));
        if key.is_empty() {
            continue;
        }
        record.insert(key, doc.text(cells[1]));
    }
    Ok(record)
}
