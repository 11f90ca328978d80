// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Read-only DOM access for the extractors.
//!
//! Every extractor in this crate talks to a page through [`DocumentReader`]
//! and never touches the parser directly. Lookups return
//! `Result<_, DomError>` so that a missing element is an explicit
//! [`DomError::NotFound`] the caller branches on, while a malformed selector
//! stays a hard error.
//!
//! [`HtmlDocument`] is the `scraper`-backed implementation. It is built from
//! raw HTML, which may come from an HTTP body or from a browser snapshot.
//! `scraper` types are `!Send`, so documents are parsed, read and dropped
//! inside synchronous helpers and never held across an `.await`.

pub mod table;

use crate::normalize::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

pub use table::read_key_value_table;

/// Normalized label → trimmed text value.
pub type KeyValueRecord = BTreeMap<String, String>;

/// Errors raised by DOM lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// No element matched the selector.
    #[error("no element matches selector `{selector}`")]
    NotFound { selector: String },
    /// The selector could not be parsed.
    #[error("invalid CSS selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl DomError {
    fn not_found(selector: &str) -> Self {
        Self::NotFound {
            selector: selector.to_string(),
        }
    }
}

/// Turn a `NotFound` into `Ok(None)`, keeping every other error.
pub trait Presence<T> {
    fn found(self) -> Result<Option<T>, DomError>;
}

impl<T> Presence<T> for Result<T, DomError> {
    fn found(self) -> Result<Option<T>, DomError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(DomError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Capability interface over a parsed page.
pub trait DocumentReader {
    /// Handle to one element of the document.
    type Element<'a>: Copy
    where
        Self: 'a;

    /// First element matching `selector` anywhere in the document.
    fn query_one<'a>(&'a self, selector: &str) -> Result<Self::Element<'a>, DomError>;

    /// All elements matching `selector`, in document order.
    fn query_all<'a>(&'a self, selector: &str) -> Result<Vec<Self::Element<'a>>, DomError>;

    /// First descendant of `scope` matching `selector`.
    fn query_one_in<'a>(
        &'a self,
        scope: Self::Element<'a>,
        selector: &str,
    ) -> Result<Self::Element<'a>, DomError>;

    /// All descendants of `scope` matching `selector`.
    fn query_all_in<'a>(
        &'a self,
        scope: Self::Element<'a>,
        selector: &str,
    ) -> Result<Vec<Self::Element<'a>>, DomError>;

    /// Visible text of an element, trimmed and whitespace-collapsed.
    fn text<'a>(&'a self, el: Self::Element<'a>) -> String;

    /// Attribute value, if present.
    fn attribute<'a>(&'a self, el: Self::Element<'a>, name: &str) -> Option<String>;

    /// Lowercase tag name.
    fn tag_name<'a>(&'a self, el: Self::Element<'a>) -> String;

    /// Next sibling that is an element (text and comments are skipped).
    fn next_element_sibling<'a>(&'a self, el: Self::Element<'a>) -> Option<Self::Element<'a>>;

    /// Text of the element's first child node only.
    fn leading_text<'a>(&'a self, el: Self::Element<'a>) -> String;

    /// Text of the first match, `None` when absent or blank.
    fn text_of(&self, selector: &str) -> Result<Option<String>, DomError> {
        Ok(self
            .query_one(selector)
            .found()?
            .map(|el| self.text(el))
            .filter(|t| !t.is_empty()))
    }

    /// Attribute of the first match, `None` when the element or attribute is absent.
    fn attribute_of(&self, selector: &str, name: &str) -> Result<Option<String>, DomError> {
        Ok(self
            .query_one(selector)
            .found()?
            .and_then(|el| self.attribute(el, name)))
    }
}

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse a full HTML document.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

fn compile(selector: &str) -> Result<Selector, DomError> {
    Selector::parse(selector).map_err(|e| DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Concatenated text nodes, trimmed, with whitespace runs collapsed.
/// Inline markup adds no separator of its own.
fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

impl DocumentReader for HtmlDocument {
    type Element<'a> = ElementRef<'a>;

    fn query_one<'a>(&'a self, selector: &str) -> Result<ElementRef<'a>, DomError> {
        let sel = compile(selector)?;
        self.html
            .select(&sel)
            .next()
            .ok_or_else(|| DomError::not_found(selector))
    }

    fn query_all<'a>(&'a self, selector: &str) -> Result<Vec<ElementRef<'a>>, DomError> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).collect())
    }

    fn query_one_in<'a>(
        &'a self,
        scope: ElementRef<'a>,
        selector: &str,
    ) -> Result<ElementRef<'a>, DomError> {
        let sel = compile(selector)?;
        scope
            .select(&sel)
            .next()
            .ok_or_else(|| DomError::not_found(selector))
    }

    fn query_all_in<'a>(
        &'a self,
        scope: ElementRef<'a>,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, DomError> {
        let sel = compile(selector)?;
        Ok(scope.select(&sel).collect())
    }

    fn text<'a>(&'a self, el: ElementRef<'a>) -> String {
        element_text(el)
    }

    fn attribute<'a>(&'a self, el: ElementRef<'a>, name: &str) -> Option<String> {
        el.value().attr(name).map(|v| v.to_string())
    }

    fn tag_name<'a>(&'a self, el: ElementRef<'a>) -> String {
        el.value().name().to_ascii_lowercase()
    }

    fn next_element_sibling<'a>(&'a self, el: ElementRef<'a>) -> Option<ElementRef<'a>> {
        el.next_siblings().find_map(ElementRef::wrap)
    }

    fn leading_text<'a>(&'a self, el: ElementRef<'a>) -> String {
        let Some(first) = el.first_child() else {
            return String::new();
        };
        if let Some(text) = first.value().as_text() {
            return collapse_whitespace(text);
        }
        ElementRef::wrap(first).map(element_text).unwrap_or_default()
    }
}
