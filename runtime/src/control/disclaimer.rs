// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Disclaimer acceptance.

use crate::acquisition::http_client::HttpClient;
use crate::config::ControlConfig;
use crate::dom::{DocumentReader, HtmlDocument, Presence};
use crate::error::ScrapeError;
use crate::normalize::resolve_url;

/// Acceptance form on the disclaimer page.
pub const DISCLAIMER_FORM: &str = "form[action^=\"/Disclaimer/Accept\"]";

/// The acceptance form, ready to be resubmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclaimerForm {
    /// Absolute URL the form posts to.
    pub action_url: String,
    /// Hidden inputs in document order, values verbatim.
    pub fields: Vec<(String, String)>,
}

/// Locate the acceptance form in the disclaimer page fetched from `page_url`.
pub fn parse_disclaimer_form(
    html: &str,
    page_url: &str,
    base_url: &str,
) -> Result<DisclaimerForm, ScrapeError> {
    let doc = HtmlDocument::parse(html);

    let form = doc
        .query_one(DISCLAIMER_FORM)
        .found()?
        .ok_or_else(|| ScrapeError::DisclaimerFormMissing {
            url: page_url.to_string(),
        })?;

    // DISCLAIMER_FORM only matches forms with an action prefix, so this
    // fails only if that selector is loosened.
    let action = doc
        .attribute(form, "action")
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ScrapeError::DisclaimerActionMissing {
            url: page_url.to_string(),
        })?;

    let mut fields = Vec::new();
    for input in doc.query_all_in(form, "input[type=hidden]")? {
        if let Some(name) = doc.attribute(input, "name").filter(|n| !n.is_empty()) {
            fields.push((name, doc.attribute(input, "value").unwrap_or_default()));
        }
    }

    Ok(DisclaimerForm {
        action_url: resolve_url(base_url, &action),
        fields,
    })
}

/// Fetch the disclaimer page and post its acceptance form once.
pub async fn accept_disclaimer(
    client: &HttpClient,
    config: &ControlConfig,
) -> Result<(), ScrapeError> {
    let page_url = config.disclaimer_url();
    let page = client.get(&page_url).await?;
    let form = parse_disclaimer_form(&page.body, &page_url, &config.base_url)?;

    tracing::debug!("posting disclaimer acceptance to {}", form.action_url);
    client.post_form(&form.action_url, &form.fields).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://wnc.planning-register.co.uk";
    const PAGE: &str = "https://wnc.planning-register.co.uk/Disclaimer?returnUrl=x";

    #[test]
    fn test_parse_disclaimer_form() {
        let html = r#"
            <form action="/Search" method="get"><input type="hidden" name="q" value="ignored"></form>
            <form action="/Disclaimer/Accept?id=1" method="post">
              <input type="hidden" name="token" value="abc">
              <input type="hidden" name="returnUrl" value="/BuildingControl/Display/FP/2025/0159">
              <input type="hidden" name="empty">
              <input type="hidden" value="nameless">
              <input type="submit" name="agree" value="Agree">
            </form>"#;
        let form = parse_disclaimer_form(html, PAGE, BASE).unwrap();
        assert_eq!(
            form.action_url,
            "https://wnc.planning-register.co.uk/Disclaimer/Accept?id=1"
        );
        assert_eq!(
            form.fields,
            vec![
                ("token".to_string(), "abc".to_string()),
                (
                    "returnUrl".to_string(),
                    "/BuildingControl/Display/FP/2025/0159".to_string()
                ),
                ("empty".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_missing_form_is_fatal() {
        let err = parse_disclaimer_form("<form action='/Other'></form>", PAGE, BASE).unwrap_err();
        assert!(matches!(err, ScrapeError::DisclaimerFormMissing { .. }));
        assert!(err.to_string().contains("Disclaimer form not found"));
    }

    #[test]
    fn test_form_without_action_is_not_the_disclaimer_form() {
        for html in [
            r#"<form method="post"><input type="hidden" name="token" value="abc"></form>"#,
            r#"<form action="" method="post"><input type="hidden" name="token" value="abc"></form>"#,
        ] {
            let err = parse_disclaimer_form(html, PAGE, BASE).unwrap_err();
            assert!(matches!(err, ScrapeError::DisclaimerFormMissing { .. }));
        }
    }
}
