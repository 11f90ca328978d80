// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Building-warrant pipeline against a scripted browser.

mod common;

use assert_json_diff::assert_json_include;
use common::{FakeContext, FakeRenderer};
use planscrape::cli::warrant_cmd::scrape_with;
use planscrape::config::WarrantConfig;
use planscrape::warrant::scrape_building_warrant;
use serde_json::json;
use std::sync::atomic::Ordering;
use url::Url;

const CASE_URL: &str =
    "https://portal.example.gov.uk/idoxpa-web/scottishBuildingWarrantDetails.do?keyVal=K1";

fn config() -> WarrantConfig {
    WarrantConfig {
        case_url: Url::parse(CASE_URL).unwrap(),
        ..WarrantConfig::default()
    }
}

const SUMMARY: &str = r#"
    <div class="addressCrumb">
      <span class="caseNumber">25/01234/WARR</span>
      <span class="description">Erection of 12 dwellinghouses</span>
      <span class="address">Site 4 Harbour Road Edinburgh</span>
    </div>
    <table id="simpleDetailsTable">
      <tr><th>Reference</th><td>25/01234/WARR</td></tr>
      <tr><th>Status:</th><td>Approved</td></tr>
    </table>
    <p class="associatedcase">There are 3 cases associated with this application.</p>
    <p class="associatedproperty">There are 12 properties associated with this application.
      <a href="propertyDetails.do?keyVal=P1">View</a></p>"#;

const DETAILS: &str = r#"
    <table id="buildingStandardsDetails">
      <tr><th>Work Type</th><td>New Build</td></tr>
    </table>"#;

const DATES: &str = r#"
    <table id="simpleDetailsTable">
      <tr><th>Application Received Date</th><td>Mon 06 Jan 2025</td></tr>
    </table>"#;

const PLOTS: &str = r#"
    <form id="bsPlotsDesc">
      <select id="plotDesc">
        <option value="">All</option>
        <option value="P1">Plot 1</option>
        <option value="P2">Plot 2</option>
      </select>
      <input type="submit" value="Go">
    </form>
    <div class="tabcontainer"><p>Select a plot</p></div>"#;

fn plot_page(n: u32) -> String {
    format!(
        r#"<div class="tabcontainer">
             <p><b>Plot {n} - House type A</b></p>
             <table summary="Building Standards Application Plots">
               <tr><th>Plot Number</th><td>{n}</td></tr>
               <tr><th>Status</th><td>Under construction</td></tr>
             </table>
           </div>"#
    )
}

const SUBTABS: &str = r#"
    <ul class="subtabs">
      <li><a href="scottishBuildingWarrantDetails.do?keyVal=K1&amp;activeTab=designCertificate">Certificates of Design</a></li>
      <li><a href="scottishBuildingWarrantDetails.do?keyVal=K1&amp;activeTab=constructionCertificate">Certificates of Construction</a></li>
    </ul>"#;

fn design_certificates() -> String {
    format!(
        r#"{SUBTABS}
           <div class="tabcontainer">
             <table><tr><th>Certificate Number</th><td>D-001</td></tr></table>
             <a href="plotDetails.do?keyVal=P1">Plot 1</a>
             <a href="plotDetails.do?keyVal=P2">Plot 2</a>
           </div>"#
    )
}

fn construction_certificates() -> String {
    format!(
        r#"{SUBTABS}
           <div class="tabcontainer"><p>No certificates of construction.</p></div>"#
    )
}

const RELATED: &str = r#"
    <div class="tabcontainer">
      <h2>Planning Applications</h2>
      <ul><li><a href="applicationDetails.do?keyVal=A1">24/00001/FUL</a></li></ul>
    </div>"#;

const MAP: &str = r#"
    <form id="mapForm" action="/map/index.html" method="post" target="mapiframe">
      <input type="hidden" name="keyVal" value="K1">
    </form>
    <iframe name="mapiframe"></iframe>
    <div id="mapCopyright">© Crown copyright</div>"#;

fn scripted_case(config: &WarrantConfig) -> FakeContext {
    FakeContext::new()
        .page(config.tab_url("summary"), SUMMARY)
        .page(config.tab_url("details"), DETAILS)
        .page(config.tab_url("plots"), PLOTS)
        .plot_page("P1", plot_page(1))
        .plot_page("P2", plot_page(2))
        .page(config.tab_url("dates"), DATES)
        .page(config.tab_url("designCertificate"), design_certificates())
        .page(
            config.tab_url("constructionCertificate"),
            construction_certificates(),
        )
        .page(config.tab_url("relatedCases"), RELATED)
        .page(config.tab_url("map"), MAP)
        .frame("https://maps.example.gov.uk/?keyVal=K1")
}

#[tokio::test]
async fn test_plots_visit_every_non_empty_option_once() {
    let config = config();
    let mut ctx = scripted_case(&config);
    let log = ctx.log();

    let record = scrape_building_warrant(&mut ctx, &config).await.unwrap();

    let log = log.lock().unwrap();
    let selections: Vec<&String> = log.iter().filter(|e| e.starts_with("select")).collect();
    assert_eq!(selections, ["select #plotDesc P1", "select #plotDesc P2"]);
    assert_eq!(log.iter().filter(|e| e.starts_with("submit")).count(), 2);

    assert_eq!(record.plots.options.len(), 3);
    assert_eq!(
        record.plots.plots.keys().collect::<Vec<_>>(),
        ["P1", "P2"]
    );
    assert_eq!(
        record.plots.plots["P2"].description.as_deref(),
        Some("Plot 2 - House type A")
    );
    assert_eq!(record.plots.plots["P2"].details["plot_number"], "2");
}

#[tokio::test]
async fn test_plots_resubmit_initially_selected_option_after_another() {
    let config = config();
    let initial = format!(
        r#"<form id="bsPlotsDesc">
             <select id="plotDesc">
               <option value="">All</option>
               <option value="P1">Plot 1</option>
               <option value="P2" selected>Plot 2</option>
             </select>
             <input type="submit" value="Go">
           </form>
           {}"#,
        plot_page(2)
    );
    let mut ctx = scripted_case(&config).page(config.tab_url("plots"), initial);
    let log = ctx.log();

    let record = scrape_building_warrant(&mut ctx, &config).await.unwrap();

    let log = log.lock().unwrap();
    let submits: Vec<&String> = log.iter().filter(|e| e.starts_with("submit")).collect();
    assert_eq!(submits, ["submit P1", "submit P2"]);
    assert_eq!(record.plots.plots["P1"].details["plot_number"], "1");
    assert_eq!(record.plots.plots["P2"].details["plot_number"], "2");
}

#[tokio::test]
async fn test_plots_initially_selected_first_option_is_not_resubmitted() {
    let config = config();
    let initial = format!(
        r#"<select id="plotDesc">
             <option value="P1" selected>Plot 1</option>
             <option value="P2">Plot 2</option>
           </select>
           {}"#,
        plot_page(1)
    );
    let mut ctx = scripted_case(&config).page(config.tab_url("plots"), initial);
    let log = ctx.log();

    let record = scrape_building_warrant(&mut ctx, &config).await.unwrap();

    let log = log.lock().unwrap();
    let submits: Vec<&String> = log.iter().filter(|e| e.starts_with("submit")).collect();
    assert_eq!(submits, ["submit P2"]);
    assert_eq!(record.plots.plots["P1"].details["plot_number"], "1");
    assert_eq!(record.plots.plots["P2"].details["plot_number"], "2");
}

#[tokio::test]
async fn test_full_case_record() {
    let config = config();
    let mut ctx = scripted_case(&config);
    let log = ctx.log();

    let record = scrape_building_warrant(&mut ctx, &config).await.unwrap();
    let value = serde_json::to_value(&record).unwrap();

    assert_json_include!(
        actual: value,
        expected: json!({
            "header": {
                "caseNumber": "25/01234/WARR",
                "description": "Erection of 12 dwellinghouses",
                "address": "Site 4 Harbour Road Edinburgh"
            },
            "summary": {"reference": "25/01234/WARR", "status": "Approved"},
            "cases": {"count": 3},
            "properties": {
                "count": 12,
                "url": "https://portal.example.gov.uk/idoxpa-web/propertyDetails.do?keyVal=P1"
            },
            "further_information": {"work_type": "New Build"},
            "important_dates": {"application_received_date": "Mon 06 Jan 2025"},
            "certificates": {
                "certificates_of_design": {
                    "title": "Certificates of Design",
                    "table": {"certificate_number": "D-001"},
                    "applies_to_plots": [
                        {"text": "Plot 1", "href": "https://portal.example.gov.uk/idoxpa-web/plotDetails.do?keyVal=P1"},
                        {"text": "Plot 2", "href": "https://portal.example.gov.uk/idoxpa-web/plotDetails.do?keyVal=P2"}
                    ]
                },
                "certificates_of_construction": {
                    "table": null,
                    "message": "No certificates of construction.",
                    "applies_to_plots": null
                }
            },
            "related_items": {
                "sections": [{"title": "Planning Applications", "items": [{"text": "24/00001/FUL"}]}]
            },
            "map": {
                "iframe_url": "https://maps.example.gov.uk/?keyVal=K1",
                "form_action": "/map/index.html",
                "form_params": {"keyVal": "K1"},
                "copyright": "© Crown copyright"
            }
        })
    );
    assert!(value["map"].get("error").is_none());

    let navigations: Vec<String> = log
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| e.strip_prefix("navigate ").map(str::to_string))
        .collect();
    assert_eq!(navigations.first(), Some(&config.tab_url("summary")));
    assert_eq!(navigations.last(), Some(&config.tab_url("map")));
}

#[tokio::test]
async fn test_map_failure_is_recorded_not_fatal() {
    let config = config();
    let mut ctx = scripted_case(&config).failing(config.tab_url("map"));

    let record = scrape_building_warrant(&mut ctx, &config).await.unwrap();

    assert_eq!(record.map.tab_url, config.tab_url("map"));
    assert!(record.map.error.as_deref().unwrap().contains("timed out"));
    assert_eq!(record.map.form_params, None);
    assert_eq!(record.further_information["work_type"], "New Build");
}

#[tokio::test]
async fn test_summary_without_table_is_fatal() {
    let config = config();
    let mut ctx = scripted_case(&config).page(config.tab_url("summary"), "<p>Maintenance</p>");

    let err = scrape_building_warrant(&mut ctx, &config).await.unwrap_err();
    assert!(format!("{err:#}").contains("#simpleDetailsTable"));
}

#[tokio::test]
async fn test_browser_is_shut_down_after_failure() {
    let config = config();
    let template = scripted_case(&config).failing(config.tab_url("details"));
    let log = template.log();
    let renderer = FakeRenderer::new(template);

    assert!(scrape_with(&renderer, &config).await.is_err());
    assert!(renderer.shut_down.load(Ordering::Relaxed));
    assert_eq!(log.lock().unwrap().last().map(String::as_str), Some("close"));
}
