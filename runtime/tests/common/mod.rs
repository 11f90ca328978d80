// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scripted browser used by the pipeline tests.
//!
//! Pages are served from a URL map. Plot pages are keyed by the dropdown
//! value that was selected before the submit. Every call that changes the
//! page is appended to a shared log.

#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use planscrape::dom::{DocumentReader, HtmlDocument};
use planscrape::renderer::{LoadState, NavigationResult, RenderContext, Renderer};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct FakeContext {
    pages: HashMap<String, String>,
    plot_pages: HashMap<String, String>,
    failing: HashSet<String>,
    frame: Option<String>,
    pending_value: Option<String>,
    current_url: String,
    current_html: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn plot_page(mut self, value: impl Into<String>, html: impl Into<String>) -> Self {
        self.plot_pages.insert(value.into(), html.into());
        self
    }

    pub fn failing(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    pub fn frame(mut self, url: impl Into<String>) -> Self {
        self.frame = Some(url.into());
        self
    }

    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.log)
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn nav_result(&self) -> NavigationResult {
        NavigationResult {
            final_url: self.current_url.clone(),
            load_time_ms: 1,
        }
    }
}

#[async_trait]
impl RenderContext for FakeContext {
    async fn navigate(
        &mut self,
        url: &str,
        _wait: LoadState,
        _timeout_ms: u64,
    ) -> Result<NavigationResult> {
        self.record(format!("navigate {url}"));
        if self.failing.contains(url) {
            bail!("navigation to {url} timed out");
        }
        let html = self
            .pages
            .get(url)
            .ok_or_else(|| anyhow!("no page scripted for {url}"))?;
        self.current_html = html.clone();
        self.current_url = url.to_string();
        Ok(self.nav_result())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout_ms: u64) -> Result<()> {
        let doc = HtmlDocument::parse(&self.current_html);
        doc.query_one(selector)?;
        Ok(())
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        self.record(format!("select {selector} {value}"));
        self.pending_value = Some(value.to_string());
        Ok(())
    }

    async fn submit_and_wait(
        &mut self,
        _selector: &str,
        _wait: LoadState,
        _timeout_ms: u64,
    ) -> Result<NavigationResult> {
        let value = self
            .pending_value
            .take()
            .ok_or_else(|| anyhow!("submit without a selection"))?;
        self.record(format!("submit {value}"));
        self.current_html = self
            .plot_pages
            .get(&value)
            .ok_or_else(|| anyhow!("no plot page scripted for {value}"))?
            .clone();
        Ok(self.nav_result())
    }

    async fn frame_url(&self, _name: &str, _timeout_ms: u64) -> Result<Option<String>> {
        Ok(self.frame.clone())
    }

    async fn execute_js(&self, _script: &str) -> Result<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }

    async fn get_html(&self) -> Result<String> {
        Ok(self.current_html.clone())
    }

    async fn get_url(&self) -> Result<String> {
        Ok(self.current_url.clone())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.record("close".to_string());
        Ok(())
    }
}

/// Hands out clones of one scripted context and records shutdown.
pub struct FakeRenderer {
    template: FakeContext,
    active: AtomicUsize,
    pub shut_down: AtomicBool,
}

impl FakeRenderer {
    pub fn new(template: FakeContext) -> Self {
        Self {
            template,
            active: AtomicUsize::new(0),
            shut_down: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        self.active.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(self.template.clone()))
    }

    async fn shutdown(&self) -> Result<()> {
        self.shut_down.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}
