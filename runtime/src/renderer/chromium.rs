// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chromium-based renderer using chromiumoxide.

use super::{LoadState, NavigationResult, RenderContext, Renderer};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Interval between DOM polls while waiting on page state.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Resource count must stay unchanged this long for the network to count as idle.
const NETWORK_QUIET: Duration = Duration::from_millis(500);

/// `window` property tagging the document that was live before a navigation.
const DOCUMENT_MARKER: &str = "__planscrapeDocument";

static DOCUMENT_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. PLANSCRAPE_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("PLANSCRAPE_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.planscrape/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".planscrape/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".planscrape/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".planscrape/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".planscrape/chromium/chrome-linux64/chrome"),
                home.join(".planscrape/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based renderer.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    /// Launch a Chromium instance, headless unless `headless` is false.
    pub async fn new(headless: bool) -> Result<Self> {
        let chrome_path = find_chromium()
            .context("Chromium not found. Set PLANSCRAPE_CHROMIUM_PATH or install Chrome.")?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        builder = if headless {
            builder.arg("--headless=new")
        } else {
            builder.with_head()
        };
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumContext {
            page,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.context("failed to close Chromium")?;
        let _ = browser.wait().await;
        self.handler.abort();
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumContext {
    async fn eval_bool(&self, script: &str) -> Result<bool> {
        Ok(self.execute_js(script).await?.as_bool().unwrap_or(false))
    }

    /// Block until the page satisfies `wait`.
    async fn settle(&self, wait: LoadState) -> Result<()> {
        match wait {
            LoadState::DomContentLoaded => {
                while !self.eval_bool("document.readyState !== 'loading'").await? {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
            LoadState::NetworkIdle => {
                while !self.eval_bool("document.readyState === 'complete'").await? {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                let count = "performance.getEntriesByType('resource').length";
                let mut last = self.execute_js(count).await?.as_u64().unwrap_or(0);
                let mut quiet_since = Instant::now();
                while quiet_since.elapsed() < NETWORK_QUIET {
                    tokio::time::sleep(POLL_INTERVAL).await;
                    let now = self.execute_js(count).await?.as_u64().unwrap_or(0);
                    if now != last {
                        last = now;
                        quiet_since = Instant::now();
                    }
                }
            }
        }
        Ok(())
    }

    /// Tag the live document so that its replacement can be told apart.
    async fn mark_document(&self) -> Result<String> {
        let token = DOCUMENT_TOKEN.fetch_add(1, Ordering::Relaxed).to_string();
        self.execute_js(&mark_script(&token)).await?;
        Ok(token)
    }

    /// Block until the document tagged with `token` is gone.
    ///
    /// Probes fail while the old execution context is torn down; those are
    /// retried. Callers bound this with a timeout.
    async fn wait_for_new_document(&self, token: &str) {
        let script = still_marked_script(token);
        loop {
            match self.execute_js(&script).await {
                Ok(v) if v.as_bool() == Some(false) => return,
                Ok(_) => {}
                Err(e) => tracing::trace!("document probe failed mid-navigation: {e:#}"),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn current_url_or(&self, fallback: &str) -> String {
        self.page
            .url()
            .await
            .unwrap_or_default()
            .map(|u| u.to_string())
            .unwrap_or_else(|| fallback.to_string())
    }
}

fn mark_script(token: &str) -> String {
    format!("window.{DOCUMENT_MARKER} = {}; true", js_string(token))
}

fn still_marked_script(token: &str) -> String {
    format!("window.{DOCUMENT_MARKER} === {}", js_string(token))
}

/// Quote `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(
        &mut self,
        url: &str,
        wait: LoadState,
        timeout_ms: u64,
    ) -> Result<NavigationResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            let token = self.mark_document().await?;
            // Page.navigate returns once the navigation commits; load state is
            // left to `settle`.
            let nav = self
                .page
                .execute(NavigateParams::new(url))
                .await
                .context("navigation failed")?;
            if let Some(err) = &nav.result.error_text {
                bail!("navigation failed: {err}");
            }
            self.wait_for_new_document(&token).await;
            self.settle(wait).await
        })
        .await;

        match result {
            Ok(Ok(())) => Ok(NavigationResult {
                final_url: self.current_url_or(url).await,
                load_time_ms: start.elapsed().as_millis() as u64,
            }),
            Ok(Err(e)) => Err(e.context(format!("failed to load {url}"))),
            Err(_) => bail!("navigation to {url} timed out after {timeout_ms}ms"),
        }
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let script = format!("document.querySelector({}) !== null", js_string(selector));
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.eval_bool(&script).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("timed out after {timeout_ms}ms waiting for `{selector}`");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let script = format!(
            "(() => {{
                const s = document.querySelector({sel});
                if (!s) return false;
                s.value = {val};
                s.dispatchEvent(new Event('input', {{ bubbles: true }}));
                s.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return s.value === {val};
            }})()",
            sel = js_string(selector),
            val = js_string(value),
        );
        if !self.eval_bool(&script).await? {
            bail!("could not select option `{value}` in `{selector}`");
        }
        Ok(())
    }

    async fn submit_and_wait(
        &mut self,
        selector: &str,
        wait: LoadState,
        timeout_ms: u64,
    ) -> Result<NavigationResult> {
        let start = Instant::now();
        let before = self.get_url().await.unwrap_or_default();

        let result = tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            let button = self
                .page
                .find_element(selector)
                .await
                .with_context(|| format!("submit control `{selector}` not found"))?;
            let token = self.mark_document().await?;
            button.click().await.context("click failed")?;
            self.wait_for_new_document(&token).await;
            self.settle(wait).await
        })
        .await;

        match result {
            Ok(Ok(())) => Ok(NavigationResult {
                final_url: self.current_url_or(&before).await,
                load_time_ms: start.elapsed().as_millis() as u64,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => bail!("submit via `{selector}` timed out after {timeout_ms}ms"),
        }
    }

    async fn frame_url(&self, name: &str, timeout_ms: u64) -> Result<Option<String>> {
        let script = format!(
            "(() => {{
                const f = document.querySelector('iframe[name=' + JSON.stringify({name}) + '], frame[name=' + JSON.stringify({name}) + ']');
                if (!f) return {{ present: false, url: '' }};
                try {{ return {{ present: true, url: f.contentWindow.location.href }}; }}
                catch (e) {{ return {{ present: true, url: f.src || '' }}; }}
            }})()",
            name = js_string(name),
        );
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let probe = self.execute_js(&script).await?;
            if !probe["present"].as_bool().unwrap_or(false) {
                return Ok(None);
            }
            let url = probe["url"].as_str().unwrap_or_default();
            if !url.is_empty() && url != "about:blank" {
                return Ok(Some(url.to_string()));
            }
            if Instant::now() >= deadline {
                tracing::debug!("frame `{name}` still blank after {timeout_ms}ms");
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("JS execution failed")?;

        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert JS result: {e:?}"))
    }

    async fn get_html(&self) -> Result<String> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to get HTML")?;

        let html: String = result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert HTML result: {e:?}"))?;

        Ok(html)
    }

    async fn get_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .context("failed to get URL")?
            .map(|u| u.to_string())
            .unwrap_or_default();
        Ok(url)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}
