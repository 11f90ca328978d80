// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Renderer abstraction for browser-driven portal navigation.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide). Extractors
//! never see the browser: they receive HTML snapshots taken through
//! [`RenderContext::get_html`].

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadState {
    /// The load event fired and no new resources were requested for a short
    /// quiet window.
    #[default]
    NetworkIdle,
    /// The initial markup was parsed. Used for pages whose embedded maps or
    /// analytics never go quiet.
    DomContentLoaded,
}

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
    /// Number of currently active contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab) for rendering pages.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL and wait for `wait`, failing after `timeout_ms`.
    async fn navigate(
        &mut self,
        url: &str,
        wait: LoadState,
        timeout_ms: u64,
    ) -> Result<NavigationResult>;
    /// Wait until `selector` matches an element in the current page.
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()>;
    /// Set the value of the `<select>` matching `selector` and fire `change`.
    async fn select_option(&mut self, selector: &str, value: &str) -> Result<()>;
    /// Click the submit control matching `selector` and wait for the
    /// resulting navigation.
    async fn submit_and_wait(
        &mut self,
        selector: &str,
        wait: LoadState,
        timeout_ms: u64,
    ) -> Result<NavigationResult>;
    /// URL loaded by the frame named `name`.
    ///
    /// `None` when no such frame exists or it is still `about:blank` once
    /// `timeout_ms` has passed. A slow frame is not an error.
    async fn frame_url(&self, name: &str, timeout_ms: u64) -> Result<Option<String>>;
    /// Execute JavaScript in the page context and return the result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;
    /// Get the full page HTML.
    async fn get_html(&self) -> Result<String>;
    /// Get the current URL.
    async fn get_url(&self) -> Result<String>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}
