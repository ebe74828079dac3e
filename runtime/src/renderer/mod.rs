//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide).

pub mod chromium;

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// How often `wait_until_ready` polls `document.readyState`.
const READY_POLL_MS: u64 = 250;

/// Result of navigating to a URL.
#[derive(Debug, Clone)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A cookie to install in a browser context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

/// Parse a `name=value; name2=value2` header into cookies for `domain`.
///
/// Pairs without `=` are ignored; values may themselves contain `=`.
pub fn parse_cookie_header(header: &str, domain: &str) -> Vec<Cookie> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(name, value)| Cookie {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
            domain: domain.to_string(),
        })
        .filter(|c| !c.name.is_empty())
        .collect()
}

/// Screenshot clip rectangle anchored at the page origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub width: f64,
    pub height: f64,
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
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;
    /// Execute JavaScript in the page context and return the result.
    /// Scripts evaluating to `undefined` yield `Value::Null`.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;
    /// Get the full page HTML.
    async fn get_html(&self) -> Result<String>;
    /// Override the user agent for subsequent requests.
    async fn set_user_agent(&self, user_agent: &str) -> Result<()>;
    /// Set the emulated viewport size.
    async fn set_viewport(&self, width: u32, height: u32) -> Result<()>;
    /// Install cookies.
    async fn set_cookies(&self, cookies: &[Cookie]) -> Result<()>;
    /// Capture a PNG screenshot of the clip region.
    async fn screenshot_png(&self, clip: Clip) -> Result<Vec<u8>>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;

    /// Poll until `document.readyState` is `complete`.
    async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            let state = self.execute_js("document.readyState").await?;
            if state.as_str() == Some("complete") {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                bail!("page not ready after {}ms", timeout.as_millis());
            }
            tokio::time::sleep(Duration::from_millis(READY_POLL_MS)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_header() {
        let cookies = parse_cookie_header("sid=1; persistent=ab==; junk;  userid=7 ", ".x.com");
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies[1].name, "persistent");
        assert_eq!(cookies[1].value, "ab==");
        assert_eq!(cookies[2].value, "7");
        assert!(cookies.iter().all(|c| c.domain == ".x.com"));
    }

    #[test]
    fn test_parse_empty_cookie_header() {
        assert!(parse_cookie_header("", ".x.com").is_empty());
        assert!(parse_cookie_header("=orphan", ".x.com").is_empty());
    }
}
