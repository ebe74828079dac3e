//! Site screenshots: render websites concurrently, save a viewport-sized
//! screenshot of each, then publish them to the image host and KV index.

use anyhow::{Context, Result};
use futures::future::join_all;
use paperflow::{normalize_url, site_name};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::acquisition::page_meta::{extract_meta, visible_text};
use crate::renderer::{Clip, RenderContext, Renderer};
use crate::upload::{KvClient, KvMetadata, TelegramUploader, UploadedImage};

/// User agents picked from at random per site.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 6.3; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:30.0) Gecko/20100101 Firefox/30.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_2) AppleWebKit/537.75.14 (KHTML, like Gecko) Version/7.0.3 Safari/537.75.14",
    "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.2; Win64; x64; Trident/6.0)",
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; it; rv:1.8.1.11) Gecko/20071127 Firefox/2.0.0.11",
    "Opera/9.25 (Windows NT 5.1; U; en)",
    "Mozilla/4.0 (compatible; MSIE 6.0; Windows NT 5.1; SV1; .NET CLR 1.1.4322; .NET CLR 2.0.50727)",
    "Mozilla/5.0 (compatible; Konqueror/3.5; Linux) KHTML/3.5.5 (like Gecko) (Kubuntu)",
    "Mozilla/5.0 (X11; U; Linux i686; en-US; rv:1.8.0.12) Gecko/20070731 Ubuntu/dapper-security Firefox/1.5.0.12",
    "Lynx/2.8.5rel.1 libwww-FM/2.14 SSL-MM/1.4.1 GNUTLS/1.2.9",
    "Mozilla/5.0 (X11; Linux i686) AppleWebKit/535.7 (KHTML, like Gecko) Ubuntu/11.04 Chromium/16.0.912.77 Chrome/16.0.912.77 Safari/535.7",
    "Mozilla/5.0 (X11; Ubuntu; Linux i686; rv:10.0) Gecko/20100101 Firefox/10.0",
];

const DIMENSIONS_SCRIPT: &str = "({ width: document.body.scrollWidth, height: document.body.scrollHeight })";

#[derive(Debug, Clone)]
pub struct ShotOptions {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub navigation_timeout: Duration,
}

impl Default for ShotOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1920,
            viewport_height: 1080,
            navigation_timeout: Duration::from_secs(60),
        }
    }
}

/// A captured site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteShot {
    pub name: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub screenshot: PathBuf,
}

/// Screenshot clip: the page's scroll size capped at the viewport.
pub fn clip_for(page: &serde_json::Value, opts: &ShotOptions) -> Clip {
    let dim = |key: &str, cap: u32| {
        page.get(key)
            .and_then(|v| v.as_f64())
            .filter(|v| *v > 0.0)
            .map_or(f64::from(cap), |v| v.min(f64::from(cap)))
    };
    Clip {
        width: dim("width", opts.viewport_width),
        height: dim("height", opts.viewport_height),
    }
}

/// One site of a capture run.
#[derive(Debug, Clone)]
pub struct Capture {
    /// The URL as given.
    pub url: String,
    /// `None` when the site failed.
    pub shot: Option<SiteShot>,
    /// Time this site took, from context creation to saved file.
    pub duration_ms: u64,
}

/// Capture every URL concurrently. The result is index-aligned with `urls`.
pub async fn capture_sites(
    urls: &[String],
    renderer: &dyn Renderer,
    output_dir: &Path,
    opts: &ShotOptions,
) -> Vec<Capture> {
    let tasks = urls
        .iter()
        .map(|url| capture_site_logged(url, renderer, output_dir, opts));
    join_all(tasks).await
}

async fn capture_site_logged(
    url: &str,
    renderer: &dyn Renderer,
    output_dir: &Path,
    opts: &ShotOptions,
) -> Capture {
    let start = Instant::now();
    tracing::info!(url, "capturing site");
    let result = capture_site(url, renderer, output_dir, opts).await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let shot = match result {
        Ok(shot) => {
            tracing::info!(url, duration_ms, "captured {}", shot.screenshot.display());
            Some(shot)
        }
        Err(e) => {
            tracing::error!(url, duration_ms, "failed to capture site: {e:#}");
            None
        }
    };
    Capture {
        url: url.to_string(),
        shot,
        duration_ms,
    }
}

/// Capture one site in its own browser context.
pub async fn capture_site(
    raw_url: &str,
    renderer: &dyn Renderer,
    output_dir: &Path,
    opts: &ShotOptions,
) -> Result<SiteShot> {
    let url = normalize_url(raw_url);
    let name = site_name(&url)?;

    let mut ctx = renderer.new_context().await?;
    let result = shoot(&url, &name, ctx.as_mut(), output_dir, opts).await;
    if let Err(e) = ctx.close().await {
        tracing::warn!("failed to close browser context: {e:#}");
    }
    result
}

async fn shoot(
    url: &str,
    name: &str,
    ctx: &mut dyn RenderContext,
    output_dir: &Path,
    opts: &ShotOptions,
) -> Result<SiteShot> {
    let user_agent = {
        let mut rng = rand::thread_rng();
        USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
    };
    ctx.set_user_agent(user_agent).await?;
    ctx.set_viewport(opts.viewport_width, opts.viewport_height)
        .await?;
    let nav = ctx
        .navigate(url, opts.navigation_timeout.as_millis() as u64)
        .await?;
    tracing::debug!(url, final_url = %nav.final_url, load_time_ms = nav.load_time_ms, "site loaded");

    let html = ctx.get_html().await?;
    let meta = extract_meta(&html);
    tracing::info!(url, title = %meta.title, description = %meta.description, "page metadata");
    tracing::debug!(url, text = %visible_text(&html), "page text");

    let dims = ctx.execute_js(DIMENSIONS_SCRIPT).await?;
    let png = ctx.screenshot_png(clip_for(&dims, opts)).await?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let screenshot = output_dir.join(format!("{name}.png"));
    tokio::fs::write(&screenshot, &png)
        .await
        .with_context(|| format!("failed to write {}", screenshot.display()))?;

    Ok(SiteShot {
        name: name.to_string(),
        url: url.to_string(),
        title: meta.title,
        description: meta.description,
        screenshot,
    })
}

/// Where a published screenshot ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Published {
    pub name: String,
    pub src: String,
    pub kv_written: bool,
}

/// Upload a screenshot and, when a KV client is given, index it under the
/// returned key with the site name as value.
pub async fn publish_shot(
    shot: &SiteShot,
    uploader: &TelegramUploader,
    kv: Option<&KvClient>,
    metadata: &KvMetadata,
) -> Result<Published> {
    let UploadedImage { src, .. } = uploader.upload_photo(&shot.screenshot).await?;
    let kv_written = match kv {
        Some(kv) => {
            kv.put(&src, &shot.name, Some(metadata)).await?;
            true
        }
        None => false,
    };
    Ok(Published {
        name: shot.name.clone(),
        src,
        kv_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clip_caps_at_viewport() {
        let opts = ShotOptions::default();
        let clip = clip_for(&json!({"width": 2560, "height": 7200}), &opts);
        assert_eq!(clip, Clip { width: 1920.0, height: 1080.0 });

        let small = clip_for(&json!({"width": 800, "height": 600.5}), &opts);
        assert_eq!(small, Clip { width: 800.0, height: 600.5 });
    }

    #[test]
    fn test_clip_defaults_when_unmeasured() {
        let opts = ShotOptions::default();
        let clip = clip_for(&json!({"width": 0}), &opts);
        assert_eq!(clip, Clip { width: 1920.0, height: 1080.0 });
    }
}
