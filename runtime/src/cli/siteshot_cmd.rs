//! `paperflow siteshot URL...`: screenshot sites and publish them.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use super::output::{is_json, print_json, say};
use super::{audit_event, open_audit};
use crate::acquisition::http_client::HttpClient;
use crate::config::Config;
use crate::pipeline::ItemStatus;
use crate::pipeline::siteshot::{capture_sites, publish_shot, Published, ShotOptions, SiteShot};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use crate::upload::{KvClient, KvKey, KvMetadata, TelegramUploader};

pub struct SiteshotArgs {
    pub urls: Vec<String>,
    pub output_dir: PathBuf,
    pub no_upload: bool,
    pub no_kv: bool,
    pub label: Option<String>,
    pub list_type: Option<String>,
}

#[derive(Serialize)]
struct SiteshotSummary {
    captured: Vec<SiteShot>,
    failed: Vec<String>,
    published: Vec<Published>,
    keys: Vec<KvKey>,
}

/// Run the siteshot command.
pub async fn run(args: SiteshotArgs) -> Result<()> {
    let config = Config::load();

    // Resolve credentials before spending time in the browser.
    let http = HttpClient::new(60_000);
    let uploader = if args.no_upload {
        None
    } else {
        Some(TelegramUploader::new(http.clone(), config.telegram()?))
    };
    let kv = if args.no_upload || args.no_kv {
        None
    } else {
        Some(KvClient::new(http, config.kv()?))
    };

    let renderer = ChromiumRenderer::launch(config.chromium_path.as_ref()).await?;
    let captures =
        capture_sites(&args.urls, &renderer, &args.output_dir, &ShotOptions::default()).await;
    if let Err(e) = renderer.shutdown().await {
        tracing::warn!("{e:#}");
    }

    let mut audit = open_audit();
    let mut summary = SiteshotSummary {
        captured: Vec::new(),
        failed: Vec::new(),
        published: Vec::new(),
        keys: Vec::new(),
    };
    for capture in captures {
        let url = capture.url;
        match capture.shot {
            Some(shot) => {
                say(format!("Captured {} -> {}", shot.url, shot.screenshot.display()));
                audit_event(
                    &mut audit,
                    "siteshot.capture",
                    Some(url.as_str()),
                    capture.duration_ms,
                    ItemStatus::Captured.as_str(),
                );
                summary.captured.push(shot);
            }
            None => {
                say(format!("Skipping {url}: capture failed"));
                audit_event(
                    &mut audit,
                    "siteshot.capture",
                    Some(url.as_str()),
                    capture.duration_ms,
                    ItemStatus::Failed.as_str(),
                );
                summary.failed.push(url);
            }
        }
    }

    if let Some(uploader) = &uploader {
        let metadata = KvMetadata::now(args.label.as_deref(), args.list_type.as_deref(), true);
        for shot in &summary.captured {
            let start = Instant::now();
            let result = publish_shot(shot, uploader, kv.as_ref(), &metadata).await;
            let elapsed = start.elapsed().as_millis() as u64;
            match result {
                Ok(published) => {
                    say(format!("Uploaded {}: {}", published.name, published.src));
                    audit_event(
                        &mut audit,
                        "siteshot.publish",
                        Some(published.src.as_str()),
                        elapsed,
                        ItemStatus::Published.as_str(),
                    );
                    summary.published.push(published);
                }
                Err(e) => {
                    tracing::error!(site = %shot.name, "publish failed: {e:#}");
                    say(format!("Upload failed for {}: {e:#}", shot.name));
                    audit_event(
                        &mut audit,
                        "siteshot.publish",
                        Some(shot.name.as_str()),
                        elapsed,
                        ItemStatus::Failed.as_str(),
                    );
                }
            }
        }
    }

    if let Some(kv) = &kv {
        match kv.list_keys().await {
            Ok(keys) => {
                say("Keys in KV store:");
                for key in &keys {
                    say(format!("  Name: {}, Metadata: {}", key.name, metadata_text(key)));
                }
                summary.keys = keys;
            }
            Err(e) => tracing::warn!("failed to list KV keys: {e:#}"),
        }
    }

    if is_json() {
        print_json(&summary);
    }
    Ok(())
}

pub(crate) fn metadata_text(key: &KvKey) -> String {
    key.metadata
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "No metadata".to_string())
}
