//! `paperflow crawl [LABEL...]`: crawl exam papers into the article store.

use anyhow::Result;
use paperflow::labels::{default_crawl_labels, region};
use paperflow::{ArticleStore, MemoryArticleStore};
use std::time::{Duration, Instant};

use super::output::{is_json, print_json, say};
use super::{audit_event, audit_outcomes, open_audit};
use crate::acquisition::http_client::HttpClient;
use crate::acquisition::paper_list::PaperListClient;
use crate::config::Config;
use crate::pipeline::crawl::{crawl_label, CrawlOptions, CrawlReport};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use crate::store::SupabaseStore;

/// Timing overrides from the command line, in seconds.
pub struct CrawlArgs {
    pub labels: Vec<String>,
    pub dry_run: bool,
    pub ready_timeout: u64,
    pub capture_delay: u64,
    pub paper_delay: u64,
}

/// Run the crawl command.
pub async fn run(args: CrawlArgs) -> Result<()> {
    let config = Config::load();
    let site = config.exam_site();
    let http = HttpClient::new(30_000);

    let store: Box<dyn ArticleStore> = if args.dry_run {
        say("Dry run: articles are kept in memory and discarded on exit.");
        Box::new(MemoryArticleStore::new())
    } else {
        Box::new(SupabaseStore::new(http.clone(), &config.supabase()?))
    };

    let opts = CrawlOptions {
        spa_base: site.spa_base.clone(),
        cookie: site.cookie.clone(),
        cookie_domain: site.cookie_domain.clone(),
        ready_timeout: Duration::from_secs(args.ready_timeout),
        capture_delay: Duration::from_secs(args.capture_delay),
        paper_delay: Duration::from_secs(args.paper_delay),
        ..Default::default()
    };
    let list = PaperListClient::new(http, site);

    let labels: Vec<String> = if args.labels.is_empty() {
        default_crawl_labels().into_iter().map(String::from).collect()
    } else {
        args.labels
    };

    let renderer = ChromiumRenderer::launch(config.chromium_path.as_ref()).await?;
    let mut audit = open_audit();
    let mut reports: Vec<CrawlReport> = Vec::new();

    for label in &labels {
        say(format!(
            "Crawling label {label} ({})...",
            region(label).unwrap_or("unknown")
        ));
        let start = Instant::now();
        match crawl_label(label, &list, &renderer, store.as_ref(), &opts).await {
            Ok(report) => {
                say(format!(
                    "  {} papers, {} documents: {} inserted, {} skipped, {} failed",
                    report.papers_listed,
                    report.documents,
                    report.inserted,
                    report.skipped,
                    report.failed
                ));
                audit_outcomes(&mut audit, "crawl.paper", &report.outcomes);
                reports.push(report);
            }
            Err(e) => {
                tracing::error!(label = %label, "crawl failed: {e:#}");
                say(format!("  failed: {e:#}"));
                audit_event(
                    &mut audit,
                    "crawl.label",
                    Some(label.as_str()),
                    start.elapsed().as_millis() as u64,
                    "failed",
                );
            }
        }
    }

    say("Closing browser...");
    if let Err(e) = renderer.shutdown().await {
        tracing::warn!("{e:#}");
    }

    if is_json() {
        print_json(&reports);
    }
    Ok(())
}
