//! Paper crawl: list a label's papers, render each one, pull the paper
//! document out of the page's console output, and insert it as an article.

use anyhow::Result;
use paperflow::{convert_value, ArticleStore, InsertOutcome, NewArticle, PaperSummary};
use serde::Serialize;
use std::time::{Duration, Instant};

use super::{ItemOutcome, ItemStatus};
use crate::acquisition::console::{documents_from_logs, hook_script, CaptureMode, READ_LOGS_SCRIPT};
use crate::acquisition::paper_list::PaperListClient;
use crate::renderer::{parse_cookie_header, RenderContext, Renderer};

/// Timing and site parameters for a crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub spa_base: String,
    pub cookie: String,
    pub cookie_domain: String,
    pub navigation_timeout: Duration,
    /// Upper bound on waiting for `document.readyState == "complete"`.
    pub ready_timeout: Duration,
    /// Time the page gets to log its payload after the hook is installed.
    pub capture_delay: Duration,
    /// Pause between consecutive papers.
    pub paper_delay: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            spa_base: crate::config::DEFAULT_EXAM_SPA_BASE.to_string(),
            cookie: String::new(),
            cookie_domain: crate::config::DEFAULT_COOKIE_DOMAIN.to_string(),
            navigation_timeout: Duration::from_secs(30),
            ready_timeout: Duration::from_secs(8),
            capture_delay: Duration::from_secs(5),
            paper_delay: Duration::from_secs(15),
        }
    }
}

/// Summary of crawling one label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    pub label: String,
    pub papers_listed: usize,
    pub documents: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<ItemOutcome>,
}

/// Reader-facing URL of a paper.
pub fn paper_url(spa_base: &str, paper: &PaperSummary) -> String {
    format!(
        "{spa_base}/shenlun/zhenti/shenlun/{}?checkId={}",
        paper.id, paper.encode_check_info
    )
}

/// Fetch the first page of a label's papers and crawl them.
pub async fn crawl_label(
    label_id: &str,
    list: &PaperListClient,
    renderer: &dyn Renderer,
    store: &dyn ArticleStore,
    opts: &CrawlOptions,
) -> Result<CrawlReport> {
    let papers = list.fetch_page(label_id, 0).await?;
    tracing::info!(label = label_id, papers = papers.len(), "fetched paper list");
    crawl_papers(label_id, &papers, renderer, store, opts).await
}

/// Crawl the given papers in one shared browser context.
pub async fn crawl_papers(
    label_id: &str,
    papers: &[PaperSummary],
    renderer: &dyn Renderer,
    store: &dyn ArticleStore,
    opts: &CrawlOptions,
) -> Result<CrawlReport> {
    let mut report = CrawlReport {
        label: label_id.to_string(),
        papers_listed: papers.len(),
        ..Default::default()
    };
    if papers.is_empty() {
        return Ok(report);
    }

    let mut ctx = renderer.new_context().await?;
    let result = crawl_in_context(label_id, papers, ctx.as_mut(), store, opts, &mut report).await;
    if let Err(e) = ctx.close().await {
        tracing::warn!("failed to close browser context: {e:#}");
    }
    result.map(|()| report)
}

async fn crawl_in_context(
    label_id: &str,
    papers: &[PaperSummary],
    ctx: &mut dyn RenderContext,
    store: &dyn ArticleStore,
    opts: &CrawlOptions,
    report: &mut CrawlReport,
) -> Result<()> {
    if !opts.cookie.is_empty() {
        // Cookies can only be set once the origin has been visited.
        ctx.navigate(&opts.spa_base, duration_ms(opts.navigation_timeout))
            .await?;
        ctx.set_cookies(&parse_cookie_header(&opts.cookie, &opts.cookie_domain))
            .await?;
    }

    for (index, paper) in papers.iter().enumerate() {
        tracing::info!(
            label = label_id,
            "processing paper {}/{}: {}",
            index + 1,
            papers.len(),
            paper.name
        );
        let start = Instant::now();
        let target = format!("{label_id}/{}", paper.id);

        match crawl_paper(label_id, paper, ctx, store, opts).await {
            Ok(paper_report) => {
                report.documents += paper_report.documents;
                report.inserted += paper_report.inserted;
                report.skipped += paper_report.skipped;
                report.failed += paper_report.rejected;
                let status = if paper_report.inserted > 0 {
                    ItemStatus::Inserted
                } else {
                    ItemStatus::Skipped
                };
                report
                    .outcomes
                    .push(ItemOutcome::new(target, status, elapsed_ms(start)));
            }
            Err(e) => {
                tracing::error!(label = label_id, "failed to process paper {}: {e:#}", paper.name);
                report.failed += 1;
                report.outcomes.push(
                    ItemOutcome::new(target, ItemStatus::Failed, elapsed_ms(start))
                        .with_detail(format!("{e:#}")),
                );
            }
        }

        if index + 1 < papers.len() && !opts.paper_delay.is_zero() {
            tracing::info!("waiting {}s before the next paper", opts.paper_delay.as_secs());
            tokio::time::sleep(opts.paper_delay).await;
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
struct PaperReport {
    documents: usize,
    inserted: usize,
    skipped: usize,
    /// Captured documents that did not convert.
    rejected: usize,
}

async fn crawl_paper(
    label_id: &str,
    paper: &PaperSummary,
    ctx: &mut dyn RenderContext,
    store: &dyn ArticleStore,
    opts: &CrawlOptions,
) -> Result<PaperReport> {
    let url = paper_url(&opts.spa_base, paper);
    let nav = ctx.navigate(&url, duration_ms(opts.navigation_timeout)).await?;
    tracing::debug!(final_url = %nav.final_url, load_time_ms = nav.load_time_ms, "paper page loaded");
    ctx.wait_until_ready(opts.ready_timeout).await?;
    ctx.execute_js(hook_script(CaptureMode::ArrayPayloads)).await?;

    tokio::time::sleep(opts.capture_delay).await;

    let logs = ctx.execute_js(READ_LOGS_SCRIPT).await?;
    let documents = documents_from_logs(&logs);
    let mut paper_report = PaperReport {
        documents: documents.len(),
        ..Default::default()
    };
    if documents.is_empty() {
        tracing::info!(url = %url, "no console output captured");
        return Ok(paper_report);
    }

    for doc in documents {
        let converted = match convert_value(doc) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(url = %url, "failed to convert paper document: {e}");
                paper_report.rejected += 1;
                continue;
            }
        };
        tracing::debug!(title = %converted.name, materials = converted.materials.len(), "converted paper");

        let article = NewArticle::from_paper(label_id, paper, converted);
        match store.insert_article(article).await? {
            InsertOutcome::Inserted(row) => {
                tracing::info!(id = row.id, "saved article");
                paper_report.inserted += 1;
            }
            InsertOutcome::Skipped => paper_report.skipped += 1,
        }
    }
    Ok(paper_report)
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis() as u64
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_url() {
        let paper = PaperSummary {
            topic: "t".into(),
            name: "n".into(),
            id: 77,
            encode_check_info: "ck%3D".into(),
        };
        assert_eq!(
            paper_url("https://spa.fenbi.com", &paper),
            "https://spa.fenbi.com/shenlun/zhenti/shenlun/77?checkId=ck%3D"
        );
    }

    #[test]
    fn test_default_timings() {
        let opts = CrawlOptions::default();
        assert_eq!(opts.ready_timeout, Duration::from_secs(8));
        assert_eq!(opts.capture_delay, Duration::from_secs(5));
        assert_eq!(opts.paper_delay, Duration::from_secs(15));
    }
}
