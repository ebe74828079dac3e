//! The three pipelines: paper crawl, answer generation, and site screenshots.
//!
//! Each pipeline handles items one at a time (site screenshots run
//! concurrently), logs and records per-item failures, and keeps going.

pub mod answer;
pub mod crawl;
pub mod siteshot;

use serde::Serialize;

/// What happened to one item of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    pub target: String,
    pub status: ItemStatus,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Inserted,
    Updated,
    Skipped,
    Captured,
    Published,
    Failed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Inserted => "inserted",
            ItemStatus::Updated => "updated",
            ItemStatus::Skipped => "skipped",
            ItemStatus::Captured => "captured",
            ItemStatus::Published => "published",
            ItemStatus::Failed => "failed",
        }
    }
}

impl ItemOutcome {
    pub fn new(target: impl Into<String>, status: ItemStatus, duration_ms: u64) -> Self {
        Self {
            target: target.into(),
            status,
            duration_ms,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
