//! Article persistence: the store trait and an in-memory implementation.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::types::{
    AnswerUpdate, InsertOutcome, NewArticle, PipelineError, PipelineResult, StoredArticle,
};

/// A table of article records.
///
/// Titles are unique for insert purposes; updates address rows by page number.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Whether an article with this title exists.
    async fn article_exists(&self, name: &str) -> PipelineResult<bool>;

    /// Insert a row unconditionally and return it as stored.
    async fn insert_raw(&self, article: &NewArticle) -> PipelineResult<StoredArticle>;

    /// Articles of a label whose answer is still empty, in id order.
    async fn pending_answers(&self, label_id: &str) -> PipelineResult<Vec<StoredArticle>>;

    /// Write reasoning and answer text to every row with this page number.
    /// Returns the number of rows updated.
    async fn update_answer(&self, page_num: i64, update: &AnswerUpdate) -> PipelineResult<usize>;

    /// Insert the article unless one with the same title already exists.
    async fn insert_article(&self, mut article: NewArticle) -> PipelineResult<InsertOutcome> {
        if article.name.trim().is_empty() {
            return Err(PipelineError::InvalidInput("article has no title".into()));
        }

        if self.article_exists(&article.name).await? {
            tracing::info!(title = %article.name, "article already exists, skipping insert");
            return Ok(InsertOutcome::Skipped);
        }

        article.created_at = Some(Utc::now().to_rfc3339());
        let stored = self.insert_raw(&article).await?;
        tracing::info!(id = stored.id, title = %stored.name, "inserted article");
        Ok(InsertOutcome::Inserted(stored))
    }
}

/// In-memory article table used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    rows: Mutex<Vec<StoredArticle>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows.
    pub async fn rows(&self) -> Vec<StoredArticle> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn article_exists(&self, name: &str) -> PipelineResult<bool> {
        Ok(self.rows.lock().await.iter().any(|r| r.name == name))
    }

    async fn insert_raw(&self, article: &NewArticle) -> PipelineResult<StoredArticle> {
        let mut rows = self.rows.lock().await;
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let stored = StoredArticle {
            id,
            label_id: article.label_id.clone(),
            topic: article.topic.clone(),
            page_num: article.page_num,
            name: article.name.clone(),
            materials: article.materials.clone(),
            questions: article.questions.clone(),
            solutions: article.solutions.clone(),
            last_question: article.last_question.clone(),
            think: None,
            answer: None,
            thinks: None,
            answers: None,
            created_at: article.created_at.clone(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn pending_answers(&self, label_id: &str) -> PipelineResult<Vec<StoredArticle>> {
        let rows = self.rows.lock().await;
        let mut pending: Vec<StoredArticle> = rows
            .iter()
            .filter(|r| r.label_id == label_id && r.awaits_answer())
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.id);
        Ok(pending)
    }

    async fn update_answer(&self, page_num: i64, update: &AnswerUpdate) -> PipelineResult<usize> {
        let mut rows = self.rows.lock().await;
        let mut updated = 0;
        for row in rows.iter_mut().filter(|r| r.page_num == page_num) {
            row.think = Some(update.think.clone());
            row.answer = Some(update.answer.clone());
            if update.thinks.is_some() {
                row.thinks = update.thinks.clone();
            }
            if update.answers.is_some() {
                row.answers = update.answers.clone();
            }
            updated += 1;
        }
        Ok(updated)
    }
}
