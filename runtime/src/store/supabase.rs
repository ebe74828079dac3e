//! `articles` table on Supabase, spoken to through its PostgREST endpoint.

use async_trait::async_trait;
use paperflow::{AnswerUpdate, ArticleStore, NewArticle, PipelineError, PipelineResult, StoredArticle};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::acquisition::http_client::HttpClient;
use crate::config::SupabaseConfig;

const TABLE: &str = "articles";

/// Article store backed by a Supabase project.
pub struct SupabaseStore {
    http: HttpClient,
    table_url: String,
    key: String,
}

impl SupabaseStore {
    pub fn new(http: HttpClient, config: &SupabaseConfig) -> Self {
        Self {
            http,
            table_url: format!("{}/rest/v1/{TABLE}", config.url),
            key: config.key.clone(),
        }
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .inner()
            .request(method, &self.table_url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> PipelineResult<T> {
        let resp = builder.send().await.map_err(store_err)?;
        let status = resp.status();
        let body = resp.text().await.map_err(store_err)?;
        if !status.is_success() {
            return Err(PipelineError::Store(format!(
                "{TABLE} request failed with {status}: {}",
                postgrest_message(&body)
            )));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn store_err(e: reqwest::Error) -> PipelineError {
    PipelineError::Store(e.to_string())
}

/// The `message` of a PostgREST error body, or the body itself.
fn postgrest_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ArticleStore for SupabaseStore {
    async fn article_exists(&self, name: &str) -> PipelineResult<bool> {
        let rows: Vec<serde_json::Value> = self
            .send(
                self.request(Method::GET)
                    .query(&[("select", "id".to_string()), ("name", format!("eq.{name}"))]),
            )
            .await
            .map_err(|e| {
                tracing::error!(title = name, "failed to check whether article exists: {e}");
                e
            })?;
        Ok(!rows.is_empty())
    }

    async fn insert_raw(&self, article: &NewArticle) -> PipelineResult<StoredArticle> {
        let rows: Vec<StoredArticle> = self
            .send(
                self.request(Method::POST)
                    .header("Prefer", "return=representation")
                    .json(article),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| PipelineError::Store("insert returned no rows".into()))
    }

    async fn pending_answers(&self, label_id: &str) -> PipelineResult<Vec<StoredArticle>> {
        self.send(self.request(Method::GET).query(&[
            ("select", "*".to_string()),
            ("labelId", format!("eq.{label_id}")),
            ("or", "(answer.is.null,answer.eq.)".to_string()),
            ("order", "id.asc".to_string()),
        ]))
        .await
    }

    async fn update_answer(&self, page_num: i64, update: &AnswerUpdate) -> PipelineResult<usize> {
        let rows: Vec<serde_json::Value> = self
            .send(
                self.request(Method::PATCH)
                    .query(&[("page_num", format!("eq.{page_num}"))])
                    .header("Prefer", "return=representation")
                    .json(update),
            )
            .await?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgrest_message() {
        assert_eq!(
            postgrest_message(r#"{"code":"42501","message":"permission denied"}"#),
            "permission denied"
        );
        assert_eq!(postgrest_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_table_url() {
        let store = SupabaseStore::new(
            HttpClient::new(1000),
            &SupabaseConfig {
                url: "https://abc.supabase.co".into(),
                key: "k".into(),
            },
        );
        assert_eq!(store.table_url, "https://abc.supabase.co/rest/v1/articles");
    }
}
