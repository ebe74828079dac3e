//! Paper list API of the exam site.

use anyhow::{Context, Result};
use paperflow::PaperSummary;

use super::http_client::HttpClient;
use crate::config::ExamSiteConfig;
use crate::renderer::chromium::DESKTOP_USER_AGENT;

/// Client for `GET /api/shenlun/papers`.
pub struct PaperListClient {
    http: HttpClient,
    site: ExamSiteConfig,
}

impl PaperListClient {
    pub fn new(http: HttpClient, site: ExamSiteConfig) -> Self {
        Self { http, site }
    }

    /// URL of one page of a label's paper list.
    pub fn list_url(&self, label_id: &str, page: u32) -> String {
        format!(
            "{}/api/shenlun/papers?labelId={label_id}&toPage={page}&kav=100&av=100&hav=100&app=web",
            self.site.api_base
        )
    }

    /// Fetch one page of papers for a label.
    pub async fn fetch_page(&self, label_id: &str, page: u32) -> Result<Vec<PaperSummary>> {
        let url = self.list_url(label_id, page);
        let referer = format!("{}/", self.site.spa_base);
        let mut headers = vec![
            ("User-Agent", DESKTOP_USER_AGENT),
            ("Accept", "application/json"),
            ("Referer", referer.as_str()),
            ("Origin", self.site.spa_base.as_str()),
        ];
        if !self.site.cookie.is_empty() {
            headers.push(("Cookie", self.site.cookie.as_str()));
        }

        let resp = self.http.get(&url, &headers).await?;
        let body = resp.json()?;
        parse_paper_list(&body).with_context(|| format!("unexpected paper list from {url}"))
    }
}

/// Extract the `list` entries of a paper list response.
pub fn parse_paper_list(body: &serde_json::Value) -> Result<Vec<PaperSummary>> {
    let list = body
        .get("list")
        .cloned()
        .context("response has no `list` field")?;
    Ok(serde_json::from_value(list)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_paper_list() {
        let body = json!({
            "list": [
                {"topic": "t1", "name": "n1", "id": 1, "encodeCheckInfo": "c1", "date": 0},
                {"topic": "t2", "name": "n2", "id": 2, "encodeCheckInfo": "c2"}
            ],
            "pageInfo": {"totalPage": 4}
        });
        let papers = parse_paper_list(&body).unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[1].encode_check_info, "c2");
    }

    #[test]
    fn test_parse_paper_list_missing_list() {
        assert!(parse_paper_list(&json!({"code": 401})).is_err());
    }

    #[test]
    fn test_list_url() {
        let client = PaperListClient::new(
            HttpClient::new(1000),
            ExamSiteConfig {
                api_base: "https://tiku.example".into(),
                spa_base: "https://spa.example".into(),
                cookie: String::new(),
                cookie_domain: ".example".into(),
            },
        );
        assert_eq!(
            client.list_url("105", 0),
            "https://tiku.example/api/shenlun/papers?labelId=105&toPage=0&kav=100&av=100&hav=100&app=web"
        );
    }
}
