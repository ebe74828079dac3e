//! Cloudflare Workers KV: write screenshot keys and list the namespace.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::acquisition::http_client::HttpClient;
use crate::config::KvConfig;

/// Metadata stored alongside each screenshot key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KvMetadata {
    #[serde(rename = "CurrentDateTime")]
    pub current_date_time: String,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "ListType")]
    pub list_type: String,
    #[serde(rename = "TimeStamp")]
    pub time_stamp: i64,
    pub liked: bool,
}

impl KvMetadata {
    /// Metadata stamped with the current time.
    pub fn now(label: Option<&str>, list_type: Option<&str>, liked: bool) -> Self {
        Self::at(Utc::now(), label, list_type, liked)
    }

    pub fn at(when: DateTime<Utc>, label: Option<&str>, list_type: Option<&str>, liked: bool) -> Self {
        Self {
            current_date_time: when
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            label: label.unwrap_or("None").to_string(),
            list_type: list_type.unwrap_or("None").to_string(),
            time_stamp: when.timestamp_millis(),
            liked,
        }
    }
}

/// One key of a namespace listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KvKey {
    pub name: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl<T> Envelope<T> {
    fn error_text(&self) -> String {
        if self.errors.is_empty() {
            return "unknown error".to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub struct KvClient {
    http: HttpClient,
    config: KvConfig,
}

impl KvClient {
    pub fn new(http: HttpClient, config: KvConfig) -> Self {
        Self { http, config }
    }

    fn namespace_url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_base)
            .with_context(|| format!("invalid Cloudflare API base {}", self.config.api_base))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("Cloudflare API base cannot be a base URL"))?
            .pop_if_empty()
            .extend([
                "accounts",
                self.config.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                self.config.namespace_id.as_str(),
            ])
            .extend(tail);
        Ok(url)
    }

    /// Write `value` under `key`, with optional metadata.
    pub async fn put(&self, key: &str, value: &str, metadata: Option<&KvMetadata>) -> Result<()> {
        let url = self.namespace_url(&["values", key])?;
        let mut form = Form::new().text("value", value.to_string());
        if let Some(meta) = metadata {
            form = form.text("metadata", serde_json::to_string(meta)?);
        }

        let resp = self
            .http
            .inner()
            .put(url)
            .bearer_auth(&self.config.api_token)
            .multipart(form)
            .send()
            .await
            .context("failed to reach Cloudflare KV")?;

        read_envelope::<serde_json::Value>(resp, "write to").await?;
        tracing::info!(key, "wrote KV entry");
        Ok(())
    }

    /// List the keys in the namespace.
    pub async fn list_keys(&self) -> Result<Vec<KvKey>> {
        let url = self.namespace_url(&["keys"])?;
        let resp = self
            .http
            .inner()
            .get(url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .context("failed to reach Cloudflare KV")?;

        let keys = read_envelope::<Vec<KvKey>>(resp, "list keys in").await?;
        Ok(keys.unwrap_or_default())
    }
}

/// Decode a Cloudflare response. A failing status is reported with the
/// envelope's errors when the body has them, and with the raw body otherwise.
async fn read_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
    action: &str,
) -> Result<Option<T>> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .context("failed to read Cloudflare KV response")?;
    let envelope = serde_json::from_str::<Envelope<T>>(&body);

    if !status.is_success() {
        let detail = match &envelope {
            Ok(envelope) => envelope.error_text(),
            Err(_) => body.trim().chars().take(200).collect(),
        };
        bail!("failed to {action} Cloudflare KV: HTTP {status}: {detail}");
    }
    let envelope = envelope.context("invalid response from Cloudflare KV")?;
    if !envelope.success {
        bail!("failed to {action} Cloudflare KV: {}", envelope.error_text());
    }
    Ok(envelope.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client(base: &str) -> KvClient {
        KvClient::new(
            HttpClient::new(1000),
            KvConfig {
                api_base: base.into(),
                api_token: "t".into(),
                account_id: "acct".into(),
                namespace_id: "ns".into(),
            },
        )
    }

    #[test]
    fn test_namespace_url_encodes_key() {
        let url = client("https://api.cloudflare.com/client/v4")
            .namespace_url(&["values", "a b/c.png"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acct/storage/kv/namespaces/ns/values/a%20b%2Fc.png"
        );
    }

    #[test]
    fn test_namespace_url_on_bare_host() {
        let url = client("http://127.0.0.1:8787").namespace_url(&["keys"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8787/accounts/acct/storage/kv/namespaces/ns/keys"
        );
    }

    #[test]
    fn test_metadata_wire_format() {
        let when = Utc.with_ymd_and_hms(2025, 2, 13, 8, 30, 0).unwrap();
        let meta = KvMetadata::at(when, None, None, true);
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["Label"], "None");
        assert_eq!(value["ListType"], "None");
        assert_eq!(value["TimeStamp"], when.timestamp_millis());
        assert_eq!(value["liked"], true);
        assert_eq!(value["CurrentDateTime"].as_str().unwrap().len(), 19);
    }
}
