//! Image hosting through the Telegram Bot API (`sendPhoto`).

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::acquisition::http_client::HttpClient;
use crate::config::TelegramConfig;

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("no file at {0}")]
    FileMissing(PathBuf),

    #[error("TG_CHAT_ID is empty")]
    ChatIdMissing,

    #[error("upload to Telegram failed: {0}")]
    Api(String),

    #[error("Telegram response carried no photo file id")]
    NoFileId,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A photo stored on Telegram's servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_id: String,
    /// File id plus the local file's extension; used as the KV key.
    pub src: String,
}

pub struct TelegramUploader {
    http: HttpClient,
    config: TelegramConfig,
}

impl TelegramUploader {
    pub fn new(http: HttpClient, config: TelegramConfig) -> Self {
        Self { http, config }
    }

    /// Send a photo to the configured chat and return its file id.
    pub async fn upload_photo(&self, path: &Path) -> Result<UploadedImage, UploadError> {
        if !path.exists() {
            return Err(UploadError::FileMissing(path.to_path_buf()));
        }
        let chat_id = self
            .config
            .chat_id
            .clone()
            .ok_or(UploadError::ChatIdMissing)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(&extension))?;
        let form = Form::new().text("chat_id", chat_id).part("photo", part);

        let url = format!(
            "{}/bot{}/sendPhoto",
            self.config.api_base, self.config.bot_token
        );
        let resp = self.http.inner().post(&url).multipart(form).send().await?;
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);

        if status.as_u16() != 200 {
            let description = body
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("Upload to Telegram failed");
            return Err(UploadError::Api(description.to_string()));
        }

        let file_id = largest_photo_id(&body).ok_or(UploadError::NoFileId)?;
        tracing::info!(path = %path.display(), %file_id, "uploaded photo");
        Ok(UploadedImage {
            src: format!("{file_id}{extension}"),
            file_id,
        })
    }
}

/// `file_id` of the largest photo size in a `sendPhoto` response.
pub fn largest_photo_id(response: &Value) -> Option<String> {
    if response.get("ok").and_then(|v| v.as_bool()) != Some(true) {
        return None;
    }
    response
        .get("result")?
        .get("photo")?
        .as_array()?
        .iter()
        .max_by_key(|p| p.get("file_size").and_then(|s| s.as_u64()).unwrap_or(0))?
        .get("file_id")?
        .as_str()
        .map(String::from)
}

fn mime_for(extension: &str) -> &'static str {
    match extension {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".webp" => "image/webp",
        ".gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_largest_photo_id() {
        let resp = json!({
            "ok": true,
            "result": {"photo": [
                {"file_id": "small", "file_size": 1200},
                {"file_id": "large", "file_size": 98000},
                {"file_id": "medium", "file_size": 15000}
            ]}
        });
        assert_eq!(largest_photo_id(&resp).as_deref(), Some("large"));
    }

    #[test]
    fn test_largest_photo_id_requires_ok() {
        let resp = json!({"ok": false, "result": {"photo": [{"file_id": "x", "file_size": 1}]}});
        assert!(largest_photo_id(&resp).is_none());
        assert!(largest_photo_id(&json!({"ok": true, "result": {"document": {}}})).is_none());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(".png"), "image/png");
        assert_eq!(mime_for(".jpeg"), "image/jpeg");
        assert_eq!(mime_for(""), "application/octet-stream");
    }
}
