//! URL normalisation and screenshot naming.

use crate::types::PipelineResult;
use url::Url;

/// Prefix `https://` when the URL carries no http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Filesystem-safe site name: the host with every non-alphanumeric
/// character replaced by `-`.
pub fn site_name(raw: &str) -> PipelineResult<String> {
    let url = Url::parse(&normalize_url(raw))?;
    let host = url.host_str().unwrap_or_default();
    Ok(host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("dunlin.ai"), "https://dunlin.ai");
        assert_eq!(normalize_url("http://a.b/"), "http://a.b/");
        assert_eq!(normalize_url(" https://a.b "), "https://a.b");
    }

    #[test]
    fn test_site_name() {
        assert_eq!(site_name("https://www.yeschat.ai/chat?q=1").unwrap(), "www-yeschat-ai");
        assert_eq!(site_name("Dunlin.AI").unwrap(), "dunlin-ai");
        assert_eq!(site_name("http://localhost:8080/").unwrap(), "localhost");
    }

    #[test]
    fn test_site_name_rejects_garbage() {
        assert!(site_name("https://").is_err());
    }
}
