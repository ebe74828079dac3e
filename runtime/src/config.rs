// Copyright 2026 Paperflow Contributors
// SPDX-License-Identifier: Apache-2.0

//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file in the working directory. Empty values count as unset.
//! Each pipeline asks for the section it needs, so a missing credential
//! only fails the command that actually uses it.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const DEFAULT_COMPLETION_URL: &str = "https://api.lkeap.cloud.tencent.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-r1";
pub const DEFAULT_EXAM_API_BASE: &str = "https://tiku.fenbi.com";
pub const DEFAULT_EXAM_SPA_BASE: &str = "https://spa.fenbi.com";
pub const DEFAULT_COOKIE_DOMAIN: &str = ".fenbi.com";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Raw configuration as read from the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub completion_key: Option<String>,
    pub completion_url: Option<String>,
    pub completion_model: Option<String>,
    pub exam_cookie: Option<String>,
    pub exam_api_base: Option<String>,
    pub exam_spa_base: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: Option<String>,
    pub cloudflare_token: Option<String>,
    pub cloudflare_account_id: Option<String>,
    pub cloudflare_namespace_id: Option<String>,
    pub cloudflare_api_base: Option<String>,
    pub chromium_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct ExamSiteConfig {
    pub api_base: String,
    pub spa_base: String,
    pub cookie: String,
    pub cookie_domain: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KvConfig {
    pub api_base: String,
    pub api_token: String,
    pub account_id: String,
    pub namespace_id: String,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn load() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            supabase_url: get("SUPABASE_URL"),
            supabase_key: get("SUPABASE_KEY"),
            completion_key: get("DEEP_API_KEY"),
            completion_url: get("DEEP_API_URL"),
            completion_model: get("DEEP_MODEL"),
            exam_cookie: get("FENBI_COOKIE"),
            exam_api_base: get("FENBI_API_BASE"),
            exam_spa_base: get("FENBI_SPA_BASE"),
            telegram_token: get("TG_BOT_TOKEN"),
            telegram_chat_id: get("TG_CHAT_ID"),
            telegram_api_base: get("TG_API_BASE"),
            cloudflare_token: get("CLOUDFLARE_API_TOKEN"),
            cloudflare_account_id: get("CLOUDFLARE_ACCOUNT_ID"),
            cloudflare_namespace_id: get("CLOUDFLARE_NAMESPACE_ID"),
            cloudflare_api_base: get("CLOUDFLARE_API_BASE"),
            chromium_path: get("PAPERFLOW_CHROMIUM_PATH").map(PathBuf::from),
        }
    }

    pub fn supabase(&self) -> Result<SupabaseConfig> {
        match (&self.supabase_url, &self.supabase_key) {
            (Some(url), Some(key)) => Ok(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                key: key.clone(),
            }),
            _ => Err(anyhow!("SUPABASE_URL or SUPABASE_KEY is not set")),
        }
    }

    pub fn completion(&self) -> Result<CompletionConfig> {
        let api_key = self
            .completion_key
            .clone()
            .ok_or_else(|| anyhow!("DEEP_API_KEY is not set"))?;
        Ok(CompletionConfig {
            url: self
                .completion_url
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
            api_key,
            model: self
                .completion_model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Exam site endpoints. A missing cookie is allowed but logged: the
    /// list API and paper pages then see an anonymous visitor.
    pub fn exam_site(&self) -> ExamSiteConfig {
        let cookie = self.exam_cookie.clone().unwrap_or_default();
        if cookie.is_empty() {
            tracing::warn!("FENBI_COOKIE is not set; requests will be anonymous");
        }
        ExamSiteConfig {
            api_base: trimmed_or(&self.exam_api_base, DEFAULT_EXAM_API_BASE),
            spa_base: trimmed_or(&self.exam_spa_base, DEFAULT_EXAM_SPA_BASE),
            cookie,
            cookie_domain: DEFAULT_COOKIE_DOMAIN.to_string(),
        }
    }

    pub fn telegram(&self) -> Result<TelegramConfig> {
        let bot_token = self
            .telegram_token
            .clone()
            .ok_or_else(|| anyhow!("TG_BOT_TOKEN is not set"))?;
        Ok(TelegramConfig {
            api_base: trimmed_or(&self.telegram_api_base, DEFAULT_TELEGRAM_API_BASE),
            bot_token,
            chat_id: self.telegram_chat_id.clone(),
        })
    }

    pub fn kv(&self) -> Result<KvConfig> {
        match (
            &self.cloudflare_token,
            &self.cloudflare_account_id,
            &self.cloudflare_namespace_id,
        ) {
            (Some(token), Some(account), Some(namespace)) => Ok(KvConfig {
                api_base: trimmed_or(&self.cloudflare_api_base, DEFAULT_CLOUDFLARE_API_BASE),
                api_token: token.clone(),
                account_id: account.clone(),
                namespace_id: namespace.clone(),
            }),
            _ => Err(anyhow!(
                "CLOUDFLARE_API_TOKEN, CLOUDFLARE_ACCOUNT_ID and CLOUDFLARE_NAMESPACE_ID must all be set"
            )),
        }
    }
}

fn trimmed_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_completion_defaults() {
        let cfg = config(&[("DEEP_API_KEY", "sk-1")]);
        let completion = cfg.completion().unwrap();
        assert_eq!(completion.url, DEFAULT_COMPLETION_URL);
        assert_eq!(completion.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_key_is_error() {
        assert!(config(&[]).completion().is_err());
        assert!(config(&[("SUPABASE_URL", "https://x.supabase.co")])
            .supabase()
            .is_err());
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let cfg = config(&[("DEEP_API_KEY", "  "), ("TG_CHAT_ID", "")]);
        assert!(cfg.completion_key.is_none());
        assert!(cfg.telegram_chat_id.is_none());
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let cfg = config(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_KEY", "k"),
            ("FENBI_SPA_BASE", "http://127.0.0.1:9000/"),
        ]);
        assert_eq!(cfg.supabase().unwrap().url, "https://x.supabase.co");
        assert_eq!(cfg.exam_site().spa_base, "http://127.0.0.1:9000");
        assert_eq!(cfg.exam_site().api_base, DEFAULT_EXAM_API_BASE);
    }

    #[test]
    fn test_kv_requires_all_three() {
        let partial = config(&[("CLOUDFLARE_API_TOKEN", "t"), ("CLOUDFLARE_ACCOUNT_ID", "a")]);
        assert!(partial.kv().is_err());
        let full = config(&[
            ("CLOUDFLARE_API_TOKEN", "t"),
            ("CLOUDFLARE_ACCOUNT_ID", "a"),
            ("CLOUDFLARE_NAMESPACE_ID", "n"),
        ]);
        assert_eq!(full.kv().unwrap().api_base, DEFAULT_CLOUDFLARE_API_BASE);
    }
}
