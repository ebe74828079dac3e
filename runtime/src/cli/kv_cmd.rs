//! `paperflow kv list`: list the keys of the screenshot namespace.

use anyhow::Result;

use super::output::{is_json, print_json, say};
use super::siteshot_cmd::metadata_text;
use crate::acquisition::http_client::HttpClient;
use crate::config::Config;
use crate::upload::KvClient;

/// Run `kv list`.
pub async fn run_list() -> Result<()> {
    let config = Config::load();
    let kv = KvClient::new(HttpClient::new(30_000), config.kv()?);
    let keys = kv.list_keys().await?;

    if is_json() {
        print_json(&keys);
        return Ok(());
    }
    if keys.is_empty() {
        say("Namespace is empty.");
    }
    for key in &keys {
        say(format!("Name: {}, Metadata: {}", key.name, metadata_text(key)));
    }
    Ok(())
}
