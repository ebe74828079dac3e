//! `paperflow pending --label L`: list articles still awaiting an answer.

use anyhow::Result;
use paperflow::ArticleStore;

use super::output::{is_json, print_json, say, truncate};
use crate::acquisition::http_client::HttpClient;
use crate::config::Config;
use crate::store::SupabaseStore;

/// Run the pending command.
pub async fn run(label: &str, limit: usize) -> Result<()> {
    let config = Config::load();
    let store = SupabaseStore::new(HttpClient::new(30_000), &config.supabase()?);
    let mut pending = store.pending_answers(label).await?;
    let total = pending.len();
    pending.truncate(limit);

    if is_json() {
        print_json(&pending);
        return Ok(());
    }

    if pending.is_empty() {
        say(format!("No articles awaiting an answer for label {label}."));
        return Ok(());
    }

    say(format!("{total} article(s) awaiting an answer for label {label}:"));
    for article in &pending {
        say("-".repeat(50));
        say(format!("ID: {}  page: {}", article.id, article.page_num));
        say(format!("Title: {}", article.name));
        say(format!("Materials: {}", article.materials.len()));
        say(format!("Question: {}", truncate(article.final_question(), 120)));
    }
    if total > pending.len() {
        say(format!("... and {} more", total - pending.len()));
    }
    Ok(())
}
