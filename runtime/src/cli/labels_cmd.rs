//! `paperflow labels`: show the built-in label catalogue.

use anyhow::Result;
use paperflow::LABELS;

use super::output::{is_json, print_json, say};

/// Run the labels command.
pub async fn run() -> Result<()> {
    if is_json() {
        let rows: Vec<_> = LABELS
            .iter()
            .map(|l| serde_json::json!({"code": l.code, "region": l.region, "crawl": l.crawl}))
            .collect();
        print_json(&rows);
        return Ok(());
    }

    say(format!("{:<6} {:<10} {}", "CODE", "CRAWL", "REGION"));
    for label in LABELS {
        let crawl = if label.crawl { "yes" } else { "no" };
        say(format!("{:<6} {:<10} {}", label.code, crawl, label.region));
    }
    Ok(())
}
