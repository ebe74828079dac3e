//! `paperflow answer [LABEL...]`: draft answers for stored articles.

use anyhow::Result;
use paperflow::labels::default_answer_labels;
use std::time::Instant;

use super::output::{is_json, print_json, say};
use super::{audit_event, audit_outcomes, open_audit};
use crate::acquisition::http_client::HttpClient;
use crate::config::Config;
use crate::llm::ChatCompletionClient;
use crate::pipeline::answer::{answer_label, AnswerMode, AnswerReport};
use crate::store::SupabaseStore;

/// Reasoning models can take several minutes per essay.
const COMPLETION_TIMEOUT_MS: u64 = 600_000;

/// Run the answer command.
pub async fn run(labels: Vec<String>, per_question: bool) -> Result<()> {
    let config = Config::load();
    let store = SupabaseStore::new(HttpClient::new(30_000), &config.supabase()?);
    let completer = ChatCompletionClient::new(
        HttpClient::new(COMPLETION_TIMEOUT_MS).with_max_retries(0),
        config.completion()?,
    );
    let mode = if per_question {
        AnswerMode::PerQuestion
    } else {
        AnswerMode::Essay
    };

    let labels: Vec<String> = if labels.is_empty() {
        default_answer_labels().into_iter().map(String::from).collect()
    } else {
        labels
    };

    let mut audit = open_audit();
    let mut reports: Vec<AnswerReport> = Vec::new();

    for label in &labels {
        say(format!("Answering label {label} with {}...", completer.model()));
        let start = Instant::now();
        match answer_label(label, &store, &completer, mode).await {
            Ok(report) => {
                say(format!(
                    "  {} pending: {} updated, {} skipped, {} failed",
                    report.pending, report.updated, report.skipped, report.failed
                ));
                audit_outcomes(&mut audit, "answer.article", &report.outcomes);
                reports.push(report);
            }
            Err(e) => {
                tracing::error!(label = %label, "answer run failed: {e:#}");
                say(format!("  failed: {e:#}"));
                audit_event(
                    &mut audit,
                    "answer.label",
                    Some(label.as_str()),
                    start.elapsed().as_millis() as u64,
                    "failed",
                );
            }
        }
    }

    if is_json() {
        print_json(&reports);
    }
    Ok(())
}
