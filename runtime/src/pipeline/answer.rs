//! Answer generation: draft answers for stored articles with a completion
//! model and write them back by page number.

use anyhow::Result;
use paperflow::{
    essay_prompt, question_prompt, strip_fence, AnswerUpdate, ArticleStore, StoredArticle,
};
use serde::Serialize;
use std::time::Instant;

use super::{ItemOutcome, ItemStatus};
use crate::llm::{Completer, CompletionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerMode {
    /// One essay for the final question.
    #[default]
    Essay,
    /// One answer per question; the final question is answered as the essay.
    PerQuestion,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnswerReport {
    pub label: String,
    pub pending: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<ItemOutcome>,
}

/// Answer every pending article of a label.
pub async fn answer_label(
    label_id: &str,
    store: &dyn ArticleStore,
    completer: &dyn Completer,
    mode: AnswerMode,
) -> Result<AnswerReport> {
    let pending = store.pending_answers(label_id).await?;
    let mut report = AnswerReport {
        label: label_id.to_string(),
        pending: pending.len(),
        ..Default::default()
    };
    if pending.is_empty() {
        tracing::info!(label = label_id, "no articles awaiting an answer");
        return Ok(report);
    }

    for article in &pending {
        let start = Instant::now();
        let target = format!("{label_id}/{}", article.page_num);

        let result = match draft_answer(article, completer, mode).await {
            Ok(Some(update)) => store
                .update_answer(article.page_num, &update)
                .await
                .map(Some)
                .map_err(anyhow::Error::from),
            Ok(None) => Ok(None),
            Err(e) => Err(e.into()),
        };

        let elapsed = start.elapsed().as_millis() as u64;
        let outcome = match result {
            Ok(Some(rows)) => {
                tracing::info!(id = article.id, page_num = article.page_num, rows, "stored answer");
                report.updated += 1;
                ItemOutcome::new(target, ItemStatus::Updated, elapsed)
            }
            Ok(None) => {
                tracing::warn!(id = article.id, "skipping article: completion lacks reasoning or content");
                report.skipped += 1;
                ItemOutcome::new(target, ItemStatus::Skipped, elapsed)
            }
            Err(e) => {
                tracing::error!(id = article.id, "failed to answer article: {e:#}");
                report.failed += 1;
                ItemOutcome::new(target, ItemStatus::Failed, elapsed).with_detail(format!("{e:#}"))
            }
        };
        report.outcomes.push(outcome);
    }

    Ok(report)
}

/// Produce the update for one article, or `None` when a completion came
/// back without reasoning or content.
pub async fn draft_answer(
    article: &StoredArticle,
    completer: &dyn Completer,
    mode: AnswerMode,
) -> Result<Option<AnswerUpdate>, CompletionError> {
    match mode {
        AnswerMode::Essay => {
            let prompt = essay_prompt(&article.materials, article.final_question());
            Ok(ask(completer, &prompt).await?.map(|(think, answer)| AnswerUpdate {
                think,
                answer,
                thinks: None,
                answers: None,
            }))
        }
        AnswerMode::PerQuestion => {
            let questions: Vec<&str> = if article.questions.is_empty() {
                vec![article.final_question()]
            } else {
                article.questions.iter().map(String::as_str).collect()
            };

            let mut thinks = Vec::with_capacity(questions.len());
            let mut answers = Vec::with_capacity(questions.len());
            for (i, question) in questions.iter().enumerate() {
                let prompt = if i + 1 == questions.len() {
                    essay_prompt(&article.materials, question)
                } else {
                    question_prompt(&article.materials, question)
                };
                let Some((think, answer)) = ask(completer, &prompt).await? else {
                    return Ok(None);
                };
                thinks.push(think);
                answers.push(answer);
            }

            let think = thinks.last().cloned().unwrap_or_default();
            let answer = answers.last().cloned().unwrap_or_default();
            Ok(Some(AnswerUpdate {
                think,
                answer,
                thinks: Some(thinks),
                answers: Some(answers),
            }))
        }
    }
}

async fn ask(
    completer: &dyn Completer,
    prompt: &str,
) -> Result<Option<(String, String)>, CompletionError> {
    let completion = completer.complete(prompt).await?;
    Ok(completion
        .into_answer()
        .map(|(think, answer)| (think, strip_fence(&answer))))
}
