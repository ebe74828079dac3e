//! Parsing of chat-completion messages into reasoning and answer text.

use serde::{Deserialize, Serialize};

/// The `message` object of a chat-completion choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

/// Reasoning and answer text extracted from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub reasoning: String,
    pub content: String,
}

impl From<CompletionMessage> for Completion {
    fn from(msg: CompletionMessage) -> Self {
        let reasoning = msg
            .reasoning_content
            .unwrap_or_default()
            .trim_matches('\n')
            .to_string();
        let content = msg
            .content
            .unwrap_or_default()
            .trim_start_matches('\n')
            .to_string();
        Self { reasoning, content }
    }
}

impl Completion {
    /// Both parts, or `None` when either is empty.
    pub fn into_answer(self) -> Option<(String, String)> {
        if self.reasoning.is_empty() || self.content.is_empty() {
            None
        } else {
            Some((self.reasoning, self.content))
        }
    }
}

/// Unwrap an answer the model wrapped entirely in a code fence.
///
/// Only text whose first line opens a fence and whose last line is a bare
/// closing fence is unwrapped. Anything else, including a fence followed by
/// prose or a fence that was never closed, is returned unchanged.
pub fn strip_fence(text: &str) -> String {
    let trimmed = text.trim();
    let lines: Vec<&str> = trimmed.split('\n').collect();
    let fenced = lines.len() > 2
        && lines[0].trim_start().starts_with("```")
        && lines[lines.len() - 1].trim() == "```";
    if fenced {
        lines[1..lines.len() - 1].join("\n").trim().to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_trims_newlines() {
        let msg: CompletionMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": "\n\n# Title\n\nBody\n",
            "reasoning_content": "\nthinking...\n\n"
        }))
        .unwrap();
        let completion = Completion::from(msg);
        assert_eq!(completion.reasoning, "thinking...");
        assert_eq!(completion.content, "# Title\n\nBody\n");
    }

    #[test]
    fn test_into_answer_requires_both_parts() {
        let missing_reasoning = Completion::from(CompletionMessage {
            content: Some("answer".into()),
            ..Default::default()
        });
        assert!(missing_reasoning.into_answer().is_none());

        let missing_content = Completion::from(CompletionMessage {
            reasoning_content: Some("why".into()),
            content: Some("\n\n".into()),
            ..Default::default()
        });
        assert!(missing_content.into_answer().is_none());
    }

    #[test]
    fn test_strip_fence() {
        assert_eq!(strip_fence("```markdown\n# T\nbody\n```\n"), "# T\nbody");
        assert_eq!(strip_fence("plain answer\n"), "plain answer\n");
        assert_eq!(strip_fence("a\nb"), "a\nb");
    }

    #[test]
    fn test_strip_fence_keeps_prose_after_block() {
        let text = "```text\n# Title\n```\nParagraph one.\nFinal paragraph.";
        assert_eq!(strip_fence(text), text);
    }

    #[test]
    fn test_strip_fence_keeps_unclosed_block() {
        let text = "```markdown\n# Title\nIntro.\nConclusion sentence";
        assert_eq!(strip_fence(text), text);
    }
}
