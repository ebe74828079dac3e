//! Core data types for papers and article records.

use serde::{Deserialize, Serialize};

/// A paper document as captured from the exam site's console output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub materials: Vec<SourceMaterial>,
    pub questions: Vec<SourceQuestion>,
    #[serde(default)]
    pub solutions: Vec<SourceSolution>,
}

impl SourceDocument {
    /// Deserialize a document from a raw JSON value.
    pub fn from_value(value: serde_json::Value) -> PipelineResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMaterial {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceQuestion {
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accessory {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSolution {
    #[serde(default)]
    pub reference: Option<String>,
}

/// A paper document reshaped into the fields an article stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedPaper {
    pub name: String,
    pub materials: Vec<String>,
    pub questions: Vec<String>,
    pub solutions: Vec<String>,
    pub last_question: String,
}

/// One entry of a label's paper list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub topic: String,
    pub name: String,
    pub id: i64,
    #[serde(rename = "encodeCheckInfo")]
    pub encode_check_info: String,
}

/// Insert payload for the `articles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    #[serde(rename = "labelId")]
    pub label_id: String,
    pub topic: String,
    pub page_num: i64,
    pub name: String,
    pub materials: Vec<String>,
    pub questions: Vec<String>,
    pub solutions: Vec<String>,
    pub last_question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl NewArticle {
    /// Combine a paper list entry with its converted document.
    pub fn from_paper(label_id: &str, summary: &PaperSummary, paper: ConvertedPaper) -> Self {
        Self {
            label_id: label_id.to_string(),
            topic: summary.topic.clone(),
            page_num: summary.id,
            name: paper.name,
            materials: paper.materials,
            questions: paper.questions,
            solutions: paper.solutions,
            last_question: paper.last_question,
            created_at: None,
        }
    }
}

/// An article row as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: i64,
    #[serde(rename = "labelId", default)]
    pub label_id: String,
    #[serde(default)]
    pub topic: String,
    pub page_num: i64,
    pub name: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub last_question: String,
    #[serde(default)]
    pub think: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub thinks: Option<Vec<String>>,
    #[serde(default)]
    pub answers: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl StoredArticle {
    /// Whether the answer column is still empty.
    pub fn awaits_answer(&self) -> bool {
        self.answer.as_deref().map_or(true, |a| a.trim().is_empty())
    }

    /// The question an essay answer responds to: the last one in the list,
    /// or `last_question` when the list is empty.
    pub fn final_question(&self) -> &str {
        self.questions
            .last()
            .map(String::as_str)
            .unwrap_or(&self.last_question)
    }
}

/// Reasoning and answer text written back after a completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerUpdate {
    pub think: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<String>>,
}

/// Result of an idempotent insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(StoredArticle),
    /// An article with the same title already exists.
    Skipped,
}

/// Errors that can occur in the pipeline library.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience result type.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored(answer: Option<&str>) -> StoredArticle {
        StoredArticle {
            id: 1,
            label_id: "105".into(),
            topic: "t".into(),
            page_num: 42,
            name: "paper".into(),
            materials: vec![],
            questions: vec!["q1".into(), "q2".into()],
            solutions: vec![],
            last_question: "essay".into(),
            think: None,
            answer: answer.map(String::from),
            thinks: None,
            answers: None,
            created_at: None,
        }
    }

    #[test]
    fn test_new_article_wire_names() {
        let summary = PaperSummary {
            topic: "2023 exam".into(),
            name: "Paper A".into(),
            id: 9001,
            encode_check_info: "abc".into(),
        };
        let paper = ConvertedPaper {
            name: "Paper A".into(),
            materials: vec!["m".into()],
            questions: vec!["q".into()],
            solutions: vec![String::new()],
            last_question: "write an essay".into(),
        };
        let article = NewArticle::from_paper("106", &summary, paper);
        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["labelId"], "106");
        assert_eq!(value["page_num"], 9001);
        assert_eq!(value["topic"], "2023 exam");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_paper_summary_from_list_item() {
        let item = json!({
            "topic": "t",
            "name": "n",
            "id": 12,
            "encodeCheckInfo": "xyz",
            "extra": true
        });
        let summary: PaperSummary = serde_json::from_value(item).unwrap();
        assert_eq!(summary.encode_check_info, "xyz");
        assert_eq!(summary.id, 12);
    }

    #[test]
    fn test_awaits_answer() {
        assert!(stored(None).awaits_answer());
        assert!(stored(Some("  ")).awaits_answer());
        assert!(!stored(Some("done")).awaits_answer());
    }

    #[test]
    fn test_final_question_falls_back() {
        let mut a = stored(None);
        assert_eq!(a.final_question(), "q2");
        a.questions.clear();
        assert_eq!(a.final_question(), "essay");
    }

    #[test]
    fn test_answer_update_omits_lists() {
        let update = AnswerUpdate {
            think: "t".into(),
            answer: "a".into(),
            thinks: None,
            answers: None,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, json!({"think": "t", "answer": "a"}));
    }
}
