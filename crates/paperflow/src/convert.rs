//! Reshape a captured paper document into article fields.

use crate::types::{ConvertedPaper, PipelineError, PipelineResult, SourceDocument};

/// Marker the exam site appends to titles reconstructed from candidates' memory.
pub const RECALLED_MARKER: &str = "（网友回忆版）";

/// Convert a source document into the fields stored on an article.
///
/// The title and `last_question` both come from the final question: its
/// `source` (with [`RECALLED_MARKER`] removed) and the title of its first
/// accessory.
pub fn convert_document(doc: &SourceDocument) -> PipelineResult<ConvertedPaper> {
    let last = doc
        .questions
        .last()
        .ok_or(PipelineError::MissingField("questions"))?;

    let source = last
        .source
        .as_deref()
        .ok_or(PipelineError::MissingField("questions[-1].source"))?;

    let last_question = last
        .accessories
        .first()
        .and_then(|a| a.title.clone())
        .ok_or(PipelineError::MissingField("questions[-1].accessories[0].title"))?;

    Ok(ConvertedPaper {
        name: source.replace(RECALLED_MARKER, ""),
        materials: doc.materials.iter().map(|m| m.content.clone()).collect(),
        questions: doc.questions.iter().map(|q| q.content.clone()).collect(),
        solutions: doc
            .solutions
            .iter()
            .map(|s| s.reference.clone().unwrap_or_default())
            .collect(),
        last_question,
    })
}

/// Convert a raw JSON value; shape errors surface as [`PipelineError::Json`].
pub fn convert_value(value: serde_json::Value) -> PipelineResult<ConvertedPaper> {
    let doc = SourceDocument::from_value(value)?;
    convert_document(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "materials": [
                {"content": "<p>material one</p>"},
                {"content": "<p>material two</p>"}
            ],
            "questions": [
                {"content": "summarise", "source": "2024 Gansu", "accessories": []},
                {
                    "content": "write an essay",
                    "source": "2024年甘肃公务员考试申论（网友回忆版）",
                    "accessories": [{"title": "Essay: on rural revival"}, {"title": "ignored"}]
                }
            ],
            "solutions": [
                {"reference": "point A"},
                {"reference": null},
                {}
            ]
        })
    }

    #[test]
    fn test_convert_strips_marker_and_keeps_order() {
        let paper = convert_value(sample()).unwrap();
        assert_eq!(paper.name, "2024年甘肃公务员考试申论");
        assert_eq!(
            paper.materials,
            vec!["<p>material one</p>", "<p>material two</p>"]
        );
        assert_eq!(paper.questions, vec!["summarise", "write an essay"]);
        assert_eq!(paper.last_question, "Essay: on rural revival");
    }

    #[test]
    fn test_convert_missing_references_become_empty() {
        let paper = convert_value(sample()).unwrap();
        assert_eq!(paper.solutions, vec!["point A", "", ""]);
    }

    #[test]
    fn test_convert_without_solutions_key() {
        let mut doc = sample();
        doc.as_object_mut().unwrap().remove("solutions");
        let paper = convert_value(doc).unwrap();
        assert!(paper.solutions.is_empty());
    }

    #[test]
    fn test_convert_no_questions() {
        let doc = json!({"materials": [], "questions": []});
        let err = convert_value(doc).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField("questions")));
    }

    #[test]
    fn test_convert_last_question_without_accessory() {
        let doc = json!({
            "materials": [],
            "questions": [{"content": "q", "source": "s", "accessories": []}]
        });
        let err = convert_value(doc).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField(_)));
    }

    #[test]
    fn test_convert_rejects_wrong_shape() {
        let err = convert_value(json!({"materials": [{"text": "x"}], "questions": []}))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Json(_)));
    }
}
