//! Prompt templates for essay and per-question answers.

fn render_materials(materials: &[String]) -> String {
    serde_json::to_string(materials).unwrap_or_default()
}

/// Essay prompt: read every material and answer the final question as a
/// five-paragraph Markdown essay.
pub fn essay_prompt(materials: &[String], question: &str) -> String {
    format!(
        "阅读所有Materials ，根据Question的要求作答，使用Markdown语法，第一行为文章标题，\
         总分总结构（一个总起，三个分论点，一个总结，共五段。），分论点的小标题加粗但不换行，\
         其中源于材料的论据用醒目的Markdown样式来展示\n\
         Materials: {}\n\
         Question: {}\n",
        render_materials(materials),
        question
    )
}

/// Per-question prompt: answer one question strictly from the materials.
pub fn question_prompt(materials: &[String], question: &str) -> String {
    format!(
        "阅读所有Materials ，根据Question的要求作答，使用Markdown语法，\
         答案须紧扣材料并满足题目的字数与格式要求\n\
         Materials: {}\n\
         Question: {}\n",
        render_materials(materials),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essay_prompt_embeds_inputs() {
        let prompt = essay_prompt(&["材料一".into(), "m2".into()], "写一篇文章");
        assert!(prompt.contains("Materials: [\"材料一\",\"m2\"]"));
        assert!(prompt.ends_with("Question: 写一篇文章\n"));
        assert!(prompt.contains("共五段"));
    }

    #[test]
    fn test_question_prompt_differs() {
        let m = vec!["x".to_string()];
        assert_ne!(essay_prompt(&m, "q"), question_prompt(&m, "q"));
        assert!(question_prompt(&m, "q").contains("Question: q"));
    }
}
