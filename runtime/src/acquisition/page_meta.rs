//! Title and description extraction from rendered HTML.

use scraper::{Html, Selector};

/// Page metadata shown alongside a screenshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

/// Extract `<title>` and the meta description, falling back to
/// `og:description`.
pub fn extract_meta(html: &str) -> PageMeta {
    let doc = Html::parse_document(html);

    let title = select_first(&doc, "title")
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let description = meta_content(&doc, r#"meta[name="description"]"#)
        .filter(|d| !d.is_empty())
        .or_else(|| meta_content(&doc, r#"meta[property="og:description"]"#))
        .unwrap_or_default();

    PageMeta { title, description }
}

/// Visible text of the document, whitespace-collapsed.
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    select_first(&doc, "body")
        .map(|body| body.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<scraper::ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).next()
}

fn meta_content(doc: &Html, css: &str) -> Option<String> {
    select_first(doc, css)
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_meta() {
        let html = r#"<html><head><title>  Dunlin AI </title>
            <meta name="description" content=" Research agent ">
            <meta property="og:description" content="og text"></head><body></body></html>"#;
        let meta = extract_meta(html);
        assert_eq!(meta.title, "Dunlin AI");
        assert_eq!(meta.description, "Research agent");
    }

    #[test]
    fn test_og_description_fallback() {
        let html = r#"<html><head><meta property="og:description" content="from og"></head></html>"#;
        let meta = extract_meta(html);
        assert_eq!(meta.title, "");
        assert_eq!(meta.description, "from og");
    }

    #[test]
    fn test_empty_description_falls_back() {
        let html = r#"<head><meta name="description" content=""><meta property="og:description" content="og"></head>"#;
        assert_eq!(extract_meta(html).description, "og");
    }

    #[test]
    fn test_visible_text() {
        let html = "<html><body><h1>Hi</h1>\n<p>there   you</p></body></html>";
        assert_eq!(visible_text(html), "Hi there you");
    }
}
