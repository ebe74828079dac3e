//! Paperflow core: exam paper records, document conversion and completion parsing.

pub mod completion;
pub mod convert;
pub mod labels;
pub mod prompt;
pub mod site;
pub mod store;
pub mod types;

pub use completion::{strip_fence, Completion, CompletionMessage};
pub use convert::{convert_document, convert_value};
pub use labels::{Label, LABELS};
pub use prompt::{essay_prompt, question_prompt};
pub use site::{normalize_url, site_name};
pub use store::{ArticleStore, MemoryArticleStore};
pub use types::*;
