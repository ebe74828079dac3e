//! Screenshot publishing: Telegram as the image host, Workers KV as the index.

pub mod kv;
pub mod telegram;

pub use kv::{KvClient, KvKey, KvMetadata};
pub use telegram::{TelegramUploader, UploadError, UploadedImage};
