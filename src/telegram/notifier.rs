use anyhow::Result;
use async_trait::async_trait;

/// Outbound text delivery to a chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text` (Telegram legacy Markdown) to `chat_id`. Not retried.
    async fn send(&self, chat_id: i64, text: &str) -> Result<()>;
}
