use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::notifier::Notifier;

/// Seconds a `getUpdates` long-poll may be held open by Telegram.
pub const LONG_POLL_SECS: u64 = 30;

/// Minimal Telegram Bot API client: `sendMessage` and `getUpdates`.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    api_url: String,
    token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let http = Client::builder()
            // must outlive the long-poll window
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TelegramClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Send a Markdown-styled text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "Markdown",
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        debug!("Message delivered to chat {}", chat_id);
        Ok(())
    }

    /// Long-poll for updates with IDs >= `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: ["message"],
        };
        self.call("getUpdates", &request).await
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // The token is part of the path; never log this URL.
        let url = format!("{}/bot{}/{}", self.api_url, self.token, method);

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Telegram {} request failed", method))?;

        let status = resp.status();
        let parsed: ApiResponse<T> = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Telegram {} response ({})", method, status))?;

        if !parsed.ok {
            anyhow::bail!(
                "Telegram {} error {}: {}",
                method,
                status,
                parsed.description.unwrap_or_default()
            );
        }
        parsed
            .result
            .with_context(|| format!("Telegram {} response has no result", method))
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        self.send_message(chat_id, text).await
    }
}
