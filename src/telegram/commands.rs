//! Chat command listener.
//!
//! Two commands are served, in any chat:
//! - `/start` or `/status`: confirms the bot is alive and when the digest goes out
//! - `/id` or `/identify`: echoes the chat ID, to find the value for `USER_ID`
//!
//! Anything else is ignored.

use anyhow::Result;
use chrono::NaiveTime;
use rand::Rng;
use std::time::Duration;
use tracing::{error, info, warn};

use super::client::{TelegramClient, Update, LONG_POLL_SECS};
use super::notifier::Notifier;

/// Pause after a failed `getUpdates` before polling again.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status,
    Identify,
}

/// Parse a message text into a command. Accepts `/cmd`, `/cmd@BotName` and
/// trailing arguments; command names are case-insensitive.
pub fn parse_command(text: &str) -> Option<Command> {
    let word = text.trim().strip_prefix('/')?.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);
    match name.to_lowercase().as_str() {
        "start" | "status" => Some(Command::Status),
        "id" | "identify" => Some(Command::Identify),
        _ => None,
    }
}

pub fn status_reply(digest_time: NaiveTime) -> String {
    format!(
        "✅ Bot is running. You'll get daily stats at {}.",
        digest_time.format("%H:%M")
    )
}

pub fn identify_reply(chat_id: i64) -> String {
    format!("Your chat ID is: `{}`", chat_id)
}

/// Answer a single update. Returns the command that was served, if any.
pub async fn handle_update(
    notifier: &dyn Notifier,
    update: &Update,
    digest_time: NaiveTime,
) -> Result<Option<Command>> {
    let Some(message) = &update.message else {
        return Ok(None);
    };
    let Some(command) = message.text.as_deref().and_then(parse_command) else {
        return Ok(None);
    };

    let chat_id = message.chat.id;
    info!("Received {:?} command from chat {}", command, chat_id);

    let reply = match command {
        Command::Status => status_reply(digest_time),
        Command::Identify => identify_reply(chat_id),
    };
    notifier.send(chat_id, &reply).await?;
    Ok(Some(command))
}

/// Long-poll Telegram for commands forever.
pub async fn run_command_loop(client: TelegramClient, digest_time: NaiveTime) {
    info!("Starting Telegram command listener...");

    let mut offset = 0i64;
    loop {
        let updates = match client.get_updates(offset, LONG_POLL_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
                warn!("Failed to poll Telegram updates: {:#}", e);
                tokio::time::sleep(POLL_ERROR_BACKOFF + jitter).await;
                continue;
            }
        };

        for update in &updates {
            offset = offset.max(update.update_id + 1);
            if let Err(e) = handle_update(&client, update, digest_time).await {
                error!("Failed to answer command: {:#}", e);
            }
        }
    }
}
