use chrono::NaiveTime;
use clap::Parser;

/// Daily "Over 2.5 goals" digest bot for Telegram
#[derive(Parser, Debug, Clone)]
#[command(name = "overgoals-bot", version, about)]
pub struct Config {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: String,

    /// API-Sports (API-Football) key, sent as the `x-apisports-key` header
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Telegram chat ID that receives the daily digest
    #[arg(long, env = "USER_ID", allow_negative_numbers = true)]
    pub user_id: i64,

    /// Local wall-clock time of the daily digest (HH:MM)
    #[arg(long, env = "DIGEST_TIME", default_value = "12:00", value_parser = parse_digest_time)]
    pub digest_time: NaiveTime,

    /// Send one digest right away at startup, then keep the daily schedule.
    /// A successful startup digest counts as that day's delivery.
    #[arg(long, env = "SEND_ON_STARTUP", default_value = "false")]
    pub send_on_startup: bool,

    /// API-Sports football base URL
    #[arg(
        long,
        env = "FOOTBALL_API_URL",
        default_value = "https://v3.football.api-sports.io"
    )]
    pub football_api_url: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_URL", default_value = "https://api.telegram.org")]
    pub telegram_api_url: String,

    /// Timeout for a single provider request, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.telegram_token.trim().is_empty() {
            anyhow::bail!("TELEGRAM_TOKEN must not be empty");
        }
        if self.api_key.trim().is_empty() {
            anyhow::bail!("API_KEY must not be empty");
        }
        if self.user_id == 0 {
            anyhow::bail!("USER_ID must be a non-zero Telegram chat ID (send /id to the bot to find it)");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be positive");
        }
        url::Url::parse(&self.football_api_url)
            .map_err(|e| anyhow::anyhow!("invalid FOOTBALL_API_URL: {}", e))?;
        url::Url::parse(&self.telegram_api_url)
            .map_err(|e| anyhow::anyhow!("invalid TELEGRAM_API_URL: {}", e))?;
        Ok(())
    }
}

fn parse_digest_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| format!("expected HH:MM (24h), got '{}': {}", s, e))
}
