use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tracing::{error, info};

mod config;
mod digest;
mod football;
mod scheduler;
mod telegram;

use config::Config;
use digest::DigestBuilder;
use football::ApiSports;
use scheduler::DailySchedule;
use telegram::{run_command_loop, TelegramClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let provider = ApiSports::new(
        &config.api_key,
        &config.football_api_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;
    let telegram = TelegramClient::new(&config.telegram_api_url, &config.telegram_token)?;

    let schedule = DailySchedule {
        builder: DigestBuilder::new(Arc::new(provider)),
        notifier: Arc::new(telegram.clone()),
        recipient: config.user_id,
        at: config.digest_time,
    };

    info!(
        "⚽ Over 2.5 digest bot started: recipient chat {}, daily at {}",
        config.user_id,
        config.digest_time.format("%H:%M")
    );

    let mut sent_today = None;
    if config.send_on_startup {
        match schedule.deliver_now().await {
            Ok(date) => sent_today = Some(date),
            Err(e) => error!("Startup digest failed: {:#}", e),
        }
    }

    let commands = tokio::spawn(run_command_loop(telegram, config.digest_time));
    let daily = tokio::spawn(schedule.run(sent_today));

    tokio::select! {
        res = commands => return Err(task_exit_error("command listener", res)),
        res = daily => return Err(task_exit_error("scheduler", res)),
        _ = tokio::signal::ctrl_c() => info!("Shutdown requested, exiting"),
    }

    Ok(())
}

/// Both background tasks loop forever; any exit is a failure.
fn task_exit_error(task: &str, res: Result<(), JoinError>) -> anyhow::Error {
    match res {
        Ok(()) => anyhow!("{} stopped unexpectedly", task),
        Err(e) => anyhow!("{} crashed: {}", task, e),
    }
}
