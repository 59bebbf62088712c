pub mod client;
pub mod commands;
pub mod notifier;

pub use client::TelegramClient;
pub use commands::run_command_loop;
pub use notifier::Notifier;
