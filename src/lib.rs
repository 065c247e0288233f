//! Simba library root.

pub mod cli;
pub mod config;
pub mod error;
pub mod kinos;
pub mod logging;
pub mod telegram;

pub use cli::Commands;
pub use config::{KinosSettings, TelegramSettings};
pub use error::{Error, Result};
pub use kinos::{AgentRef, KinosClient};
pub use telegram::run_bot_daemon;
