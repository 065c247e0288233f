//! Telegram integration: outbound relay and the inbound bot daemon.

pub mod bot;
pub mod relay;

pub use bot::run_bot_daemon;
pub use relay::Relay;
