//! Environment-based configuration.
//!
//! Every setting comes from process env (a `.env` file is loaded at startup).
//! The KinOS API key is the only value validated before any network call:
//! a missing key is fatal immediately, everything else degrades per command.

use std::env;

use crate::error::{Error, Result};

/// Default KinOS API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.kinos-engine.ai";

/// KinOS API credentials and endpoint.
#[derive(Clone, Debug)]
pub struct KinosSettings {
    pub api_key: String,
    pub base_url: String,
}

impl KinosSettings {
    /// Load from `KINOS_API_KEY` (required) and `KINOS_API_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("KINOS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("KINOS_API_KEY is not set in the environment".to_string())
            })?;

        let base_url = env::var("KINOS_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self { api_key, base_url })
    }
}

/// Telegram bot credentials and the single authorized chat.
#[derive(Clone, Debug)]
pub struct TelegramSettings {
    pub bot_token: String,
    /// Chat id as configured; `"*"` accepts any chat (bot server only).
    pub chat_id: String,
}

impl TelegramSettings {
    /// Load from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN is not set in the environment".to_string())
            })?;

        let chat_id = env::var("TELEGRAM_CHAT_ID")
            .ok()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("TELEGRAM_CHAT_ID is not set in the environment".to_string())
            })?;

        Ok(Self { bot_token, chat_id })
    }

    /// Same as [`from_env`](Self::from_env) but logs and returns `None`
    /// instead of failing, for commands where the relay is optional.
    pub fn from_env_optional() -> Option<Self> {
        match Self::from_env() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("Telegram relay disabled: {}", e);
                None
            }
        }
    }

    /// Whether an inbound update from `chat_id` may be processed.
    pub fn allows_chat(&self, chat_id: i64) -> bool {
        self.chat_id == "*" || self.chat_id == chat_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(chat_id: &str) -> TelegramSettings {
        TelegramSettings {
            bot_token: "token".to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    #[test]
    fn test_wildcard_allows_any_chat() {
        let s = settings("*");
        assert!(s.allows_chat(1));
        assert!(s.allows_chat(-1001234567890));
    }

    #[test]
    fn test_exact_chat_match() {
        let s = settings("42");
        assert!(s.allows_chat(42));
        assert!(!s.allows_chat(43));
    }
}
