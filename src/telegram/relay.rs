//! Outbound Telegram notifications to the preconfigured chat.
//!
//! Delivery is best-effort: a failed rich send falls back to plain text once,
//! and a failure of the fallback itself is logged and swallowed. No delivery
//! problem is ever fatal to the invoking command.

use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};

use crate::config::TelegramSettings;

pub struct Relay {
    bot: Bot,
    chat_id: ChatId,
}

/// Plain-text body used when photo delivery fails.
pub fn photo_fallback_text(caption: &str, image_url: &str) -> String {
    format!("{}\n\nImage: {}", caption, image_url)
}

impl Relay {
    /// Build a relay for the configured chat. Returns `None` when the chat id
    /// is not a concrete numeric id (the `"*"` wildcard only makes sense for
    /// the inbound bot).
    pub fn from_settings(settings: &TelegramSettings) -> Option<Self> {
        match settings.chat_id.parse::<i64>() {
            Ok(id) => Some(Self {
                bot: Bot::new(settings.bot_token.clone()),
                chat_id: ChatId(id),
            }),
            Err(_) => {
                tracing::warn!(
                    "TELEGRAM_CHAT_ID '{}' is not a concrete chat id, relay disabled",
                    settings.chat_id
                );
                None
            }
        }
    }

    /// Send a Markdown-formatted message, degrading to plain text if the
    /// formatted send is rejected.
    pub async fn send_text(&self, text: &str) {
        let formatted = self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Markdown)
            .await;

        if let Err(e) = formatted {
            tracing::warn!("Markdown send failed, retrying as plain text: {}", e);
            self.send_plain(text).await;
        }
    }

    /// Send a photo by URL with a caption. On failure, fall back once to a
    /// plain message carrying the caption and the raw URL.
    pub async fn send_photo(&self, image_url: &str, caption: &str) {
        let delivered = match reqwest::Url::parse(image_url) {
            Ok(url) => self
                .bot
                .send_photo(self.chat_id, InputFile::url(url))
                .caption(caption)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Err(e) => Err(format!("invalid image URL: {}", e)),
        };

        match delivered {
            Ok(()) => tracing::info!("Telegram photo notification sent"),
            Err(e) => {
                tracing::warn!("Photo delivery failed, falling back to text: {}", e);
                self.send_plain(&photo_fallback_text(caption, image_url)).await;
            }
        }
    }

    async fn send_plain(&self, text: &str) {
        if let Err(e) = self.bot.send_message(self.chat_id, text).await {
            tracing::error!("Telegram message delivery failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelegramSettings;
    use mockito::Matcher;

    const TG_ERROR: &str = r#"{"ok":false,"error_code":400,"description":"Bad Request: test"}"#;

    fn relay_against(server: &mockito::ServerGuard) -> Relay {
        let url = reqwest::Url::parse(&server.url()).unwrap();
        Relay {
            bot: Bot::new("test-token").set_api_url(url),
            chat_id: ChatId(7),
        }
    }

    #[tokio::test]
    async fn test_photo_failure_falls_back_to_text_once() {
        let mut server = mockito::Server::new_async().await;
        let photo = server
            .mock("POST", Matcher::Regex("(?i)sendphoto$".to_string()))
            .with_status(400)
            .with_body(TG_ERROR)
            .expect(1)
            .create_async()
            .await;
        // The plain-text fallback itself fails too: it must fire exactly
        // once and the second failure must be swallowed, not propagated.
        let text = server
            .mock("POST", Matcher::Regex("(?i)sendmessage$".to_string()))
            .with_status(400)
            .with_body(TG_ERROR)
            .expect(1)
            .create_async()
            .await;

        let relay = relay_against(&server);
        relay
            .send_photo("https://img.example/1.png", "Simba drew: a lion")
            .await;

        photo.assert_async().await;
        text.assert_async().await;
    }

    #[tokio::test]
    async fn test_markdown_rejection_retries_plain_once() {
        let mut server = mockito::Server::new_async().await;
        // Both the Markdown attempt and the plain retry land here: two hits
        // total, and the retry's failure is swallowed.
        let text = server
            .mock("POST", Matcher::Regex("(?i)sendmessage$".to_string()))
            .with_status(400)
            .with_body(TG_ERROR)
            .expect(2)
            .create_async()
            .await;

        let relay = relay_against(&server);
        relay.send_text("*hello*").await;

        text.assert_async().await;
    }

    #[test]
    fn test_fallback_text_carries_caption_and_url() {
        let text = photo_fallback_text("Simba drew: a lion", "https://img.example/1.png");
        assert_eq!(text, "Simba drew: a lion\n\nImage: https://img.example/1.png");
    }

    #[test]
    fn test_wildcard_chat_disables_relay() {
        let settings = TelegramSettings {
            bot_token: "token".to_string(),
            chat_id: "*".to_string(),
        };
        assert!(Relay::from_settings(&settings).is_none());
    }

    #[test]
    fn test_numeric_chat_enables_relay() {
        let settings = TelegramSettings {
            bot_token: "token".to_string(),
            chat_id: "-1001234".to_string(),
        };
        assert!(Relay::from_settings(&settings).is_some());
    }
}
