//! Long-lived Telegram bot daemon.
//!
//! Polls for updates, relays text and photos to KinOS, and replies in place.
//! Updates from chats other than the configured one are dropped silently
//! (unless the configured id is the `"*"` wildcard). teloxide's dispatcher
//! keys handling by chat, so replies within one chat stay ordered.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ChatAction;
use teloxide::RequestError;

use crate::config::{KinosSettings, TelegramSettings};
use crate::error::Error;
use crate::kinos::{media, reply_text, AgentRef, KinosClient, MessagePayload};

/// Caption substitute when a photo arrives without one.
const DEFAULT_PHOTO_CAPTION: &str = "Look at this image!";

/// Reply used when the upstream call fails.
const UPSTREAM_FAILURE_REPLY: &str = "Sorry, I couldn't reach Simba right now.";

const GREETING: &str = "Hello! I'm the Simba bot. Send me a message and I'll reply!";

const HELP_TEXT: &str =
    "You can send me text messages or images, and I'll answer as Simba!";

struct BotContext {
    client: KinosClient,
    agent: AgentRef,
    settings: TelegramSettings,
}

/// Run the bot until interrupted. Fails fast when either the KinOS or the
/// Telegram configuration is missing.
pub async fn run_bot_daemon() -> crate::error::Result<()> {
    let kinos = KinosSettings::from_env()?;
    let telegram = TelegramSettings::from_env()?;

    tracing::info!("Starting Telegram bot for chat {}", telegram.chat_id);

    let bot = Bot::new(telegram.bot_token.clone());

    if let Err(e) = bot
        .set_my_commands(vec![
            teloxide::types::BotCommand::new("start", "Greeting"),
            teloxide::types::BotCommand::new("help", "Show help"),
        ])
        .await
    {
        tracing::warn!("Failed to set commands: {}", e);
    }

    let ctx = Arc::new(BotContext {
        client: KinosClient::new(&kinos),
        agent: AgentRef::simba(),
        settings: telegram,
    });

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let ctx = ctx.clone();
        async move { handle_update(bot, msg, ctx).await }
    })
    .await;

    Ok(())
}

async fn handle_update(
    bot: Bot,
    msg: Message,
    ctx: Arc<BotContext>,
) -> Result<(), RequestError> {
    if !ctx.settings.allows_chat(msg.chat.id.0) {
        tracing::warn!("Dropping update from unauthorized chat {}", msg.chat.id);
        return Ok(());
    }

    if let Some(text) = msg.text() {
        if let Some(cmd) = text.strip_prefix('/') {
            match cmd.split_whitespace().next().unwrap_or("") {
                "start" => {
                    bot.send_message(msg.chat.id, GREETING).await?;
                }
                "help" => {
                    bot.send_message(msg.chat.id, HELP_TEXT).await?;
                }
                // Unknown commands are a no-op.
                _ => {}
            }
            return Ok(());
        }
    }

    if msg.photo().is_some() {
        return handle_photo(bot, msg, ctx).await;
    }

    if let Some(text) = msg.text() {
        let text = text.to_string();
        return handle_text(bot, msg, ctx, text, None).await;
    }

    Ok(())
}

/// Forward a text (and optionally an encoded image) to KinOS and reply with
/// the normalized response.
async fn handle_text(
    bot: Bot,
    msg: Message,
    ctx: Arc<BotContext>,
    text: String,
    images: Option<Vec<String>>,
) -> Result<(), RequestError> {
    tracing::info!("Message received: {}", text);

    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let payload = MessagePayload::new(text).with_images(images.unwrap_or_default());
    let reply = match ctx.client.send_message(&ctx.agent, &payload).await {
        Some(result) => reply_text(&result).unwrap_or_else(|| {
            tracing::warn!("No content in response: {}", result);
            UPSTREAM_FAILURE_REPLY.to_string()
        }),
        None => UPSTREAM_FAILURE_REPLY.to_string(),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Download the largest photo variant, encode it as a data URL, and forward
/// it with the caption (or a placeholder when the caption is empty).
async fn handle_photo(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<(), RequestError> {
    let Some(largest) = msg.photo().and_then(|sizes| sizes.last()) else {
        return Ok(());
    };

    let caption = msg
        .caption()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_PHOTO_CAPTION)
        .to_string();

    let image = match download_file_bytes(&ctx.settings.bot_token, &largest.file.id).await {
        Ok(bytes) => media::data_url("image/jpeg", &bytes),
        Err(e) => {
            tracing::error!("Failed to download photo: {}", e);
            bot.send_message(msg.chat.id, UPSTREAM_FAILURE_REPLY).await?;
            return Ok(());
        }
    };

    handle_text(bot, msg, ctx, caption, Some(vec![image])).await
}

/// Fetch a file's bytes through the Bot API getFile/file endpoints.
async fn download_file_bytes(token: &str, file_id: &str) -> crate::error::Result<Vec<u8>> {
    let get_file_url = format!(
        "https://api.telegram.org/bot{}/getFile?file_id={}",
        token, file_id
    );
    let value: serde_json::Value = reqwest::get(get_file_url).await?.json().await?;
    let file_path = value
        .get("result")
        .and_then(|r| r.get("file_path"))
        .and_then(|p| p.as_str())
        .ok_or_else(|| Error::Telegram("getFile returned no file_path".to_string()))?;

    let download_url = format!("https://api.telegram.org/file/bot{}/{}", token, file_path);
    let bytes = reqwest::get(download_url).await?.bytes().await?;

    Ok(bytes.to_vec())
}
