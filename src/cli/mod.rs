//! CLI commands using clap.
//!
//! One subcommand per task. Each command reports its outcome on stdout the
//! way the original operator scripts did; an upstream failure is printed and
//! the process still exits cleanly. Only missing configuration fails the run.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{KinosSettings, TelegramSettings};
use crate::kinos::response::{metadata_str, ImageResult};
use crate::kinos::{
    media, reply_text, AgentRef, AnalysisPayload, CreateKinPayload, ImageGenPayload, KinosClient,
    MessagePayload, Mode, ThinkingPayload,
};
use crate::telegram::{run_bot_daemon, Relay};

const DEFAULT_ANALYSIS_MESSAGE: &str = "Analyze Simba's current emotional state. \
How is he feeling? What are his current concerns? What are his desires and needs?";

const DEFAULT_ANALYSIS_SYSTEM: &str = "Provide an in-depth analysis of Simba's current \
emotional state based on his recent conversations, memories and personality. Identify his \
dominant emotions, concerns, desires and needs. Provide a detailed but accessible \
psychological analysis.";

/// Simba - Telegram-first companion CLI for the Simba agent on KinOS.
#[derive(Parser)]
#[command(name = "simba")]
#[command(version = "0.1.0")]
#[command(about = "Talk to the Simba agent on KinOS", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send a message to Simba and print the reply
    Send {
        /// Message to send
        message: String,

        /// Image files to attach
        #[arg(long, num_args = 1..)]
        images: Vec<String>,

        /// Attachment references to include
        #[arg(long, num_args = 1..)]
        attachments: Vec<String>,

        /// Model to use
        #[arg(long, default_value = crate::kinos::request::DEFAULT_MODEL)]
        model: String,

        /// Conversation history window
        #[arg(long, default_value_t = crate::kinos::request::DEFAULT_HISTORY_LENGTH)]
        history_length: u32,

        /// Response mode
        #[arg(long, value_enum, default_value_t = Mode::Creative)]
        mode: Mode,

        /// Supplemental system instructions
        #[arg(long)]
        add_system: Option<String>,
    },

    /// Run an emotional analysis (not recorded in conversation history)
    Analyze {
        /// Analysis prompt
        #[arg(long, default_value = DEFAULT_ANALYSIS_MESSAGE)]
        message: String,

        /// Image files to attach
        #[arg(long, num_args = 1..)]
        images: Vec<String>,

        /// Model to use
        #[arg(long, default_value = crate::kinos::request::DEFAULT_MODEL)]
        model: String,

        /// Supplemental system instructions
        #[arg(long, default_value = DEFAULT_ANALYSIS_SYSTEM)]
        add_system: String,
    },

    /// Trigger the autonomous-thinking background job
    Think {
        /// Number of thinking iterations
        #[arg(long, default_value_t = 3)]
        iterations: u32,

        /// Seconds to wait between iterations
        #[arg(long, default_value_t = 600)]
        wait_time: u32,
    },

    /// Create a kin under the simba blueprint
    CreateKin {
        /// Name of the new kin
        #[arg(default_value = "simba")]
        name: String,

        /// Template to use instead of the blueprint default
        #[arg(long)]
        template_override: Option<String>,
    },

    /// Generate an image, show it to Simba, and relay it to Telegram
    Image {
        /// Prompt for the image
        prompt: String,

        /// Aspect ratio
        #[arg(long, default_value = "ASPECT_1_1")]
        aspect_ratio: String,

        /// Generation model
        #[arg(long, default_value = "V_2")]
        model: String,

        /// Magic prompt option
        #[arg(long = "magic-prompt", default_value = "AUTO")]
        magic_prompt: String,

        /// Message sent to Simba along with the image
        #[arg(long, default_value = "Here is the image I drew for you!")]
        message: String,

        /// Skip the Telegram notification
        #[arg(long)]
        no_telegram: bool,

        /// Do not send the generated image back to Simba
        #[arg(long)]
        no_send_to_kin: bool,
    },

    /// Run the Telegram bot daemon
    Telegram,
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Send {
                message,
                images,
                attachments,
                model,
                history_length,
                mode,
                add_system,
            } => {
                cmd_send(message, images, attachments, model, history_length, mode, add_system)
                    .await
            }
            Command::Analyze {
                message,
                images,
                model,
                add_system,
            } => cmd_analyze(message, images, model, add_system).await,
            Command::Think {
                iterations,
                wait_time,
            } => cmd_think(iterations, wait_time).await,
            Command::CreateKin {
                name,
                template_override,
            } => cmd_create_kin(name, template_override).await,
            Command::Image {
                prompt,
                aspect_ratio,
                model,
                magic_prompt,
                message,
                no_telegram,
                no_send_to_kin,
            } => {
                cmd_image(
                    prompt,
                    aspect_ratio,
                    model,
                    magic_prompt,
                    message,
                    no_telegram,
                    no_send_to_kin,
                )
                .await
            }
            Command::Telegram => {
                run_bot_daemon().await?;
                Ok(())
            }
        }
    }
}

fn kinos_client() -> Result<KinosClient> {
    let settings = KinosSettings::from_env()?;
    Ok(KinosClient::new(&settings))
}

/// Print the normalized reply, or the full raw mapping when neither reply
/// key is present.
fn print_reply(result: &serde_json::Value) {
    match reply_text(result) {
        Some(text) => println!("{}", text),
        None => {
            println!("No content in response. Full response:");
            println!(
                "{}",
                serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string())
            );
        }
    }
}

async fn cmd_send(
    message: String,
    images: Vec<String>,
    attachments: Vec<String>,
    model: String,
    history_length: u32,
    mode: Mode,
    add_system: Option<String>,
) -> Result<()> {
    let client = kinos_client()?;
    let payload = MessagePayload::new(message)
        .with_model(model)
        .with_history_length(history_length)
        .with_mode(mode)
        .with_add_system(add_system)
        .with_image_files(&images)
        .with_attachments(attachments);

    match client.send_message(&AgentRef::simba(), &payload).await {
        Some(result) => {
            println!("\nSimba's reply:");
            println!("{}", "-".repeat(50));
            print_reply(&result);
            println!("{}", "-".repeat(50));
            for line in send_metadata_lines(&result) {
                println!("{}", line);
            }
        }
        None => println!("Failed to send the message"),
    }
    Ok(())
}

/// Metadata lines printed after a message reply, in the order the original
/// report used: id, status, role, timestamp. Absent keys produce no line.
fn send_metadata_lines(result: &serde_json::Value) -> Vec<String> {
    [
        ("Message id", "id"),
        ("Status", "status"),
        ("Role", "role"),
        ("Timestamp", "timestamp"),
    ]
    .iter()
    .filter_map(|(label, key)| metadata_str(result, key).map(|v| format!("{}: {}", label, v)))
    .collect()
}

async fn cmd_analyze(
    message: String,
    images: Vec<String>,
    model: String,
    add_system: String,
) -> Result<()> {
    let client = kinos_client()?;
    let payload = AnalysisPayload::new(message)
        .with_model(model)
        .with_add_system(Some(add_system))
        .with_image_files(&images);

    match client.analyze(&AgentRef::simba(), &payload).await {
        Some(result) => {
            println!("\nSimba's emotional analysis:");
            println!("{}", "=".repeat(60));
            print_reply(&result);
            println!("{}", "=".repeat(60));
            if let Some(status) = metadata_str(&result, "status") {
                println!("Status: {}", status);
            }
            if let Some(mode) = metadata_str(&result, "mode") {
                println!("Mode: {}", mode);
            }
        }
        None => println!("Analysis failed"),
    }
    Ok(())
}

async fn cmd_think(iterations: u32, wait_time: u32) -> Result<()> {
    let client = kinos_client()?;
    let payload = ThinkingPayload {
        iterations,
        wait_time,
    };

    match client.autonomous_thinking(&AgentRef::simba(), &payload).await {
        Some(result) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string())
            );
            println!("Autonomous thinking started for simba/simba");
            let iters = result
                .get("iterations")
                .and_then(|v| v.as_u64())
                .unwrap_or(iterations as u64);
            let wait = result
                .get("wait_time")
                .and_then(|v| v.as_u64())
                .unwrap_or(wait_time as u64);
            println!("Iterations: {}", iters);
            println!("Wait between iterations: {} seconds", wait);
        }
        None => println!("Failed to start autonomous thinking"),
    }
    Ok(())
}

async fn cmd_create_kin(name: String, template_override: Option<String>) -> Result<()> {
    let client = kinos_client()?;
    let payload = CreateKinPayload::new(&name).with_template_override(template_override);

    match client.create_kin(&AgentRef::simba(), &payload).await {
        Some(result) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string())
            );
            println!("Kin '{}' created successfully!", name);
            if let Some(id) = metadata_str(&result, "id") {
                println!("Kin id: {}", id);
            }
            if let Some(status) = metadata_str(&result, "status") {
                println!("Status: {}", status);
            }
        }
        None => println!("Failed to create the kin"),
    }
    Ok(())
}

async fn cmd_image(
    prompt: String,
    aspect_ratio: String,
    model: String,
    magic_prompt: String,
    message: String,
    no_telegram: bool,
    no_send_to_kin: bool,
) -> Result<()> {
    let client = kinos_client()?;
    let payload = ImageGenPayload::new(&prompt)
        .with_aspect_ratio(aspect_ratio)
        .with_model(model)
        .with_magic_prompt(magic_prompt);

    println!("Generating image for prompt: {}", prompt);
    let Some(result) = client.generate_image(&AgentRef::simba(), &payload).await else {
        println!("Image generation failed");
        return Ok(());
    };

    let image = ImageResult::new(&result);
    println!("\nImage generated:");
    println!("{}", "-".repeat(50));
    if let Some(id) = image.id() {
        println!("Id: {}", id);
    }
    if let Some(status) = image.status() {
        println!("Status: {}", status);
    }
    if let Some(p) = image.prompt() {
        println!("Prompt: {}", p);
    }
    if let Some(created) = image.created_at() {
        println!("Created at: {}", created);
    }

    let Some(url) = image.url() else {
        println!("Image URL not found in the response");
        return Ok(());
    };
    println!("Image URL: {}", url);
    if let Some(path) = image.local_path() {
        println!("Local path: {}", path);
    }

    if !no_send_to_kin {
        println!("\nSending the image to Simba...");
        match media::fetch_data_url(url).await {
            Some(data_url) => {
                let payload = MessagePayload::new(&message).with_images(vec![data_url]);
                match client.send_message(&AgentRef::simba(), &payload).await {
                    Some(reply) => match reply_text(&reply) {
                        Some(text) => {
                            println!("\nSimba's reply:");
                            println!("{}", "-".repeat(50));
                            println!("{}", text);
                            println!("{}", "-".repeat(50));
                        }
                        None => println!("No reply from Simba"),
                    },
                    None => println!("Failed to send the image to Simba"),
                }
            }
            None => println!("Failed to download the generated image"),
        }
    }

    if !no_telegram {
        match TelegramSettings::from_env_optional().and_then(|s| Relay::from_settings(&s)) {
            Some(relay) => {
                relay
                    .send_photo(url, &format!("Simba drew: {}", prompt))
                    .await;
            }
            None => println!("TELEGRAM_BOT_TOKEN and/or TELEGRAM_CHAT_ID not set"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_metadata_includes_role() {
        let result = json!({
            "id": "m1",
            "status": "completed",
            "role": "assistant",
            "timestamp": "2025-01-01T00:00:00Z"
        });
        assert_eq!(
            send_metadata_lines(&result),
            vec![
                "Message id: m1",
                "Status: completed",
                "Role: assistant",
                "Timestamp: 2025-01-01T00:00:00Z"
            ]
        );
    }

    #[test]
    fn test_absent_metadata_keys_are_skipped() {
        let result = json!({"status": "ok"});
        assert_eq!(send_metadata_lines(&result), vec!["Status: ok"]);
    }

    #[test]
    fn test_analyze_defaults_keep_psychological_prompt() {
        let args = Commands::try_parse_from(["simba", "analyze"]).unwrap();
        let Command::Analyze {
            message,
            add_system,
            ..
        } = args.command
        else {
            panic!("expected the analyze subcommand");
        };
        assert!(message.starts_with("Analyze Simba's current emotional state"));
        assert!(add_system.contains("psychological analysis"));
    }
}
