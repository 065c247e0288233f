//! Simba - Telegram-first companion CLI for the Simba agent on KinOS.

use clap::Parser;
use std::process::ExitCode;

use simba::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let _guard = match simba::logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let args = Commands::parse();

    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
