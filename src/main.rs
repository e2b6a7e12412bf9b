//! Main entry point for the batch translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod core;
mod lang;
mod splitter;
mod stub;

use cli::commands::Commands;

/// Batched sentence translation driver for IndicTrans2-style models
#[derive(Parser, Debug)]
#[command(name = "indic-translator", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("indic_translator={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Execute command
    match args.command {
        Some(Commands::Split { lang, text, file }) => {
            cli::commands::handle_split(lang, text, file)?;
        }
        Some(Commands::Translate {
            source_lang,
            target_lang,
            text,
            file,
            output,
            batch_size,
            beam_width,
            max_length,
        }) => {
            cli::commands::handle_translate(
                source_lang,
                target_lang,
                text,
                file,
                output,
                batch_size,
                beam_width,
                max_length,
            )?;
        }
        Some(Commands::Languages) => {
            cli::commands::handle_languages();
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
