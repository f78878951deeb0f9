// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inject {
            jar,
            images,
            image_dir,
            width,
            classes,
            output,
            unique_names,
        }) => commands::inject(&jar, images, image_dir, width, classes, output, unique_names),
        Some(Commands::List { jar }) => commands::list(&jar),
        Some(Commands::Preview { image, width }) => commands::preview(&image, width),
        Some(Commands::Completions { shell }) => commands::completions(shell),
        None => {
            // No command provided, show help pointer
            println!("Scrimshaw v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'scrimshaw --help' for usage information");
            Ok(())
        }
    }
}
