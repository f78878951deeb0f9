// src/cli.rs
//! CLI definitions for scrimshaw
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "scrimshaw")]
#[command(author = "Scrimshaw Project")]
#[command(version)]
#[command(about = "Engrave text-art images into JAR class files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inject text-art constants into a JAR's classes
    Inject {
        /// Path to the input JAR
        jar: PathBuf,

        /// Image file to encode (repeatable; assigned to classes round-robin)
        #[arg(short, long = "image", value_name = "FILE")]
        images: Vec<PathBuf>,

        /// Directory of images to encode, walked recursively in name order
        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,

        /// Text-art width in characters (omitted: clamped original size)
        #[arg(short, long)]
        width: Option<u32>,

        /// Class entry to inject into, e.g. com/example/Main.class
        /// (repeatable; default: every class)
        #[arg(short, long = "class", value_name = "ENTRY")]
        classes: Vec<String>,

        /// Output path (default: input with _injected before the extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Re-roll generated field names that collide with existing fields
        #[arg(long)]
        unique_names: bool,
    },

    /// List the class entries of a JAR, sorted
    List {
        /// Path to the JAR
        jar: PathBuf,
    },

    /// Encode one image and print the text art to stdout
    Preview {
        /// Path to the image
        image: PathBuf,

        /// Text-art width in characters (omitted: clamped original size)
        #[arg(short, long)]
        width: Option<u32>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}
