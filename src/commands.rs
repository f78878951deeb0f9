// src/commands.rs
//! Command handlers for the scrimshaw CLI

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use scrimshaw::textart;
use scrimshaw::{default_output_path, ArtInjector, ClassArchive};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::cli::Cli;

/// Blocks beyond this many characters bloat the constant pool noticeably.
const LARGE_BLOCK_CHARS: usize = 100_000;

/// The full pipeline: encode images, load the JAR, inject, save.
#[allow(clippy::too_many_arguments)]
pub fn inject(
    jar: &Path,
    images: Vec<PathBuf>,
    image_dir: Option<PathBuf>,
    width: Option<u32>,
    classes: Vec<String>,
    output: Option<PathBuf>,
    unique_names: bool,
) -> Result<()> {
    let mut image_paths = images;
    if let Some(dir) = image_dir {
        image_paths.extend(collect_images(&dir)?);
    }
    if image_paths.is_empty() {
        bail!("no images given; pass --image or --image-dir");
    }

    let bar = ProgressBar::new(image_paths.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{msg} [{bar:30}] {pos}/{len}",
    )?);
    bar.set_message("encoding images");
    let mut blocks = Vec::with_capacity(image_paths.len());
    for path in &image_paths {
        let block = textart::encode_file(path, width)
            .with_context(|| format!("converting {}", path.display()))?;
        if block.len() > LARGE_BLOCK_CHARS {
            warn!(
                image = %path.display(),
                chars = block.len(),
                "large text-art block; consider --width"
            );
        }
        blocks.push(block);
        bar.inc(1);
    }
    bar.finish_and_clear();
    info!(images = image_paths.len(), "encoded images");

    let mut archive = ClassArchive::load(jar)?;
    let selection: Option<BTreeSet<String>> = if classes.is_empty() {
        None
    } else {
        Some(classes.into_iter().collect())
    };
    if let Some(selected) = &selection {
        let present = archive.class_names();
        for name in selected {
            if !present.contains(name) {
                warn!(class = %name, "selected class not present in archive");
            }
        }
    }

    let mut injector = ArtInjector::new(blocks).with_unique_names(unique_names);
    if let Some(selected) = selection.clone() {
        injector = injector.with_selection(selected);
    }
    let stats = injector.stats();
    archive.add_transformer(Box::new(injector));

    match &selection {
        Some(selected) => archive.transform_selected(selected),
        None => archive.transform(),
    }

    let output = output.unwrap_or_else(|| default_output_path(jar));
    archive.save(&output)?;

    println!("Injected {} classes", stats.processed());
    println!("Output file: {}", output.display());
    Ok(())
}

/// Print the sorted class entries of a JAR.
pub fn list(jar: &Path) -> Result<()> {
    let archive = ClassArchive::load(jar)?;
    for name in archive.sorted_class_names() {
        println!("{name}");
    }
    Ok(())
}

/// Encode one image and print it.
pub fn preview(image: &Path, width: Option<u32>) -> Result<()> {
    let art = textart::encode_file(image, width)?;
    print!("{art}");
    Ok(())
}

/// Emit completion scripts for the given shell.
pub fn completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

/// Every regular file under `dir`, walked in file-name order so batches are
/// assigned to classes deterministically.
fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if entry.file_type().is_file() {
            paths.push(entry.into_path());
        }
    }
    if paths.is_empty() {
        bail!("no image files found under {}", dir.display());
    }
    Ok(paths)
}
