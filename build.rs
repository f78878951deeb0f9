// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: text-art width
fn width_arg() -> Arg {
    Arg::new("width")
        .short('w')
        .long("width")
        .value_name("CHARS")
        .help("Text-art width in characters (omitted: clamped original size)")
}

fn build_cli() -> Command {
    Command::new("scrimshaw")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Scrimshaw Contributors")
        .about("Engrave text-art images into JAR class files")
        .subcommand_required(false)
        .subcommand(
            Command::new("inject")
                .about("Inject text-art constants into a JAR's classes")
                .arg(Arg::new("jar").required(true).help("Path to the input JAR"))
                .arg(
                    Arg::new("images")
                        .short('i')
                        .long("image")
                        .value_name("FILE")
                        .action(clap::ArgAction::Append)
                        .help("Image file to encode (repeatable)"),
                )
                .arg(
                    Arg::new("image_dir")
                        .long("image-dir")
                        .value_name("DIR")
                        .help("Directory of images to encode"),
                )
                .arg(width_arg())
                .arg(
                    Arg::new("classes")
                        .short('c')
                        .long("class")
                        .value_name("ENTRY")
                        .action(clap::ArgAction::Append)
                        .help("Class entry to inject into (repeatable; default: every class)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output path (default: input with _injected before the extension)"),
                )
                .arg(
                    Arg::new("unique_names")
                        .long("unique-names")
                        .action(clap::ArgAction::SetTrue)
                        .help("Re-roll generated field names that collide with existing fields"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List the class entries of a JAR, sorted")
                .arg(Arg::new("jar").required(true).help("Path to the JAR")),
        )
        .subcommand(
            Command::new("preview")
                .about("Encode one image and print the text art to stdout")
                .arg(Arg::new("image").required(true).help("Path to the image"))
                .arg(width_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("scrimshaw.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }
}
