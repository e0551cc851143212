use clap::Parser;
use scramble_core::DEFAULT_CLASS_NAME_LENGTH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scramble")]
#[command(version)]
#[command(about = "Obfuscate CSS class names and image filenames across a web project")]
#[command(long_about = "A CLI tool that renames every CSS class selector and every file under the project's img directory to random names, and rewrites the CSS, HTML and JS files that reference them. Move third-party libraries out of the project before running it.")]
pub struct Cli {
    #[arg(help = "Project root (defaults to current directory)")]
    pub target: Option<PathBuf>,

    #[arg(long, help = "Perform a dry run without making changes")]
    pub dry_run: bool,

    #[arg(long, help = "Show a diff of every content change")]
    pub diff: bool,

    #[arg(long, help = "Seed the name generator for reproducible names")]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_CLASS_NAME_LENGTH, value_parser = parse_class_length, help = "Length of generated class names")]
    pub class_length: usize,

    #[arg(short, long, help = "Skip the confirmation prompt")]
    pub yes: bool,

    #[arg(long, help = "Print the class and image name mappings when done")]
    pub print_mapping: bool,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether to ask before renaming. Nothing is asked without a terminal
    /// to answer on, so scripted runs go ahead.
    pub fn needs_confirmation(&self, interactive: bool) -> bool {
        !self.dry_run && !self.yes && interactive
    }
}

fn parse_class_length(s: &str) -> Result<usize, String> {
    let length: usize = s
        .parse()
        .map_err(|_| format!("Invalid class name length '{}', expected a positive number", s))?;
    if length == 0 {
        return Err("Class name length must be at least 1".to_string());
    }
    Ok(length)
}
