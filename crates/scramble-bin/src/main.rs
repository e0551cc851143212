mod cli;
mod diff;

use anyhow::Result;
use cli::Cli;
use scramble_core::{NameGenerator, NameMapping, ObfuscationReport, RunOptions};
use std::io::IsTerminal;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting scramble");

    handle_run(cli)?;

    info!("Scramble completed successfully");
    Ok(())
}

fn handle_run(cli: Cli) -> Result<()> {
    let target_dir = match cli.target.clone() {
        Some(target) => target,
        None => std::env::current_dir()?,
    };

    info!("Target directory: {:?}", target_dir);
    info!("Class name length: {}", cli.class_length);

    if cli.dry_run {
        warn!("Dry run mode - no changes will be made");
    }

    if !target_dir.exists() {
        anyhow::bail!("Target directory does not exist: {:?}", target_dir);
    }

    if !target_dir.is_dir() {
        anyhow::bail!("Target must be a directory: {:?}", target_dir);
    }

    let interactive = std::io::stdin().is_terminal();
    if cli.needs_confirmation(interactive) {
        if !diff::confirm_run(&target_dir)? {
            println!("Aborted, nothing was changed.");
            return Ok(());
        }
    } else if !cli.dry_run && !cli.yes {
        warn!("No terminal to confirm on, renaming without asking. Move third-party libraries out of the project first.");
    }

    let mut generator = match cli.seed {
        Some(seed) => {
            info!("Using seed: {}", seed);
            NameGenerator::seeded(seed)
        }
        None => NameGenerator::from_entropy(),
    };
    let options = RunOptions {
        dry_run: cli.dry_run,
        class_name_length: cli.class_length,
    };

    let report = if cli.diff {
        scramble_core::obfuscate_project_with(
            &target_dir,
            &mut generator,
            &options,
            diff::show_content_diff,
            diff::show_rename,
        )?
    } else {
        scramble_core::obfuscate_project(&target_dir, &mut generator, &options)?
    };

    print_report(&target_dir, &report, cli.dry_run);

    if cli.print_mapping {
        print_mapping("Class names", &report.class_names);
        print_mapping("Image names", &report.image_names);
    }

    Ok(())
}

fn print_report(target_dir: &Path, report: &ObfuscationReport, dry_run: bool) {
    if dry_run {
        println!("Dry run complete, no files in {} were changed.", target_dir.display());
    } else {
        println!("Class and image names have been updated across CSS, HTML, and JS files.");
    }
    println!("  Class names mapped: {}", report.class_names.len());
    println!("  Image names mapped: {}", report.image_names.len());
    println!(
        "  Files processed: {}",
        report.classes.files_processed + report.images.files_processed
    );
    println!("  Paths renamed: {}", report.images.paths_renamed);
    println!(
        "  Content changes: {}",
        report.classes.content_changes + report.images.content_changes
    );
}

fn print_mapping(title: &str, mapping: &NameMapping) {
    println!("\n{}:", title);
    if mapping.is_empty() {
        println!("  (none)");
    }
    for (original, replacement) in mapping.iter() {
        println!("  {} -> {}", original, replacement);
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}
