mod commands;
mod logging;
mod progress;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use emailmover_core::{
    normalize, report, subject, AppConfig, ManifestIndex, MatchingEngine, ProgressReporter,
    Relocator,
};
use progress::CliReporter;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match emailmover_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Process { relocate }) => {
            if let Err(err) = run_process(&config, relocate || config.relocate) {
                error!("Error: {:#}", err);
            }
        }
        Some(Commands::Normalize { path }) => {
            println!("{}", normalize::normalize_path(&path));
        }
        Some(Commands::Subject { file }) => {
            if let Err(err) = run_subject(&file) {
                error!("Error: {:#}", err);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }
}

fn run_process(config: &AppConfig, relocate: bool) -> anyhow::Result<()> {
    let reporter = CliReporter::new();

    info!("Interpreting {}", config.manifest_path.display());
    let mut index = ManifestIndex::load(
        &config.manifest_path,
        &config.source_root,
        &config.target_root,
    )
    .with_context(|| format!("reading manifest {}", config.manifest_path.display()))?;
    reporter.on_manifest_loaded(index.len(), index.subject_count());

    report::export_manifest(&index, &config.output_dir).context("writing manifest table")?;

    let stats = MatchingEngine::new().scan(&mut index, &reporter);

    report::export_results(&index, &config.output_dir).context("writing audit tables")?;

    info!(
        "{} matched, {} questionable, {} without subject, {} unreadable",
        format!("{}", stats.matched).green(),
        format!("{}", stats.questionable).yellow(),
        format!("{}", stats.no_subject).red(),
        format!("{}", stats.extraction_failures).red(),
    );
    if stats.missing_directories > 0 || stats.conflicts > 0 {
        info!(
            "{} directories missing, {} classification conflicts",
            format!("{}", stats.missing_directories).red(),
            format!("{}", stats.conflicts).red(),
        );
    }

    if relocate {
        info!("Moving files");
        Relocator::new().relocate_all(&index, &reporter);
    } else {
        info!("Relocation disabled; pass --relocate or set relocate = true to move files");
    }

    Ok(())
}

fn run_subject(file: &Path) -> anyhow::Result<()> {
    match subject::extract_subject(file)? {
        Some(subject) => println!("{}", subject),
        None => println!("{}", "(no subject)".dimmed()),
    }
    Ok(())
}
