//! Generate command implementation

use crate::cli::utils;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    let command = Command::new("generate")
        .about("Generate description artifacts from configured sources")
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory")
                .value_name("DIR"),
        )
        .arg(
            clap::Arg::new("force")
                .short('f')
                .long("force")
                .help("Regenerate even if sources haven't changed")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("dry-run")
                .long("dry-run")
                .help("Don't write files")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("fail-fast")
                .long("fail-fast")
                .help("Stop on first error")
                .action(clap::ArgAction::SetTrue),
        );

    utils::synthesis_args(command)
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Starting description generation");

    let mut config = utils::load_config(matches)?;

    // Override output path if specified
    if let Some(output_path) = matches.get_one::<String>("output") {
        config.output.base_path = PathBuf::from(output_path);
    }
    if let Some(format) = utils::format_override(matches)? {
        config.output.format = format;
    }
    utils::apply_synthesis_args(matches, &mut config.synthesis);

    if matches.get_flag("fail-fast") {
        config.generation.fail_fast = true;
    }

    let app = utils::create_app(config, matches)?;

    if matches.get_flag("dry-run") {
        info!("Dry run mode - no files will be written");
        println!("Dry run mode - no files will be written");

        let result = app.dry_run().await?;

        println!("Files that would be generated: {}", result.files_would_generate());
        println!("Planning time: {}ms", result.total_processing_time_ms);

        for source_result in result.results {
            let state = if source_result.up_to_date {
                "up to date"
            } else {
                "would regenerate"
            };
            println!(
                "  {} ({}): {}, {}/{} declarations described",
                source_result.source_name,
                source_result.source_type,
                state,
                source_result.declarations_described,
                source_result.declarations_total
            );
            for path in &source_result.planned_files {
                println!("    {}", path.display());
            }
            for error in source_result.errors {
                eprintln!("    Error: {error}");
            }
            for warning in source_result.warnings {
                println!("    Warning: {warning}");
            }
        }

        return Ok(());
    }

    let result = app.generate(matches.get_flag("force")).await?;

    println!(
        "Sources processed: {}/{} ({} up to date)",
        result.sources_processed, result.total_sources, result.statistics.sources_up_to_date
    );
    println!("Files generated: {}", result.statistics.files_generated);
    println!(
        "Declarations described: {}",
        result.statistics.declarations_described
    );
    println!(
        "Processing time: {}ms",
        result.statistics.total_processing_time_ms
    );

    for source_result in &result.results {
        if source_result.skipped {
            println!("  {}: up to date", source_result.source_name);
        } else {
            println!(
                "  {} ({}): {} files generated in {:?}",
                source_result.source_name,
                source_result.source_type,
                source_result.files_generated,
                source_result.output_path
            );
        }
        for error in &source_result.errors {
            eprintln!("    Error: {error}");
        }
        for warning in &source_result.warnings {
            println!("    Warning: {warning}");
        }
    }

    if result.statistics.error_count > 0 {
        return Err(anyhow!(
            "Generation finished with {} errors",
            result.statistics.error_count
        ));
    }

    println!("Generation completed successfully!");
    Ok(())
}
