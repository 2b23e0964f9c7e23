//! Validate command implementation

use crate::cli::utils;
use crate::config::Source;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::{info, warn};

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate configuration file")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    let config = utils::load_config(matches)?;

    println!("Configuration file is valid!");
    println!("Version: {}", config.version);
    println!("Sources: {}", config.sources.len());
    println!("Output path: {:?}", config.output.base_path);
    println!("Output format: {}", config.output.format);

    for source in &config.sources {
        let kind = match source {
            Source::Go(_) => "Go",
            Source::Manifest(_) => "manifest",
        };
        println!("  - {} ({}): {:?}", source.name(), kind, source.path());

        match source.resolved_path() {
            Ok(path) if path.exists() => {}
            Ok(path) => {
                warn!("Source {} path does not exist: {:?}", source.name(), path);
                println!("    Warning: path does not exist");
            }
            Err(e) => println!("    Warning: {e}"),
        }
    }

    Ok(())
}
