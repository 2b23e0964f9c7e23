//! Init command implementation

use crate::config::{GoSource, ManifestSource, Source};
use crate::Config;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a new configuration file")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .value_name("FILE")
                .default_value(".descgen.yaml"),
        )
        .arg(
            clap::Arg::new("example")
                .short('e')
                .long("example")
                .help("Create example configuration")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("force")
                .short('f')
                .long("force")
                .help("Overwrite an existing file")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Output path is required"))?;
    let example = matches.get_flag("example");

    if output_path.exists() && !matches.get_flag("force") {
        return Err(anyhow!(
            "{:?} already exists, use --force to overwrite it",
            output_path
        ));
    }

    info!("Initializing configuration file: {:?}", output_path);

    let config = if example {
        create_example_config()
    } else {
        create_starter_config()
    };

    config.save_to_file(&output_path)?;

    info!("Configuration file created: {:?}", output_path);

    if example {
        println!("Example configuration created with Go and manifest sources.");
        println!("Edit the file to customize your sources and settings.");
    } else {
        println!("Configuration file created with a single Go source.");
        println!("Point it at your packages to get started.");
    }

    Ok(())
}

fn create_starter_config() -> Config {
    let mut config = Config::default();
    config.sources.push(Source::Go(GoSource::new("models", "./")));
    config
}

fn create_example_config() -> Config {
    let mut config = Config::default();

    let mut api = GoSource::new("api", "./api/v1");
    api.exclude_patterns.push("**/zz_generated*.go".to_string());
    config.sources.push(Source::Go(api));

    config.sources.push(Source::Manifest(ManifestSource::new(
        "extra",
        "./declarations.yaml",
    )));

    config.synthesis.root_key = Some("_description".to_string());
    config.output.base_path = PathBuf::from("./generated/descriptions");
    config.output.format = crate::OutputFormat::Jsonnet;

    config
}
