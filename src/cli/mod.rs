//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("descgen")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Synthesize description trees from documented type declarations")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::generate::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::inspect::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("generate", sub_matches)) => commands::generate::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("inspect", sub_matches)) => commands::inspect::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::{anyhow, Result};
    use clap::{Arg, ArgAction, ArgMatches, Command};
    use std::path::PathBuf;

    use crate::{DescGen, LockfileManager, OutputFormat, SynthesisOptions};

    /// Configuration file names looked up in the working directory
    pub const DEFAULT_CONFIG_FILES: [&str; 4] = [
        ".descgen.yaml",
        ".descgen.yml",
        "descgen.yaml",
        "descgen.yml",
    ];

    /// Get configuration file path from arguments or use default
    pub fn get_config_path(matches: &ArgMatches) -> Result<PathBuf> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            return Ok(PathBuf::from(config_path));
        }

        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
            .ok_or_else(|| {
                anyhow!("No configuration file found. Use --config to specify a file or create one with 'descgen init'")
            })
    }

    /// Load configuration from file
    pub fn load_config(matches: &ArgMatches) -> Result<crate::Config> {
        let config_path = get_config_path(matches)?;
        crate::Config::from_file(&config_path)
    }

    /// Create a DescGen instance whose lockfile sits next to the configuration
    pub fn create_app(config: crate::Config, matches: &ArgMatches) -> Result<DescGen> {
        let config_path = get_config_path(matches)?;
        Ok(DescGen::new(config)?.with_lockfile(LockfileManager::for_config(
            &config_path,
            env!("CARGO_PKG_VERSION"),
        )))
    }

    pub fn config_arg() -> Arg {
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path")
            .value_name("FILE")
    }

    /// Arguments that override synthesis and output settings
    pub fn synthesis_args(command: Command) -> Command {
        command
            .arg(
                Arg::new("format")
                    .long("format")
                    .help("Output format: json, yaml, jsonnet or go")
                    .value_name("FORMAT"),
            )
            .arg(
                Arg::new("doc-only")
                    .long("doc-only")
                    .help("Only use documentation comments")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("no-aliases")
                    .long("no-aliases")
                    .help("Key members by their declared names")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("nested")
                    .long("nested")
                    .help("Describe members whose type is another declaration")
                    .action(ArgAction::SetTrue),
            )
    }

    /// Apply synthesis overrides on top of configured options
    pub fn apply_synthesis_args(matches: &ArgMatches, options: &mut SynthesisOptions) {
        if matches.get_flag("doc-only") {
            options.doc_only = true;
        }
        if matches.get_flag("no-aliases") {
            options.use_aliases = false;
        }
        if matches.get_flag("nested") {
            options.nested = true;
        }
    }

    pub fn format_override(matches: &ArgMatches) -> Result<Option<OutputFormat>> {
        matches
            .get_one::<String>("format")
            .map(|format| format.parse::<OutputFormat>())
            .transpose()
    }
}
