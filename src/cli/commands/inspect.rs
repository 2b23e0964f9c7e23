//! Inspect command implementation

use crate::cli::utils;
use crate::{DescGen, OutputFormat, SynthesisOptions};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use descgen_generator::render::render;
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    let command = Command::new("inspect")
        .about("Print the descriptions synthesized for a single file")
        .arg(
            clap::Arg::new("file")
                .help("Go source or declaration manifest")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            clap::Arg::new("root-key")
                .long("root-key")
                .help("Keep the declaration comment under this key")
                .value_name("KEY"),
        )
        .arg(
            clap::Arg::new("alias-tag")
                .long("alias-tag")
                .help("Struct tag key that supplies external member names")
                .value_name("KEY")
                .default_value("json"),
        )
        .arg(
            clap::Arg::new("declarations")
                .long("declarations")
                .help("Print the introspected declarations instead of descriptions")
                .action(clap::ArgAction::SetTrue),
        );

    utils::synthesis_args(command)
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<String>("file")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("A file to inspect is required"))?;
    let alias_tag = matches
        .get_one::<String>("alias-tag")
        .map(String::as_str)
        .unwrap_or("json");

    let mut options = SynthesisOptions::default();
    utils::apply_synthesis_args(matches, &mut options);
    options.root_key = matches.get_one::<String>("root-key").cloned();

    info!("Inspecting {:?}", path);
    let inspection = DescGen::inspect_file(&path, &options, alias_tag).await?;

    for diagnostic in &inspection.introspection.diagnostics {
        eprintln!(
            "Warning: {}:{}: {}",
            path.display(),
            diagnostic.line,
            diagnostic.message
        );
    }

    if matches.get_flag("declarations") {
        print!("{}", serde_yaml::to_string(&inspection.introspection)?);
        return Ok(());
    }

    let leaves: usize = inspection
        .document
        .described()
        .map(|(_, node)| node.leaf_count())
        .sum();
    info!(
        "{} of {} declarations described ({} descriptions)",
        inspection.document.described_count(),
        inspection.document.declarations.len(),
        leaves
    );

    let format = utils::format_override(matches)?.unwrap_or(OutputFormat::Json);
    let rendered = render(format, std::slice::from_ref(&inspection.document))?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    Ok(())
}
