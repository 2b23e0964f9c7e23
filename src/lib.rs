//! Description Generator Library
//!
//! Synthesizes nested description trees from documented type declarations.
//! Declarations come from Go sources or YAML/JSON manifests; each
//! declaration's comments and stored members become a tree of plain-text
//! descriptions keyed by external member name, written out as JSON, YAML,
//! Jsonnet or Go.

pub mod cli;
pub mod config;
pub mod error;
pub mod introspect;
pub mod utils;

pub use config::{Config, GenerationConfig, GoSource, ManifestSource, Source};
pub use descgen_generator::{
    DescribedDeclaration, DescriptionDocument, DescriptionGenerator, GeneratedFile,
    GenerationResult, GenerationStatistics, Organization, OutputConfig, OutputFormat,
    SourceResult, TypeKind,
};
pub use descgen_lockfile::{FileChecksum, Lockfile, LockfileManager, SourceEntry};
pub use descgen_synth::{
    AliasTable, CommentBlock, CommentKind, Declaration, DescriptionNode, Member, StorageKind,
    SynthesisOptions, Synthesizer,
};
pub use error::{DescGenError, DescGenResult};
pub use introspect::{Diagnostic, IntrospectError, Introspection, Introspector};

use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Main application context that coordinates all components
pub struct DescGen {
    config: Config,
    generator: DescriptionGenerator,
    lockfile_manager: LockfileManager,
    synthesizer: Synthesizer,
}

/// Descriptions synthesized for one source
#[derive(Debug, Clone, Default)]
pub struct SourceScan {
    /// One document per input file that could be introspected, sorted by path
    pub documents: Vec<DescriptionDocument>,

    /// Input files that could not be introspected
    pub errors: Vec<String>,

    /// Syntax problems the parser recovered from
    pub warnings: Vec<String>,
}

impl SourceScan {
    pub fn declarations_total(&self) -> usize {
        self.documents.iter().map(|d| d.declarations.len()).sum()
    }

    pub fn declarations_described(&self) -> usize {
        self.documents.iter().map(|d| d.described_count()).sum()
    }
}

/// What `inspect` found in a single file
#[derive(Debug, Clone)]
pub struct Inspection {
    pub introspection: Introspection,
    pub document: DescriptionDocument,
}

/// Dry run result for a single source
#[derive(Debug, Clone, Default)]
pub struct DryRunSourceResult {
    pub source_name: String,
    pub source_type: String,
    pub up_to_date: bool,
    pub files_processed: usize,
    pub planned_files: Vec<PathBuf>,
    pub declarations_total: usize,
    pub declarations_described: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Dry run result
#[derive(Debug, Clone, Default)]
pub struct DryRunResult {
    pub results: Vec<DryRunSourceResult>,
    pub total_processing_time_ms: u64,
}

impl DryRunResult {
    pub fn files_would_generate(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.up_to_date)
            .map(|r| r.planned_files.len())
            .sum()
    }
}

impl DescGen {
    /// Create a new DescGen instance with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let generator = DescriptionGenerator::new(config.output.clone());
        let lockfile_manager = LockfileManager::new(
            LockfileManager::default_path(),
            env!("CARGO_PKG_VERSION"),
        );
        let synthesizer = Synthesizer::new(config.synthesis.clone());

        Ok(Self {
            config,
            generator,
            lockfile_manager,
            synthesizer,
        })
    }

    /// Use a lockfile other than `.descgen.lock` in the working directory
    pub fn with_lockfile(mut self, lockfile_manager: LockfileManager) -> Self {
        self.lockfile_manager = lockfile_manager;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lockfile_path(&self) -> &Path {
        self.lockfile_manager.path()
    }

    /// Generate description artifacts for all configured sources
    ///
    /// Sources whose inputs and settings match the lockfile are skipped
    /// unless `force` is set.
    pub async fn generate(&self, force: bool) -> Result<GenerationResult> {
        info!("Starting description generation");

        let start_time = Instant::now();
        let mut result = GenerationResult {
            total_sources: self.config.sources.len(),
            ..Default::default()
        };

        for source in &self.config.sources {
            let source_start = Instant::now();

            match self.process_source(source, force).await {
                Ok(mut source_result) => {
                    source_result.processing_time_ms = source_start.elapsed().as_millis() as u64;
                    info!("Successfully processed source: {}", source.name());
                    result.record(source_result);
                }
                Err(e) => {
                    error!("Failed to process source {}: {}", source.name(), e);
                    if self.config.generation.fail_fast {
                        return Err(e);
                    }

                    result.record(SourceResult {
                        source_name: source.name().to_string(),
                        source_type: source.source_type().to_string(),
                        errors: vec![e.to_string()],
                        output_path: self.generator.source_output_path(source.name()),
                        processing_time_ms: source_start.elapsed().as_millis() as u64,
                        ..Default::default()
                    });
                }
            }
        }

        let generation_time = start_time.elapsed();
        result.statistics.total_processing_time_ms = generation_time.as_millis() as u64;
        info!(
            "Generation completed in {}",
            utils::format_duration(generation_time)
        );

        Ok(result)
    }

    /// Report what `generate` would do without writing anything
    pub async fn dry_run(&self) -> Result<DryRunResult> {
        info!("Planning description generation");

        let start_time = Instant::now();
        let mut result = DryRunResult::default();

        for source in &self.config.sources {
            match self.plan_source(source).await {
                Ok(source_result) => result.results.push(source_result),
                Err(e) => {
                    error!("Failed to plan source {}: {}", source.name(), e);
                    if self.config.generation.fail_fast {
                        return Err(e);
                    }

                    result.results.push(DryRunSourceResult {
                        source_name: source.name().to_string(),
                        source_type: source.source_type().to_string(),
                        errors: vec![e.to_string()],
                        ..Default::default()
                    });
                }
            }
        }

        result.total_processing_time_ms = start_time.elapsed().as_millis() as u64;
        Ok(result)
    }

    /// Introspect and synthesize every input file of a source
    pub async fn describe_source(&self, source: &Source) -> DescGenResult<SourceScan> {
        let (root, files) = self.source_files(source)?;
        self.scan(source, &root, &files).await
    }

    /// Introspect one file and synthesize its declarations on their own
    pub async fn inspect_file(
        path: &Path,
        options: &SynthesisOptions,
        alias_tag: &str,
    ) -> DescGenResult<Inspection> {
        let introspector = introspect::for_path(path, alias_tag)?;
        debug!("Inspecting {:?} with the {} introspector", path, introspector.name());

        let introspection = introspector.introspect(path).await?;
        let built = Synthesizer::new(options.clone()).build_all(&introspection.declarations);
        let document = describe(
            utils::relative_to(path, path),
            &introspection,
            &mut built.into_iter(),
        );

        Ok(Inspection {
            introspection,
            document,
        })
    }

    async fn process_source(&self, source: &Source, force: bool) -> Result<SourceResult> {
        let name = source.name();
        let (root, files) = self.source_files(source)?;
        let inputs = checksums(&files)?;
        let fingerprint = self.fingerprint(source)?;

        let mut result = SourceResult {
            source_name: name.to_string(),
            source_type: source.source_type().to_string(),
            files_processed: files.len(),
            output_path: self.generator.source_output_path(name),
            ..Default::default()
        };

        if !force
            && self
                .lockfile_manager
                .is_up_to_date(name, &fingerprint, &inputs)?
        {
            info!("Source {} is up to date, skipping", name);
            result.skipped = true;
            return Ok(result);
        }

        let scan = self.scan(source, &root, &files).await?;
        let planned = self.generator.plan(name, &scan.documents)?;
        self.remove_stale_outputs(name, &planned)?;
        let written = self.generator.write(&planned).await?;

        result.declarations_total = scan.declarations_total();
        result.declarations_described = scan.declarations_described();
        result.files_generated = written.len();
        result.generated_files = written;
        result.errors = scan.errors;
        result.warnings = scan.warnings;

        // A partial run must not mark the source as up to date
        if result.errors.is_empty() {
            let outputs = planned
                .iter()
                .map(|file| {
                    (
                        file.path.clone(),
                        FileChecksum::from_content(file.content.as_bytes()),
                    )
                })
                .collect();
            self.lockfile_manager
                .record(name, SourceEntry::new(fingerprint, inputs, outputs))?;
        } else {
            warn!(
                "Source {} had {} failed files, lockfile not updated",
                name,
                result.errors.len()
            );
        }

        Ok(result)
    }

    async fn plan_source(&self, source: &Source) -> Result<DryRunSourceResult> {
        let name = source.name();
        let (root, files) = self.source_files(source)?;
        let inputs = checksums(&files)?;
        let fingerprint = self.fingerprint(source)?;

        let up_to_date = self
            .lockfile_manager
            .is_up_to_date(name, &fingerprint, &inputs)?;
        let scan = self.scan(source, &root, &files).await?;
        let planned = self.generator.plan(name, &scan.documents)?;

        Ok(DryRunSourceResult {
            source_name: name.to_string(),
            source_type: source.source_type().to_string(),
            up_to_date,
            files_processed: files.len(),
            planned_files: planned.into_iter().map(|f| f.path).collect(),
            declarations_total: scan.declarations_total(),
            declarations_described: scan.declarations_described(),
            errors: scan.errors,
            warnings: scan.warnings,
        })
    }

    /// Source root and the input files under it
    fn source_files(&self, source: &Source) -> DescGenResult<(PathBuf, Vec<PathBuf>)> {
        let config_error =
            |e: anyhow::Error| DescGenError::Config(format!("Source {}: {}", source.name(), e));

        let root = source.resolved_path().map_err(config_error)?;
        let files = match source {
            Source::Go(go) => {
                utils::find_source_files(&root, &go.include_patterns, &go.exclude_patterns)
                    .map_err(config_error)?
            }
            Source::Manifest(_) => {
                if !root.is_file() {
                    return Err(DescGenError::Config(format!(
                        "Source {}: manifest {:?} does not exist",
                        source.name(),
                        root
                    )));
                }
                vec![root.clone()]
            }
        };

        debug!("Source {} has {} input files", source.name(), files.len());
        Ok((root, files))
    }

    /// Hash of every setting that shapes a source's artifacts
    fn fingerprint(&self, source: &Source) -> DescGenResult<String> {
        let settings = serde_yaml::to_string(&(source, &self.config.synthesis, &self.config.output))?;
        Ok(descgen_lockfile::hash_string(&settings))
    }

    /// Introspect files concurrently, then synthesize each package as one input set
    async fn scan(&self, source: &Source, root: &Path, files: &[PathBuf]) -> DescGenResult<SourceScan> {
        let introspector = introspect::for_source(source);
        let mut tasks = JoinSet::new();

        for (index, path) in files.iter().cloned().enumerate() {
            let introspector: Arc<dyn Introspector> = Arc::clone(&introspector);
            tasks.spawn_blocking(move || {
                let introspection = introspector.introspect_file(&path);
                (index, path, introspection)
            });
        }

        let mut introspected = Vec::with_capacity(files.len());
        while let Some(joined) = tasks.join_next().await {
            introspected.push(joined?);
        }
        introspected.sort_by_key(|(index, _, _)| *index);

        let mut scan = SourceScan::default();
        let mut parsed = Vec::with_capacity(introspected.len());

        for (_, path, introspection) in introspected {
            match introspection {
                Ok(introspection) => {
                    scan.warnings.extend(introspection.diagnostics.iter().map(|d| {
                        format!("{}:{}: {}", path.display(), d.line, d.message)
                    }));
                    parsed.push((path, introspection));
                }
                Err(e) => {
                    if self.config.generation.fail_fast {
                        return Err(e.into());
                    }
                    warn!("Skipping {:?}: {}", path, e);
                    scan.errors.push(e.to_string());
                }
            }
        }

        // Member types may refer to declarations in sibling files of the
        // same package, never to another package's
        let mut packages: BTreeMap<(Option<&Path>, Option<&str>), Vec<usize>> = BTreeMap::new();
        for (index, (path, introspection)) in parsed.iter().enumerate() {
            packages
                .entry((path.parent(), introspection.package.as_deref()))
                .or_default()
                .push(index);
        }

        let mut documents: Vec<Option<DescriptionDocument>> = vec![None; parsed.len()];
        for files in packages.values() {
            let declarations: Vec<Declaration> = files
                .iter()
                .flat_map(|&index| parsed[index].1.declarations.iter().cloned())
                .collect();
            let mut built = self.synthesizer.build_all(&declarations).into_iter();

            for &index in files {
                let (path, introspection) = &parsed[index];
                documents[index] = Some(describe(
                    utils::relative_to(path, root),
                    introspection,
                    &mut built,
                ));
            }
        }
        scan.documents = documents.into_iter().flatten().collect();

        Ok(scan)
    }

    /// Delete artifacts recorded for a source that this run no longer produces
    fn remove_stale_outputs(&self, source_name: &str, planned: &[GeneratedFile]) -> Result<()> {
        let lockfile = self.lockfile_manager.load_or_create()?;
        let Some(entry) = lockfile.sources.get(source_name) else {
            return Ok(());
        };

        let current: BTreeSet<&PathBuf> = planned.iter().map(|f| &f.path).collect();
        for stale in entry.outputs.keys().filter(|p| !current.contains(p)) {
            if stale.exists() {
                info!("Removing stale artifact: {:?}", stale);
                std::fs::remove_file(stale)?;
            }
        }

        Ok(())
    }
}

/// Pair an introspected file with the next synthesized descriptions
fn describe(
    source: PathBuf,
    introspection: &Introspection,
    built: &mut impl Iterator<Item = (String, Option<DescriptionNode>)>,
) -> DescriptionDocument {
    let mut document = DescriptionDocument::new(source, introspection.package.clone());

    for (name, description) in built.take(introspection.declarations.len()) {
        let mut described = DescribedDeclaration::new(name, description);
        described.type_params = introspection.type_param_count(&described.name);
        described.kind = introspection.type_kind(&described.name);
        document.declarations.push(described);
    }

    document
}

fn checksums(files: &[PathBuf]) -> Result<BTreeMap<PathBuf, FileChecksum>> {
    files
        .iter()
        .map(|path| Ok((path.clone(), FileChecksum::from_file(path)?)))
        .collect()
}
