//! Result types for generation operations

use std::path::PathBuf;

/// Result of processing a source
#[derive(Debug, Clone, Default)]
pub struct SourceResult {
    pub source_name: String,
    pub source_type: String,
    pub files_processed: usize,
    pub files_generated: usize,
    pub declarations_total: usize,
    pub declarations_described: usize,
    pub generated_files: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub output_path: PathBuf,
    pub processing_time_ms: u64,
    pub skipped: bool,
}

/// Overall generation result
#[derive(Debug, Default)]
pub struct GenerationResult {
    pub sources_processed: usize,
    pub total_sources: usize,
    pub results: Vec<SourceResult>,
    pub statistics: GenerationStatistics,
}

impl GenerationResult {
    /// Fold a finished source into the totals
    pub fn record(&mut self, result: SourceResult) {
        self.sources_processed += 1;
        self.statistics.files_generated += result.files_generated;
        self.statistics.declarations_described += result.declarations_described;
        self.statistics.error_count += result.errors.len();
        self.statistics.warning_count += result.warnings.len();
        if result.skipped {
            self.statistics.sources_up_to_date += 1;
        }
        self.results.push(result);
    }
}

/// Generation statistics
#[derive(Debug, Clone, Default)]
pub struct GenerationStatistics {
    /// Total processing time in milliseconds
    pub total_processing_time_ms: u64,

    /// Number of files generated
    pub files_generated: usize,

    /// Number of declarations that received a description
    pub declarations_described: usize,

    /// Number of sources skipped because nothing changed
    pub sources_up_to_date: usize,

    /// Number of errors encountered
    pub error_count: usize,

    /// Number of warnings encountered
    pub warning_count: usize,
}
