//! Code verification pipeline.
//!
//! Drives a single verification run: enumerate candidate files, classify
//! each one against the reference code set, optionally delete files with no
//! confirmed codes, and accumulate the audit report. Files are processed
//! one at a time in directory-listing order; deletion happens synchronously
//! before the next file so on-disk state always matches the counts
//! accumulated so far. Any unreadable file fails the whole run rather than
//! corrupting the audit trail.

use std::fs;
use std::path::Path;
use std::time::Instant;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::core::codes::CodeEntry;
use crate::core::errors::{Result, SharesError};
use crate::core::relevance::{classify, FileInstance};

/// File-name prefixes that denote non-patient metadata files.
pub const RESERVED_PREFIXES: [&str; 2] = ["hospitalInformation", "practitionerInformation"];

/// Options for a verification run.
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Delete files classified irrelevant. Irreversible.
    pub delete: bool,
}

/// Observational progress callback, advanced once per classified file.
///
/// Implementations observe only; they cannot affect control flow.
pub trait ProgressSink {
    /// Called once before classification with the candidate count.
    fn begin(&mut self, total: usize);
    /// Called after each file is classified.
    fn advance(&mut self, file: &str);
    /// Called once after the last file.
    fn finish(&mut self);
}

/// No-op progress sink for library callers and tests.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn begin(&mut self, _total: usize) {}
    fn advance(&mut self, _file: &str) {}
    fn finish(&mut self) {}
}

/// Completed audit report for one verification run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Number of candidate files examined
    pub total_files: usize,
    /// Files with at least one confirmed code occurrence
    pub relevant_files: usize,
    /// Files with none
    pub irrelevant_files: usize,
    /// Names of files deleted this run; empty unless deletion was requested
    pub deleted_files: Vec<String>,
    /// Per-file occurrence detail, only for files with matches
    pub text_search_instances: Vec<FileInstance>,
    /// Wall-clock seconds spent classifying (excludes loading and listing)
    pub total_time_seconds: f64,
}

/// Verification pipeline over a directory of candidate files.
#[derive(Debug)]
pub struct VerificationPipeline {
    codes: IndexSet<CodeEntry>,
}

impl VerificationPipeline {
    /// Create a pipeline over the given reference code set.
    pub fn new(codes: IndexSet<CodeEntry>) -> Self {
        Self { codes }
    }

    /// Run verification without progress reporting.
    pub fn run(&self, dir: impl AsRef<Path>, options: &VerifyOptions) -> Result<VerificationReport> {
        self.run_with_progress(dir, options, &mut NoProgress)
    }

    /// Run verification, advancing `progress` once per classified file.
    pub fn run_with_progress(
        &self,
        dir: impl AsRef<Path>,
        options: &VerifyOptions,
        progress: &mut dyn ProgressSink,
    ) -> Result<VerificationReport> {
        let dir = dir.as_ref();
        let candidates = enumerate_candidates(dir)?;
        progress.begin(candidates.len());

        let mut relevant_files = 0;
        let mut irrelevant_files = 0;
        let mut deleted_files = Vec::new();
        let mut text_search_instances = Vec::new();

        let started = Instant::now();

        for filename in &candidates {
            let path = dir.join(filename);
            let content = fs::read_to_string(&path).map_err(|err| {
                SharesError::filesystem_at(
                    format!("cannot read candidate file: {err}"),
                    path.display().to_string(),
                )
            })?;

            let lines: Vec<&str> = content.lines().collect();
            let instances = classify(&lines, &self.codes);

            if instances.is_empty() {
                irrelevant_files += 1;
                if options.delete {
                    fs::remove_file(&path).map_err(|err| {
                        SharesError::filesystem_at(
                            format!("cannot delete irrelevant file: {err}"),
                            path.display().to_string(),
                        )
                    })?;
                    deleted_files.push(filename.clone());
                }
            } else {
                relevant_files += 1;
                text_search_instances.push(FileInstance {
                    file: filename.clone(),
                    instances,
                });
            }

            progress.advance(filename);
        }

        progress.finish();
        let total_time_seconds = started.elapsed().as_secs_f64();

        debug!(
            "Classified {} files: {} relevant, {} irrelevant",
            candidates.len(),
            relevant_files,
            irrelevant_files
        );

        Ok(VerificationReport {
            total_files: candidates.len(),
            relevant_files,
            irrelevant_files,
            deleted_files,
            text_search_instances,
            total_time_seconds,
        })
    }
}

/// List candidate file names in a directory, in listing order.
///
/// Candidates are immediate entries with a `.json` extension whose names do
/// not begin with a reserved metadata prefix. Listing order is whatever the
/// filesystem returns; it is stable within a run, which keeps the report
/// reproducible.
pub fn enumerate_candidates(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|err| {
        SharesError::filesystem_at(
            format!("cannot list directory: {err}"),
            dir.display().to_string(),
        )
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| {
            SharesError::filesystem_at(
                format!("cannot read directory entry: {err}"),
                dir.display().to_string(),
            )
        })?;

        if !entry.path().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_candidate_file(&name) {
            candidates.push(name);
        }
    }

    Ok(candidates)
}

/// Whether a file name qualifies as a candidate for classification.
pub fn is_candidate_file(name: &str) -> bool {
    let has_data_extension = Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    has_data_extension && !RESERVED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}
