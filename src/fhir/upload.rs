//! FHIR resource upload.
//!
//! Single-bundle posting and whole-directory Synthea uploads. Synthea names
//! its output files by resource kind; servers reject patient bundles whose
//! referenced organizations and practitioners do not exist yet, so the
//! directory upload always sends `hospitalInformation*` files first, then
//! `practitionerInformation*`, then the remaining patient bundles.

use std::fs;
use std::path::Path;

use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};

use crate::core::errors::{Result, SharesError};

/// FHIR JSON media type used for both request and response negotiation.
pub const FHIR_JSON: &str = "application/fhir+json";

/// Server response to a single bundle POST.
#[derive(Debug)]
pub struct UploadOutcome {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl UploadOutcome {
    /// Whether the server accepted the bundle.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Synthea directory contents split by upload precedence.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyntheaBatches {
    /// `hospitalInformation*` files, uploaded first
    pub hospitals: Vec<String>,
    /// `practitionerInformation*` files, uploaded second
    pub practitioners: Vec<String>,
    /// Remaining patient bundles, uploaded last
    pub patients: Vec<String>,
}

impl SyntheaBatches {
    /// Total number of files across all batches.
    pub fn len(&self) -> usize {
        self.hospitals.len() + self.practitioners.len() + self.patients.len()
    }

    /// Whether no files were found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File names in upload order.
    pub fn in_order(&self) -> impl Iterator<Item = &String> {
        self.hospitals
            .iter()
            .chain(self.practitioners.iter())
            .chain(self.patients.iter())
    }
}

/// Outcome counts for a directory upload.
#[derive(Debug, Default)]
pub struct UploadSummary {
    /// Bundles accepted by the server (or logged in a dry run)
    pub uploaded: usize,
    /// Bundles the server rejected or that failed to send
    pub failed: usize,
}

/// POST a single bundle to a FHIR endpoint.
///
/// Transport failures (connection refused, TLS, timeouts) are errors; any
/// HTTP response, success or not, is returned as an [`UploadOutcome`] for
/// the caller to judge.
pub async fn post_bundle(client: &Client, url: &str, bundle: &Value) -> Result<UploadOutcome> {
    let response = client
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, FHIR_JSON)
        .header(reqwest::header::ACCEPT, FHIR_JSON)
        .body(serde_json::to_vec(bundle)?)
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(UploadOutcome { status, body })
}

/// Split a directory's `.json` files into Synthea upload batches.
///
/// Non-JSON files are ignored. Within each batch, files keep the listing
/// order of the directory.
pub fn partition_synthea_files(names: impl IntoIterator<Item = String>) -> SyntheaBatches {
    let mut batches = SyntheaBatches::default();

    for name in names {
        let is_json = Path::new(&name)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            continue;
        }

        if name.starts_with("hospitalInformation") {
            batches.hospitals.push(name);
        } else if name.starts_with("practitionerInformation") {
            batches.practitioners.push(name);
        } else {
            batches.patients.push(name);
        }
    }

    batches
}

/// List a directory's immediate file names in listing order.
pub fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|err| {
        SharesError::filesystem_at(
            format!("cannot list directory: {err}"),
            dir.display().to_string(),
        )
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| {
            SharesError::filesystem_at(
                format!("cannot read directory entry: {err}"),
                dir.display().to_string(),
            )
        })?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(names)
}

/// Upload a Synthea output directory to a FHIR server, sequentially and in
/// naming-convention order.
///
/// Each file is read, parsed, and posted before the next is touched. A file
/// the server rejects is logged and counted as failed; the batch continues.
/// An unreadable or unparseable file fails the run. With `dry_run` set, no
/// network traffic occurs and every file counts as uploaded.
pub async fn upload_directory(
    client: &Client,
    dir: &Path,
    url: &str,
    dry_run: bool,
) -> Result<UploadSummary> {
    let batches = partition_synthea_files(list_file_names(dir)?);
    info!(
        "Uploading {} resource files from {} to {url}",
        batches.len(),
        dir.display()
    );

    let mut summary = UploadSummary::default();

    for name in batches.in_order() {
        let path = dir.join(name);
        let bundle = read_bundle(&path)?;

        if dry_run {
            info!("Dry run: would have uploaded {name}");
            summary.uploaded += 1;
            continue;
        }

        match post_bundle(client, url, &bundle).await {
            Ok(outcome) if outcome.is_success() => {
                info!("[SUCCESS] {} {name}", outcome.status);
                summary.uploaded += 1;
            }
            Ok(outcome) => {
                error!("[FAILURE] {} {name}: {}", outcome.status, outcome.body);
                summary.failed += 1;
            }
            Err(err) => {
                error!("[ERROR] {name}: {err}");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn read_bundle(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|err| {
        SharesError::filesystem_at(
            format!("cannot read resource file: {err}"),
            path.display().to_string(),
        )
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        SharesError::validation_field(
            format!("resource file is not valid JSON: {err}"),
            path.display().to_string(),
        )
    })
}
