//! Reference code table loading.
//!
//! The reference table is a CSV file with at least a `Code` and a
//! `Code_Type` column. Each row pairs a clinical code value with a short
//! coding-system label; the label is resolved to a canonical system URI
//! through a [`CodeSystemMap`]. Rows whose label is unknown, or whose code
//! value is empty, are skipped without error.

use std::fs::File;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use tracing::debug;

use crate::core::errors::{Result, SharesError};

/// A clinical code paired with its canonical coding-system URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeEntry {
    /// Code value as it appears in the reference table
    pub code: String,
    /// Canonical coding-system URI
    pub system_uri: String,
}

impl CodeEntry {
    /// Create a new code entry.
    pub fn new(code: impl Into<String>, system_uri: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            system_uri: system_uri.into(),
        }
    }
}

/// Mapping from short code-system labels to canonical system URIs.
///
/// The default mapping covers the three systems emitted by Synthea record
/// generation. The mapping is an explicit value rather than a global so
/// callers can extend it without touching the verification algorithm.
#[derive(Debug, Clone)]
pub struct CodeSystemMap {
    mappings: IndexMap<String, String>,
}

impl Default for CodeSystemMap {
    fn default() -> Self {
        let mut mappings = IndexMap::new();
        mappings.insert("SNOMED-CT".to_string(), "http://snomed.info/sct".to_string());
        mappings.insert("LOINC".to_string(), "http://loinc.org".to_string());
        mappings.insert(
            "RxNorm".to_string(),
            "http://www.nlm.nih.gov/research/umls/rxnorm".to_string(),
        );
        Self { mappings }
    }
}

impl CodeSystemMap {
    /// Create an empty mapping.
    pub fn empty() -> Self {
        Self {
            mappings: IndexMap::new(),
        }
    }

    /// Add or replace a label-to-URI mapping.
    pub fn with_mapping(mut self, label: impl Into<String>, uri: impl Into<String>) -> Self {
        self.mappings.insert(label.into(), uri.into());
        self
    }

    /// Resolve a code-system label to its canonical URI.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.mappings.get(label).map(String::as_str)
    }

    /// Number of known code systems.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// One row of the reference table. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct ReferenceRow {
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "Code_Type")]
    code_type: Option<String>,
}

/// Load the deduplicated set of code entries from a reference CSV table.
///
/// Fails if the file cannot be opened or the row stream errors before
/// completion; the caller must treat that as fatal for the whole run.
pub fn load_reference_codes(
    path: impl AsRef<Path>,
    systems: &CodeSystemMap,
) -> Result<IndexSet<CodeEntry>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        SharesError::reference_at(
            format!("cannot open reference table: {err}"),
            path.display().to_string(),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let mut codes = IndexSet::new();

    for row in reader.deserialize::<ReferenceRow>() {
        let row = row?;
        let Some(code) = row.code.filter(|c| !c.is_empty()) else {
            continue;
        };
        let Some(uri) = row.code_type.as_deref().and_then(|label| systems.resolve(label)) else {
            continue;
        };
        codes.insert(CodeEntry::new(code, uri));
    }

    debug!(
        "Loaded {} unique code entries from {}",
        codes.len(),
        path.display()
    );
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_deduplicates_mapped_rows() {
        let file = write_csv(
            "Code,Code_Type,Description\n\
             1234,LOINC,Blood pressure\n\
             1234,LOINC,Blood pressure again\n\
             5678,SNOMED-CT,Diagnosis\n",
        );

        let codes = load_reference_codes(file.path(), &CodeSystemMap::default()).unwrap();
        assert_eq!(codes.len(), 2);
        assert!(codes.contains(&CodeEntry::new("1234", "http://loinc.org")));
        assert!(codes.contains(&CodeEntry::new("5678", "http://snomed.info/sct")));
    }

    #[test]
    fn unknown_system_label_is_skipped() {
        let file = write_csv(
            "Code,Code_Type\n\
             1234,UNKNOWN-SYSTEM\n\
             5678,RxNorm\n",
        );

        let codes = load_reference_codes(file.path(), &CodeSystemMap::default()).unwrap();
        assert_eq!(codes.len(), 1);
        assert!(codes.contains(&CodeEntry::new(
            "5678",
            "http://www.nlm.nih.gov/research/umls/rxnorm"
        )));
    }

    #[test]
    fn empty_code_value_is_skipped() {
        let file = write_csv("Code,Code_Type\n,LOINC\n9999,LOINC\n");

        let codes = load_reference_codes(file.path(), &CodeSystemMap::default()).unwrap();
        assert_eq!(codes.len(), 1);
    }

    #[test]
    fn missing_file_is_a_reference_error() {
        let err = load_reference_codes("/nonexistent/codes.csv", &CodeSystemMap::default())
            .unwrap_err();
        assert!(matches!(err, SharesError::Reference { .. }));
    }

    #[test]
    fn custom_mapping_extends_resolution() {
        let systems = CodeSystemMap::default().with_mapping("ICD-10", "http://hl7.org/fhir/sid/icd-10");
        let file = write_csv("Code,Code_Type\nA01,ICD-10\n");

        let codes = load_reference_codes(file.path(), &systems).unwrap();
        assert!(codes.contains(&CodeEntry::new("A01", "http://hl7.org/fhir/sid/icd-10")));
    }
}
