//! Verification report persistence.
//!
//! The report is the only persistent output of a verification run besides
//! requested deletions. It is written once, after the classification pass
//! completes, into the audited directory itself; a failed run never leaves
//! a half-built report behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, SharesError};
use crate::core::verify::VerificationReport;

/// File name of the report written into the audited directory.
pub const REPORT_FILE_NAME: &str = "verification_report.json";

/// Serialize the report as pretty-printed JSON into `dir`, overwriting any
/// prior report. Returns the path written.
pub fn write_verification_report(report: &VerificationReport, dir: &Path) -> Result<PathBuf> {
    let report_path = dir.join(REPORT_FILE_NAME);
    let content = serde_json::to_string_pretty(report)?;
    fs::write(&report_path, content).map_err(|err| {
        SharesError::filesystem_at(
            format!("cannot write report: {err}"),
            report_path.display().to_string(),
        )
    })?;
    Ok(report_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::relevance::{FileInstance, MatchInstance};

    fn sample_report() -> VerificationReport {
        VerificationReport {
            total_files: 3,
            relevant_files: 1,
            irrelevant_files: 2,
            deleted_files: vec!["b.json".to_string(), "c.json".to_string()],
            text_search_instances: vec![FileInstance {
                file: "a.json".to_string(),
                instances: vec![MatchInstance {
                    code: "1234".to_string(),
                    system_uri: "http://loinc.org".to_string(),
                    line_number: 5,
                }],
            }],
            total_time_seconds: 0.42,
        }
    }

    #[test]
    fn writes_camel_case_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_verification_report(&sample_report(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), REPORT_FILE_NAME);

        let raw = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(json["totalFiles"], 3);
        assert_eq!(json["relevantFiles"], 1);
        assert_eq!(json["irrelevantFiles"], 2);
        assert_eq!(json["deletedFiles"].as_array().unwrap().len(), 2);
        let instance = &json["textSearchInstances"][0]["instances"][0];
        assert_eq!(instance["code"], "1234");
        assert_eq!(instance["systemUri"], "http://loinc.org");
        assert_eq!(instance["lineNumber"], 5);
        assert!(json["totalTimeSeconds"].is_f64());
    }

    #[test]
    fn overwrites_prior_report() {
        let dir = tempfile::tempdir().unwrap();
        write_verification_report(&sample_report(), dir.path()).unwrap();

        let mut second = sample_report();
        second.total_files = 7;
        second.relevant_files = 7;
        second.irrelevant_files = 0;
        let path = write_verification_report(&second, dir.path()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["totalFiles"], 7);
    }

    #[test]
    fn unwritable_directory_is_a_filesystem_error() {
        let err = write_verification_report(&sample_report(), Path::new("/nonexistent/out"))
            .unwrap_err();
        assert!(matches!(err, SharesError::FileSystem { .. }));
    }
}
