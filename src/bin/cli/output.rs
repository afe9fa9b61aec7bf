//! Console summary rendering.

use std::path::Path;

use owo_colors::OwoColorize;

use shares_cli::core::verify::VerificationReport;
use shares_cli::fhir::upload::UploadOutcome;

/// Print the human-readable verification summary block.
pub fn print_verification_summary(report: &VerificationReport, report_path: &Path, delete: bool) {
    println!("{}", "Verification complete:".bright_green().bold());
    println!("  Total files processed: {}", report.total_files);
    println!("  Relevant files: {}", report.relevant_files);
    println!("  Irrelevant files: {}", report.irrelevant_files);
    if delete {
        println!("  Files deleted: {}", report.deleted_files.len());
    }
    println!("  Total time: {:.2} seconds", report.total_time_seconds);
    println!("  Report saved to: {}", report_path.display());
}

/// Print a FHIR server response, pretty-printing JSON bodies when possible.
pub fn print_response(outcome: &UploadOutcome) {
    if outcome.is_success() {
        println!("{} {}", "Response Status:".bright_green(), outcome.status);
    } else {
        println!("{} {}", "Response Status:".bright_red(), outcome.status);
    }

    match serde_json::from_str::<serde_json::Value>(&outcome.body) {
        Ok(json) => match serde_json::to_string_pretty(&json) {
            Ok(pretty) => println!("Response Data: {pretty}"),
            Err(_) => println!("Response Data: {}", outcome.body),
        },
        Err(_) => {
            if !outcome.body.is_empty() {
                println!("Response Data: {}", outcome.body);
            }
        }
    }
}
