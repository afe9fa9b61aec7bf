//! # SHARES CLI: CQL and FHIR Resource Management
//!
//! Library backing the `shares` command-line tool. It manages CQL files as
//! FHIR `Library` resources and audits directories of per-patient FHIR
//! resource files against a reference table of clinical codes:
//!
//! - **Code Verification**: proximity text matching of clinical codes
//!   against their coding-system URIs, with structured audit reports
//! - **Bundle Authoring**: CQL-to-base64 conversion and FHIR transaction
//!   bundle construction
//! - **Resource Upload**: posting bundles to FHIR servers, including
//!   Synthea directory uploads in naming-convention order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shares_cli::core::codes::{load_reference_codes, CodeSystemMap};
//! use shares_cli::core::verify::{VerificationPipeline, VerifyOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let codes = load_reference_codes("codes.csv", &CodeSystemMap::default())?;
//!     let report = VerificationPipeline::new(codes)
//!         .run("./fhir", &VerifyOptions::default())?;
//!     println!("{} of {} files relevant", report.relevant_files, report.total_files);
//!     Ok(())
//! }
//! ```

#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Core verification engine modules
pub mod core {
    //! Code verification algorithms and data structures.

    pub mod codes;
    pub mod errors;
    pub mod relevance;
    pub mod verify;
}

// FHIR bundle authoring and transport
pub mod fhir {
    //! FHIR bundle construction and server upload.

    pub mod bundle;
    pub mod upload;
}

// I/O and report persistence
pub mod io {
    //! Report serialization and persistence.

    pub mod reports;
}

// Re-export primary types for convenience
pub use core::codes::{CodeEntry, CodeSystemMap};
pub use core::errors::{Result, SharesError};
pub use core::verify::{VerificationPipeline, VerificationReport, VerifyOptions};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
