//! CLI Argument Structures
//!
//! Argument definitions and command structures for the shares CLI binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI tool for managing CQL files as FHIR resources
#[derive(Parser)]
#[command(name = "shares")]
#[command(version = VERSION)]
#[command(about = "CLI tool for managing CQL files as FHIR resources by the SHARES team")]
#[command(long_about = "
Manage CQL files as FHIR Library resources and audit directories of patient
record files for relevant clinical codes.

Common Usage:

  # Convert a CQL file to base64
  shares convert screening.cql

  # Build a FHIR transaction bundle from a CQL file
  shares create-fhir-bundle screening.cql bundle.json 'Screening measures'

  # Post a bundle to a FHIR server
  shares post-fhir bundle.json http://localhost:8080/fhir/

  # Upload a Synthea output directory in dependency order
  shares synthea-upload ./fhir http://localhost:8080/fhir/

  # Audit patient files against a reference code table
  shares verify-codes ./fhir codes.csv --delete
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a .cql file to a base64 string
    Convert(ConvertArgs),

    /// Create a FHIR bundle as a JSON file from an input .cql file
    #[command(name = "create-fhir-bundle")]
    CreateFhirBundle(CreateFhirBundleArgs),

    /// Post a FHIR bundle JSON file to a FHIR server
    #[command(name = "post-fhir")]
    PostFhir(PostFhirArgs),

    /// Create a FHIR bundle from a .cql file and post it to a server
    #[command(name = "create-and-post")]
    CreateAndPost(CreateAndPostArgs),

    /// Upload a directory of Synthea-generated FHIR resources in naming-convention order
    #[command(name = "synthea-upload")]
    SyntheaUpload(SyntheaUploadArgs),

    /// Verify JSON files for relevant codes from a CSV table, optionally deleting irrelevant files
    #[command(name = "verify-codes")]
    VerifyCodes(VerifyCodesArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Path to the .cql file to convert
    pub file: PathBuf,

    /// Write the base64 content here instead of stdout
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CreateFhirBundleArgs {
    /// Path to the input .cql file
    pub file: PathBuf,

    /// Path to write the bundle JSON to
    pub output: PathBuf,

    /// Description for the Library resource
    pub description: String,

    /// FHIR server base URL used in resource URLs
    #[arg(long, default_value = shares_cli::fhir::bundle::DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Args)]
pub struct PostFhirArgs {
    /// Path to the bundle JSON file
    pub file: PathBuf,

    /// URL of the FHIR server endpoint
    pub url: String,
}

#[derive(Args)]
pub struct CreateAndPostArgs {
    /// Path to the input .cql file
    pub file: PathBuf,

    /// Path to write the bundle JSON to
    pub output: PathBuf,

    /// Description for the Library resource
    pub description: String,

    /// URL of the FHIR server to post to
    pub url: String,
}

#[derive(Args)]
pub struct SyntheaUploadArgs {
    /// Directory with Synthea-generated "fhir" resource files
    pub directory: PathBuf,

    /// URL of the FHIR server to upload the resources to
    pub url: String,

    /// Perform a dry run without uploading any resources
    #[arg(short, long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct VerifyCodesArgs {
    /// Path to the directory containing JSON files
    pub fhir_path: PathBuf,

    /// Path to the CSV file containing codes
    pub csv_file_path: PathBuf,

    /// Delete irrelevant files
    #[arg(long)]
    pub delete: bool,
}
