//! Command Execution Logic
//!
//! One async function per subcommand. Commands translate library errors to
//! `anyhow` so the binary exits with a single human-readable message; no
//! command retries, and a failed verification run writes no report.

use std::fs;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use shares_cli::core::codes::{load_reference_codes, CodeSystemMap};
use shares_cli::core::verify::{ProgressSink, VerificationPipeline, VerifyOptions};
use shares_cli::fhir::bundle::{
    build_fhir_bundle, encode_content, extract_library_info, normalize_base_url,
};
use shares_cli::fhir::upload::{post_bundle, upload_directory};
use shares_cli::io::reports::write_verification_report;

use crate::cli::args::{
    ConvertArgs, CreateAndPostArgs, CreateFhirBundleArgs, PostFhirArgs, SyntheaUploadArgs,
    VerifyCodesArgs,
};
use crate::cli::output::{print_response, print_verification_summary};

/// Convert a CQL file to base64, to stdout or a file.
pub async fn convert_command(args: ConvertArgs) -> anyhow::Result<()> {
    let content = fs::read(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let encoded = encode_content(&content);

    match args.output {
        Some(output) => {
            fs::write(&output, &encoded)
                .with_context(|| format!("cannot write {}", output.display()))?;
            println!("Base64 content written to {}", output.display());
        }
        None => println!("{encoded}"),
    }

    Ok(())
}

/// Build a FHIR bundle from a CQL file and write it to disk.
pub async fn create_fhir_bundle_command(args: CreateFhirBundleArgs) -> anyhow::Result<()> {
    let bundle = author_bundle(&args.file, &args.description, &args.base_url)?;

    fs::write(&args.output, serde_json::to_string_pretty(&bundle)?)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    println!("FHIR bundle written to {}", args.output.display());

    Ok(())
}

/// Post an existing bundle file to a FHIR server.
pub async fn post_fhir_command(args: PostFhirArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let bundle: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| "bundle file is not valid JSON")?;

    let client = reqwest::Client::new();
    let outcome = post_bundle(&client, &args.url, &bundle).await?;
    print_response(&outcome);

    if !outcome.is_success() {
        anyhow::bail!("FHIR server rejected the bundle (HTTP {})", outcome.status);
    }
    Ok(())
}

/// Build a bundle from a CQL file, persist it, and post it in one step.
pub async fn create_and_post_command(args: CreateAndPostArgs) -> anyhow::Result<()> {
    let base_url = normalize_base_url(&args.url);
    let bundle = author_bundle(&args.file, &args.description, &base_url)?;

    fs::write(&args.output, serde_json::to_string_pretty(&bundle)?)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    println!("FHIR bundle written to {}", args.output.display());

    let client = reqwest::Client::new();
    let outcome = post_bundle(&client, &base_url, &bundle).await?;
    print_response(&outcome);

    if !outcome.is_success() {
        anyhow::bail!("FHIR server rejected the bundle (HTTP {})", outcome.status);
    }
    Ok(())
}

/// Upload a Synthea output directory in naming-convention order.
pub async fn synthea_upload_command(args: SyntheaUploadArgs) -> anyhow::Result<()> {
    if args.dry_run {
        println!("Dry run enabled. No resources will be uploaded.");
    }
    println!(
        "Uploading Synthea-generated FHIR resources from {} to {}",
        args.directory.display(),
        args.url
    );

    let client = reqwest::Client::new();
    let summary = upload_directory(&client, &args.directory, &args.url, args.dry_run).await?;

    println!("Done. {} uploaded, {} failed.", summary.uploaded, summary.failed);
    Ok(())
}

/// Audit a directory of patient files against a reference code table.
pub async fn verify_codes_command(args: VerifyCodesArgs) -> anyhow::Result<()> {
    let codes = load_reference_codes(&args.csv_file_path, &CodeSystemMap::default())?;
    info!("Reference table yielded {} code entries", codes.len());

    let pipeline = VerificationPipeline::new(codes);
    let options = VerifyOptions { delete: args.delete };

    let mut progress = CliProgress::default();
    let report = pipeline.run_with_progress(&args.fhir_path, &options, &mut progress)?;

    let report_path = write_verification_report(&report, &args.fhir_path)?;
    print_verification_summary(&report, &report_path, args.delete);

    Ok(())
}

fn author_bundle(
    file: &std::path::Path,
    description: &str,
    base_url: &str,
) -> anyhow::Result<serde_json::Value> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let library = extract_library_info(&content).ok_or_else(|| {
        anyhow::anyhow!("could not extract library name and version from the .cql file")
    })?;

    let encoded = encode_content(content.as_bytes());
    Ok(build_fhir_bundle(&library, description, &encoded, base_url))
}

/// Terminal progress bar advanced once per classified file.
#[derive(Default)]
struct CliProgress {
    bar: Option<ProgressBar>,
}

impl ProgressSink for CliProgress {
    fn begin(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        self.bar = Some(bar);
    }

    fn advance(&mut self, file: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(file.to_string());
            bar.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("Verification complete");
        }
    }
}
