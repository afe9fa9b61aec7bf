//! SHARES CLI - CQL and FHIR resource management.
//!
//! Thin binary entry point: parse arguments, initialize logging, dispatch
//! to the matching command.

use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Convert(args) => {
            cli::convert_command(args).await?;
        }
        Commands::CreateFhirBundle(args) => {
            cli::create_fhir_bundle_command(args).await?;
        }
        Commands::PostFhir(args) => {
            cli::post_fhir_command(args).await?;
        }
        Commands::CreateAndPost(args) => {
            cli::create_and_post_command(args).await?;
        }
        Commands::SyntheaUpload(args) => {
            cli::synthea_upload_command(args).await?;
        }
        Commands::VerifyCodes(args) => {
            cli::verify_codes_command(args).await?;
        }
    }

    Ok(())
}
