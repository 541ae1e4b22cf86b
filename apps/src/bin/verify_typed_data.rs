use std::fs;
use std::path::PathBuf;

use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use agreement_signer::{split_documents, verify_document, CompactSignature};

/// CLI to verify signatures over the typed-data documents of a file.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to one or more concatenated typed-data JSON documents.
    #[clap(long, value_name = "FILE")]
    file_path: PathBuf,

    /// Address expected to have produced every signature.
    #[clap(long)]
    signer: Address,

    /// Compact signature, one per document, in file order.
    #[clap(long = "signature", required = true)]
    signatures: Vec<CompactSignature>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment variables from {:?}", path),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => bail!("failed to load .env file: {}", e),
    }

    let args = Args::parse();

    let contents = fs::read_to_string(&args.file_path)
        .with_context(|| format!("failed to read {}", args.file_path.display()))?;
    let spans = split_documents(&contents)?;
    info!("Document ranges: {:?}", spans);

    if spans.len() != args.signatures.len() {
        bail!("found {} document(s) but {} signature(s)", spans.len(), args.signatures.len());
    }

    for (i, (span, signature)) in spans.iter().zip(&args.signatures).enumerate() {
        debug!("Verifying document #{i} with {signature}");
        let digest = verify_document(span.slice(&contents), signature, args.signer)
            .with_context(|| format!("document #{i} failed verification"))?;
        println!("#{i} OK digest: {}", digest.signing_hash);
    }

    Ok(())
}
