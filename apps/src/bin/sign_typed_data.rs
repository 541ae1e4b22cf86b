use std::fs;
use std::path::PathBuf;

use alloy_primitives::hex;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use agreement_signer::{identity, sign_document, split_documents};

/// CLI to sign every EIP-712 typed-data document in a file and print digest and signature.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to one or more concatenated typed-data JSON documents.
    #[clap(long, value_name = "FILE")]
    file_path: PathBuf,

    /// Private key to sign with; if omitted, a random key is generated.
    #[clap(long, env = "SIGNER_PRIVATE_KEY")]
    private_key: Option<PrivateKeySigner>,
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
    if spans.is_empty() {
        bail!("no typed data documents found in {}", args.file_path.display());
    }
    info!("Found {} typed data document(s)", spans.len());

    let signer = match args.private_key {
        Some(pk) => pk,
        None => PrivateKeySigner::random(),
    };

    println!("File: {}", args.file_path.display());
    println!("Signer: {}", identity::checksummed_address(&signer));
    for (i, span) in spans.iter().enumerate() {
        let (digest, signature) = sign_document(&signer, span.slice(&contents))
            .with_context(|| format!("document #{i} (bytes {}..{})", span.start, span.end))?;
        println!("#{i} Digest (EIP-712): 0x{}", hex::encode(digest.signing_hash));
        println!("#{i} Signature: {signature}");
    }

    Ok(())
}
