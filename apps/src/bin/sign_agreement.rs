use alloy_primitives::{hex, Address};
use alloy_signer_local::PrivateKeySigner;
use anyhow::{bail, Result};
use clap::Parser;
use tracing::{debug, info};

use agreement_signer::{generate_signature, identity, signing_digest, Agreement, Domain};

/// CLI to sign an `Agreement(address active,address passive,bytes metadata)` message.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Private key of the signing party.
    #[clap(long, env = "SIGNER_PRIVATE_KEY")]
    private_key: PrivateKeySigner,

    /// Address of the active party.
    #[clap(long)]
    active: Address,

    /// Address of the passive party; defaults to the signer.
    #[clap(long)]
    passive: Option<Address>,

    /// Metadata URI, signed as its UTF-8 bytes.
    #[clap(long)]
    metadata: String,

    /// EIP-712 domain name.
    #[clap(long, env = "DOMAIN_NAME", default_value = "Name")]
    domain_name: String,

    /// EIP-712 domain version.
    #[clap(long, env = "DOMAIN_VERSION", default_value = "Version")]
    domain_version: String,

    /// Chain id of the verifying contract.
    #[clap(long, env = "CHAIN_ID", default_value_t = 31337)]
    chain_id: u64,

    /// Address of the contract that verifies the signature.
    #[clap(long, env = "VERIFYING_CONTRACT")]
    verifying_contract: Address,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment variables from {:?}", path),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => bail!("failed to load .env file: {}", e),
    }

    let args = Args::parse();
    let signer = args.private_key;

    let agreement = Agreement::with_metadata_uri(
        args.active,
        args.passive.unwrap_or_else(|| signer.address()),
        &args.metadata,
    );
    let domain = Domain::new(args.domain_name, args.domain_version, args.chain_id, args.verifying_contract);
    let schema = Agreement::schema();
    let message = agreement.message();

    let digest = signing_digest(&schema, &domain, &message)?;
    info!("Signing agreement between {:#x} and {:#x}", agreement.active, agreement.passive);
    let signature = generate_signature(&signer, &schema, &domain, &message).await?;

    println!("Signer: {}", identity::checksummed_address(&signer));
    println!("Digest (EIP-712): 0x{}", hex::encode(digest.signing_hash));
    println!("Signature: {signature}");

    Ok(())
}
