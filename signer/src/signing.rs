use alloy_primitives::{Address, B256};

use crate::compact::CompactSignature;
use crate::domain::Domain;
use crate::error::{Result, SigningError};
use crate::generator::signing_digest;
use crate::message::Message;
use crate::schema::TypeSchema;

/// Recover the address that produced `signature` over the 32-byte `digest`.
pub fn recover_signer(digest: &B256, signature: &CompactSignature) -> Result<Address, SigningError> {
    Ok(signature.to_signature()?.recover_address_from_prehash(digest)?)
}

/// Check `signature` against an expected signer for a raw digest.
pub fn verify_digest_signature(
    digest: &B256,
    signature: &CompactSignature,
    expected: Address,
) -> Result<(), SigningError> {
    let recovered = recover_signer(digest, signature)?;
    if recovered != expected {
        return Err(SigningError::SignerMismatch { expected, recovered });
    }
    Ok(())
}

/// Verify an EIP-712 signature over `message` against an expected signer.
/// - the digest is recomputed from `(schema, domain, message)`
/// - `expected` must equal the address recovered from `signature`
pub fn verify_signature(
    schema: &TypeSchema,
    domain: &Domain,
    message: &Message,
    signature: &CompactSignature,
    expected: Address,
) -> Result<()> {
    let digest = signing_digest(schema, domain, message)?;
    verify_digest_signature(&digest.signing_hash, signature, expected)?;
    Ok(())
}
