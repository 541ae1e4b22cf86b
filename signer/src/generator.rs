//! Deterministic EIP-712 compact signatures.
//!
//! The digest is `keccak256(0x19 0x01 || domainSeparator || hashStruct(message))`
//! and the signature is secp256k1 with RFC 6979 nonces, so a fixed
//! `(identity, schema, domain, message)` tuple always yields the same bytes.

use alloy_dyn_abi::TypedData;
use alloy_primitives::{keccak256, B256};
use alloy_signer::{Signer, SignerSync};
use tracing::debug;

use crate::compact::CompactSignature;
use crate::domain::Domain;
use crate::error::{EncodingError, Result, SigningError};
use crate::message::Message;
use crate::schema::TypeSchema;

/// The three hashes that make up an EIP-712 signing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip712Digest {
    pub domain_separator: B256,
    pub struct_hash: B256,
    pub signing_hash: B256,
}

impl Eip712Digest {
    pub fn new(domain_separator: B256, struct_hash: B256) -> Self {
        let mut out = Vec::with_capacity(2 + 32 + 32);
        out.push(0x19);
        out.push(0x01);
        out.extend_from_slice(domain_separator.as_slice());
        out.extend_from_slice(struct_hash.as_slice());
        Self { domain_separator, struct_hash, signing_hash: keccak256(out) }
    }

    pub(crate) fn from_typed_data(typed: &TypedData) -> Result<Self, EncodingError> {
        Ok(Self::new(typed.domain.separator(), typed.hash_struct()?))
    }
}

/// Builds the encoder input, inferring the primary type from the schema.
pub fn build_typed_data(schema: &TypeSchema, domain: &Domain, message: &Message) -> Result<TypedData, EncodingError> {
    let primary_type = schema.primary_type()?;
    build_typed_data_for(schema, &primary_type, domain, message)
}

/// Builds the encoder input for an explicitly named primary type.
pub fn build_typed_data_for(
    schema: &TypeSchema,
    primary_type: &str,
    domain: &Domain,
    message: &Message,
) -> Result<TypedData, EncodingError> {
    schema.validate()?;
    let message = message.to_typed_json(schema, primary_type)?;

    let document = serde_json::json!({
        "types": schema.to_json(),
        "primaryType": primary_type,
        "domain": {},
        "message": message,
    });
    let mut typed: TypedData = serde_json::from_value(document)?;
    typed.domain = domain.to_eip712();
    Ok(typed)
}

pub fn signing_digest(schema: &TypeSchema, domain: &Domain, message: &Message) -> Result<Eip712Digest, EncodingError> {
    Eip712Digest::from_typed_data(&build_typed_data(schema, domain, message)?)
}

/// Signs `message` under `domain` with `identity`.
pub async fn generate_signature<S>(
    identity: &S,
    schema: &TypeSchema,
    domain: &Domain,
    message: &Message,
) -> Result<CompactSignature>
where
    S: Signer + ?Sized,
{
    let digest = signing_digest(schema, domain, message)?;
    debug!(signer = %identity.address(), digest = %digest.signing_hash, "signing EIP-712 digest");
    let signature = identity.sign_hash(&digest.signing_hash).await.map_err(SigningError::from)?;
    Ok(signature.into())
}

/// Blocking variant of [`generate_signature`].
pub fn generate_signature_sync<S>(
    identity: &S,
    schema: &TypeSchema,
    domain: &Domain,
    message: &Message,
) -> Result<CompactSignature>
where
    S: SignerSync + ?Sized,
{
    let digest = signing_digest(schema, domain, message)?;
    debug!(digest = %digest.signing_hash, "signing EIP-712 digest");
    let signature = identity.sign_hash_sync(&digest.signing_hash).map_err(SigningError::from)?;
    Ok(signature.into())
}
