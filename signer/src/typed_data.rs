//! Standard EIP-712 typed-data JSON documents.
//!
//! A document carries `types`, `primaryType`, `domain`, and `message`. Files
//! may hold several documents back to back; [`split_documents`] finds them.

use alloy_dyn_abi::TypedData;
use alloy_primitives::Address;
use alloy_signer::SignerSync;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compact::CompactSignature;
use crate::error::{EncodingError, Result, SigningError};
use crate::generator::Eip712Digest;
use crate::signing::verify_digest_signature;

/// Byte range `[start, end)` of one JSON document inside a larger input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSpan {
    pub start: usize,
    pub end: usize,
}

impl DocumentSpan {
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

/// A parsed typed-data document.
#[derive(Debug, Clone)]
pub struct TypedDataDocument(TypedData);

impl TypedDataDocument {
    pub fn parse(json: &str) -> Result<Self, EncodingError> {
        Ok(Self(serde_json::from_str(json)?))
    }

    pub fn primary_type(&self) -> &str {
        &self.0.primary_type
    }

    pub fn digest(&self) -> Result<Eip712Digest, EncodingError> {
        let digest = Eip712Digest::from_typed_data(&self.0)?;
        debug!(primary_type = %self.0.primary_type, digest = %digest.signing_hash, "computed typed data digest");
        Ok(digest)
    }

    pub fn typed_data(&self) -> &TypedData {
        &self.0
    }
}

/// Sign a single typed-data JSON document.
pub fn sign_document<S>(identity: &S, json: &str) -> Result<(Eip712Digest, CompactSignature)>
where
    S: SignerSync + ?Sized,
{
    let digest = TypedDataDocument::parse(json)?.digest()?;
    let signature = identity.sign_hash_sync(&digest.signing_hash).map_err(SigningError::from)?;
    Ok((digest, signature.into()))
}

/// Verify a signature over a single typed-data JSON document.
pub fn verify_document(json: &str, signature: &CompactSignature, expected: Address) -> Result<Eip712Digest> {
    let digest = TypedDataDocument::parse(json)?.digest()?;
    verify_digest_signature(&digest.signing_hash, signature, expected)?;
    Ok(digest)
}

/// Locate each top-level JSON object of `input`, in order.
///
/// Objects may be separated by whitespace or written back to back. Anything
/// that is not a JSON object at the top level is rejected.
pub fn split_documents(input: &str) -> Result<Vec<DocumentSpan>, EncodingError> {
    let mut stream = serde_json::Deserializer::from_str(input).into_iter::<serde_json::Value>();
    let mut spans = Vec::new();
    let mut offset = 0;

    while let Some(next) = stream.next() {
        let value = next.map_err(|e| {
            EncodingError::MalformedDocuments(format!("document #{} after byte {offset}: {e}", spans.len()))
        })?;
        let end = stream.byte_offset();
        let raw = &input[offset..end];
        let start = end - raw.trim_start().len();
        if !value.is_object() {
            return Err(EncodingError::MalformedDocuments(format!(
                "expected an object at byte {start}, found `{}`",
                raw.trim()
            )));
        }
        spans.push(DocumentSpan { start, end });
        offset = end;
    }

    Ok(spans)
}
