//! Deterministic EIP-712 compact signatures.
//!
//! ```ignore
//! let signer = identity::from_private_key(key)?;
//! let agreement = Agreement::with_metadata_uri(active, passive, "https://example.com/metadata.json");
//! let signature = generate_signature(&signer, &Agreement::schema(), &domain, &agreement.message()).await?;
//! assert_eq!(signature.to_string().len(), 132);
//! ```

pub mod agreement;
pub mod compact;
pub mod domain;
pub mod error;
pub mod generator;
pub mod identity;
pub mod message;
pub mod schema;
pub mod signing;
pub mod typed_data;

pub use agreement::Agreement;
pub use compact::CompactSignature;
pub use domain::Domain;
pub use error::{EncodingError, Error, Result, SigningError};
pub use generator::{
    build_typed_data, build_typed_data_for, generate_signature, generate_signature_sync, signing_digest, Eip712Digest,
};
pub use message::{Message, Value};
pub use schema::{FieldDescriptor, FieldType, TypeSchema};
pub use signing::{recover_signer, verify_signature};
pub use typed_data::{sign_document, split_documents, verify_document, DocumentSpan, TypedDataDocument};
