use alloy_primitives::Address;

/// Top-level error returned by the signature generator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),
}

/// The message, schema or domain could not be turned into an EIP-712 digest.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("type `{0}` is not defined in the schema")]
    UnknownType(String),

    #[error("invalid field type `{ty}` for `{path}`")]
    InvalidFieldType { path: String, ty: String },

    #[error("schema has no primary type candidate")]
    NoPrimaryType,

    #[error("schema has more than one primary type candidate: {0:?}")]
    AmbiguousPrimaryType(Vec<String>),

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{0}` is not declared in the schema")]
    UnexpectedField(String),

    #[error("field `{path}` expects `{expected}`")]
    TypeMismatch { path: String, expected: String },

    #[error("field `{path}` is out of range for `{ty}`")]
    OutOfRange { path: String, ty: String },

    #[error("field `{path}` expects {expected} elements, got {actual}")]
    ArrayLength { path: String, expected: usize, actual: usize },

    #[error("field `{path}` has an invalid address: {reason}")]
    InvalidAddress { path: String, reason: String },

    #[error("malformed typed data documents: {0}")]
    MalformedDocuments(String),

    #[error("invalid typed data JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Eip712(#[from] alloy_dyn_abi::Error),
}

/// The identity could not produce, or the signature does not match, a signer.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("invalid private key: {0}")]
    InvalidKey(#[from] alloy_signer_local::LocalSignerError),

    #[error(transparent)]
    Signer(#[from] alloy_signer::Error),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("recovery failed: {0}")]
    Recovery(#[from] alloy_primitives::SignatureError),

    #[error("recovered address {recovered:#x} does not match expected address {expected:#x}")]
    SignerMismatch { expected: Address, recovered: Address },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
