use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::schema::{FieldDescriptor, TypeSchema};

pub const AGREEMENT_TYPE_NAME: &str = "Agreement";

/// `Agreement(address active,address passive,bytes metadata)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    pub active: Address,
    pub passive: Address,
    pub metadata: Bytes,
}

impl Agreement {
    /// Agreement whose metadata is the UTF-8 encoding of `uri`.
    pub fn with_metadata_uri(active: Address, passive: Address, uri: &str) -> Self {
        Self { active, passive, metadata: Bytes::copy_from_slice(uri.as_bytes()) }
    }

    pub fn schema() -> TypeSchema {
        TypeSchema::new().with_struct(
            AGREEMENT_TYPE_NAME,
            [
                FieldDescriptor::new("active", "address"),
                FieldDescriptor::new("passive", "address"),
                FieldDescriptor::new("metadata", "bytes"),
            ],
        )
    }

    pub fn message(&self) -> Message {
        Message::new()
            .with("active", self.active)
            .with("passive", self.passive)
            .with("metadata", self.metadata.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_single_primary_type() {
        assert_eq!(Agreement::schema().primary_type().unwrap(), AGREEMENT_TYPE_NAME);
    }

    #[test]
    fn message_matches_schema() {
        let a = Agreement::with_metadata_uri(Address::ZERO, Address::repeat_byte(0xab), "ipfs://x");
        let json = a.message().to_typed_json(&Agreement::schema(), AGREEMENT_TYPE_NAME).unwrap();
        assert_eq!(json["metadata"], "0x697066733a2f2f78");
    }
}
