use std::str::FromStr;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;

use crate::error::SigningError;

/// Parses a 32-byte hex private key, with or without a `0x` prefix.
pub fn from_private_key(key: &str) -> Result<PrivateKeySigner, SigningError> {
    Ok(PrivateKeySigner::from_str(key.trim())?)
}

/// EIP-55 checksummed address of `signer`.
pub fn checksummed_address(signer: &PrivateKeySigner) -> String {
    signer.address().to_checksum(None)
}

/// Address derived from a raw private key.
pub fn derive_address(key: &str) -> Result<Address, SigningError> {
    Ok(from_private_key(key)?.address())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_checksummed_address() {
        let signer =
            from_private_key("0xad54bdeade5537fb0a553190159783e45d02d316a992db05cbed606d3ca36b39").unwrap();
        assert_eq!(checksummed_address(&signer), "0x0f6A79A579658E401E0B81c6dde1F2cd51d97176");
    }

    #[test]
    fn prefix_is_optional() {
        let with = derive_address("0xad54bdeade5537fb0a553190159783e45d02d316a992db05cbed606d3ca36b39").unwrap();
        let without = derive_address("ad54bdeade5537fb0a553190159783e45d02d316a992db05cbed606d3ca36b39").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(matches!(from_private_key("0x1234"), Err(SigningError::InvalidKey(_))));
        assert!(matches!(from_private_key("not a key"), Err(SigningError::InvalidKey(_))));
        // zero is not a valid secp256k1 scalar
        assert!(from_private_key(&format!("0x{}", "00".repeat(32))).is_err());
    }
}
