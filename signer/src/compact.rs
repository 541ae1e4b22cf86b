use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, Signature};

use crate::error::SigningError;

/// Length of `r || s || v`.
pub const COMPACT_SIGNATURE_LEN: usize = 65;

/// A 65-byte `r || s || v` signature with `v` in `{27, 28}`.
///
/// Displays as `0x` followed by 130 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactSignature([u8; COMPACT_SIGNATURE_LEN]);

impl CompactSignature {
    pub fn as_bytes(&self) -> &[u8; COMPACT_SIGNATURE_LEN] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// The recoverable form used for address recovery.
    pub fn to_signature(&self) -> Result<Signature, SigningError> {
        Signature::from_raw_array(&self.0).map_err(SigningError::from)
    }
}

impl From<Signature> for CompactSignature {
    fn from(signature: Signature) -> Self {
        Self(signature.as_bytes())
    }
}

impl fmt::Display for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_prefixed(self.0))
    }
}

impl fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactSignature({self})")
    }
}

impl FromStr for CompactSignature {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim()).map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
        let bytes: [u8; COMPACT_SIGNATURE_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            SigningError::InvalidSignature(format!(
                "expected {COMPACT_SIGNATURE_LEN} bytes, got {}",
                b.len()
            ))
        })?;
        if !matches!(bytes[64], 0 | 1 | 27 | 28) {
            return Err(SigningError::InvalidSignature(format!("invalid recovery byte {}", bytes[64])));
        }
        // normalize parity to 27/28
        let mut out = bytes;
        if out[64] < 27 {
            out[64] += 27;
        }
        Ok(Self(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VECTOR: &str = "0x0e1183b212232b4f1c3e11edd00059fb01710c0335b81c11a43d11d5b7cd01d55483b1a1432f76c4d3cab1bb2607622fd173f8f3d6bdbe8927c4706f9be447321b";

    #[test]
    fn parses_and_formats() {
        let sig: CompactSignature = VECTOR.parse().unwrap();
        assert_eq!(sig.to_string(), VECTOR);
        assert_eq!(sig.to_string().len(), 2 + 2 * COMPACT_SIGNATURE_LEN);
        assert_eq!(sig.v(), 27);
        assert_eq!(hex::encode(sig.r()), &VECTOR[2..66]);
        assert_eq!(hex::encode(sig.s()), &VECTOR[66..130]);
    }

    #[test]
    fn normalizes_raw_parity() {
        let raw = format!("{}00", &VECTOR[..130]);
        let sig: CompactSignature = raw.parse().unwrap();
        assert_eq!(sig.to_string(), VECTOR);
    }

    #[test]
    fn round_trips_through_alloy_signature() {
        let sig: CompactSignature = VECTOR.parse().unwrap();
        let alloy = sig.to_signature().unwrap();
        assert_eq!(CompactSignature::from(alloy), sig);
    }

    #[test]
    fn rejects_bad_lengths_and_parity() {
        assert!("0x1234".parse::<CompactSignature>().is_err());
        let bad_v = format!("{}05", &VECTOR[..130]);
        assert!(bad_v.parse::<CompactSignature>().is_err());
        assert!("not hex".parse::<CompactSignature>().is_err());
    }
}
