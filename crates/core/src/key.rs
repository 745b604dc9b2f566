//! Protocol keys.

use std::fmt;

use alloy::primitives::{keccak256, FixedBytes};

/// Stable identifier for an integration family (e.g. Uniswap-V3-style pools).
///
/// Derived as the first four bytes of `keccak256(name)`, so every adapter
/// generation targeting the same family maps to the same key. Collisions
/// across unrelated families are a caller error and are not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolKey(FixedBytes<4>);

impl ProtocolKey {
    /// Create a key from raw bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(FixedBytes(bytes))
    }

    /// Derive the key for a protocol name.
    pub fn from_name(name: &str) -> Self {
        let digest = keccak256(name.as_bytes());
        Self(FixedBytes::from_slice(&digest[..4]))
    }

    /// The underlying fixed-width bytes.
    pub fn bytes(&self) -> FixedBytes<4> {
        self.0
    }
}

impl From<FixedBytes<4>> for ProtocolKey {
    fn from(bytes: FixedBytes<4>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ProtocolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
