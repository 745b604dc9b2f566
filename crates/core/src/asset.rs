//! Asset identification.
//!
//! Token fields in calldata and events overload a sentinel address for the
//! chain-native asset. Internally that ambiguity is gone: [`Asset`] is an
//! explicit sum type, and the sentinel only survives at the ABI boundary.

use std::fmt;

use alloy::primitives::{address, Address};

/// Sentinel address used for the chain-native asset in ABI token fields.
pub const NATIVE_SENTINEL: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// A fungible asset: either the chain-native unit or a token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// The chain's base fungible unit (ETH and equivalents).
    Native,
    /// A contract-issued fungible token.
    Token(Address),
}

impl Asset {
    /// Whether this is the chain-native asset.
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Interpret an ABI token field, mapping the native sentinel to [`Asset::Native`].
    pub fn from_abi(addr: Address) -> Self {
        if addr == NATIVE_SENTINEL {
            Asset::Native
        } else {
            Asset::Token(addr)
        }
    }

    /// ABI representation of this asset (native becomes the sentinel).
    pub fn to_abi(&self) -> Address {
        match self {
            Asset::Native => NATIVE_SENTINEL,
            Asset::Token(addr) => *addr,
        }
    }

    /// The token address to hand an integration that cannot hold native
    /// assets: `wrapped` for the native side, the token itself otherwise.
    pub fn wrapped_or(&self, wrapped: Address) -> Address {
        match self {
            Asset::Native => wrapped,
            Asset::Token(addr) => *addr,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Token(addr) => write!(f, "{addr}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_maps_to_native() {
        assert_eq!(Asset::from_abi(NATIVE_SENTINEL), Asset::Native);
        assert_eq!(Asset::Native.to_abi(), NATIVE_SENTINEL);
    }

    #[test]
    fn test_token_roundtrip() {
        let addr = address!("000000000000000000000000000000000000bEEF");
        assert_eq!(Asset::from_abi(addr), Asset::Token(addr));
        assert_eq!(Asset::Token(addr).to_abi(), addr);
        assert!(!Asset::Token(addr).is_native());
    }

    #[test]
    fn test_wrapped_or() {
        let weth = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
        let usdc = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert_eq!(Asset::Native.wrapped_or(weth), weth);
        assert_eq!(Asset::Token(usdc).wrapped_or(weth), usdc);
    }
}
