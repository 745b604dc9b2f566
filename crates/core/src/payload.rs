//! Integration-specific payloads.
//!
//! The execution wrapper forwards payloads verbatim; only the matching
//! adapter understands their shape. The payload is a tagged union: typed
//! variants for families this workspace knows about, plus an opaque
//! ABI-encoded escape hatch for payloads the wrapper never needs to decode.

use alloy::primitives::{
    aliases::{I24, U24},
    Bytes, U256,
};
use alloy::sol;
use alloy::sol_types::SolValue;

use crate::error::ModuleError;

// ABI layout of the Uniswap V3 payload as carried in opaque calldata.
sol! {
    struct SolV3MintPayload {
        uint24 fee;
        int24 tickLower;
        int24 tickUpper;
        uint256 amount0Min;
        uint256 amount1Min;
        uint256 deadline;
    }
}

/// Mint parameters understood by the Uniswap V3 adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniswapV3MintPayload {
    /// Pool fee tier in hundredths of a bip (500, 3000, 10000).
    pub fee: u32,
    /// Lower tick bound of the position.
    pub tick_lower: i32,
    /// Upper tick bound of the position.
    pub tick_upper: i32,
    /// Minimum acceptable amount of token0, for slippage protection.
    pub amount0_min: U256,
    /// Minimum acceptable amount of token1, for slippage protection.
    pub amount1_min: U256,
    /// Unix deadline after which the integration rejects the call.
    pub deadline: U256,
}

impl UniswapV3MintPayload {
    /// ABI-encode into the opaque wire form.
    pub fn abi_encode(&self) -> Result<Bytes, ModuleError> {
        let sol = SolV3MintPayload {
            fee: U24::try_from(self.fee)
                .map_err(|_| ModuleError::Abi(format!("fee {} exceeds uint24", self.fee)))?,
            tickLower: I24::try_from(self.tick_lower)
                .map_err(|_| ModuleError::Abi(format!("tick {} exceeds int24", self.tick_lower)))?,
            tickUpper: I24::try_from(self.tick_upper)
                .map_err(|_| ModuleError::Abi(format!("tick {} exceeds int24", self.tick_upper)))?,
            amount0Min: self.amount0_min,
            amount1Min: self.amount1_min,
            deadline: self.deadline,
        };
        Ok(sol.abi_encode().into())
    }

    /// Decode from the opaque wire form.
    pub fn abi_decode(data: &[u8]) -> Result<Self, ModuleError> {
        let sol = SolV3MintPayload::abi_decode(data, true)
            .map_err(|e| ModuleError::Abi(format!("invalid UniswapV3 payload: {e}")))?;
        Ok(Self {
            fee: u32::try_from(sol.fee)
                .map_err(|_| ModuleError::Abi("fee exceeds u32".to_string()))?,
            tick_lower: i32::try_from(sol.tickLower)
                .map_err(|_| ModuleError::Abi("tickLower exceeds i32".to_string()))?,
            tick_upper: i32::try_from(sol.tickUpper)
                .map_err(|_| ModuleError::Abi("tickUpper exceeds i32".to_string()))?,
            amount0_min: sol.amount0Min,
            amount1_min: sol.amount1Min,
            deadline: sol.deadline,
        })
    }
}

/// Payload forwarded verbatim from the entry point to the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationPayload {
    /// Typed payload for the Uniswap V3 adapter family.
    UniswapV3(UniswapV3MintPayload),
    /// ABI-encoded payload decoded only inside the matching adapter.
    Opaque(Bytes),
}
