//! Liquidity action parameters.

use alloy::primitives::{Address, U256};

use crate::asset::Asset;

/// Request shape for the uniform add-liquidity entry point.
///
/// Constructed per call by the caller and never persisted. Fields are not
/// validated beyond what the execution wrapper structurally needs; bad values
/// surface as downstream call failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityActionParams {
    /// First asset of the pair.
    pub token0: Asset,
    /// Second asset of the pair.
    pub token1: Asset,
    /// Declared amount of `token0`.
    pub amount0: U256,
    /// Declared amount of `token1`.
    pub amount1: U256,
    /// Execution endpoint of the target integration (receives approvals).
    pub position_manager: Address,
    /// Account credited with the resulting position and any refunds.
    pub receiver: Address,
}

impl LiquidityActionParams {
    /// Native value the caller must attach: the sum of amounts declared on
    /// native-asset sides.
    pub fn required_native(&self) -> U256 {
        let mut required = U256::ZERO;
        if self.token0.is_native() {
            required = required.saturating_add(self.amount0);
        }
        if self.token1.is_native() {
            required = required.saturating_add(self.amount1);
        }
        required
    }

    /// The declared (asset, amount) pairs in order.
    pub fn sides(&self) -> [(Asset, U256); 2] {
        [(self.token0, self.amount0), (self.token1, self.amount1)]
    }
}
