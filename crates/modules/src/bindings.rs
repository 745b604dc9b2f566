//! ABI interfaces for modules and integrations.
//!
//! These define the calldata shapes modules accept at their universal entry
//! point and the call shape the Uniswap V3 adapter issues against a
//! position-manager endpoint.

use alloy::sol;

use modliq_core::{Asset, LiquidityActionParams};

sol! {
    /// ABI form of the liquidity action parameters. Token fields use the
    /// native sentinel address for the chain-native asset.
    struct SolLiquidityParams {
        address token0;
        address token1;
        uint256 amount0;
        uint256 amount1;
        address positionManager;
        address receiver;
    }

    /// Uniform module surface. Every module answers these and nothing else;
    /// unrecognized selectors fail with a distinguished unsupported-call
    /// error.
    interface IPoolModule {
        function addLiquidity(SolLiquidityParams params, bytes payload) external payable;
        function key() external pure returns (bytes4);
        function version() external pure returns (string memory);
    }

    /// Subset of the Uniswap V3 position manager the adapter targets.
    interface INonfungiblePositionManager {
        struct MintParams {
            address token0;
            address token1;
            uint24 fee;
            int24 tickLower;
            int24 tickUpper;
            uint256 amount0Desired;
            uint256 amount1Desired;
            uint256 amount0Min;
            uint256 amount1Min;
            address recipient;
            uint256 deadline;
        }

        function mint(MintParams params)
            external
            payable
            returns (uint256 tokenId, uint128 liquidity, uint256 amount0, uint256 amount1);

        function refundETH() external payable;
    }
}

impl From<SolLiquidityParams> for LiquidityActionParams {
    fn from(sol: SolLiquidityParams) -> Self {
        Self {
            token0: Asset::from_abi(sol.token0),
            token1: Asset::from_abi(sol.token1),
            amount0: sol.amount0,
            amount1: sol.amount1,
            position_manager: sol.positionManager,
            receiver: sol.receiver,
        }
    }
}

impl From<&LiquidityActionParams> for SolLiquidityParams {
    fn from(params: &LiquidityActionParams) -> Self {
        Self {
            token0: params.token0.to_abi(),
            token1: params.token1.to_abi(),
            amount0: params.amount0,
            amount1: params.amount1,
            positionManager: params.position_manager,
            receiver: params.receiver,
        }
    }
}
