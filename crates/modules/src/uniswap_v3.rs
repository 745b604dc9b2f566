//! Uniswap V3 integration adapter.
//!
//! Exemplar adapter: translates the standardized parameters plus a
//! family-specific payload into one `mint` call against a Uniswap-V3-style
//! position manager. Duplicating this file (new key, new call shape) is all
//! an additional integration family needs.

use alloy::primitives::{
    aliases::{I24, U24},
    Address, U256,
};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::debug;

use modliq_core::{
    IntegrationPayload, LiquidityActionParams, ModuleError, ProtocolKey, Result,
    UniswapV3MintPayload,
};

use crate::bindings::INonfungiblePositionManager;
use crate::host::Host;
use crate::wrapper::{IntegrationAdapter, PoolModule};

/// Module type for the Uniswap V3 family.
pub type UniswapV3Module = PoolModule<UniswapV3Adapter>;

/// Adapter issuing `mint` calls against a Uniswap V3 position manager.
///
/// The underlying integration cannot hold native assets, so the adapter
/// substitutes the configured wrapped-native token for any native side.
#[derive(Debug, Clone)]
pub struct UniswapV3Adapter {
    wrapped_native: Address,
}

impl UniswapV3Adapter {
    /// Protocol name the key is derived from.
    pub const PROTOCOL_NAME: &'static str = "UniswapV3";

    /// Create an adapter using `wrapped_native` for native token sides.
    ///
    /// Fails fast when `wrapped_native` is the zero address.
    pub fn new(wrapped_native: Address) -> Result<Self> {
        if wrapped_native == Address::ZERO {
            return Err(ModuleError::ZeroAddress("wrapped_native"));
        }
        Ok(Self { wrapped_native })
    }

    /// Key shared by every adapter generation of this family.
    pub fn protocol_key() -> ProtocolKey {
        ProtocolKey::from_name(Self::PROTOCOL_NAME)
    }

    fn decode_payload(payload: &IntegrationPayload) -> Result<UniswapV3MintPayload> {
        match payload {
            IntegrationPayload::UniswapV3(mint) => Ok(mint.clone()),
            IntegrationPayload::Opaque(bytes) => UniswapV3MintPayload::abi_decode(bytes),
        }
    }
}

#[async_trait]
impl IntegrationAdapter for UniswapV3Adapter {
    fn key(&self) -> ProtocolKey {
        Self::protocol_key()
    }

    async fn provide_liquidity(
        &self,
        host: &Host,
        module: Address,
        value: U256,
        params: &LiquidityActionParams,
        payload: &IntegrationPayload,
    ) -> Result<()> {
        let mint = Self::decode_payload(payload)?;

        let call = INonfungiblePositionManager::mintCall {
            params: INonfungiblePositionManager::MintParams {
                token0: params.token0.wrapped_or(self.wrapped_native),
                token1: params.token1.wrapped_or(self.wrapped_native),
                fee: U24::try_from(mint.fee)
                    .map_err(|_| ModuleError::Abi(format!("fee {} exceeds uint24", mint.fee)))?,
                tickLower: I24::try_from(mint.tick_lower).map_err(|_| {
                    ModuleError::Abi(format!("tick {} exceeds int24", mint.tick_lower))
                })?,
                tickUpper: I24::try_from(mint.tick_upper).map_err(|_| {
                    ModuleError::Abi(format!("tick {} exceeds int24", mint.tick_upper))
                })?,
                amount0Desired: params.amount0,
                amount1Desired: params.amount1,
                amount0Min: mint.amount0_min,
                amount1Min: mint.amount1_min,
                recipient: params.receiver,
                deadline: mint.deadline,
            },
        };

        debug!(
            position_manager = %params.position_manager,
            fee = mint.fee,
            tick_lower = mint.tick_lower,
            tick_upper = mint.tick_upper,
            %value,
            "minting position"
        );
        host.call_endpoint(
            params.position_manager,
            module,
            value,
            call.abi_encode().into(),
        )
        .await?;

        // Unspent native stays with the endpoint until explicitly returned;
        // ask for it back so the wrapper's sweep can reach it.
        if !value.is_zero() {
            host.call_endpoint(
                params.position_manager,
                module,
                U256::ZERO,
                INonfungiblePositionManager::refundETHCall {}.abi_encode().into(),
            )
            .await?;
        }
        Ok(())
    }
}
