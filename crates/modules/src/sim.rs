//! Simulated position-manager endpoint.
//!
//! Deterministic stand-in for a Uniswap-V3-style position manager, used by
//! the demo binary and integration tests. It consumes a configurable
//! fraction of each desired amount (pulling tokens via the approvals the
//! module granted, or spending forwarded native for the wrapped-native
//! side) and holds unspent native until `refundETH` is called.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, Bytes, FixedBytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use modliq_core::{Asset, ModuleError, Result};

use crate::bindings::INonfungiblePositionManager::{mintCall, refundETHCall};
use crate::host::{Host, IntegrationEndpoint};

/// Basis-point denominator for the consumed fraction.
const BPS: u64 = 10_000;

/// Simulated Uniswap-V3-style position manager.
#[derive(Debug)]
pub struct SimPositionManager {
    address: Address,
    wrapped_native: Address,
    consume_bps: u64,
    next_token_id: AtomicU64,
    pending_refunds: RwLock<HashMap<Address, U256>>,
}

impl SimPositionManager {
    /// Create a simulated manager at `address` consuming `consume_bps`
    /// (out of 10000) of each desired amount.
    pub fn new(address: Address, wrapped_native: Address, consume_bps: u64) -> Self {
        Self {
            address,
            wrapped_native,
            consume_bps: consume_bps.min(BPS),
            next_token_id: AtomicU64::new(1),
            pending_refunds: RwLock::new(HashMap::new()),
        }
    }

    fn consumed(&self, desired: U256) -> U256 {
        desired.saturating_mul(U256::from(self.consume_bps)) / U256::from(BPS)
    }

    async fn handle_mint(
        &self,
        host: &Host,
        from: Address,
        value: U256,
        calldata: &[u8],
    ) -> Result<Bytes> {
        let call = mintCall::abi_decode(calldata, true)
            .map_err(|e| ModuleError::Abi(format!("invalid mint calldata: {e}")))?;
        let params = call.params;

        let mut native_left = value;
        let mut amounts = [U256::ZERO; 2];
        let sides = [
            (params.token0, params.amount0Desired, params.amount0Min),
            (params.token1, params.amount1Desired, params.amount1Min),
        ];
        for (i, (token, desired, min)) in sides.into_iter().enumerate() {
            let consumed = self.consumed(desired);
            if consumed < min {
                return Err(ModuleError::Integration(format!(
                    "consumed {consumed} below minimum {min}"
                )));
            }
            // The wrapped-native side is paid from the forwarded value when
            // any was attached; everything else is pulled by allowance.
            if token == self.wrapped_native && !value.is_zero() {
                if native_left < consumed {
                    return Err(ModuleError::Integration(format!(
                        "forwarded native {native_left} does not cover {consumed}"
                    )));
                }
                native_left -= consumed;
            } else {
                host.ledger.transfer_from(
                    Asset::Token(token),
                    self.address,
                    from,
                    self.address,
                    consumed,
                )?;
            }
            amounts[i] = consumed;
        }

        if !native_left.is_zero() {
            let mut refunds = self.pending_refunds.write();
            let owed = refunds.get(&from).copied().unwrap_or(U256::ZERO);
            refunds.insert(from, owed.saturating_add(native_left));
        }

        let token_id = self.next_token_id.fetch_add(1, Ordering::SeqCst);
        let liquidity =
            u128::try_from(amounts[0].saturating_add(amounts[1])).unwrap_or(u128::MAX);
        debug!(
            token_id,
            amount0 = %amounts[0],
            amount1 = %amounts[1],
            refundable = %native_left,
            "simulated mint"
        );
        Ok((U256::from(token_id), liquidity, amounts[0], amounts[1])
            .abi_encode()
            .into())
    }

    fn handle_refund(&self, host: &Host, from: Address) -> Result<Bytes> {
        let refund = self
            .pending_refunds
            .write()
            .remove(&from)
            .unwrap_or(U256::ZERO);
        if !refund.is_zero() {
            host.ledger
                .transfer(Asset::Native, self.address, from, refund)?;
            debug!(%from, %refund, "refunded unspent native");
        }
        Ok(Bytes::default())
    }
}

#[async_trait]
impl IntegrationEndpoint for SimPositionManager {
    async fn call(
        &self,
        host: &Host,
        from: Address,
        value: U256,
        calldata: Bytes,
    ) -> Result<Bytes> {
        let selector: FixedBytes<4> = match calldata.get(..4) {
            Some(bytes) => FixedBytes::from_slice(bytes),
            None => {
                return Err(ModuleError::UnsupportedCall {
                    selector: FixedBytes::ZERO,
                })
            }
        };
        if selector.0 == mintCall::SELECTOR {
            self.handle_mint(host, from, value, &calldata).await
        } else if selector.0 == refundETHCall::SELECTOR {
            self.handle_refund(host, from)
        } else {
            Err(ModuleError::UnsupportedCall { selector })
        }
    }
}
