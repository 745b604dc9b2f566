//! Generic execution wrapper for liquidity modules.
//!
//! [`PoolModule`] standardizes everything around an integration call: fund
//! intake from the caller, approval of the integration endpoint, delegation
//! to the adapter, refund sweep to the receiver, and event emission. The
//! adapter only translates parameters into one integration call; it never
//! moves refunds or emits completion events itself.
//!
//! The safety discipline is sweep-to-zero: whatever balance the module holds
//! after delegation (refunds, overpayments, even balances that predate the
//! call) is transferred to the receiver before the call returns, so no asset
//! ever lingers where a reentrant collaborator could observe it.

use std::fmt;

use alloy::primitives::{Address, Bytes, FixedBytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use tracing::{debug, info};

use modliq_core::{
    Asset, Event, IntegrationPayload, LiquidityActionParams, LiquidityAdded, ModuleError,
    ProtocolKey, Result,
};

use crate::bindings::IPoolModule;
use crate::host::Host;

/// Contract generation of the wrapper and its adapters.
pub const MODULE_VERSION: &str = "1.0.0";

/// Integration-specific half of a module.
///
/// Implementations decode the payload, translate the standardized parameters
/// into the integration's call shape, and issue exactly one call against the
/// endpoint at `params.position_manager` (plus an optional native-refund
/// call). Unspent funds stay in the module for the wrapper to sweep.
#[async_trait]
pub trait IntegrationAdapter: Send + Sync + fmt::Debug {
    /// Protocol key of the integration family this adapter serves.
    fn key(&self) -> ProtocolKey;

    /// Perform the integration-specific call.
    ///
    /// Declared amounts have already been pulled into `module` and approved
    /// to the integration endpoint; `value` native has been credited to
    /// `module`'s balance.
    async fn provide_liquidity(
        &self,
        host: &Host,
        module: Address,
        value: U256,
        params: &LiquidityActionParams,
        payload: &IntegrationPayload,
    ) -> Result<()>;
}

/// Uniform operation contract every module exposes.
///
/// The registry stores and hands out `Arc<dyn LiquidityModule>` handles;
/// callers invoke the action entry point on the handle directly.
#[async_trait]
pub trait LiquidityModule: Send + Sync + fmt::Debug {
    /// Address this module occupies in the ledger world.
    fn address(&self) -> Address;

    /// Protocol key of the integration family.
    fn key(&self) -> ProtocolKey;

    /// Semantic version of the module contract generation.
    fn version(&self) -> &str {
        MODULE_VERSION
    }

    /// Add liquidity through this module.
    ///
    /// `value` is the native amount attached to the call; it must already
    /// have been credited to the module's balance (the executor does this
    /// when it moves the call value).
    async fn add_liquidity(
        &self,
        caller: Address,
        value: U256,
        params: LiquidityActionParams,
        payload: IntegrationPayload,
    ) -> Result<()>;

    /// Universal calldata entry point.
    ///
    /// Routes known selectors to the typed operations and rejects everything
    /// else with [`ModuleError::UnsupportedCall`]. Calldata shorter than a
    /// selector reports the zero selector. Only `addLiquidity` is payable;
    /// the introspection entry points fail when value is attached.
    async fn dispatch(&self, caller: Address, value: U256, calldata: &[u8]) -> Result<Bytes> {
        let selector: FixedBytes<4> = match calldata.get(..4) {
            Some(bytes) => FixedBytes::from_slice(bytes),
            None => return Err(ModuleError::UnsupportedCall {
                selector: FixedBytes::ZERO,
            }),
        };

        if selector.0 == IPoolModule::addLiquidityCall::SELECTOR {
            let call = IPoolModule::addLiquidityCall::abi_decode(calldata, true)
                .map_err(|e| ModuleError::Abi(format!("invalid addLiquidity calldata: {e}")))?;
            self.add_liquidity(
                caller,
                value,
                call.params.into(),
                IntegrationPayload::Opaque(call.payload),
            )
            .await?;
            Ok(Bytes::default())
        } else if selector.0 == IPoolModule::keyCall::SELECTOR {
            // Introspection entry points are not payable; accepting value
            // here would strand it in the module.
            if !value.is_zero() {
                return Err(ModuleError::NonPayable { selector, value });
            }
            Ok(self.key().bytes().abi_encode().into())
        } else if selector.0 == IPoolModule::versionCall::SELECTOR {
            if !value.is_zero() {
                return Err(ModuleError::NonPayable { selector, value });
            }
            Ok(self.version().to_string().abi_encode().into())
        } else {
            Err(ModuleError::UnsupportedCall { selector })
        }
    }
}

/// Reusable execution wrapper around an [`IntegrationAdapter`].
#[derive(Debug)]
pub struct PoolModule<A> {
    address: Address,
    host: Host,
    adapter: A,
}

impl<A: IntegrationAdapter> PoolModule<A> {
    /// Create a module at `address` delegating to `adapter`.
    pub fn new(address: Address, host: Host, adapter: A) -> Self {
        Self {
            address,
            host,
            adapter,
        }
    }

    /// Sweep the module's entire remaining balance of `asset` to `receiver`.
    fn sweep(&self, asset: Asset, receiver: Address) -> Result<()> {
        let balance = self.host.ledger.balance_of(asset, self.address);
        if !balance.is_zero() {
            self.host
                .ledger
                .transfer(asset, self.address, receiver, balance)?;
            debug!(%asset, %receiver, amount = %balance, "swept residual balance");
        }
        Ok(())
    }
}

#[async_trait]
impl<A: IntegrationAdapter> LiquidityModule for PoolModule<A> {
    fn address(&self) -> Address {
        self.address
    }

    fn key(&self) -> ProtocolKey {
        self.adapter.key()
    }

    async fn add_liquidity(
        &self,
        caller: Address,
        value: U256,
        params: LiquidityActionParams,
        payload: IntegrationPayload,
    ) -> Result<()> {
        // Native coverage is checked before any token moves, so a failure
        // here leaves the caller untouched.
        let required = params.required_native();
        if value < required {
            return Err(ModuleError::InsufficientNativeValue {
                required,
                supplied: value,
            });
        }

        let ledger = &self.host.ledger;
        for (asset, amount) in params.sides() {
            if let Asset::Token(token) = asset {
                ledger.transfer_from(asset, self.address, caller, self.address, amount)?;
                ledger.approve(asset, self.address, params.position_manager, amount)?;
                debug!(token = %token, amount = %amount, "pulled and approved");
            }
        }

        self.adapter
            .provide_liquidity(&self.host, self.address, value, &params, &payload)
            .await?;

        // Sweep-to-zero: native first, then each token side. Balances that
        // predate the call are deliberately included.
        self.sweep(Asset::Native, params.receiver)?;
        for (asset, _) in params.sides() {
            if !asset.is_native() {
                self.sweep(asset, params.receiver)?;
            }
        }

        self.host.journal.record(Event::LiquidityAdded(LiquidityAdded {
            receiver: params.receiver,
            token0: params.token0.to_abi(),
            token1: params.token1.to_abi(),
            sender: caller,
            amount0: params.amount0,
            amount1: params.amount1,
        }));
        info!(
            key = %self.key(),
            receiver = %params.receiver,
            sender = %caller,
            amount0 = %params.amount0,
            amount1 = %params.amount1,
            "liquidity added"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{InMemoryLedger, TokenLedger};
    use alloy::primitives::address;
    use std::sync::Arc;

    const MODULE: Address = address!("00000000000000000000000000000000000d0D01");
    const CALLER: Address = address!("00000000000000000000000000000000000000a1");
    const RECEIVER: Address = address!("00000000000000000000000000000000000000b2");
    const POSITION_MANAGER: Address = address!("C36442b4a4522E871399CD717aBDD847Ab11FE88");

    fn token0() -> Asset {
        Asset::Token(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"))
    }

    fn token1() -> Asset {
        Asset::Token(address!("6B175474E89094C44Da98b954EedeAC495271d0F"))
    }

    /// Adapter that performs no integration call, leaving every pulled
    /// amount in the module for the sweep.
    #[derive(Debug)]
    struct NoopAdapter;

    #[async_trait]
    impl IntegrationAdapter for NoopAdapter {
        fn key(&self) -> ProtocolKey {
            ProtocolKey::from_name("Noop")
        }

        async fn provide_liquidity(
            &self,
            _host: &Host,
            _module: Address,
            _value: U256,
            _params: &LiquidityActionParams,
            _payload: &IntegrationPayload,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn setup() -> (Arc<InMemoryLedger>, Host, PoolModule<NoopAdapter>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let host = Host::new(ledger.clone());
        let module = PoolModule::new(MODULE, host.clone(), NoopAdapter);
        (ledger, host, module)
    }

    fn params(t0: Asset, t1: Asset, amount0: u64, amount1: u64) -> LiquidityActionParams {
        LiquidityActionParams {
            token0: t0,
            token1: t1,
            amount0: U256::from(amount0),
            amount1: U256::from(amount1),
            position_manager: POSITION_MANAGER,
            receiver: RECEIVER,
        }
    }

    fn opaque() -> IntegrationPayload {
        IntegrationPayload::Opaque(Bytes::new())
    }

    #[tokio::test]
    async fn test_pull_approve_and_sweep() {
        let (ledger, host, module) = setup();
        ledger.mint(token0(), CALLER, U256::from(1_000));
        ledger.mint(token1(), CALLER, U256::from(2_000));
        ledger.approve(token0(), CALLER, MODULE, U256::from(1_000)).unwrap();
        ledger.approve(token1(), CALLER, MODULE, U256::from(2_000)).unwrap();

        module
            .add_liquidity(
                CALLER,
                U256::ZERO,
                params(token0(), token1(), 1_000, 2_000),
                opaque(),
            )
            .await
            .unwrap();

        // Exact pull: caller drained by exactly the declared amounts.
        assert_eq!(ledger.balance_of(token0(), CALLER), U256::ZERO);
        assert_eq!(ledger.balance_of(token1(), CALLER), U256::ZERO);
        // The noop adapter spent nothing, so the sweep refunds everything.
        assert_eq!(ledger.balance_of(token0(), RECEIVER), U256::from(1_000));
        assert_eq!(ledger.balance_of(token1(), RECEIVER), U256::from(2_000));
        // Zero residue.
        assert_eq!(ledger.balance_of(token0(), MODULE), U256::ZERO);
        assert_eq!(ledger.balance_of(token1(), MODULE), U256::ZERO);
        // The endpoint was approved for exactly the declared amounts.
        assert_eq!(
            ledger.allowance(token0(), MODULE, POSITION_MANAGER),
            U256::from(1_000)
        );

        let events = host.journal.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::LiquidityAdded(e) => {
                assert_eq!(e.receiver, RECEIVER);
                assert_eq!(e.token0, token0().to_abi());
                assert_eq!(e.token1, token1().to_abi());
                assert_eq!(e.sender, CALLER);
                assert_eq!(e.amount0, U256::from(1_000));
                assert_eq!(e.amount1, U256::from(2_000));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_insufficient_native_pulls_nothing() {
        let (ledger, host, module) = setup();
        ledger.mint(token0(), CALLER, U256::from(1_000));
        ledger.approve(token0(), CALLER, MODULE, U256::from(1_000)).unwrap();

        let err = module
            .add_liquidity(
                CALLER,
                U256::from(400),
                params(token0(), Asset::Native, 1_000, 500),
                opaque(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ModuleError::InsufficientNativeValue {
                required: U256::from(500),
                supplied: U256::from(400),
            }
        );
        // The check runs before any pull.
        assert_eq!(ledger.balance_of(token0(), CALLER), U256::from(1_000));
        assert_eq!(ledger.balance_of(token0(), MODULE), U256::ZERO);
        assert!(host.journal.is_empty());
    }

    #[tokio::test]
    async fn test_preexisting_balances_are_swept() {
        let (ledger, _host, module) = setup();
        // Stray balances that arrived before the call.
        ledger.mint(token0(), MODULE, U256::from(50));
        ledger.mint(Asset::Native, MODULE, U256::from(7));
        ledger.mint(token0(), CALLER, U256::from(100));
        ledger.approve(token0(), CALLER, MODULE, U256::from(100)).unwrap();

        module
            .add_liquidity(
                CALLER,
                U256::ZERO,
                params(token0(), token1(), 100, 0),
                opaque(),
            )
            .await
            .unwrap();

        assert_eq!(ledger.balance_of(token0(), RECEIVER), U256::from(150));
        assert_eq!(ledger.balance_of(Asset::Native, RECEIVER), U256::from(7));
        assert_eq!(ledger.balance_of(token0(), MODULE), U256::ZERO);
        assert_eq!(ledger.balance_of(Asset::Native, MODULE), U256::ZERO);
    }

    #[tokio::test]
    async fn test_native_value_swept_to_receiver() {
        let (ledger, _host, module) = setup();
        // Simulate the executor moving the call value in.
        ledger.mint(Asset::Native, MODULE, U256::from(500));

        module
            .add_liquidity(
                CALLER,
                U256::from(500),
                params(Asset::Native, token1(), 500, 0),
                opaque(),
            )
            .await
            .unwrap();

        assert_eq!(ledger.balance_of(Asset::Native, RECEIVER), U256::from(500));
        assert_eq!(ledger.balance_of(Asset::Native, MODULE), U256::ZERO);
    }

    #[tokio::test]
    async fn test_missing_allowance_aborts() {
        let (ledger, host, module) = setup();
        ledger.mint(token0(), CALLER, U256::from(1_000));
        // No approval granted.

        let err = module
            .add_liquidity(
                CALLER,
                U256::ZERO,
                params(token0(), token1(), 1_000, 0),
                opaque(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ModuleError::InsufficientAllowance { .. }));
        assert!(host.journal.is_empty());
    }

    #[test]
    fn test_default_version() {
        let (_ledger, host, _module) = setup();
        let module = PoolModule::new(MODULE, host, NoopAdapter);
        assert_eq!(module.version(), "1.0.0");
    }

    #[tokio::test]
    async fn test_dispatch_rejects_unknown_selector() {
        let (_ledger, _host, module) = setup();
        let err = module
            .dispatch(CALLER, U256::ZERO, &[0xde, 0xad, 0xbe, 0xef, 0x00])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ModuleError::UnsupportedCall {
                selector: FixedBytes([0xde, 0xad, 0xbe, 0xef]),
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_rejects_short_calldata() {
        let (_ledger, _host, module) = setup();
        let err = module.dispatch(CALLER, U256::ZERO, &[0x01]).await.unwrap_err();
        assert_eq!(
            err,
            ModuleError::UnsupportedCall {
                selector: FixedBytes::ZERO,
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_key_and_version() {
        let (_ledger, _host, module) = setup();

        let key = module
            .dispatch(CALLER, U256::ZERO, &IPoolModule::keyCall {}.abi_encode())
            .await
            .unwrap();
        assert_eq!(
            key,
            Bytes::from(ProtocolKey::from_name("Noop").bytes().abi_encode())
        );

        let version = module
            .dispatch(CALLER, U256::ZERO, &IPoolModule::versionCall {}.abi_encode())
            .await
            .unwrap();
        assert_eq!(version, Bytes::from("1.0.0".to_string().abi_encode()));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_value_on_introspection() {
        let (_ledger, _host, module) = setup();
        for calldata in [
            IPoolModule::keyCall {}.abi_encode(),
            IPoolModule::versionCall {}.abi_encode(),
        ] {
            let err = module
                .dispatch(CALLER, U256::from(5), &calldata)
                .await
                .unwrap_err();
            assert_eq!(
                err,
                ModuleError::NonPayable {
                    selector: FixedBytes::from_slice(&calldata[..4]),
                    value: U256::from(5),
                }
            );
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_add_liquidity() {
        let (ledger, _host, module) = setup();
        ledger.mint(token0(), CALLER, U256::from(100));
        ledger.approve(token0(), CALLER, MODULE, U256::from(100)).unwrap();

        let call = IPoolModule::addLiquidityCall {
            params: (&params(token0(), token1(), 100, 0)).into(),
            payload: Bytes::new(),
        };
        module
            .dispatch(CALLER, U256::ZERO, &call.abi_encode())
            .await
            .unwrap();

        assert_eq!(ledger.balance_of(token0(), RECEIVER), U256::from(100));
        assert_eq!(ledger.balance_of(token0(), MODULE), U256::ZERO);
    }
}
