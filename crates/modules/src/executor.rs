//! Whole-call atomicity for module invocations.
//!
//! The platform the modules model runs on serializes calls and undoes every
//! effect of a failed one. [`ModuleExecutor`] supplies that guarantee here:
//! it snapshots the ledger and journal, moves the attached native value from
//! the caller to the module (payable semantics), runs the call, and restores
//! both on any error. No failure ever leaves partial fund movement behind.

use alloy::primitives::{Address, Bytes, U256};
use tracing::warn;

use modliq_core::{Asset, IntegrationPayload, LiquidityActionParams, Result};

use crate::host::Host;
use crate::wrapper::LiquidityModule;

/// Executes module calls with rollback-on-error semantics.
#[derive(Debug, Clone)]
pub struct ModuleExecutor {
    host: Host,
}

impl ModuleExecutor {
    /// Create an executor over `host`.
    pub fn new(host: Host) -> Self {
        Self { host }
    }

    /// The host this executor runs against.
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Invoke `add_liquidity` on `module`, attaching `value` native.
    pub async fn add_liquidity(
        &self,
        module: &dyn LiquidityModule,
        caller: Address,
        value: U256,
        params: LiquidityActionParams,
        payload: IntegrationPayload,
    ) -> Result<()> {
        self.run(module, caller, value, |value| {
            module.add_liquidity(caller, value, params, payload)
        })
        .await
    }

    /// Invoke the universal calldata entry point on `module`.
    pub async fn dispatch(
        &self,
        module: &dyn LiquidityModule,
        caller: Address,
        value: U256,
        calldata: &[u8],
    ) -> Result<Bytes> {
        self.run(module, caller, value, |value| {
            module.dispatch(caller, value, calldata)
        })
        .await
    }

    async fn run<'a, T, F, Fut>(
        &self,
        module: &'a dyn LiquidityModule,
        caller: Address,
        value: U256,
        call: F,
    ) -> Result<T>
    where
        F: FnOnce(U256) -> Fut,
        Fut: std::future::Future<Output = Result<T>> + 'a,
    {
        let snapshot = self.host.ledger.snapshot();
        let journal_mark = self.host.journal.len();

        let result = async {
            if !value.is_zero() {
                self.host
                    .ledger
                    .transfer(Asset::Native, caller, module.address(), value)?;
            }
            call(value).await
        }
        .await;

        if let Err(err) = &result {
            warn!(module = %module.address(), %caller, error = %err, "call reverted");
            self.host.ledger.restore(snapshot);
            self.host.journal.truncate(journal_mark);
        }
        result
    }
}
