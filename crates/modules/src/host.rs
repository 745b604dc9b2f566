//! Host environment for module execution.
//!
//! The host bundles the external collaborators a module touches during one
//! invocation: the token ledger, the set of integration endpoints reachable
//! by address, and the event journal. Endpoint calls move any attached
//! native value before the endpoint runs, mirroring payable call semantics.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use modliq_core::{Asset, Journal, ModuleError, Result};

use crate::ledger::TokenLedger;

/// An external contract reachable at an address.
///
/// Implementations decode their own calldata shape; a module treats the
/// endpoint as untrusted and relies on the executor's rollback for safety.
#[async_trait]
pub trait IntegrationEndpoint: Send + Sync + fmt::Debug {
    /// Handle a call from `from` with `value` native attached.
    ///
    /// `value` has already been credited to the endpoint's ledger balance
    /// when this runs.
    async fn call(
        &self,
        host: &Host,
        from: Address,
        value: U256,
        calldata: Bytes,
    ) -> Result<Bytes>;
}

/// Shared execution environment handed to modules.
#[derive(Debug, Clone)]
pub struct Host {
    /// Balances and allowances.
    pub ledger: Arc<dyn TokenLedger>,
    /// Event audit trail.
    pub journal: Arc<Journal>,
    endpoints: Arc<RwLock<HashMap<Address, Arc<dyn IntegrationEndpoint>>>>,
}

impl Host {
    /// Create a host over a ledger with an empty endpoint set.
    pub fn new(ledger: Arc<dyn TokenLedger>) -> Self {
        Self {
            ledger,
            journal: Arc::new(Journal::new()),
            endpoints: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register an integration endpoint at `address`.
    pub fn register_endpoint(&self, address: Address, endpoint: Arc<dyn IntegrationEndpoint>) {
        self.endpoints.write().insert(address, endpoint);
    }

    /// Call the endpoint at `target`, forwarding `value` native from `from`.
    ///
    /// Fails with [`ModuleError::UnknownEndpoint`] when nothing is registered
    /// at the target address.
    pub async fn call_endpoint(
        &self,
        target: Address,
        from: Address,
        value: U256,
        calldata: Bytes,
    ) -> Result<Bytes> {
        let endpoint = self
            .endpoints
            .read()
            .get(&target)
            .cloned()
            .ok_or(ModuleError::UnknownEndpoint { address: target })?;
        if !value.is_zero() {
            self.ledger.transfer(Asset::Native, from, target, value)?;
        }
        trace!(%target, %from, %value, len = calldata.len(), "endpoint call");
        endpoint.call(self, from, value, calldata).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use alloy::primitives::address;

    #[derive(Debug)]
    struct Echo;

    #[async_trait]
    impl IntegrationEndpoint for Echo {
        async fn call(
            &self,
            _host: &Host,
            _from: Address,
            _value: U256,
            calldata: Bytes,
        ) -> Result<Bytes> {
            Ok(calldata)
        }
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_rejected() {
        let host = Host::new(Arc::new(InMemoryLedger::new()));
        let target = address!("1111111111111111111111111111111111111111");
        let err = host
            .call_endpoint(target, Address::ZERO, U256::ZERO, Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err, ModuleError::UnknownEndpoint { address: target });
    }

    #[tokio::test]
    async fn test_call_moves_value_to_endpoint() {
        let ledger = Arc::new(InMemoryLedger::new());
        let host = Host::new(ledger.clone());
        let caller = address!("00000000000000000000000000000000000000a1");
        let target = address!("1111111111111111111111111111111111111111");
        host.register_endpoint(target, Arc::new(Echo));
        ledger.mint(Asset::Native, caller, U256::from(10));

        let out = host
            .call_endpoint(target, caller, U256::from(4), Bytes::from(vec![1, 2]))
            .await
            .unwrap();
        assert_eq!(out, Bytes::from(vec![1, 2]));
        assert_eq!(ledger.balance_of(Asset::Native, caller), U256::from(6));
        assert_eq!(ledger.balance_of(Asset::Native, target), U256::from(4));
    }
}
