//! Fungible-asset ledger abstraction.
//!
//! Models the per-token transfer endpoints the execution wrapper talks to:
//! pull-transfer by prior authorization, balance query, and approvals.
//! Native and token balances live in the same ledger, keyed by [`Asset`].
//! Snapshots give the executor whole-call atomicity: any failure restores
//! the ledger to its pre-call state.

use std::collections::HashMap;
use std::fmt;

use alloy::primitives::{Address, U256};
use parking_lot::RwLock;
use tracing::trace;

use modliq_core::{Asset, ModuleError, Result};

/// Balances and allowances for assets over accounts.
pub trait TokenLedger: Send + Sync + fmt::Debug {
    /// Balance of `holder` in `asset`.
    fn balance_of(&self, asset: Asset, holder: Address) -> U256;

    /// Remaining allowance granted by `owner` to `spender` for `asset`.
    fn allowance(&self, asset: Asset, owner: Address, spender: Address) -> U256;

    /// Move `amount` of `asset` from `from` to `to`.
    fn transfer(&self, asset: Asset, from: Address, to: Address, amount: U256) -> Result<()>;

    /// Pull `amount` of `asset` from `from` to `to`, spending `spender`'s
    /// allowance granted by `from`.
    fn transfer_from(
        &self,
        asset: Asset,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()>;

    /// Set `spender`'s allowance over `owner`'s `asset` to `amount`.
    fn approve(&self, asset: Asset, owner: Address, spender: Address, amount: U256) -> Result<()>;

    /// Credit `amount` of `asset` to `to` out of thin air (seeding only).
    fn mint(&self, asset: Asset, to: Address, amount: U256);

    /// Capture the full ledger state.
    fn snapshot(&self) -> LedgerSnapshot;

    /// Restore a previously captured state, discarding everything since.
    fn restore(&self, snapshot: LedgerSnapshot);
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    balances: HashMap<(Asset, Address), U256>,
    allowances: HashMap<(Asset, Address, Address), U256>,
}

/// Opaque captured ledger state.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot(LedgerState);

/// In-memory [`TokenLedger`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, asset: Asset, holder: Address) -> U256 {
        self.state
            .read()
            .balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn allowance(&self, asset: Asset, owner: Address, spender: Address) -> U256 {
        self.state
            .read()
            .allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn transfer(&self, asset: Asset, from: Address, to: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let mut state = self.state.write();
        let available = state
            .balances
            .get(&(asset, from))
            .copied()
            .unwrap_or(U256::ZERO);
        if available < amount {
            return Err(ModuleError::InsufficientBalance {
                asset,
                holder: from,
                needed: amount,
                available,
            });
        }
        state.balances.insert((asset, from), available - amount);
        let to_balance = state
            .balances
            .get(&(asset, to))
            .copied()
            .unwrap_or(U256::ZERO);
        state
            .balances
            .insert((asset, to), to_balance.saturating_add(amount));
        trace!(%asset, %from, %to, %amount, "ledger transfer");
        Ok(())
    }

    fn transfer_from(
        &self,
        asset: Asset,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        // Self-pulls need no prior authorization.
        if spender != from {
            let mut state = self.state.write();
            let allowed = state
                .allowances
                .get(&(asset, from, spender))
                .copied()
                .unwrap_or(U256::ZERO);
            if allowed < amount {
                return Err(ModuleError::InsufficientAllowance {
                    asset,
                    owner: from,
                    spender,
                    needed: amount,
                    available: allowed,
                });
            }
            state
                .allowances
                .insert((asset, from, spender), allowed - amount);
        }
        self.transfer(asset, from, to, amount)
    }

    fn approve(&self, asset: Asset, owner: Address, spender: Address, amount: U256) -> Result<()> {
        self.state
            .write()
            .allowances
            .insert((asset, owner, spender), amount);
        trace!(%asset, %owner, %spender, %amount, "ledger approval");
        Ok(())
    }

    fn mint(&self, asset: Asset, to: Address, amount: U256) {
        let mut state = self.state.write();
        let balance = state
            .balances
            .get(&(asset, to))
            .copied()
            .unwrap_or(U256::ZERO);
        state
            .balances
            .insert((asset, to), balance.saturating_add(amount));
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot(self.state.read().clone())
    }

    fn restore(&self, snapshot: LedgerSnapshot) {
        *self.state.write() = snapshot.0;
    }
}
