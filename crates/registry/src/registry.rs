//! Delayed module registry.
//!
//! Authoritative mapping from protocol key to the trusted module handle,
//! mutated through a two-phase workflow: `schedule` opens a delay window,
//! `update` promotes the pending candidate once the window has strictly
//! elapsed, and `cancel` aborts a pending entry at any time. The delay is a
//! governance buffer: it gives reviewers time to inspect a pending trusted
//! implementation change, with cancellation as the abort path.
//!
//! Reading `key()` from a candidate is an external call into untrusted code;
//! every mutating operation performs it before touching registry state, so a
//! reentrant candidate can never observe a half-written mapping.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::Address;
use parking_lot::RwLock;
use tracing::{debug, info};

use modliq_core::{
    Clock, Event, Journal, ModuleError, ModuleScheduled, ModuleSet, ProtocolKey, Result,
    ScheduledModuleCanceled,
};
use modliq_modules::LiquidityModule;

/// Delay between scheduling a module and being able to activate it.
pub const MODULE_UPDATE_DELAY_SECS: u64 = 7 * 24 * 60 * 60;

/// A pending, not-yet-trusted module for a protocol key.
#[derive(Debug, Clone)]
pub struct UpcomingModule {
    /// The scheduled candidate.
    pub module: Arc<dyn LiquidityModule>,
    /// Unix timestamp the delay window opened at.
    pub since: u64,
}

/// Registry of trusted modules per protocol key.
///
/// Reads are open to anyone; mutations are restricted to the manager.
#[derive(Debug)]
pub struct ModuleRegistry {
    manager: Address,
    delay_secs: u64,
    clock: Arc<dyn Clock>,
    journal: Arc<Journal>,
    modules: RwLock<HashMap<ProtocolKey, Arc<dyn LiquidityModule>>>,
    upcoming: RwLock<HashMap<ProtocolKey, UpcomingModule>>,
}

impl ModuleRegistry {
    /// Create a registry administered by `manager`.
    pub fn new(manager: Address, clock: Arc<dyn Clock>, journal: Arc<Journal>) -> Self {
        Self {
            manager,
            delay_secs: MODULE_UPDATE_DELAY_SECS,
            clock,
            journal,
            modules: RwLock::new(HashMap::new()),
            upcoming: RwLock::new(HashMap::new()),
        }
    }

    /// The account allowed to mutate the registry.
    pub fn manager(&self) -> Address {
        self.manager
    }

    fn ensure_manager(&self, caller: Address) -> Result<()> {
        if caller != self.manager {
            return Err(ModuleError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Schedule `candidate` for its protocol key, opening the delay window.
    ///
    /// At most one pending candidate exists per key; the first scheduled
    /// wins until it is explicitly canceled or activated. Whether a module
    /// is already active for the key is deliberately not checked;
    /// scheduling a replacement just opens a new window.
    pub fn schedule_module(
        &self,
        caller: Address,
        candidate: Arc<dyn LiquidityModule>,
    ) -> Result<()> {
        self.ensure_manager(caller)?;
        if candidate.address() == Address::ZERO {
            return Err(ModuleError::ZeroAddress("module"));
        }
        // Untrusted external read, done before any state is touched.
        let key = candidate.key();
        let now = self.clock.now();

        let mut upcoming = self.upcoming.write();
        if let Some(existing) = upcoming.get(&key) {
            return Err(ModuleError::AlreadyScheduled {
                key,
                module: existing.module.address(),
                since: existing.since,
            });
        }
        let module = candidate.address();
        upcoming.insert(
            key,
            UpcomingModule {
                module: candidate,
                since: now,
            },
        );
        drop(upcoming);

        self.journal.record(Event::ModuleScheduled(ModuleScheduled {
            key,
            module,
            since: now,
        }));
        info!(%key, %module, since = now, "module scheduled");
        Ok(())
    }

    /// Promote the pending candidate for `candidate`'s key into the trusted
    /// mapping, once the delay window has strictly elapsed.
    pub fn update_module(&self, caller: Address, candidate: &dyn LiquidityModule) -> Result<()> {
        self.ensure_manager(caller)?;
        let key = candidate.key();
        let now = self.clock.now();

        let mut upcoming = self.upcoming.write();
        let since = match upcoming.get(&key) {
            Some(entry) => entry.since,
            None => return Err(ModuleError::NotScheduled { key }),
        };
        let ready_at = since.saturating_add(self.delay_secs);
        // Strict comparison: the boundary instant itself is still too early.
        if now <= ready_at {
            return Err(ModuleError::DelayNotElapsed { key, ready_at, now });
        }

        // Both maps mutate under their locks before anything else runs.
        let mut modules = self.modules.write();
        let pending = match upcoming.remove(&key) {
            Some(entry) => entry.module,
            None => return Err(ModuleError::NotScheduled { key }),
        };
        let module = pending.address();
        modules.insert(key, pending);
        drop(modules);
        drop(upcoming);

        self.journal
            .record(Event::ModuleSet(ModuleSet { key, module }));
        info!(%key, %module, "module set");
        Ok(())
    }

    /// Clear any pending entry for `candidate`'s key.
    ///
    /// A harmless no-op when nothing is scheduled; the cancellation event is
    /// emitted either way.
    pub fn cancel_scheduled_module(
        &self,
        caller: Address,
        candidate: &dyn LiquidityModule,
    ) -> Result<()> {
        self.ensure_manager(caller)?;
        let key = candidate.key();

        let removed = self.upcoming.write().remove(&key);
        match &removed {
            Some(entry) => info!(%key, module = %entry.module.address(), "scheduled module canceled"),
            None => debug!(%key, "cancel with nothing scheduled"),
        }
        self.journal
            .record(Event::ScheduledModuleCanceled(ScheduledModuleCanceled {
                key,
            }));
        Ok(())
    }

    /// Currently trusted module for `key`, if any.
    pub fn get_module(&self, key: ProtocolKey) -> Option<Arc<dyn LiquidityModule>> {
        self.modules.read().get(&key).cloned()
    }

    /// Pending candidate for `key`, if any.
    pub fn get_upcoming_module(&self, key: ProtocolKey) -> Option<UpcomingModule> {
        self.upcoming.read().get(&key).cloned()
    }
}
