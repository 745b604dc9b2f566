//! Event types, signatures, and the journal.
//!
//! Events are the durable audit trail external tooling relies on. Field order
//! and indexing must stay stable across versions; each struct documents the
//! Solidity-level signature it corresponds to, and [`event_signatures`]
//! exposes the Keccak256 hashes used for log filtering (first topic).

use alloy::primitives::{keccak256, Address, B256, U256};
use parking_lot::RwLock;
use tracing::debug;

use crate::key::ProtocolKey;

/// Liquidity was added through a module.
///
/// `LiquidityAdded(address indexed receiver, address token0, address token1,
/// address indexed sender, uint256 amount0, uint256 amount1)`
///
/// Token fields carry the ABI form (native sentinel for the native asset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityAdded {
    /// Account credited with the position and refunds (indexed).
    pub receiver: Address,
    /// First asset of the pair, ABI form.
    pub token0: Address,
    /// Second asset of the pair, ABI form.
    pub token1: Address,
    /// Original caller (indexed).
    pub sender: Address,
    /// Declared amount of token0.
    pub amount0: U256,
    /// Declared amount of token1.
    pub amount1: U256,
}

/// A candidate module entered the delay window.
///
/// `ModuleScheduled(bytes4 indexed key, address indexed module, uint64 since)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleScheduled {
    /// Protocol key the candidate targets (indexed).
    pub key: ProtocolKey,
    /// Candidate module address (indexed).
    pub module: Address,
    /// Unix timestamp the delay window opened at.
    pub since: u64,
}

/// A pending module was promoted to the trusted mapping.
///
/// `ModuleSet(bytes4 indexed key, address indexed module)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSet {
    /// Protocol key that was updated (indexed).
    pub key: ProtocolKey,
    /// Newly trusted module address (indexed).
    pub module: Address,
}

/// A pending entry was cleared before activation.
///
/// `ScheduledModuleCanceled(bytes4 indexed key)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledModuleCanceled {
    /// Protocol key whose pending entry was cleared (indexed).
    pub key: ProtocolKey,
}

/// Any event emitted by the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// See [`LiquidityAdded`].
    LiquidityAdded(LiquidityAdded),
    /// See [`ModuleScheduled`].
    ModuleScheduled(ModuleScheduled),
    /// See [`ModuleSet`].
    ModuleSet(ModuleSet),
    /// See [`ScheduledModuleCanceled`].
    ScheduledModuleCanceled(ScheduledModuleCanceled),
}

impl Event {
    /// Keccak256 signature of the event (first log topic).
    pub fn signature(&self) -> B256 {
        match self {
            Event::LiquidityAdded(_) => event_signatures::liquidity_added(),
            Event::ModuleScheduled(_) => event_signatures::module_scheduled(),
            Event::ModuleSet(_) => event_signatures::module_set(),
            Event::ScheduledModuleCanceled(_) => event_signatures::scheduled_module_canceled(),
        }
    }
}

/// Keccak256 event signatures for log subscription.
pub mod event_signatures {
    use super::*;

    /// keccak256("LiquidityAdded(address,address,address,address,uint256,uint256)")
    pub fn liquidity_added() -> B256 {
        keccak256("LiquidityAdded(address,address,address,address,uint256,uint256)")
    }

    /// keccak256("ModuleScheduled(bytes4,address,uint64)")
    pub fn module_scheduled() -> B256 {
        keccak256("ModuleScheduled(bytes4,address,uint64)")
    }

    /// keccak256("ModuleSet(bytes4,address)")
    pub fn module_set() -> B256 {
        keccak256("ModuleSet(bytes4,address)")
    }

    /// keccak256("ScheduledModuleCanceled(bytes4)")
    pub fn scheduled_module_canceled() -> B256 {
        keccak256("ScheduledModuleCanceled(bytes4)")
    }
}

/// Append-only event journal shared by the host and the registry.
///
/// Order reflects call order; entries are never rewritten. Callers that need
/// rollback semantics truncate via [`Journal::truncate`] together with their
/// ledger snapshot.
#[derive(Debug, Default)]
pub struct Journal {
    events: RwLock<Vec<Event>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: Event) {
        debug!(event = ?event, signature = %event.signature(), "event recorded");
        self.events.write().push(event);
    }

    /// Snapshot of all recorded events, in emission order.
    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drop every event past `len`, restoring an earlier snapshot point.
    pub fn truncate(&self, len: usize) {
        self.events.write().truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_signatures_are_distinct() {
        let sigs = [
            event_signatures::liquidity_added(),
            event_signatures::module_scheduled(),
            event_signatures::module_set(),
            event_signatures::scheduled_module_canceled(),
        ];
        for (i, a) in sigs.iter().enumerate() {
            assert!(!a.is_zero());
            for b in &sigs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_journal_preserves_order() {
        let journal = Journal::new();
        let key = ProtocolKey::from_name("UniswapV3");
        let module = address!("1111111111111111111111111111111111111111");
        journal.record(Event::ModuleScheduled(ModuleScheduled {
            key,
            module,
            since: 7,
        }));
        journal.record(Event::ModuleSet(ModuleSet { key, module }));

        let events = journal.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::ModuleScheduled(_)));
        assert!(matches!(events[1], Event::ModuleSet(_)));
    }

    #[test]
    fn test_journal_truncate() {
        let journal = Journal::new();
        let key = ProtocolKey::from_name("UniswapV3");
        journal.record(Event::ScheduledModuleCanceled(ScheduledModuleCanceled {
            key,
        }));
        let mark = journal.len();
        journal.record(Event::ScheduledModuleCanceled(ScheduledModuleCanceled {
            key,
        }));
        journal.truncate(mark);
        assert_eq!(journal.len(), 1);
    }
}
