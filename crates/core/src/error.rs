//! Unified error taxonomy for the module workspace.
//!
//! Every failure is terminal for the call that raised it: nothing retries
//! internally, and the executor rolls the ledger back to its pre-call state.
//! Variants carry enough structured detail (existing value, required value,
//! current value) for a caller to decide a corrective action.

use alloy::primitives::{Address, FixedBytes, U256};
use thiserror::Error;

use crate::asset::Asset;
use crate::key::ProtocolKey;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, ModuleError>;

/// Errors raised by modules, the registry, and the host model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// A required address was zero at construction time.
    #[error("zero address supplied for {0}")]
    ZeroAddress(&'static str),

    /// Caller is not the registry manager.
    #[error("caller {caller} is not the manager")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// An upcoming module already exists for the key.
    #[error("module already scheduled for key {key}: {module} since {since}")]
    AlreadyScheduled {
        /// Protocol key in conflict.
        key: ProtocolKey,
        /// The pending candidate.
        module: Address,
        /// Unix timestamp the pending candidate was scheduled at.
        since: u64,
    },

    /// No upcoming module exists for the key.
    #[error("no module scheduled for key {key}")]
    NotScheduled {
        /// Protocol key without a pending entry.
        key: ProtocolKey,
    },

    /// The activation delay has not strictly elapsed.
    #[error("module for key {key} not ready: activatable after {ready_at}, now {now}")]
    DelayNotElapsed {
        /// Protocol key of the pending entry.
        key: ProtocolKey,
        /// Timestamp that must be strictly exceeded.
        ready_at: u64,
        /// Current host time.
        now: u64,
    },

    /// Attached native value does not cover the declared native amounts.
    #[error("insufficient native value: required {required}, supplied {supplied}")]
    InsufficientNativeValue {
        /// Sum of native-side declared amounts.
        required: U256,
        /// Value actually attached to the call.
        supplied: U256,
    },

    /// Calldata did not match any known entry point.
    #[error("unsupported call: selector {selector}")]
    UnsupportedCall {
        /// The unrecognized selector (zero if calldata was too short).
        selector: FixedBytes<4>,
    },

    /// Native value was attached to a call that does not accept it.
    #[error("call {selector} does not accept native value, got {value}")]
    NonPayable {
        /// Selector of the rejected call.
        selector: FixedBytes<4>,
        /// Value that was attached.
        value: U256,
    },

    /// A transfer drew more than the holder's balance.
    #[error("insufficient balance of {asset} for {holder}: needed {needed}, available {available}")]
    InsufficientBalance {
        /// Asset being moved.
        asset: Asset,
        /// Account being debited.
        holder: Address,
        /// Amount requested.
        needed: U256,
        /// Amount actually held.
        available: U256,
    },

    /// A pull-transfer exceeded the spender's allowance.
    #[error(
        "insufficient allowance of {asset}: owner {owner}, spender {spender}, \
         needed {needed}, available {available}"
    )]
    InsufficientAllowance {
        /// Asset being pulled.
        asset: Asset,
        /// Account that granted the allowance.
        owner: Address,
        /// Account attempting the pull.
        spender: Address,
        /// Amount requested.
        needed: U256,
        /// Allowance actually granted.
        available: U256,
    },

    /// No integration endpoint is registered at the target address.
    #[error("no endpoint registered at {address}")]
    UnknownEndpoint {
        /// The unresolvable call target.
        address: Address,
    },

    /// The integration endpoint rejected the call.
    #[error("integration call failed: {0}")]
    Integration(String),

    /// ABI encoding or decoding failed.
    #[error("abi error: {0}")]
    Abi(String),
}
