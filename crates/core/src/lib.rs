//! Core domain types for the modular liquidity router.
//!
//! This crate provides the shared vocabulary of the workspace:
//! - Asset identification (`Native` vs `Token`, ABI sentinel conversion)
//! - Protocol keys derived from protocol names
//! - Liquidity action parameters and integration payloads
//! - The unified error taxonomy
//! - Event types, signatures, and the append-only journal
//! - Time sources and deployment configuration
//!
//! Higher layers (modules, registry) depend on this crate and never the
//! other way around.

mod asset;
mod clock;
pub mod config;
mod error;
mod events;
mod key;
mod params;
mod payload;

pub use asset::{Asset, NATIVE_SENTINEL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    parse_address, DeploymentConfig, DeploymentDetails, ModuleConfig, ResolvedDeployment,
    ResolvedModule, DEPLOYMENT_ENV,
};
pub use error::{ModuleError, Result};
pub use events::{
    event_signatures, Event, Journal, LiquidityAdded, ModuleScheduled, ModuleSet,
    ScheduledModuleCanceled,
};
pub use key::ProtocolKey;
pub use params::LiquidityActionParams;
pub use payload::{IntegrationPayload, UniswapV3MintPayload};
