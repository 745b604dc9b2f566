//! Liquidity modules: the execution wrapper and integration adapters.
//!
//! This crate provides:
//! - Host abstractions for the external collaborators modules touch
//!   (token ledger, integration endpoints, event journal)
//! - The generic [`PoolModule`] execution wrapper (pull in, delegate,
//!   sweep refunds, emit)
//! - The [`IntegrationAdapter`] seam and the Uniswap V3 exemplar
//! - ABI bindings for the uniform module surface and the position manager
//! - A rollback-on-error [`ModuleExecutor`] and a simulated endpoint for
//!   demos and tests

pub mod bindings;
mod executor;
mod host;
mod ledger;
mod sim;
mod uniswap_v3;
mod wrapper;

pub use executor::ModuleExecutor;
pub use host::{Host, IntegrationEndpoint};
pub use ledger::{InMemoryLedger, LedgerSnapshot, TokenLedger};
pub use sim::SimPositionManager;
pub use uniswap_v3::{UniswapV3Adapter, UniswapV3Module};
pub use wrapper::{IntegrationAdapter, LiquidityModule, PoolModule, MODULE_VERSION};
