//! Modular liquidity demo binary.
//!
//! Wires the deployment config into a registry plus one Uniswap V3 module
//! against the in-memory host, then walks the whole lifecycle: schedule the
//! module, show that early activation is rejected, activate after the delay,
//! discover the module through the registry and add liquidity through it.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use alloy::primitives::{address, Address, U256};

use modliq_core::{
    config::DeploymentConfig, Asset, IntegrationPayload, Journal, LiquidityActionParams,
    ManualClock, ProtocolKey, UniswapV3MintPayload,
};
use modliq_modules::{
    Host, InMemoryLedger, LiquidityModule, ModuleExecutor, PoolModule, SimPositionManager,
    TokenLedger, UniswapV3Adapter,
};
use modliq_registry::{ModuleRegistry, MODULE_UPDATE_DELAY_SECS};

const DEMO_CALLER: Address = address!("00000000000000000000000000000000000000C1");
const DEMO_RECEIVER: Address = address!("00000000000000000000000000000000000000C2");
const DEMO_TOKEN: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
const MODULE_BASE: Address = address!("00000000000000000000000000000000000d0D01");

/// Deterministic per-entry module address for the demo deployment.
fn module_address(index: usize) -> Address {
    let mut bytes = MODULE_BASE.into_array();
    bytes[19] = bytes[19].wrapping_add(index as u8);
    Address::from(bytes)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,modliq_core=debug,modliq_modules=debug,modliq_registry=debug")
        }))
        .init();

    let deployment = DeploymentConfig::from_env()?.resolve()?;
    info!(
        deployment = %deployment.name,
        chain_id = deployment.chain_id,
        modules = deployment.modules.len(),
        "Starting modular liquidity demo"
    );

    // In-memory host stands in for the chain; the simulated position manager
    // consumes 90% of each desired amount and refunds the rest.
    let ledger = Arc::new(InMemoryLedger::new());
    let host = Host::new(ledger.clone());
    for entry in &deployment.modules {
        host.register_endpoint(
            entry.position_manager,
            Arc::new(SimPositionManager::new(
                entry.position_manager,
                deployment.wrapped_native,
                9_000,
            )),
        );
    }

    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let journal = Arc::new(Journal::new());
    let registry = ModuleRegistry::new(deployment.manager, clock.clone(), journal.clone());

    // Schedule one module per configured protocol, each at its own address.
    for (index, entry) in deployment.modules.iter().enumerate() {
        let module: Arc<dyn LiquidityModule> = match entry.protocol.as_str() {
            "UniswapV3" => Arc::new(PoolModule::new(
                module_address(index),
                host.clone(),
                UniswapV3Adapter::new(deployment.wrapped_native)?,
            )),
            other => anyhow::bail!("no adapter available for protocol '{other}'"),
        };
        registry.schedule_module(deployment.manager, module.clone())?;

        // Too early: the window is strict.
        clock.advance(MODULE_UPDATE_DELAY_SECS - 3_600);
        if let Err(err) = registry.update_module(deployment.manager, module.as_ref()) {
            warn!(protocol = %entry.protocol, %err, "early activation rejected");
        }

        clock.advance(2 * 3_600);
        registry.update_module(deployment.manager, module.as_ref())?;
    }

    // Lookup is open to anyone once the module is live.
    let key = ProtocolKey::from_name("UniswapV3");
    let module = registry
        .get_module(key)
        .ok_or_else(|| anyhow::anyhow!("no module registered for {key}"))?;
    info!(%key, module = %module.address(), version = module.version(), "module discovered");

    // Seed the caller and run one token + native position.
    let token = Asset::Token(DEMO_TOKEN);
    ledger.mint(token, DEMO_CALLER, U256::from(1_000_000u64));
    ledger.mint(Asset::Native, DEMO_CALLER, U256::from(500_000u64));
    ledger.approve(token, DEMO_CALLER, module.address(), U256::from(1_000_000u64))?;

    let executor = ModuleExecutor::new(host.clone());
    executor
        .add_liquidity(
            module.as_ref(),
            DEMO_CALLER,
            U256::from(500_000u64),
            LiquidityActionParams {
                token0: token,
                token1: Asset::Native,
                amount0: U256::from(1_000_000u64),
                amount1: U256::from(500_000u64),
                position_manager: deployment.modules[0].position_manager,
                receiver: DEMO_RECEIVER,
            },
            IntegrationPayload::UniswapV3(UniswapV3MintPayload {
                fee: 3_000,
                tick_lower: -887_220,
                tick_upper: 887_220,
                amount0_min: U256::ZERO,
                amount1_min: U256::ZERO,
                deadline: U256::MAX,
            }),
        )
        .await?;

    info!(
        token_refund = %ledger.balance_of(token, DEMO_RECEIVER),
        native_refund = %ledger.balance_of(Asset::Native, DEMO_RECEIVER),
        module_token = %ledger.balance_of(token, module.address()),
        module_native = %ledger.balance_of(Asset::Native, module.address()),
        "liquidity added, module residue is zero"
    );

    for event in host.journal.events() {
        info!(event = %event.signature(), ?event, "journal entry");
    }
    for event in journal.events() {
        info!(event = %event.signature(), ?event, "registry journal entry");
    }

    Ok(())
}
