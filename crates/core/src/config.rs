//! Deployment configuration.
//!
//! Ties together the per-target values the core treats as constructor-time
//! inputs: the wrapped-native token for the chain, the registry manager, and
//! the integration endpoints modules should target. Loaded from TOML, with a
//! built-in demo deployment as the fallback.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable pointing at a deployment TOML file.
pub const DEPLOYMENT_ENV: &str = "MODLIQ_DEPLOYMENT";

/// Full deployment configuration as read from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Deployment metadata.
    pub deployment: DeploymentDetails,
    /// Modules to wire at startup.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

/// Deployment metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentDetails {
    /// Deployment name (e.g. "mainnet-demo").
    pub name: String,
    /// Chain ID of the target network.
    pub chain_id: u64,
    /// Wrapped-native token address for this chain.
    pub wrapped_native: String,
    /// Account allowed to mutate the module registry.
    pub manager: String,
}

/// One module wiring entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Protocol name the key is derived from (e.g. "UniswapV3").
    pub protocol: String,
    /// Integration execution endpoint the module targets.
    pub position_manager: String,
}

/// Deployment configuration with all addresses parsed.
#[derive(Debug, Clone)]
pub struct ResolvedDeployment {
    /// Deployment name.
    pub name: String,
    /// Chain ID.
    pub chain_id: u64,
    /// Wrapped-native token address.
    pub wrapped_native: Address,
    /// Registry manager account.
    pub manager: Address,
    /// Resolved module wiring entries.
    pub modules: Vec<ResolvedModule>,
}

/// Resolved module wiring entry.
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    /// Protocol name.
    pub protocol: String,
    /// Integration execution endpoint.
    pub position_manager: Address,
}

impl DeploymentConfig {
    /// Parse a deployment from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse deployment TOML")
    }

    /// Load a deployment from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployment file {}", path.display()))?;
        let config = Self::from_toml_str(&raw)?;
        info!(
            deployment = %config.deployment.name,
            path = %path.display(),
            "Deployment config loaded"
        );
        Ok(config)
    }

    /// Load from the `MODLIQ_DEPLOYMENT` path, falling back to the built-in
    /// demo deployment when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(DEPLOYMENT_ENV) {
            Ok(path) => Self::load(path),
            Err(_) => {
                info!("{DEPLOYMENT_ENV} unset, using built-in demo deployment");
                Ok(Self::demo())
            }
        }
    }

    /// Built-in single-module demo deployment.
    pub fn demo() -> Self {
        Self {
            deployment: DeploymentDetails {
                name: "demo".to_string(),
                chain_id: 1,
                wrapped_native: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string(),
                manager: "0x00000000000000000000000000000000000000A1".to_string(),
            },
            modules: vec![ModuleConfig {
                protocol: "UniswapV3".to_string(),
                position_manager: "0xC36442b4a4522E871399CD717aBDD847Ab11FE88".to_string(),
            }],
        }
    }

    /// Parse every address field.
    pub fn resolve(&self) -> Result<ResolvedDeployment> {
        let modules = self
            .modules
            .iter()
            .map(|m| {
                Ok(ResolvedModule {
                    protocol: m.protocol.clone(),
                    position_manager: parse_address(&m.position_manager)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedDeployment {
            name: self.deployment.name.clone(),
            chain_id: self.deployment.chain_id,
            wrapped_native: parse_address(&self.deployment.wrapped_native)?,
            manager: parse_address(&self.deployment.manager)?,
            modules,
        })
    }
}

/// Parse an address from a string, returning an error on failure.
pub fn parse_address(s: &str) -> Result<Address> {
    s.parse()
        .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_deployment_resolves() {
        let resolved = DeploymentConfig::demo().resolve().unwrap();
        assert_eq!(resolved.chain_id, 1);
        assert_eq!(resolved.modules.len(), 1);
        assert_eq!(resolved.modules[0].protocol, "UniswapV3");
    }

    #[test]
    fn test_toml_roundtrip() {
        let raw = r#"
            [deployment]
            name = "testnet"
            chain_id = 11155111
            wrapped_native = "0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14"
            manager = "0x00000000000000000000000000000000000000A1"

            [[modules]]
            protocol = "UniswapV3"
            position_manager = "0x1238536071E1c677A632429e3655c799b22cDA52"
        "#;
        let config = DeploymentConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.deployment.name, "testnet");
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.chain_id, 11_155_111);
    }

    #[test]
    fn test_bad_address_is_rejected() {
        let mut config = DeploymentConfig::demo();
        config.deployment.manager = "not-an-address".to_string();
        assert!(config.resolve().is_err());
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("0x0000000000000000000000000000000000000000").is_ok());
        assert!(parse_address("invalid").is_err());
    }
}
