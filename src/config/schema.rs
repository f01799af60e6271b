//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the deployer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the deployment pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeployerConfig {
    /// RPC endpoint settings.
    pub rpc: RpcConfig,

    /// Gas policy defaults.
    pub gas: GasConfig,

    /// Retry and fee-escalation settings.
    pub retry: RetryConfig,

    /// Confirmation polling settings.
    pub confirmation: ConfirmationConfig,
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Primary JSON-RPC endpoint URL.
    pub url: String,

    /// Failover endpoint URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// Expected chain ID; verified against the endpoint at connect time.
    pub chain_id: u64,

    /// Per-call RPC timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            timeout_secs: 10,
        }
    }
}

/// Gas policy defaults, overridable per request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Fixed max fee per gas in gwei; queried from the endpoint if unset.
    pub max_fee_per_gas_gwei: Option<u64>,

    /// Fixed priority fee in gwei; queried from the endpoint if unset.
    pub max_priority_fee_per_gas_gwei: Option<u64>,

    /// Gas limit override; estimated from the endpoint if unset.
    pub gas_limit: Option<u64>,

    /// Gas limit used when estimation fails. Without it an estimation
    /// failure is terminal.
    pub fallback_gas_limit: Option<u64>,

    /// Ceiling for fee escalation, in gwei.
    pub max_fee_ceiling_gwei: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            max_fee_per_gas_gwei: None,
            max_priority_fee_per_gas_gwei: None,
            gas_limit: None,
            fallback_gas_limit: None,
            max_fee_ceiling_gwei: 500,
        }
    }
}

const WEI_PER_GWEI: u128 = 1_000_000_000;

impl GasConfig {
    pub fn max_fee_per_gas_wei(&self) -> Option<u128> {
        self.max_fee_per_gas_gwei.map(|g| g as u128 * WEI_PER_GWEI)
    }

    pub fn max_priority_fee_per_gas_wei(&self) -> Option<u128> {
        self.max_priority_fee_per_gas_gwei
            .map(|g| g as u128 * WEI_PER_GWEI)
    }

    pub fn max_fee_ceiling_wei(&self) -> u128 {
        self.max_fee_ceiling_gwei as u128 * WEI_PER_GWEI
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum broadcast attempts before giving up.
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,

    /// Backoff delay cap in milliseconds.
    pub max_delay_ms: u64,

    /// Fee bump applied on fee-related resubmission, in percent.
    pub fee_bump_percent: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
            fee_bump_percent: 25,
        }
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Receipt poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum time to wait for a receipt, in seconds.
    pub max_wait_secs: u64,

    /// Block depth required before a mined transaction counts as confirmed.
    pub confirmation_blocks: u32,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            max_wait_secs: 120,
            confirmation_blocks: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeployerConfig::default();
        assert_eq!(config.rpc.url, "http://localhost:8545");
        assert_eq!(config.rpc.timeout_secs, 10);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.confirmation.confirmation_blocks, 1);
        assert!(config.gas.max_fee_per_gas_gwei.is_none());
    }

    #[test]
    fn test_gwei_conversion() {
        let gas = GasConfig {
            max_fee_per_gas_gwei: Some(3),
            ..Default::default()
        };
        assert_eq!(gas.max_fee_per_gas_wei(), Some(3_000_000_000));
        assert_eq!(gas.max_fee_ceiling_wei(), 500_000_000_000);
    }

    #[test]
    fn test_minimal_toml() {
        let config: DeployerConfig = toml::from_str(
            r#"
            [rpc]
            url = "https://rpc.example.org"
            chain_id = 1313161554

            [retry]
            max_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc.url, "https://rpc.example.org");
        assert_eq!(config.rpc.chain_id, 1313161554);
        assert_eq!(config.retry.max_attempts, 3);
        // Untouched sections fall back to defaults
        assert_eq!(config.confirmation.poll_interval_ms, 2_000);
    }
}
