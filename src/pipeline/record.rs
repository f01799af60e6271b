//! Deployment record emission.
//!
//! Pure formatting of a terminal outcome into the record handed to the
//! caller's sink. No network or state effects.

use alloy::primitives::{Address, U256};
use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::outcome::DeploymentOutcome;

/// Durable record of one deployment run.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentRecord {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// Contract name from the artifact.
    pub contract: String,
    /// Deployer account.
    pub deployer: Address,
    /// Deployer balance in wei when the run started.
    pub starting_balance: U256,
    /// Terminal outcome.
    pub outcome: DeploymentOutcome,
}

impl DeploymentRecord {
    pub fn new(
        contract: impl Into<String>,
        deployer: Address,
        starting_balance: U256,
        outcome: DeploymentOutcome,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            contract: contract.into(),
            deployer,
            starting_balance,
            outcome,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the record through the log sink.
    pub fn log(&self) {
        match &self.outcome {
            DeploymentOutcome::Confirmed {
                address,
                block_number,
                gas_used,
                tx_hash,
            } => {
                tracing::info!(
                    run_id = %self.run_id,
                    contract = %self.contract,
                    address = %address,
                    block_number,
                    gas_used,
                    tx_hash = %tx_hash,
                    "contract deployed"
                );
            }
            DeploymentOutcome::Failed { reason, retriable } => {
                tracing::error!(
                    run_id = %self.run_id,
                    contract = %self.contract,
                    reason = %reason,
                    retriable,
                    "deployment failed"
                );
            }
            DeploymentOutcome::Pending { tx_hash } => {
                tracing::info!(
                    run_id = %self.run_id,
                    contract = %self.contract,
                    tx_hash = %tx_hash,
                    "deployment pending"
                );
            }
        }
    }
}
