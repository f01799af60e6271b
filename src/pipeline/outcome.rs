//! Terminal deployment outcomes and the failure taxonomy.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;

use crate::chain::types::{RpcError, RpcErrorKind};

/// The terminal artifact of one deployment request.
///
/// Exactly one outcome is produced per request; once `Confirmed` or
/// non-retriable `Failed`, the outcome for a given nonce and hash never
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeploymentOutcome {
    /// Broadcast but not yet mined. Used for in-flight reporting only;
    /// the pipeline always resolves to one of the other variants.
    Pending { tx_hash: TxHash },

    /// Mined successfully at the required confirmation depth.
    Confirmed {
        address: Address,
        block_number: u64,
        gas_used: u64,
        tx_hash: TxHash,
    },

    /// Terminal failure; `retriable` tells the caller whether resubmitting
    /// a fresh request can help.
    Failed {
        reason: FailureReason,
        retriable: bool,
    },
}

impl DeploymentOutcome {
    /// Build a `Failed` outcome with the retriable flag derived from the
    /// reason.
    pub fn failed(reason: FailureReason) -> Self {
        let retriable = reason.retriable();
        DeploymentOutcome::Failed { reason, retriable }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, DeploymentOutcome::Confirmed { .. })
    }
}

/// Why a deployment failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Malformed request; no network call was made.
    Validation(String),

    /// The signing key was rejected.
    InvalidKey(String),

    /// An RPC failure that exhausted the retry budget.
    Rpc { kind: RpcErrorKind, message: String },

    /// Gas estimation failed and no fallback limit was supplied.
    GasEstimation(String),

    /// The account cannot cover the deployment cost.
    InsufficientFunds,

    /// The constructor itself rejected execution.
    Reverted,

    /// No receipt within the maximum wait duration. The transaction may
    /// still confirm later; resubmitters must deduplicate by address.
    Timeout,

    /// Caller-initiated cancellation.
    Cancelled,
}

impl FailureReason {
    /// Whether the caller may usefully retry with a fresh request.
    pub fn retriable(&self) -> bool {
        match self {
            FailureReason::Rpc { kind, .. } => kind.retriable(),
            FailureReason::Timeout | FailureReason::Cancelled => true,
            _ => false,
        }
    }
}

impl From<RpcError> for FailureReason {
    fn from(err: RpcError) -> Self {
        match err.kind {
            RpcErrorKind::InsufficientFunds => FailureReason::InsufficientFunds,
            kind => FailureReason::Rpc {
                kind,
                message: err.message,
            },
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Validation(msg) => write!(f, "validation failed: {}", msg),
            FailureReason::InvalidKey(msg) => write!(f, "invalid key: {}", msg),
            FailureReason::Rpc { kind, message } => write!(f, "rpc failure ({}): {}", kind, message),
            FailureReason::GasEstimation(msg) => write!(f, "gas estimation failed: {}", msg),
            FailureReason::InsufficientFunds => f.write_str("insufficient funds"),
            FailureReason::Reverted => f.write_str("constructor reverted"),
            FailureReason::Timeout => f.write_str("confirmation timed out"),
            FailureReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_classification() {
        assert!(FailureReason::Timeout.retriable());
        assert!(FailureReason::Cancelled.retriable());
        assert!(FailureReason::Rpc {
            kind: RpcErrorKind::Underpriced,
            message: String::new()
        }
        .retriable());
        assert!(!FailureReason::InsufficientFunds.retriable());
        assert!(!FailureReason::Reverted.retriable());
        assert!(!FailureReason::Validation("bad".into()).retriable());
        assert!(!FailureReason::GasEstimation("no".into()).retriable());
    }

    #[test]
    fn test_insufficient_funds_normalized() {
        let reason = FailureReason::from(RpcError::from_message(
            "insufficient funds for gas * price + value",
        ));
        assert_eq!(reason, FailureReason::InsufficientFunds);
        let outcome = DeploymentOutcome::failed(reason);
        assert_eq!(
            outcome,
            DeploymentOutcome::Failed {
                reason: FailureReason::InsufficientFunds,
                retriable: false
            }
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = DeploymentOutcome::Pending {
            tx_hash: TxHash::ZERO,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"pending\""));

        let json = serde_json::to_string(&DeploymentOutcome::failed(FailureReason::Timeout)).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"retriable\":true"));
    }
}
