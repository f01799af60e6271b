//! Chain-level types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use thiserror::Error;

/// Snapshot of an account read from the endpoint immediately before a
/// transaction is built. Must be re-read before any resubmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountState {
    /// Native token balance in wei.
    pub balance: U256,
    /// Next transaction nonce as reported by the node.
    pub nonce: u64,
    /// Chain ID the account state was read from.
    pub chain_id: u64,
}

/// EIP-1559 fee suggestion from the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Minimal view of a transaction receipt.
///
/// Only the fields the pipeline acts on; the raw RPC receipt stays inside
/// the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    pub contract_address: Option<Address>,
    /// True if execution succeeded, false if the transaction reverted.
    pub success: bool,
}

/// A signed, broadcast-ready deployment transaction.
///
/// Owned by the pipeline until broadcast; afterwards only the hash is used
/// for confirmation polling.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// EIP-2718 encoded raw transaction bytes.
    pub raw: Vec<u8>,
    pub hash: TxHash,
    pub nonce: u64,
    pub from: Address,
}

/// Classification of an RPC failure.
///
/// The first three are node-level rejections recognized from the error
/// message; `ConnectionLost` covers transport failures and timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcErrorKind {
    Underpriced,
    NonceTooLow,
    InsufficientFunds,
    ConnectionLost,
    Unknown,
}

impl RpcErrorKind {
    /// Whether a failure of this kind can be fixed by resubmitting.
    ///
    /// `InsufficientFunds` is the one node rejection no retry fixes.
    pub fn retriable(self) -> bool {
        !matches!(self, RpcErrorKind::InsufficientFunds)
    }
}

impl std::fmt::Display for RpcErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RpcErrorKind::Underpriced => "underpriced",
            RpcErrorKind::NonceTooLow => "nonce too low",
            RpcErrorKind::InsufficientFunds => "insufficient funds",
            RpcErrorKind::ConnectionLost => "connection lost",
            RpcErrorKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// An RPC failure with its classification and the node's original message.
#[derive(Debug, Clone, Error)]
#[error("rpc error ({kind}): {message}")]
pub struct RpcError {
    pub kind: RpcErrorKind,
    pub message: String,
}

impl RpcError {
    pub fn new(kind: RpcErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify an error from the node's message text.
    ///
    /// Geth uses code -32000 for most submission rejections, so the message
    /// is the only reliable discriminator across clients.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = classify_rpc_message(&message);
        Self { kind, message }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::ConnectionLost, message)
    }
}

/// Map a node error message onto an [`RpcErrorKind`].
pub fn classify_rpc_message(message: &str) -> RpcErrorKind {
    let msg = message.to_ascii_lowercase();
    if msg.contains("underpriced") {
        RpcErrorKind::Underpriced
    } else if msg.contains("nonce too low") || msg.contains("nonce is too low") {
        RpcErrorKind::NonceTooLow
    } else if msg.contains("insufficient funds") || msg.contains("insufficient balance") {
        RpcErrorKind::InsufficientFunds
    } else if msg.contains("connection")
        || msg.contains("timed out")
        || msg.contains("timeout")
        || msg.contains("transport")
    {
        RpcErrorKind::ConnectionLost
    } else {
        RpcErrorKind::Unknown
    }
}

/// Errors raised while establishing chain access, before the pipeline runs.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Endpoint URL invalid or connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// The secret is not a well-formed private key.
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// The endpoint reports a different chain than configured.
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// The signer rejected the transaction.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Result type for chain setup operations.
pub type ChainResult<T> = Result<T, ChainError>;
