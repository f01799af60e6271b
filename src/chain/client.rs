//! Blockchain RPC endpoint connector.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint (primary + failovers)
//! - Query account state, fees, and receipts needed before and after submission
//! - Broadcast raw signed transactions and classify node rejections
//! - Enforce a timeout on every call

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::chain::types::{
    AccountState, ChainError, ChainResult, FeeEstimate, Receipt, RpcError, RpcErrorKind,
};
use crate::config::schema::RpcConfig;

/// Read and broadcast operations the deployment pipeline needs from a chain.
///
/// Implemented by [`RpcClient`] for real endpoints and by scripted mocks in
/// tests. Read operations never mutate chain state.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Chain ID reported by the endpoint.
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// Balance and nonce snapshot for an account.
    async fn account_state(&self, address: Address) -> Result<AccountState, RpcError>;

    /// Latest block number.
    async fn block_number(&self) -> Result<u64, RpcError>;

    /// EIP-1559 fee suggestion.
    async fn fee_estimate(&self) -> Result<FeeEstimate, RpcError>;

    /// Best-effort gas estimate for a transaction.
    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, RpcError>;

    /// Broadcast a raw signed transaction. Errors carry the node's
    /// rejection classified into an [`RpcErrorKind`].
    async fn broadcast(&self, raw: &[u8]) -> Result<TxHash, RpcError>;

    /// Receipt for a transaction, or `None` while it is unmined.
    async fn receipt(&self, hash: TxHash) -> Result<Option<Receipt>, RpcError>;
}

/// RPC client with failover support.
#[derive(Clone)]
pub struct RpcClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configured chain ID.
    chain_id: u64,
    /// Request timeout duration.
    timeout_duration: Duration,
    /// Primary URL, kept for diagnostics only.
    url: String,
}

impl RpcClient {
    /// Connect to the configured endpoint(s).
    ///
    /// Verifies the reported chain ID against the configuration; a mismatch
    /// is a hard error, an unreachable endpoint only logs a warning so the
    /// pipeline surfaces the failure on first use.
    pub async fn connect(config: &RpcConfig) -> ChainResult<Self> {
        let mut providers = Vec::new();

        let primary: url::Url = config.url.parse().map_err(|e| {
            ChainError::Connection(format!("invalid RPC URL '{}': {}", config.url, e))
        })?;
        providers
            .push(Arc::new(ProviderBuilder::new().connect_http(primary))
                as Arc<dyn Provider + Send + Sync>);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url))
                    as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            chain_id: config.chain_id,
            timeout_duration: Duration::from_secs(config.timeout_secs),
            url: config.url.clone(),
        };

        match client.chain_id().await {
            Ok(actual) if actual != config.chain_id => {
                return Err(ChainError::ChainMismatch {
                    expected: config.chain_id,
                    actual,
                });
            }
            Ok(_) => {
                tracing::info!(
                    rpc_url = %config.url,
                    chain_id = config.chain_id,
                    "RPC endpoint connected"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "RPC endpoint configured but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Run a read call against each provider in order until one answers.
    async fn with_failover<T, F, Fut>(&self, op: &'static str, call: F) -> Result<T, RpcError>
    where
        F: Fn(Arc<dyn Provider + Send + Sync>) -> Fut,
        Fut: std::future::Future<Output = Result<T, alloy::transports::TransportError>>,
    {
        let mut last = RpcError::connection(format!("all RPC endpoints failed for {}", op));
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, op, error = %e, "RPC error, trying next provider");
                    last = RpcError::from_message(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, op, "RPC timeout, trying next provider");
                    last = RpcError::connection(format!("{} timed out", op));
                }
            }
        }
        Err(last)
    }
}

#[async_trait]
impl Endpoint for RpcClient {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        self.with_failover("chain_id", |p| async move { p.get_chain_id().await })
            .await
    }

    async fn account_state(&self, address: Address) -> Result<AccountState, RpcError> {
        let balance = self
            .with_failover("get_balance", |p| async move { p.get_balance(address).await })
            .await?;
        let nonce = self
            .with_failover("get_transaction_count", |p| async move {
                p.get_transaction_count(address).await
            })
            .await?;

        Ok(AccountState {
            balance,
            nonce,
            chain_id: self.chain_id,
        })
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        self.with_failover("block_number", |p| async move { p.get_block_number().await })
            .await
    }

    async fn fee_estimate(&self) -> Result<FeeEstimate, RpcError> {
        let est = self
            .with_failover("estimate_eip1559_fees", |p| async move {
                p.estimate_eip1559_fees().await
            })
            .await?;

        Ok(FeeEstimate {
            max_fee_per_gas: est.max_fee_per_gas,
            max_priority_fee_per_gas: est.max_priority_fee_per_gas,
        })
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, RpcError> {
        self.with_failover("estimate_gas", |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    async fn broadcast(&self, raw: &[u8]) -> Result<TxHash, RpcError> {
        // A node-level rejection (underpriced, bad nonce, no funds) is the
        // same on every endpoint; only transport failures justify failover.
        let mut last = RpcError::connection("all RPC endpoints failed for broadcast");
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.send_raw_transaction(raw)).await {
                Ok(Ok(pending)) => return Ok(*pending.tx_hash()),
                Ok(Err(e)) => {
                    let err = RpcError::from_message(e.to_string());
                    if err.kind != RpcErrorKind::ConnectionLost {
                        return Err(err);
                    }
                    tracing::warn!(provider_idx = i, error = %err, "Broadcast failed, trying next provider");
                    last = err;
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "Broadcast timed out, trying next provider");
                    last = RpcError::connection("broadcast timed out");
                }
            }
        }
        Err(last)
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<Receipt>, RpcError> {
        let raw = self
            .with_failover("get_transaction_receipt", |p| async move {
                p.get_transaction_receipt(hash).await
            })
            .await?;

        Ok(raw.map(map_receipt))
    }
}

fn map_receipt(receipt: TransactionReceipt) -> Receipt {
    Receipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number.unwrap_or_default(),
        gas_used: receipt.gas_used,
        contract_address: receipt.contract_address,
        success: receipt.status(),
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.url)
            .field("chain_id", &self.chain_id)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
