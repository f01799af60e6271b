//! Wallet management and transaction signing.
//!
//! # Security
//! - The private key is an explicit constructor argument, never read from
//!   ambient process state inside this module
//! - Keys are never logged or serialized; only the derived address is
//!   observable
//! - Signing happens in memory for the lifetime of one deployment run

use alloy::consensus::Transaction;
use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::chain::types::{ChainError, ChainResult, SignedTransaction};

/// Wallet holding the deployment signing key.
#[derive(Clone)]
pub struct Wallet {
    /// Network wallet used to produce signed envelopes.
    inner: EthereumWallet,
    /// Address derived from the key.
    address: Address,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID transactions will be bound to
    ///
    /// # Security
    /// The key is parsed and held in memory only. It is never logged.
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> ChainResult<Self> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::InvalidKey(format!("{}", e)))?;
        let signer = signer.with_chain_id(Some(chain_id));
        let address = signer.address();

        tracing::info!(
            address = %address,
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self {
            inner: EthereumWallet::from(signer),
            address,
            chain_id,
        })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a fully-populated transaction request.
    ///
    /// The request must carry nonce, chain id, gas limit, and fee fields;
    /// the caller decides all of them explicitly.
    pub async fn sign(&self, tx: TransactionRequest) -> ChainResult<SignedTransaction> {
        let envelope = tx
            .build(&self.inner)
            .await
            .map_err(|e| ChainError::Signing(format!("{}", e)))?;

        Ok(SignedTransaction {
            raw: envelope.encoded_2718(),
            hash: *envelope.tx_hash(),
            nonce: envelope.nonce(),
            from: self.address,
        })
    }
}

impl std::fmt::Debug for Wallet {
    // Never expose the inner signer, only the public address.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
