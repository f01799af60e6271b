//! Shared utilities for pipeline integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use contract_deployer::chain::types::{
    AccountState, FeeEstimate, Receipt, RpcError, RpcErrorKind,
};
use contract_deployer::Endpoint;

/// What the mock observed for one broadcast, decoded from the raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastSeen {
    pub nonce: u64,
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub tx_hash: TxHash,
}

/// Scripted chain endpoint.
///
/// Broadcast and receipt responses are consumed front-to-back; an empty
/// script means "accept the broadcast" and "no receipt yet" respectively.
pub struct MockEndpoint {
    chain_id: u64,
    balance: U256,
    chain_nonce: AtomicU64,
    block_number: AtomicU64,
    gas_estimates: Mutex<VecDeque<Result<u64, RpcError>>>,
    broadcast_script: Mutex<VecDeque<Result<(), RpcError>>>,
    receipt_script: Mutex<VecDeque<Option<Receipt>>>,
    broadcasts: Mutex<Vec<BroadcastSeen>>,
    pub receipt_polls: AtomicU64,
}

impl MockEndpoint {
    pub fn new() -> Self {
        Self {
            chain_id: 31337,
            balance: U256::from(10u128.pow(18)),
            chain_nonce: AtomicU64::new(0),
            block_number: AtomicU64::new(100),
            gas_estimates: Mutex::new(VecDeque::new()),
            broadcast_script: Mutex::new(VecDeque::new()),
            receipt_script: Mutex::new(VecDeque::new()),
            broadcasts: Mutex::new(Vec::new()),
            receipt_polls: AtomicU64::new(0),
        }
    }

    pub fn push_broadcast_err(&self, kind: RpcErrorKind, message: &str) {
        self.broadcast_script
            .lock()
            .unwrap()
            .push_back(Err(RpcError::new(kind, message)));
    }

    pub fn push_gas_estimate_err(&self, message: &str) {
        self.gas_estimates
            .lock()
            .unwrap()
            .push_back(Err(RpcError::connection(message)));
    }

    pub fn push_receipt(&self, receipt: Receipt) {
        self.receipt_script.lock().unwrap().push_back(Some(receipt));
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().unwrap().len()
    }

    pub fn broadcasts_seen(&self) -> Vec<BroadcastSeen> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn seen_fees(&self) -> Vec<u128> {
        self.broadcasts_seen()
            .iter()
            .map(|b| b.max_fee_per_gas)
            .collect()
    }

    pub fn seen_nonces(&self) -> Vec<u64> {
        self.broadcasts_seen().iter().map(|b| b.nonce).collect()
    }
}

impl Default for MockEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

/// A receipt for a successful deployment, mined a few blocks back.
pub fn success_receipt() -> Receipt {
    Receipt {
        tx_hash: TxHash::ZERO,
        block_number: 95,
        gas_used: 321_000,
        contract_address: Some(Address::repeat_byte(0xcd)),
        success: true,
    }
}

/// A receipt whose execution reverted.
pub fn reverted_receipt() -> Receipt {
    Receipt {
        success: false,
        ..success_receipt()
    }
}

#[async_trait]
impl Endpoint for MockEndpoint {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        Ok(self.chain_id)
    }

    async fn account_state(&self, _address: Address) -> Result<AccountState, RpcError> {
        Ok(AccountState {
            balance: self.balance,
            nonce: self.chain_nonce.load(Ordering::SeqCst),
            chain_id: self.chain_id,
        })
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        Ok(self.block_number.load(Ordering::SeqCst))
    }

    async fn fee_estimate(&self) -> Result<FeeEstimate, RpcError> {
        Ok(FeeEstimate {
            max_fee_per_gas: 2_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
        })
    }

    async fn estimate_gas(&self, _tx: TransactionRequest) -> Result<u64, RpcError> {
        match self.gas_estimates.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(1_000_000),
        }
    }

    async fn broadcast(&self, raw: &[u8]) -> Result<TxHash, RpcError> {
        let mut slice = raw;
        let envelope = TxEnvelope::decode_2718(&mut slice).expect("well-formed raw transaction");
        let seen = BroadcastSeen {
            nonce: envelope.nonce(),
            gas_limit: envelope.gas_limit(),
            max_fee_per_gas: envelope.max_fee_per_gas(),
            tx_hash: *envelope.tx_hash(),
        };
        self.broadcasts.lock().unwrap().push(seen);

        match self.broadcast_script.lock().unwrap().pop_front() {
            Some(Err(e)) => Err(e),
            Some(Ok(())) | None => Ok(seen.tx_hash),
        }
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<Receipt>, RpcError> {
        self.receipt_polls.fetch_add(1, Ordering::SeqCst);
        match self.receipt_script.lock().unwrap().pop_front() {
            Some(Some(mut receipt)) => {
                receipt.tx_hash = hash;
                Ok(Some(receipt))
            }
            Some(None) | None => Ok(None),
        }
    }
}
