//! Per-account nonce allocation.
//!
//! Concurrent deployments from one account must never share a nonce, and a
//! resubmission must observe nonce movement caused by external activity.
//! Allocation therefore re-reads the chain nonce inside a per-account
//! critical section and hands out `max(chain, local)`.

use std::sync::Arc;

use alloy::primitives::Address;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::chain::client::Endpoint;
use crate::chain::types::RpcError;

/// Serialized nonce allocation across concurrent deployments.
#[derive(Default)]
pub struct NonceAllocator {
    /// Next-nonce cell per account. `None` until the first allocation.
    accounts: DashMap<Address, Arc<Mutex<Option<u64>>>>,
}

impl NonceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, address: Address) -> Arc<Mutex<Option<u64>>> {
        self.accounts
            .entry(address)
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Allocate the next nonce for `address`.
    ///
    /// Holds the account's lock across the chain read, so two concurrent
    /// allocations cannot observe the same pending count.
    pub async fn allocate<E>(&self, address: Address, endpoint: &E) -> Result<u64, RpcError>
    where
        E: Endpoint + ?Sized,
    {
        let cell = self.cell(address);
        let mut next = cell.lock().await;

        let chain_nonce = endpoint.account_state(address).await?.nonce;
        let nonce = match *next {
            Some(local) => local.max(chain_nonce),
            None => chain_nonce,
        };
        *next = Some(nonce + 1);

        Ok(nonce)
    }

    /// Return a nonce whose broadcast definitively failed.
    ///
    /// Only the most recent allocation can be taken back; anything older is
    /// already shadowed by a later in-flight transaction.
    pub async fn release(&self, address: Address, nonce: u64) {
        let cell = self.cell(address);
        let mut next = cell.lock().await;
        if *next == Some(nonce + 1) {
            *next = Some(nonce);
        }
    }
}
