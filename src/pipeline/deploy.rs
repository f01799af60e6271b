//! Deployment pipeline state machine.
//!
//! # States
//! ```text
//! Built ──▶ Signed ──▶ Submitted ──▶ Confirmed
//!             ▲            │    └───▶ Failed
//!             └─ Retrying ─┘
//! ```
//!
//! # Responsibilities
//! - Validate the request before any network call
//! - Price, sign, and broadcast the deployment transaction
//! - Classify broadcast rejections and drive the retry loop
//! - Poll for the receipt under a bounded, cancellable deadline
//!
//! The pipeline never propagates an error past its boundary: every run
//! resolves to exactly one [`DeploymentOutcome`].

use std::sync::Arc;
use std::time::Duration;

use alloy::dyn_abi::DynSolValue;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use tokio::time::{interval, sleep, timeout};
use tracing::Instrument;

use crate::chain::client::Endpoint;
use crate::chain::types::{RpcError, RpcErrorKind};
use crate::chain::wallet::Wallet;
use crate::config::schema::ConfirmationConfig;
use crate::lifecycle::cancel::CancelHandle;
use crate::pipeline::artifact::ContractArtifact;
use crate::pipeline::nonce::NonceAllocator;
use crate::pipeline::outcome::{DeploymentOutcome, FailureReason};
use crate::resilience::policy::RetryPolicy;

/// Fee parameters for one deployment request.
#[derive(Debug, Clone, Default)]
pub struct GasPolicy {
    /// Max fee per gas in wei; queried from the endpoint if unset.
    pub max_fee_per_gas: Option<u128>,
    /// Priority fee in wei; queried from the endpoint if unset.
    pub max_priority_fee_per_gas: Option<u128>,
    /// Gas limit override; skips estimation entirely.
    pub gas_limit: Option<u64>,
    /// Caller-supplied default when gas estimation fails.
    pub fallback_gas_limit: Option<u64>,
}

/// One deployment to perform.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub artifact: ContractArtifact,
    pub constructor_args: Vec<DynSolValue>,
    pub gas: GasPolicy,
}

/// Current fee pair, escalated across fee-related retries.
#[derive(Debug, Clone, Copy)]
struct Fees {
    max_fee: u128,
    priority: u128,
}

/// The deployment pipeline, reusable across requests.
pub struct DeploymentPipeline<E> {
    endpoint: Arc<E>,
    wallet: Wallet,
    nonces: Arc<NonceAllocator>,
    policy: RetryPolicy,
    confirmation: ConfirmationConfig,
}

impl<E: Endpoint> DeploymentPipeline<E> {
    pub fn new(
        endpoint: Arc<E>,
        wallet: Wallet,
        nonces: Arc<NonceAllocator>,
        policy: RetryPolicy,
        confirmation: ConfirmationConfig,
    ) -> Self {
        Self {
            endpoint,
            wallet,
            nonces,
            policy,
            confirmation,
        }
    }

    /// Run one deployment to its terminal outcome.
    ///
    /// Consumes the request; exactly one outcome is produced per request.
    pub async fn deploy(
        &self,
        request: DeploymentRequest,
        cancel: &mut CancelHandle,
    ) -> DeploymentOutcome {
        let span = tracing::info_span!("deploy", contract = %request.artifact.name);
        self.deploy_inner(request, cancel).instrument(span).await
    }

    async fn deploy_inner(
        &self,
        request: DeploymentRequest,
        cancel: &mut CancelHandle,
    ) -> DeploymentOutcome {
        // Built: validate and assemble calldata before touching the network.
        let deploy_data = match request.artifact.deploy_data(&request.constructor_args) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "deployment request rejected");
                return DeploymentOutcome::failed(FailureReason::Validation(e.to_string()));
            }
        };
        tracing::debug!(bytes = deploy_data.len(), "deployment data assembled");

        let mut fees: Option<Fees> = None;
        let mut gas_limit = request.gas.gas_limit;
        let mut attempt: u32 = 1;

        loop {
            match self
                .attempt(&request.gas, &deploy_data, &mut fees, &mut gas_limit, attempt, cancel)
                .await
            {
                Ok(outcome) => return outcome,
                Err(err) => {
                    if !self.policy.should_retry(attempt, err.kind) {
                        tracing::error!(attempt, error = %err, "deployment failed");
                        return DeploymentOutcome::failed(FailureReason::from(err));
                    }

                    // Fee-related rejections get a bumped fee on resubmission;
                    // transport errors resubmit at the same price.
                    if matches!(err.kind, RpcErrorKind::Underpriced | RpcErrorKind::NonceTooLow) {
                        if let Some(f) = fees.as_mut() {
                            f.max_fee = self.policy.escalate_fee(f.max_fee);
                            f.priority = self.policy.escalate_fee(f.priority).min(f.max_fee);
                        }
                    }

                    let delay = self.policy.next_delay(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "broadcast attempt failed, retrying"
                    );
                    tokio::select! {
                        _ = sleep(delay) => {}
                        _ = cancel.cancelled() => {
                            tracing::info!("deployment cancelled during backoff");
                            return DeploymentOutcome::failed(FailureReason::Cancelled);
                        }
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// One Signed → Submitted pass.
    ///
    /// `Ok` carries a terminal outcome; `Err` carries an RPC failure for the
    /// retry loop to classify.
    async fn attempt(
        &self,
        gas: &GasPolicy,
        deploy_data: &Bytes,
        fees: &mut Option<Fees>,
        gas_limit: &mut Option<u64>,
        attempt: u32,
        cancel: &mut CancelHandle,
    ) -> Result<DeploymentOutcome, RpcError> {
        let from = self.wallet.address();

        let current = match *fees {
            Some(f) => f,
            None => {
                let f = self.initial_fees(gas).await?;
                *fees = Some(f);
                f
            }
        };

        let limit = match *gas_limit {
            Some(l) => l,
            None => {
                let probe = TransactionRequest::default()
                    .with_from(from)
                    .with_deploy_code(deploy_data.clone());
                match self.endpoint.estimate_gas(probe).await {
                    Ok(estimated) => {
                        tracing::debug!(gas = estimated, "gas estimated");
                        *gas_limit = Some(estimated);
                        estimated
                    }
                    Err(e) => match gas.fallback_gas_limit {
                        Some(fallback) => {
                            tracing::warn!(
                                error = %e,
                                gas = fallback,
                                "gas estimation failed, using fallback limit"
                            );
                            *gas_limit = Some(fallback);
                            fallback
                        }
                        None => {
                            tracing::error!(error = %e, "gas estimation failed with no fallback limit");
                            return Ok(DeploymentOutcome::failed(FailureReason::GasEstimation(
                                e.message,
                            )));
                        }
                    },
                }
            }
        };

        // Signed: account state is re-read under the per-account lock on
        // every pass, so a resubmission observes external nonce movement.
        let nonce = self.nonces.allocate(from, self.endpoint.as_ref()).await?;

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(deploy_data.clone())
            .with_nonce(nonce)
            .with_chain_id(self.wallet.chain_id())
            .with_gas_limit(limit)
            .with_max_fee_per_gas(current.max_fee)
            .with_max_priority_fee_per_gas(current.priority);

        let signed = match self.wallet.sign(tx).await {
            Ok(signed) => signed,
            Err(e) => {
                self.nonces.release(from, nonce).await;
                tracing::error!(error = %e, "signing failed");
                return Ok(DeploymentOutcome::failed(FailureReason::InvalidKey(
                    e.to_string(),
                )));
            }
        };
        tracing::debug!(
            nonce,
            gas_limit = limit,
            max_fee_per_gas = current.max_fee,
            "deployment transaction signed"
        );

        // Submitted: a rejected broadcast did not consume the nonce.
        let tx_hash = match self.endpoint.broadcast(&signed.raw).await {
            Ok(hash) => hash,
            Err(e) => {
                self.nonces.release(from, nonce).await;
                return Err(e);
            }
        };
        tracing::info!(tx_hash = %tx_hash, nonce, attempt, "deployment transaction broadcast");

        Ok(self.await_confirmation(tx_hash, from, nonce, cancel).await)
    }

    async fn initial_fees(&self, gas: &GasPolicy) -> Result<Fees, RpcError> {
        let fees = match (gas.max_fee_per_gas, gas.max_priority_fee_per_gas) {
            (Some(max_fee), Some(priority)) => Fees {
                max_fee,
                priority: priority.min(max_fee),
            },
            (max_fee, priority) => {
                let estimate = self.endpoint.fee_estimate().await?;
                let max_fee = max_fee.unwrap_or(estimate.max_fee_per_gas);
                Fees {
                    max_fee,
                    priority: priority.unwrap_or(estimate.max_priority_fee_per_gas).min(max_fee),
                }
            }
        };
        Ok(fees)
    }

    /// Poll for the receipt under the configured deadline.
    ///
    /// Always returns a terminal outcome. On timeout the nonce stays
    /// allocated: the transaction may still confirm later.
    async fn await_confirmation(
        &self,
        tx_hash: TxHash,
        from: Address,
        nonce: u64,
        cancel: &mut CancelHandle,
    ) -> DeploymentOutcome {
        let poll_interval = Duration::from_millis(self.confirmation.poll_interval_ms);
        let max_wait = Duration::from_secs(self.confirmation.max_wait_secs);
        let required = self.confirmation.confirmation_blocks.max(1) as u64;

        let watch = async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.endpoint.receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "transaction pending");
                        continue;
                    }
                    Err(e) => {
                        // Transient read failures keep polling; the deadline
                        // bounds the total wait.
                        tracing::warn!(error = %e, "receipt poll failed");
                        continue;
                    }
                };

                if !receipt.success {
                    return DeploymentOutcome::failed(FailureReason::Reverted);
                }

                let current_block = match self.endpoint.block_number().await {
                    Ok(b) => b,
                    Err(_) => receipt.block_number,
                };
                let depth = current_block.saturating_sub(receipt.block_number) + 1;
                if depth >= required {
                    let address = receipt
                        .contract_address
                        .unwrap_or_else(|| from.create(nonce));
                    return DeploymentOutcome::Confirmed {
                        address,
                        block_number: receipt.block_number,
                        gas_used: receipt.gas_used,
                        tx_hash,
                    };
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = depth,
                    required,
                    "waiting for confirmation depth"
                );
            }
        };

        tokio::select! {
            result = timeout(max_wait, watch) => match result {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        waited_secs = self.confirmation.max_wait_secs,
                        "no receipt within maximum wait duration"
                    );
                    DeploymentOutcome::failed(FailureReason::Timeout)
                }
            },
            _ = cancel.cancelled() => {
                tracing::info!(tx_hash = %tx_hash, "cancelled while awaiting confirmation");
                DeploymentOutcome::failed(FailureReason::Cancelled)
            }
        }
    }
}
