//! Retry and fee-escalation policy.
//!
//! # Responsibilities
//! - Decide whether a failed broadcast attempt may be retried
//! - Schedule backoff delays between attempts
//! - Escalate fees on fee-related resubmission, bounded by a ceiling
//!
//! # Design Decisions
//! - Non-retriable rejections (insufficient funds) abort immediately,
//!   regardless of remaining attempts
//! - Fee escalation is monotone non-decreasing and clamped to the ceiling

use std::time::Duration;

use crate::chain::types::RpcErrorKind;
use crate::config::schema::{GasConfig, RetryConfig};
use crate::resilience::backoff::calculate_backoff;

/// Policy governing resubmission of deployment transactions.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum broadcast attempts.
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,
    /// Backoff delay cap in milliseconds.
    pub max_delay_ms: u64,
    /// Percentage fee bump per fee-related retry.
    pub fee_bump_percent: u64,
    /// Absolute ceiling for escalated fees, in wei.
    pub fee_ceiling: u128,
}

impl RetryPolicy {
    pub fn from_config(retry: &RetryConfig, gas: &GasConfig) -> Self {
        Self {
            max_attempts: retry.max_attempts,
            base_delay_ms: retry.base_delay_ms,
            max_delay_ms: retry.max_delay_ms,
            fee_bump_percent: retry.fee_bump_percent,
            fee_ceiling: gas.max_fee_ceiling_wei(),
        }
    }

    /// Whether the given attempt may be followed by another.
    ///
    /// `attempt` is 1-based: after the first broadcast failure this is
    /// called with `attempt == 1`.
    pub fn should_retry(&self, attempt: u32, kind: RpcErrorKind) -> bool {
        kind.retriable() && attempt < self.max_attempts
    }

    /// Delay to wait before the next attempt.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms)
    }

    /// Escalate a fee for resubmission.
    ///
    /// Strictly increases below the ceiling (at least 1 wei even when the
    /// percentage bump rounds to zero) and never decreases.
    pub fn escalate_fee(&self, previous: u128) -> u128 {
        if previous >= self.fee_ceiling {
            return previous;
        }
        let bump = (previous.saturating_mul(self.fee_bump_percent as u128) / 100).max(1);
        previous.saturating_add(bump).min(self.fee_ceiling)
    }
}
