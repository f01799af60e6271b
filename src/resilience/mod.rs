//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Broadcast attempt fails:
//!     → policy.rs (classify: retry or abort?)
//!     → backoff.rs (jittered delay before the next attempt)
//!     → policy.rs (escalated fee for fee-related rejections)
//! ```
//!
//! # Design Decisions
//! - Every retry waits; jittered backoff prevents hammering a recovering node
//! - Fee escalation only on fee/nonce rejections, never on transport errors
//! - The retry budget bounds total attempts, not wall-clock time

pub mod backoff;
pub mod policy;

pub use policy::RetryPolicy;
