//! Deployment pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! ContractArtifact + constructor args + gas policy
//!     → artifact.rs (validate, assemble deploy data)
//!     → nonce.rs (serialized per-account nonce allocation)
//!     → deploy.rs (sign, broadcast, classify, poll for receipt)
//!     → outcome.rs (exactly one terminal DeploymentOutcome)
//!     → record.rs (formatted DeploymentRecord for the caller's sink)
//! ```
//!
//! # Design Decisions
//! - The pipeline resolves to an outcome, it never throws past its boundary
//! - Account state is re-read before every (re)submission
//! - Confirmation waiting is a bounded, cancellable poll, never a blocking wait

pub mod artifact;
pub mod deploy;
pub mod nonce;
pub mod outcome;
pub mod record;

pub use artifact::ContractArtifact;
pub use deploy::{DeploymentPipeline, DeploymentRequest, GasPolicy};
pub use nonce::NonceAllocator;
pub use outcome::{DeploymentOutcome, FailureReason};
pub use record::DeploymentRecord;
