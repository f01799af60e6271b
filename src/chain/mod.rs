//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! Explicit inputs (RPC URL, private key)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → consumed by the deployment pipeline
//! ```
//!
//! # Security Constraints
//! - Private keys are explicit constructor arguments, never ambient state
//! - Never log private keys or raw signing material
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod types;
pub mod wallet;

pub use client::{Endpoint, RpcClient};
pub use types::{AccountState, ChainError, Receipt, RpcError, RpcErrorKind};
pub use wallet::Wallet;
