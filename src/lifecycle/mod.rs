//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGINT (Ctrl-C)
//!     → CancelBroadcast::cancel()
//!     → every subscribed CancelHandle resolves
//!     → pipeline aborts polling and resolves to Failed { Cancelled }
//! ```
//!
//! # Design Decisions
//! - Cancellation is cooperative: the pipeline observes the signal at its
//!   suspension points (backoff sleeps, receipt polls)
//! - A cancelled run still produces a terminal outcome and a record

pub mod cancel;

pub use cancel::{CancelBroadcast, CancelHandle};
