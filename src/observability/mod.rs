//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → structured tracing events (state transitions, retries, outcomes)
//!
//! Consumers:
//!     → stdout log sink (the automation layer's collector)
//!     → the final DeploymentRecord JSON on stdout
//! ```
//!
//! # Design Decisions
//! - Structured events over free-form prints; fields carry the data
//! - The record, not the log stream, is the durable artifact

pub mod logging;

pub use logging::init_logging;
