//! Contract Deployment Pipeline
//!
//! A single-contract deployment pipeline: takes a compiled artifact, a
//! signing key, and an RPC endpoint; builds, signs, broadcasts, and confirms
//! one deployment transaction; and emits a durable record of the outcome.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │               DEPLOYMENT PIPELINE                │
//!                    │                                                  │
//!  artifact + args   │  ┌──────────┐   ┌─────────┐   ┌───────────────┐ │
//!  ──────────────────┼─▶│ pipeline │──▶│  chain  │──▶│    chain      │ │
//!  key + endpoint    │  │ artifact │   │ wallet  │   │    client     │─┼──▶ RPC node
//!                    │  └──────────┘   └─────────┘   └───────┬───────┘ │
//!                    │                                       │         │
//!                    │                                       ▼         │
//!                    │  ┌──────────┐   ┌─────────────────────────────┐ │
//!  DeploymentRecord  │  │ pipeline │◀──│   pipeline::deploy          │ │
//!  ◀─────────────────┼──│ record   │   │   (state machine + nonce)   │ │
//!                    │  └──────────┘   └─────────────────────────────┘ │
//!                    │                                                 │
//!                    │  ┌───────────────────────────────────────────┐ │
//!                    │  │           Cross-Cutting Concerns          │ │
//!                    │  │  ┌────────┐ ┌────────────┐ ┌─────────────┐│ │
//!                    │  │  │ config │ │ resilience │ │  lifecycle  ││ │
//!                    │  │  │        │ │ retry/fees │ │ cancellation││ │
//!                    │  │  └────────┘ └────────────┘ └─────────────┘│ │
//!                    │  └───────────────────────────────────────────┘ │
//!                    └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod chain;
pub mod pipeline;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use chain::{Endpoint, RpcClient, Wallet};
pub use config::DeployerConfig;
pub use pipeline::{
    ContractArtifact, DeploymentOutcome, DeploymentPipeline, DeploymentRecord, DeploymentRequest,
    FailureReason, GasPolicy, NonceAllocator,
};
pub use resilience::RetryPolicy;
