//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DeployerConfig (validated, immutable)
//!     → CLI overrides applied at the boundary, re-validated
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; one deployment run, one config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ConfirmationConfig;
pub use schema::DeployerConfig;
pub use schema::GasConfig;
pub use schema::RetryConfig;
pub use schema::RpcConfig;
