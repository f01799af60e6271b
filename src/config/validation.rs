//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts >= 1)
//! - Check fee settings against the escalation ceiling
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeployerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::DeployerConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a loaded configuration, collecting every error.
pub fn validate_config(config: &DeployerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.rpc.url.is_empty() {
        errors.push(err("rpc.url", "must not be empty"));
    } else if config.rpc.url.parse::<url::Url>().is_err() {
        errors.push(err("rpc.url", "is not a valid URL"));
    }
    for (i, url) in config.rpc.failover_urls.iter().enumerate() {
        if url.parse::<url::Url>().is_err() {
            errors.push(err(
                &format!("rpc.failover_urls[{}]", i),
                "is not a valid URL",
            ));
        }
    }
    if config.rpc.chain_id == 0 {
        errors.push(err("rpc.chain_id", "must be non-zero"));
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(err("rpc.timeout_secs", "must be greater than zero"));
    }

    if config.retry.max_attempts == 0 {
        errors.push(err("retry.max_attempts", "must be at least 1"));
    }
    if config.retry.base_delay_ms == 0 {
        errors.push(err("retry.base_delay_ms", "must be greater than zero"));
    }
    if config.retry.max_delay_ms < config.retry.base_delay_ms {
        errors.push(err("retry.max_delay_ms", "must be >= base_delay_ms"));
    }
    if config.retry.fee_bump_percent == 0 {
        errors.push(err("retry.fee_bump_percent", "must be greater than zero"));
    }

    if config.confirmation.poll_interval_ms == 0 {
        errors.push(err("confirmation.poll_interval_ms", "must be greater than zero"));
    }
    if config.confirmation.max_wait_secs == 0 {
        errors.push(err("confirmation.max_wait_secs", "must be greater than zero"));
    }
    if config.confirmation.confirmation_blocks == 0 {
        errors.push(err("confirmation.confirmation_blocks", "must be at least 1"));
    }

    if config.gas.max_fee_ceiling_gwei == 0 {
        errors.push(err("gas.max_fee_ceiling_gwei", "must be greater than zero"));
    }
    if let Some(max_fee) = config.gas.max_fee_per_gas_gwei {
        if max_fee > config.gas.max_fee_ceiling_gwei {
            errors.push(err(
                "gas.max_fee_per_gas_gwei",
                "exceeds gas.max_fee_ceiling_gwei",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DeployerConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DeployerConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = DeployerConfig::default();
        config.rpc.url = String::new();
        config.retry.max_attempts = 0;
        config.confirmation.poll_interval_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "rpc.url"));
        assert!(errors.iter().any(|e| e.field == "retry.max_attempts"));
        assert!(errors.iter().any(|e| e.field == "confirmation.poll_interval_ms"));
    }

    #[test]
    fn test_fee_above_ceiling_rejected() {
        let mut config = DeployerConfig::default();
        config.gas.max_fee_per_gas_gwei = Some(600);
        config.gas.max_fee_ceiling_gwei = 500;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "gas.max_fee_per_gas_gwei");
    }

    #[test]
    fn test_invalid_backoff_window() {
        let mut config = DeployerConfig::default();
        config.retry.base_delay_ms = 10_000;
        config.retry.max_delay_ms = 1_000;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "retry.max_delay_ms"));
    }
}
