//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject values the rotating sink cannot work with
//! - Check the control endpoint address has a usable port
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::LogConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("logFile must not be empty")]
    EmptyLogFile,

    #[error("maxSize must be at least 1 MB")]
    ZeroMaxSize,

    #[error("maxAge must be at least 1 day")]
    ZeroMaxAge,

    #[error("logPort {0:?} is not a valid listen address")]
    InvalidPort(String),
}

/// Check a deserialized configuration.
pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.log_file.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyLogFile);
    }
    if config.max_size == 0 {
        errors.push(ValidationError::ZeroMaxSize);
    }
    if config.max_age == 0 {
        errors.push(ValidationError::ZeroMaxAge);
    }

    let port_ok = config
        .bind_address()
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
    if !port_ok {
        errors.push(ValidationError::InvalidPort(config.log_port.clone()));
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

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&LogConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_backups_is_valid() {
        let config = LogConfig {
            max_backups: 0,
            ..LogConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = LogConfig {
            max_size: 0,
            max_age: 0,
            log_port: ":notaport".into(),
            ..LogConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroMaxSize,
                ValidationError::ZeroMaxAge,
                ValidationError::InvalidPort(":notaport".into()),
            ]
        );
    }

    #[test]
    fn test_port_out_of_range() {
        let config = LogConfig {
            log_port: ":70000".into(),
            ..LogConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
