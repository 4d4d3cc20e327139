// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express. All errors
//! are collected rather than failing on the first one.

use crate::diagnostic::ConfigError;
use crate::model::CryptumConfig;

/// Upper bound for the timestamp freshness window.
const MAX_TIMESTAMP_TOLERANCE_SECS: u32 = 3600;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &CryptumConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        invalid("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            invalid(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        invalid(format!(
            "server.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.server.log_level
        ));
    }

    for origin in &config.server.cors_allowed_origins {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            invalid(format!(
                "server.cors_allowed_origins entry `{origin}` must start with http:// or https://"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    let tolerance = config.auth.timestamp_tolerance_secs;
    if tolerance == 0 || tolerance > MAX_TIMESTAMP_TOLERANCE_SECS {
        invalid(format!(
            "auth.timestamp_tolerance_secs must be between 1 and {MAX_TIMESTAMP_TOLERANCE_SECS}, got {tolerance}"
        ));
    }

    if config.credentials.max_per_profile == 0 {
        invalid("credentials.max_per_profile must be at least 1".to_string());
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

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CryptumConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = CryptumConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn zero_capacity_fails_validation() {
        let mut config = CryptumConfig::default();
        config.credentials.max_per_profile = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "max_per_profile"));
    }

    #[test]
    fn tolerance_bounds_are_enforced() {
        let mut config = CryptumConfig::default();
        config.auth.timestamp_tolerance_secs = 0;
        assert!(has_error(
            &validate_config(&config).unwrap_err(),
            "timestamp_tolerance_secs"
        ));

        config.auth.timestamp_tolerance_secs = 7200;
        assert!(has_error(
            &validate_config(&config).unwrap_err(),
            "timestamp_tolerance_secs"
        ));
    }

    #[test]
    fn bad_origin_and_host_are_both_reported() {
        let mut config = CryptumConfig::default();
        config.server.host = "not a host!".to_string();
        config.server.cors_allowed_origins = vec!["vault.example.com".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "server.host"));
        assert!(has_error(&errors, "cors_allowed_origins"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = CryptumConfig::default();
        config.server.log_level = "verbose".to_string();
        assert!(has_error(&validate_config(&config).unwrap_err(), "log_level"));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = CryptumConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.cors_allowed_origins = vec!["https://vault.example.com".to_string()];
        config.storage.database_path = "/tmp/cryptum.db".to_string();
        config.auth.timestamp_tolerance_secs = 60;
        config.credentials.max_per_profile = 3;
        assert!(validate_config(&config).is_ok());
    }
}
