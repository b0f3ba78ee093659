use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Bucket name is set
/// - Session secret is set when auth is enabled
/// - Timeouts and TTLs are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.bucket.is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.bucket cannot be empty".to_string(),
        ));
    }

    if config.auth.enabled && config.auth.session_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "auth.session_secret is required when auth is enabled".to_string(),
        ));
    }

    if config.extractor.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "extractor.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.pipeline.link_ttl_secs == 0 || config.pipeline.retention_ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline TTLs cannot be 0".to_string(),
        ));
    }

    if config.pipeline.key_prefix.is_empty() {
        return Err(ConfigError::ValidationError(
            "pipeline.key_prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}
