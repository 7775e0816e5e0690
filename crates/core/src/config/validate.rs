use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Spotify credentials are present
/// - Retry and search limits are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.spotify.client_id.trim().is_empty() || config.spotify.client_secret.trim().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "spotify.client_id and spotify.client_secret are required".to_string(),
        ));
    }

    if config.pipeline.retry_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.retry_attempts must be at least 1".to_string(),
        ));
    }

    if config.downloader.search_limit == 0 {
        return Err(ConfigError::ValidationError(
            "downloader.search_limit must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[spotify]
client_id = "id"
client_secret = "secret"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_blank_secret_fails() {
        let mut config = valid_config();
        config.spotify.client_secret = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn test_validate_zero_retry_attempts_fails() {
        let mut config = valid_config();
        config.pipeline.retry_attempts = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_search_limit_fails() {
        let mut config = valid_config();
        config.downloader.search_limit = 0;
        assert!(validate_config(&config).is_err());
    }
}
