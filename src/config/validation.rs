use crate::config::types::{Config, CrawlerConfig, OutputConfig, StopwordConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_stopword_config(&config.stopwords)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if !config
        .user_agent
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user_agent must contain only alphanumeric characters and hyphens, got '{}'",
            config.user_agent
        )));
    }

    if config.default_delay_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "default_delay_ms must be >= 1ms, got {}ms",
            config.default_delay_ms
        )));
    }

    if config.session_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "session_timeout_ms must be >= 1ms, got {}ms",
            config.session_timeout_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_dir.is_empty() {
        return Err(ConfigError::Validation(
            "database_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates stopword configuration
fn validate_stopword_config(config: &StopwordConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "stopwords path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                user_agent: "searchlight".to_string(),
                default_delay_ms: 100,
                session_timeout_ms: 1000,
            },
            output: OutputConfig {
                database_dir: ".".to_string(),
            },
            stopwords: StopwordConfig {
                path: "stopwords-en.json".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = valid_config();
        config.crawler.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_user_agent_with_spaces_rejected() {
        let mut config = valid_config();
        config.crawler.user_agent = "search light".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_delay_rejected() {
        let mut config = valid_config();
        config.crawler.default_delay_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.crawler.session_timeout_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_dir_rejected() {
        let mut config = valid_config();
        config.output.database_dir = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_stopword_path_rejected() {
        let mut config = valid_config();
        config.stopwords.path = String::new();
        assert!(validate(&config).is_err());
    }
}
