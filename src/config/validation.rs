use crate::config::types::{Config, CrawlerConfig, FetchConfig, SinkConfig, SummarizerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_summarizer_config(&config.summarizer)?;
    validate_sink_config(&config.sink)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_tasks < 1 || config.max_concurrent_tasks > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_tasks must be between 1 and 100, got {}",
            config.max_concurrent_tasks
        )));
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.probe_timeout_secs < 1 || config.probe_timeout_secs > config.request_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_secs must be between 1 and request_timeout_secs, got {}",
            config.probe_timeout_secs
        )));
    }

    Ok(())
}

fn validate_summarizer_config(config: &SummarizerConfig) -> Result<(), ConfigError> {
    // The endpoint only matters once a key is configured
    if config.api_key.is_some() {
        let url = Url::parse(&config.endpoint)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid summarizer endpoint: {}", e)))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Validation(format!(
                "Summarizer endpoint must be HTTP(S), got scheme '{}'",
                url.scheme()
            )));
        }

        if config.model.is_empty() {
            return Err(ConfigError::Validation(
                "summarizer model cannot be empty".to_string(),
            ));
        }

        if config.max_tokens < 1 {
            return Err(ConfigError::Validation(
                "summarizer max_tokens must be >= 1".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_sink_config(config: &SinkConfig) -> Result<(), ConfigError> {
    if config.root_path.is_empty() {
        return Err(ConfigError::Validation(
            "sink root_path cannot be empty".to_string(),
        ));
    }

    validate_container_name(&config.container)
}

/// Container names become directory components, so keep them tame
fn validate_container_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "sink container cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "sink container must contain only alphanumeric characters and hyphens, got '{}'",
            name
        )));
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(ConfigError::Validation(format!(
            "sink container cannot start or end with '-', got '{}'",
            name
        )));
    }

    Ok(())
}
