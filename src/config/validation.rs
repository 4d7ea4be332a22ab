use crate::config::types::CrawlConfig;
use crate::ConfigError;

/// Validates a crawl configuration
///
/// `max_depth` needs no check; the type already rules out negative depths.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.page_buffer < 1 {
        return Err(ConfigError::Validation(format!(
            "page_buffer must be >= 1, got {}",
            config.page_buffer
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&CrawlConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = CrawlConfig {
            max_concurrency: 0,
            ..CrawlConfig::default()
        };
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_excessive_concurrency_rejected() {
        let config = CrawlConfig {
            max_concurrency: 101,
            ..CrawlConfig::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_page_buffer_rejected() {
        let config = CrawlConfig {
            page_buffer: 0,
            ..CrawlConfig::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_depth_zero_is_valid() {
        let config = CrawlConfig {
            max_depth: 0,
            ..CrawlConfig::default()
        };
        assert!(validate(&config).is_ok());
    }
}
