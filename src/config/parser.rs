use crate::config::types::CrawlConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and validates a crawl configuration from a TOML file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use kumo::config::load_config;
///
/// let config = load_config(Path::new("crawl.toml")).unwrap();
/// println!("Max depth: {}", config.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: CrawlConfig = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}
