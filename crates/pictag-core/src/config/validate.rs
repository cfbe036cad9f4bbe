//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, SearchConfig};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.labeling.max_labels == 0 {
            return Err(ConfigError::ValidationError(
                "labeling.max_labels must be > 0".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.labeling.min_confidence) {
            return Err(ConfigError::ValidationError(
                "labeling.min_confidence must be between 0 and 100".into(),
            ));
        }
        self.search.validate()?;
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

impl SearchConfig {
    /// Validate the search section on its own.
    ///
    /// Run again after CLI flags are merged in, since those bypass file loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "search.timeout_ms must be > 0".into(),
            ));
        }
        if self.index.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "search.index must not be empty".into(),
            ));
        }
        if self.field.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "search.field must not be empty".into(),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "search.endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_max_labels() {
        let mut config = Config::default();
        config.labeling.max_labels = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_labels"));
    }

    #[test]
    fn test_validate_rejects_invalid_min_confidence() {
        let mut config = Config::default();
        config.labeling.min_confidence = 100.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_confidence"));

        config.labeling.min_confidence = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_confidence"));
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let mut config = Config::default();
        config.search.endpoint = "localhost:9200".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("search.endpoint"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.search.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn test_search_config_validate_rejects_empty_field() {
        let search = SearchConfig {
            field: " ".to_string(),
            ..SearchConfig::default()
        };
        let err = search.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("search.field"));
    }
}
