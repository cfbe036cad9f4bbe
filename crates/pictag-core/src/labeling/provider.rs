//! Label provider trait and request types.

use crate::config::LabelingConfig;
use crate::error::LabelError;
use crate::types::{Label, ObjectRef};
use async_trait::async_trait;

/// Limits passed to the vision service with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOptions {
    /// Maximum number of labels returned
    pub max_labels: u32,
    /// Minimum confidence (percent) for a label to be returned
    pub min_confidence: f32,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            max_labels: 10,
            min_confidence: 75.0,
        }
    }
}

impl LabelOptions {
    pub fn from_config(config: &LabelingConfig) -> Self {
        Self {
            max_labels: config.max_labels,
            min_confidence: config.min_confidence,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), LabelError> {
        if self.max_labels == 0 {
            return Err(LabelError::InvalidOptions(
                "max_labels must be > 0".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.min_confidence) {
            return Err(LabelError::InvalidOptions(format!(
                "min_confidence must be between 0 and 100, got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

/// A request to label one stored image.
#[derive(Debug, Clone)]
pub struct LabelRequest {
    /// The image, already resident in the bucket
    pub image: ObjectRef,
    /// Limits forwarded to the service
    pub options: LabelOptions,
}

/// Trait that all vision-labeling backends implement.
///
/// Uses `async_trait` so providers can be held as `Box<dyn LabelProvider>`.
#[async_trait]
pub trait LabelProvider: Send + Sync {
    /// Provider name for logging (e.g., "rekognition").
    fn name(&self) -> &str;

    /// Ask the service for labels. Order is whatever the service returns.
    async fn detect_labels(&self, request: &LabelRequest) -> Result<Vec<Label>, LabelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LabelOptions::default();
        assert_eq!(options.max_labels, 10);
        assert_eq!(options.min_confidence, 75.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_from_config() {
        let config = LabelingConfig {
            max_labels: 5,
            min_confidence: 90.0,
            ..LabelingConfig::default()
        };
        let options = LabelOptions::from_config(&config);
        assert_eq!(options.max_labels, 5);
        assert_eq!(options.min_confidence, 90.0);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let options = LabelOptions {
            max_labels: 0,
            min_confidence: 75.0,
        };
        assert!(matches!(
            options.validate(),
            Err(LabelError::InvalidOptions(_))
        ));

        let options = LabelOptions {
            max_labels: 10,
            min_confidence: 101.0,
        };
        assert!(options.validate().is_err());
    }
}
