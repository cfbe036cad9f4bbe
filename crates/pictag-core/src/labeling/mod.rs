//! Tag stage: label one stored image with a vision service.
//!
//! The provider does the work; [`tag_image`] forwards the limits and makes
//! sure the returned list honors them even if a backend ignores one.

pub(crate) mod provider;
pub(crate) mod rekognition;

pub use provider::{LabelOptions, LabelProvider, LabelRequest};
pub use rekognition::RekognitionProvider;

use crate::error::LabelError;
use crate::types::{Label, ObjectRef};

/// Label the image at `image` and return the labels in service order.
///
/// Makes exactly one provider call; errors propagate unchanged.
pub async fn tag_image(
    provider: &dyn LabelProvider,
    image: &ObjectRef,
    options: LabelOptions,
) -> Result<Vec<Label>, LabelError> {
    options.validate()?;

    let request = LabelRequest {
        image: image.clone(),
        options,
    };

    tracing::debug!(
        "Labeling {} via {} (max {}, min confidence {})",
        image,
        provider.name(),
        options.max_labels,
        options.min_confidence
    );

    let labels = provider.detect_labels(&request).await?;
    let received = labels.len();

    let labels: Vec<Label> = labels
        .into_iter()
        .filter(|label| label.confidence >= options.min_confidence)
        .take(options.max_labels as usize)
        .collect();

    if labels.len() != received {
        tracing::warn!(
            "{} returned {} labels outside the requested limits",
            provider.name(),
            received - labels.len()
        );
    }
    tracing::info!("{} labels for {}", labels.len(), image);

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider that returns canned labels and records the requests it saw.
    struct FakeProvider {
        labels: Vec<Label>,
        honor_limits: bool,
        requests: Mutex<Vec<LabelRequest>>,
    }

    impl FakeProvider {
        fn new(confidences: &[(&str, f32)], honor_limits: bool) -> Self {
            Self {
                labels: confidences
                    .iter()
                    .map(|(name, c)| Label::new(*name, *c))
                    .collect(),
                honor_limits,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LabelProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn detect_labels(&self, request: &LabelRequest) -> Result<Vec<Label>, LabelError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.honor_limits {
                Ok(self
                    .labels
                    .iter()
                    .filter(|l| l.confidence >= request.options.min_confidence)
                    .take(request.options.max_labels as usize)
                    .cloned()
                    .collect())
            } else {
                Ok(self.labels.clone())
            }
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LabelProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn detect_labels(&self, request: &LabelRequest) -> Result<Vec<Label>, LabelError> {
            Err(LabelError::ImageNotFound {
                bucket: request.image.bucket.clone(),
                key: request.image.key.clone(),
                message: "Unable to get object metadata from S3".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_threshold_applied_by_service() {
        let provider = FakeProvider::new(&[("Forest", 92.0), ("Tree", 80.0), ("Moss", 60.0)], true);
        let image = ObjectRef::new("photos", "example.jpg");

        let labels = tag_image(&provider, &image, LabelOptions::default())
            .await
            .unwrap();

        let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Forest", "Tree"]);

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].options.max_labels, 10);
        assert_eq!(requests[0].options.min_confidence, 75.0);
        assert_eq!(requests[0].image, image);
    }

    #[tokio::test]
    async fn test_limits_enforced_when_backend_ignores_them() {
        let confidences: Vec<(String, f32)> = (0..15)
            .map(|i| (format!("label-{i}"), 99.0 - i as f32 * 2.0))
            .collect();
        let refs: Vec<(&str, f32)> = confidences.iter().map(|(n, c)| (n.as_str(), *c)).collect();
        let provider = FakeProvider::new(&refs, false);
        let image = ObjectRef::new("photos", "example.jpg");

        let labels = tag_image(&provider, &image, LabelOptions::default())
            .await
            .unwrap();

        assert_eq!(labels.len(), 10);
        assert!(labels.iter().all(|l| l.confidence >= 75.0));
        assert_eq!(labels[0].name, "label-0");
    }

    #[tokio::test]
    async fn test_service_order_preserved() {
        let provider = FakeProvider::new(&[("Sky", 81.0), ("Cloud", 95.0)], true);
        let image = ObjectRef::new("photos", "example.jpg");

        let labels = tag_image(&provider, &image, LabelOptions::default())
            .await
            .unwrap();

        assert_eq!(labels[0].name, "Sky");
        assert_eq!(labels[1].name, "Cloud");
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let image = ObjectRef::new("photos", "missing.jpg");
        let err = tag_image(&FailingProvider, &image, LabelOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LabelError::ImageNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_options_skip_provider_call() {
        let provider = FakeProvider::new(&[("Sky", 90.0)], true);
        let image = ObjectRef::new("photos", "example.jpg");
        let options = LabelOptions {
            max_labels: 0,
            min_confidence: 75.0,
        };

        let err = tag_image(&provider, &image, options).await.unwrap_err();

        assert!(matches!(err, LabelError::InvalidOptions(_)));
        assert!(provider.requests.lock().unwrap().is_empty());
    }
}
