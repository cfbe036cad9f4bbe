//! AWS Rekognition provider using the DetectLabels API.
//!
//! The image is passed by S3 reference, so the bytes never leave AWS.

use super::provider::{LabelProvider, LabelRequest};
use crate::config::LabelingConfig;
use crate::error::LabelError;
use crate::types::{Label, ObjectRef};
use async_trait::async_trait;
use aws_sdk_rekognition::config::Region;
use aws_sdk_rekognition::error::{DisplayErrorContext, SdkError};
use aws_sdk_rekognition::operation::detect_labels::DetectLabelsError;
use aws_sdk_rekognition::types::{Image, S3Object};

/// Rekognition provider wrapping a shared SDK client.
pub struct RekognitionProvider {
    client: aws_sdk_rekognition::Client,
}

impl RekognitionProvider {
    pub fn new(client: aws_sdk_rekognition::Client) -> Self {
        Self { client }
    }

    /// Build a client from the standard AWS credential/region chain,
    /// applying the region and endpoint overrides from config.
    pub async fn from_config(config: &LabelingConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(ref region) = config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(ref endpoint) = config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        tracing::debug!("Rekognition client region: {:?}", sdk_config.region());

        Self::new(aws_sdk_rekognition::Client::new(&sdk_config))
    }
}

#[async_trait]
impl LabelProvider for RekognitionProvider {
    fn name(&self) -> &str {
        "rekognition"
    }

    async fn detect_labels(&self, request: &LabelRequest) -> Result<Vec<Label>, LabelError> {
        let image = Image::builder()
            .s3_object(
                S3Object::builder()
                    .bucket(&request.image.bucket)
                    .name(&request.image.key)
                    .build(),
            )
            .build();

        let output = self
            .client
            .detect_labels()
            .image(image)
            .max_labels(i32::try_from(request.options.max_labels).unwrap_or(i32::MAX))
            .min_confidence(request.options.min_confidence)
            .send()
            .await
            .map_err(|e| map_sdk_error(&request.image, e))?;

        output.labels().iter().map(convert_label).collect()
    }
}

fn convert_label(label: &aws_sdk_rekognition::types::Label) -> Result<Label, LabelError> {
    let name = label.name().ok_or_else(|| LabelError::MalformedResponse {
        message: "label without a name".to_string(),
    })?;
    let confidence = label
        .confidence()
        .ok_or_else(|| LabelError::MalformedResponse {
            message: format!("label '{name}' without a confidence"),
        })?;

    Ok(Label {
        name: name.to_string(),
        confidence,
        parents: label
            .parents()
            .iter()
            .filter_map(|p| p.name().map(String::from))
            .collect(),
        categories: label
            .categories()
            .iter()
            .filter_map(|c| c.name().map(String::from))
            .collect(),
    })
}

fn map_sdk_error(image: &ObjectRef, err: SdkError<DetectLabelsError>) -> LabelError {
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ServiceError(service) => {
            let status_code = service.raw().status().as_u16();
            map_service_error(image, service.into_err(), status_code, message)
        }
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            LabelError::Connectivity { message }
        }
        SdkError::ResponseError(_) => LabelError::MalformedResponse { message },
        _ => LabelError::Service {
            message,
            status_code: None,
        },
    }
}

fn map_service_error(
    image: &ObjectRef,
    err: DetectLabelsError,
    status_code: u16,
    message: String,
) -> LabelError {
    match err {
        DetectLabelsError::InvalidS3ObjectException(_) => LabelError::ImageNotFound {
            bucket: image.bucket.clone(),
            key: image.key.clone(),
            message,
        },
        DetectLabelsError::ThrottlingException(_)
        | DetectLabelsError::ProvisionedThroughputExceededException(_) => {
            LabelError::Throttled { message }
        }
        DetectLabelsError::AccessDeniedException(_) => LabelError::AccessDenied { message },
        _ => LabelError::Service {
            message,
            status_code: Some(status_code),
        },
    }
}
