//! The `pictag tag` command: label one stored image.

use clap::Args;
use pictag_core::config::LabelingConfig;
use pictag_core::{tag_image, Config, LabelOptions, ObjectRef, OutputWriter, RekognitionProvider};

use super::types::{required_value, OutputFormat};

/// Arguments for the `tag` command.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Bucket holding the image
    #[arg(short, long, env = "PICTAG_BUCKET")]
    pub bucket: Option<String>,

    /// Object key of the image (default from config: "example.jpg")
    #[arg(short, long)]
    pub image: Option<String>,

    /// Maximum number of labels to return
    #[arg(long)]
    pub max_labels: Option<u32>,

    /// Minimum confidence (0-100) for a label to be returned
    #[arg(long)]
    pub min_confidence: Option<f32>,

    /// AWS region for the vision service
    #[arg(long)]
    pub region: Option<String>,

    /// Custom endpoint URL for the vision service
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Merge CLI flags over the `[labeling]` config section.
fn resolve(args: &TagArgs, config: &Config) -> anyhow::Result<(ObjectRef, LabelingConfig)> {
    let mut labeling = config.labeling.clone();
    if let Some(max_labels) = args.max_labels {
        labeling.max_labels = max_labels;
    }
    if let Some(min_confidence) = args.min_confidence {
        labeling.min_confidence = min_confidence;
    }
    if args.region.is_some() {
        labeling.region = args.region.clone();
    }
    if args.endpoint_url.is_some() {
        labeling.endpoint = args.endpoint_url.clone();
    }

    let bucket = required_value(args.bucket.clone(), &labeling.bucket, "bucket")?;
    let image = required_value(args.image.clone(), &labeling.image, "image")?;

    Ok((ObjectRef::new(bucket, image), labeling))
}

/// Execute the tag command.
pub async fn execute(args: TagArgs, config: &Config) -> anyhow::Result<()> {
    let (image, labeling) = resolve(&args, config)?;
    let provider = RekognitionProvider::from_config(&labeling).await;

    let labels = tag_image(&provider, &image, LabelOptions::from_config(&labeling)).await?;

    let pretty = config.output.pretty && !args.compact;
    let mut writer = OutputWriter::new(std::io::stdout().lock(), args.format.into(), pretty);
    writer.write_all(&labels)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> TagArgs {
        TagArgs {
            bucket: None,
            image: None,
            max_labels: None,
            min_confidence: None,
            region: None,
            endpoint_url: None,
            format: OutputFormat::Json,
            compact: false,
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let mut config = Config::default();
        config.labeling.bucket = "holiday-photos".to_string();

        let (image, labeling) = resolve(&args(), &config).unwrap();

        assert_eq!(image, ObjectRef::new("holiday-photos", "example.jpg"));
        assert_eq!(labeling.max_labels, 10);
        assert_eq!(labeling.min_confidence, 75.0);
    }

    #[test]
    fn test_resolve_overrides() {
        let config = Config::default();
        let args = TagArgs {
            bucket: Some("b".to_string()),
            image: Some("images/beach.jpg".to_string()),
            max_labels: Some(3),
            min_confidence: Some(90.0),
            region: Some("eu-west-1".to_string()),
            ..args()
        };

        let (image, labeling) = resolve(&args, &config).unwrap();

        assert_eq!(image.key, "images/beach.jpg");
        assert_eq!(labeling.max_labels, 3);
        assert_eq!(labeling.min_confidence, 90.0);
        assert_eq!(labeling.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_resolve_requires_bucket() {
        assert!(resolve(&args(), &Config::default()).is_err());
    }
}
