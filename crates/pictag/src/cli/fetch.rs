//! The `pictag fetch` command: download a prefix to a local directory.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pictag_core::{
    fetch_objects_with_progress, Config, FetchEvent, FetchReport, FetchRequest, ObjectStore,
    OutputFormat, OutputWriter,
};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::types::required_value;

/// Arguments for the `fetch` command.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Bucket to download from
    #[arg(short, long, env = "PICTAG_BUCKET")]
    pub bucket: Option<String>,

    /// Key prefix selecting the objects (default from config: "images/")
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Directory to write files into (default from config: ".")
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Keep going when a download fails; exit non-zero at the end
    #[arg(long)]
    pub continue_on_error: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Print the fetch report as JSON on stdout instead of a text summary
    #[arg(long)]
    pub json: bool,
}

/// Merge CLI flags over the `[fetch]` config section.
fn build_request(args: &FetchArgs, config: &Config) -> anyhow::Result<FetchRequest> {
    let bucket = required_value(args.bucket.clone(), &config.fetch.bucket, "bucket")?;
    let prefix = args
        .prefix
        .clone()
        .unwrap_or_else(|| config.fetch.prefix.clone());
    let output_dir = match &args.output_dir {
        Some(dir) => pictag_core::config::expand_path(dir),
        None => config.output_dir(),
    };

    Ok(FetchRequest::new(bucket, prefix)
        .with_output_dir(output_dir)
        .with_continue_on_error(args.continue_on_error || config.fetch.continue_on_error))
}

/// Execute the fetch command.
pub async fn execute(args: FetchArgs, config: &Config) -> anyhow::Result<()> {
    let request = build_request(&args, config)?;
    let store = ObjectStore::s3(config.storage.clone());

    let mut progress: Option<ProgressBar> = None;
    let report = fetch_objects_with_progress(&store, &request, |event| match event {
        FetchEvent::Listed { total } => {
            if !args.no_progress && total > 0 {
                progress = Some(create_progress_bar(total as u64));
            }
        }
        FetchEvent::Processed { key, .. } => {
            if let Some(pb) = &progress {
                pb.set_message(key.to_string());
                pb.inc(1);
            }
        }
    })
    .await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let report = report?;

    let stdout = std::io::stdout().lock();
    if args.json {
        OutputWriter::new(stdout, OutputFormat::Json, config.output.pretty).write(&report)?;
    } else {
        write_summary(stdout, &report, &request.output_dir)?;
    }
    if !report.is_success() {
        for failure in &report.failed {
            eprintln!("  {}: {}", failure.key, failure.error);
        }
        anyhow::bail!("{} download(s) failed", report.failed.len());
    }

    Ok(())
}

fn write_summary(mut out: impl Write, report: &FetchReport, output_dir: &Path) -> std::io::Result<()> {
    writeln!(
        out,
        "Downloaded {} file(s) to {}",
        report.downloaded.len(),
        output_dir.display()
    )?;
    if !report.skipped.is_empty() {
        writeln!(out, "Skipped {} key(s) without a file name", report.skipped.len())?;
    }
    Ok(())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb
}
