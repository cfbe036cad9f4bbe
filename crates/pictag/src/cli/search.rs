//! The `pictag search` command: match query against the tag index.

use clap::Args;
use pictag_core::config::SearchConfig;
use pictag_core::search::search_field;
use pictag_core::{Config, ElasticsearchClient, OutputWriter};

use super::types::OutputFormat;

/// Arguments for the `search` command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query (default from config: "nature")
    pub query: Option<String>,

    /// Index to search (default from config: "images")
    #[arg(short, long)]
    pub index: Option<String>,

    /// Document field to match against (default from config: "tags")
    #[arg(long)]
    pub field: Option<String>,

    /// Search cluster URL
    #[arg(long, env = "PICTAG_SEARCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "jsonl")]
    pub format: OutputFormat,
}

/// Merge CLI flags over the `[search]` config section and re-validate it.
fn resolve(args: &SearchArgs, config: &Config) -> anyhow::Result<(SearchConfig, String)> {
    let mut search = config.search.clone();
    if let Some(endpoint) = &args.endpoint {
        search.endpoint = endpoint.clone();
    }
    if let Some(index) = &args.index {
        search.index = index.clone();
    }
    if let Some(field) = &args.field {
        search.field = field.clone();
    }
    search.validate()?;

    let query = args.query.clone().unwrap_or_else(|| search.query.clone());
    Ok((search, query))
}

/// Execute the search command.
pub async fn execute(args: SearchArgs, config: &Config) -> anyhow::Result<()> {
    let (search, query) = resolve(&args, config)?;

    let client = ElasticsearchClient::from_config(&search);
    let hits = search_field(&client, &search.index, &search.field, &query).await?;

    let mut writer = OutputWriter::new(
        std::io::stdout().lock(),
        args.format.into(),
        config.output.pretty,
    );
    writer.write_all(&hits)?;

    Ok(())
}
