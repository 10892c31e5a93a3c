use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use sub_sift::{
    catalog::{self, GroupTemplate},
    fetch::{self, Fetcher, FetcherConfig},
    output, pipeline,
    pipeline::{Prober, ProberConfig},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// A subscription merger and proxy node latency sifter
#[derive(Parser)]
#[command(name = "sub-sift")]
#[command(about = "Merge proxy subscriptions, drop dead nodes, emit a routing config")]
struct Cli {
    /// YAML file with the subscription URL list
    #[arg(short, long, default_value = "addr.yaml")]
    input: PathBuf,

    /// Output routing config file
    #[arg(short, long, default_value = "outcome.meta.yml")]
    output: PathBuf,

    /// Per-node probe timeout in seconds
    #[arg(long, default_value = "3")]
    timeout: u64,

    /// Number of concurrent probes
    #[arg(short = 'n', long, default_value = "50")]
    concurrency: usize,

    /// Timeout in seconds for subscription requests
    #[arg(long, default_value = "30")]
    fetch_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let content = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("cannot read subscription list {:?}", cli.input))?;
    let urls = fetch::read_urls(&content)?;
    if urls.is_empty() {
        bail!("no valid subscription urls in {:?}", cli.input);
    }
    info!(count = urls.len(), "loaded subscription urls");

    let fetcher = Fetcher::with_config(
        FetcherConfig::new().with_timeout(Duration::from_secs(cli.fetch_timeout)),
    )?;

    let mut raw_nodes = Vec::new();
    let mut sources_ok = 0;
    for (index, url) in urls.iter().enumerate() {
        info!(source = index + 1, total = urls.len(), "processing subscription");
        let Some(body) = fetcher.fetch(url).await else {
            warn!(url, "skipping subscription, fetch failed");
            continue;
        };
        let nodes = fetch::extract_nodes(&body);
        if nodes.is_empty() {
            warn!(url, "subscription yielded no nodes");
            continue;
        }
        info!(count = nodes.len(), "extracted nodes");
        raw_nodes.extend(nodes);
        sources_ok += 1;
    }
    info!(
        sources_ok,
        sources = urls.len(),
        raw = raw_nodes.len(),
        "finished fetching subscriptions"
    );
    if raw_nodes.is_empty() {
        bail!("no proxy nodes obtained from any subscription");
    }

    let prober = Prober::with_config(
        ProberConfig::new()
            .with_timeout(Duration::from_secs(cli.timeout))
            .with_concurrency(cli.concurrency)
            .with_probe_context(catalog::PROBE_CONTEXT.to_string()),
    );

    let template = GroupTemplate::default();
    let config = match pipeline::run(raw_nodes, &prober, catalog::default_rules(), &template).await
    {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "pipeline failed, no output written");
            return Err(e);
        }
    };

    output::write_file(&config, &cli.output)?;
    info!(path = %cli.output.display(), "done");
    Ok(())
}
