use std::sync::Arc;

use anyhow::{Context, Result, bail};
use saem_batch::{BatchDownloader, BatchJob};
use saem_client::{HttpFetcher, SearchClient, SenseClient};
use saem_config::Config;
use saem_types::{FieldPolicy, MatchMode, SearchQuery};

use crate::cli::{Cli, Command, DownloadArgs, FetchArgs, SearchArgs, SinkArgs};
use crate::progress::ProgressBarObserver;

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env();

    match cli.command {
        Command::Fetch(args) => fetch(args, &config).await,
        Command::Search(args) => {
            for sense_no in search(&args, &config).await? {
                println!("{sense_no}");
            }
            Ok(())
        }
        Command::Download(args) => download(args, &config).await,
    }
}

async fn fetch(args: FetchArgs, config: &Config) -> Result<()> {
    let sense_nos = load_ids(&args)?;
    run_batch(sense_nos, &args.sink, config).await
}

async fn search(args: &SearchArgs, config: &Config) -> Result<Vec<String>> {
    let query = SearchQuery {
        query: args.query.clone(),
        kind: args.kind.into(),
        match_mode: if args.partial {
            MatchMode::Partial
        } else {
            MatchMode::Exact
        },
        origin: args.origin.into(),
    };

    let fetcher = HttpFetcher::new(&config.network)?;
    let client = SearchClient::new(fetcher, &config.network);
    let sense_nos = client
        .resolve(&query)
        .await
        .with_context(|| format!("search for {:?} failed", args.query))?;

    tracing::info!(matches = sense_nos.len(), query = %args.query, "search resolved");
    Ok(sense_nos)
}

async fn download(args: DownloadArgs, config: &Config) -> Result<()> {
    let sense_nos = search(&args.search, config).await?;
    if sense_nos.is_empty() {
        tracing::info!("no matches, nothing to download");
        return Ok(());
    }
    run_batch(sense_nos, &args.sink, config).await
}

async fn run_batch(sense_nos: Vec<String>, sink: &SinkArgs, config: &Config) -> Result<()> {
    // Unknown field keys fail here, before any request goes out.
    let policy =
        FieldPolicy::from_overrides(sink.exclude.iter().map(|key| (key.as_str(), false)))?;

    let mut job = BatchJob::new(sense_nos);
    job.policy = policy;
    job.workers = sink.workers.unwrap_or(config.batch.workers);
    job.output_file = sink.output.clone();
    job.err_file = sink.errors.clone();

    let fetcher = HttpFetcher::new(&config.network)?;
    let client = SenseClient::new(fetcher, config.network.clone());
    let mut downloader = BatchDownloader::new(client);
    if !sink.quiet {
        downloader = downloader.with_observer(Arc::new(ProgressBarObserver::stderr()));
    }

    let report = downloader.run(job).await?;
    eprintln!(
        "{}/{} entries fetched ({:.1}%)",
        report.records.len(),
        report.total(),
        report.ratio() * 100.0
    );

    if sink.output.is_none() {
        println!("{}", serde_json::to_string(&report.records)?);
    }
    Ok(())
}

fn load_ids(args: &FetchArgs) -> Result<Vec<String>> {
    let mut sense_nos = args.ids.clone();
    if let Some(path) = &args.ids_file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        sense_nos.extend(
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    if sense_nos.is_empty() {
        bail!("no identifiers given; use --ids or --ids-file");
    }
    Ok(sense_nos)
}
