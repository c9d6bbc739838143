mod cli;
mod logging;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sprite_batch::{
    BatchCoordinator, BatchError, BatchProfile, BatchReport, DirectorySink, ExtractConfig,
    read_identifier_list, walk_entity_dirs,
};
use sprite_fetch::{AssetFetcher, LocalFetcher, RemoteFetcher};

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = cli.apply_overrides(ExtractConfig::load_from(&cli.config)?);

    let result = match &cli.command {
        Command::Debug {
            sprite_path,
            output,
        } => {
            let sprite_path = match sprite_path {
                Some(path) => path.clone(),
                None => prompt("Enter sprite path (e.g., sprite/0006/0000/0001/): ")?,
            };
            let fetcher = remote_fetcher(&config)?;
            run_batch(&fetcher, output, BatchProfile::debug(), [sprite_path])?
        }
        Command::Local { input, output } => {
            let identifiers = walk_entity_dirs(input)?;
            let profile = BatchProfile::local().with_parse_error_policy(config.on_parse_error);
            run_batch(&LocalFetcher::default(), output, profile, identifiers)?
        }
        Command::Remote { list, output } => {
            let identifiers = read_identifier_list(list)?;
            info!("Loaded {} sprite path(s) from {}", identifiers.len(), list.display());
            let fetcher = remote_fetcher(&config)?;
            let profile = BatchProfile::remote().with_parse_error_policy(config.on_parse_error);
            run_batch(&fetcher, output, profile, identifiers)?
        }
    };

    let report = match &result {
        Ok(report) => report,
        Err(BatchError::Aborted { report, .. }) => report.as_ref(),
    };
    if let Some(path) = &cli.report {
        report
            .save_to(path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    result?;
    Ok(())
}

fn remote_fetcher(config: &ExtractConfig) -> Result<RemoteFetcher> {
    let fetcher = match &config.user_agent {
        Some(agent) => {
            RemoteFetcher::with_user_agent(&config.base_url, agent, config.request_timeout())
        }
        None => RemoteFetcher::new(&config.base_url, config.request_timeout()),
    }
    .context("Failed to create HTTP client")?;
    Ok(fetcher.with_policy(config.retry_policy()?))
}

/// Run the pipeline; setup failures are `Err`, an aborted run is `Ok(Err(..))`.
fn run_batch<I>(
    fetcher: &dyn AssetFetcher,
    output: &Path,
    profile: BatchProfile,
    identifiers: I,
) -> Result<Result<BatchReport, BatchError>>
where
    I: IntoIterator<Item = String>,
{
    let sink = DirectorySink::create(output)?;
    let coordinator = BatchCoordinator::new(fetcher, &sink, profile);
    Ok(coordinator.run(identifiers))
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim().to_string();
    if line.is_empty() {
        anyhow::bail!("No sprite path given");
    }
    Ok(line)
}
