use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::Context;
use clap::Parser;
use drugsmiles::{
    cache::{LookupCache, MemoryCache, NoCache},
    config::{Config, EmptyRows},
    report::Report,
    Pipeline,
};
use log::{info, trace};

#[derive(Parser)]
struct Cli {
    /// The text file of drug names to look up, one per line.
    input: PathBuf,

    /// Where to write the CSV report. Defaults to the `output` setting from
    /// the config file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// A TOML file overriding the default settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds to wait between two PubChem requests.
    #[arg(short, long)]
    delay_ms: Option<u64>,

    /// Look up repeated names again instead of reusing the first result.
    #[arg(long)]
    no_cache: bool,

    /// Write a row of placeholders for names without any data instead of
    /// leaving them out of the report.
    #[arg(short, long)]
    keep_empty: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(delay) = self.delay_ms {
            config.delay_ms = delay;
        }
        if self.keep_empty {
            config.empty_rows = EmptyRows::Placeholder;
        }
        Ok(config)
    }
}

async fn report(
    config: &Config,
    cache: impl LookupCache,
    input: &Path,
) -> anyhow::Result<Report> {
    let pipeline = Pipeline::from_config(config, cache)?;
    trace!("reading names from {}", input.display());
    let report = pipeline
        .run_file(input, |p| {
            info!(
                "{}% complete ({}/{}) {}",
                p.percent(),
                p.index,
                p.total,
                p.name
            )
        })
        .await
        .with_context(|| format!("processing {}", input.display()))?;
    Ok(report)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    let report = if cli.no_cache {
        report(&config, NoCache, &cli.input).await?
    } else {
        report(&config, MemoryCache::new(), &cli.input).await?
    };

    let output = cli.output.unwrap_or_else(|| PathBuf::from(&config.output));
    report
        .write(&output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "wrote {} rows for {} names to {}, {} warnings",
        report.rows.len(),
        report.processed,
        output.display(),
        report.warnings.len(),
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e:#}");
        exit(1);
    }
}
