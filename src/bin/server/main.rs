//! Web form around the drugsmiles pipeline: upload a text file of drug names,
//! see what PubChem returned, and download the CSV.

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use drugsmiles::{
    cache::MemoryCache,
    config::Config,
    error::ConfigError,
    pubchem::{CompoundSource, PubChem},
    reader::NameReader,
    report::Assembler,
    Pipeline,
};
use log::{debug, info};

mod handlers;
mod templates;

/// how many generated CSV files are kept for download. older ones are
/// dropped as new uploads come in
const KEEP_REPORTS: usize = 64;

#[derive(Parser)]
struct Cli {
    /// A TOML file overriding the default settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    address: String,
}

/// The most recent reports, oldest first. Ids keep counting up across
/// evictions, so a stale id never points at someone else's report.
#[derive(Default)]
struct Reports {
    next: usize,
    kept: VecDeque<(usize, Vec<u8>)>,
}

pub(crate) struct AppState<S> {
    pub(crate) config: Config,

    /// shared by every upload, so the lookup cache lives as long as the
    /// server
    pub(crate) pipeline: Pipeline<S, MemoryCache>,

    reports: Mutex<Reports>,
}

impl<S: CompoundSource> AppState<S> {
    pub(crate) fn new(config: Config, source: S) -> Result<Self, ConfigError> {
        let pipeline = Pipeline::new(
            NameReader::new(&config.encodings)?,
            Assembler::new(source, MemoryCache::new(), (&config).into()),
        );
        Ok(Self {
            config,
            pipeline,
            reports: Mutex::default(),
        })
    }
}

impl<S> AppState<S> {
    /// keep `csv` for download and return its id
    pub(crate) fn store(&self, csv: Vec<u8>) -> usize {
        let mut reports =
            self.reports.lock().unwrap_or_else(PoisonError::into_inner);
        let id = reports.next;
        reports.next += 1;
        if reports.kept.len() == KEEP_REPORTS {
            if let Some((old, _)) = reports.kept.pop_front() {
                debug!("evicting report {old}");
            }
        }
        reports.kept.push_back((id, csv));
        id
    }

    pub(crate) fn report(&self, id: usize) -> Option<Vec<u8>> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .kept
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, csv)| csv.clone())
    }
}

pub(crate) fn app<S>(state: Arc<AppState<S>>) -> Router
where
    S: CompoundSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/process", post(handlers::process::<S>))
        .route("/download/:id", get(handlers::download::<S>))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let source = PubChem::new(&config)?;
    let state = Arc::new(AppState::new(config, source)?);

    let listener = tokio::net::TcpListener::bind(&cli.address).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
