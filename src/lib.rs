//! Retrieve PubChem identifiers, IUPAC names, and SMILES strings for a list
//! of drug names and collect them into a CSV report.
//!
//! The pipeline runs strictly one way: raw bytes are decoded into names by
//! [reader::NameReader], each name is looked up through a
//! [pubchem::CompoundSource], and [report::Assembler] turns the records into
//! a [report::Report] that serializes to CSV.

use std::path::Path;

use log::info;

use cache::LookupCache;
use config::Config;
use error::{ConfigError, PipelineError};
use pubchem::{CompoundSource, PubChem};
use reader::NameReader;
use report::{Assembler, Progress, Report, ReportOptions};

pub mod cache;
pub mod config;
pub mod error;
pub mod pubchem;
pub mod reader;
pub mod report;

#[cfg(test)]
mod testing;

pub struct Pipeline<S, C> {
    reader: NameReader,
    assembler: Assembler<S, C>,
}

impl<C: LookupCache> Pipeline<PubChem, C> {
    /// a pipeline that queries PubChem as described by `config`, memoizing
    /// through `cache`
    pub fn from_config(config: &Config, cache: C) -> Result<Self, ConfigError> {
        Ok(Self::new(
            NameReader::new(&config.encodings)?,
            Assembler::new(PubChem::new(config)?, cache, config.into()),
        ))
    }
}

impl<S: CompoundSource, C: LookupCache> Pipeline<S, C> {
    pub fn new(reader: NameReader, assembler: Assembler<S, C>) -> Self {
        Self { reader, assembler }
    }

    /// decode `bytes` into drug names and build the report for them
    pub async fn run(
        &self,
        bytes: &[u8],
        progress: impl FnMut(Progress<'_>),
    ) -> Result<Report, PipelineError> {
        let names = self.reader.read(bytes)?;
        info!("read {} drug names", names.len());
        self.assembler.assemble(&names, progress).await
    }

    /// like [Pipeline::run], but read the names from the file at `path`
    pub async fn run_file(
        &self,
        path: impl AsRef<Path>,
        progress: impl FnMut(Progress<'_>),
    ) -> Result<Report, PipelineError> {
        let names = self.reader.read_file(path)?;
        info!("read {} drug names", names.len());
        self.assembler.assemble(&names, progress).await
    }
}

impl<S: CompoundSource> Pipeline<S, cache::NoCache> {
    /// the default reader and report options without any memoization
    pub fn uncached(source: S) -> Self {
        Self::new(
            NameReader::default(),
            Assembler::new(source, cache::NoCache, ReportOptions::default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        cache::MemoryCache,
        config::Config,
        error::{ConfigError, DecodeError, PipelineError},
        pubchem::CompoundRecord,
        testing::{aspirin, ibuprofen_smiles, MockSource},
        Pipeline,
    };

    fn mock() -> MockSource {
        MockSource::default()
            .with("Aspirin", aspirin())
            .with("Ibuprofen", ibuprofen_smiles())
    }

    #[tokio::test]
    async fn full_partial_and_missing() {
        let p = Pipeline::uncached(mock());
        let mut updates = 0;
        let report = p
            .run(b"Aspirin\nIbuprofen\nNotARealDrug123\n", |_| updates += 1)
            .await
            .unwrap();
        assert_eq!(updates, 3);
        assert_eq!(report.processed, 3);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("NotARealDrug123"));

        let got = String::from_utf8(report.to_csv().unwrap()).unwrap();
        let want = "\
Drug Name,Compound CID,IUPAC Name,SMILES
Aspirin,2244,2-acetyloxybenzoic acid,CC(=O)OC1=CC=CC=C1C(=O)O
Ibuprofen,CID not found,IUPAC not found,CC(C)CC1=CC=C(C=C1)C(C)C(=O)O
";
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn single_field_gets_placeholders() {
        let source = MockSource::default().with(
            "Water",
            CompoundRecord {
                cid: Some(962),
                ..Default::default()
            },
        );
        let report = Pipeline::uncached(source)
            .run(b"Water", |_| {})
            .await
            .unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].cid, "962");
        assert_eq!(report.rows[0].iupac_name, "IUPAC not found");
        assert_eq!(report.rows[0].smiles, "SMILES not found");
    }

    #[tokio::test]
    async fn empty_file() {
        for input in [&b""[..], &b"\n\n  \r\n"[..]] {
            let got = Pipeline::uncached(mock()).run(input, |_| {}).await;
            assert!(matches!(got, Err(PipelineError::EmptyInput)));
        }
    }

    #[tokio::test]
    async fn every_lookup_fails() {
        let source =
            MockSource::default().failing("Aspirin").failing("Ibuprofen");
        let got = Pipeline::uncached(source.clone())
            .run(b"Aspirin\nIbuprofen", |_| {})
            .await;
        assert!(matches!(got, Err(PipelineError::NoResults)));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn undecodable_input() {
        let p = Pipeline::new(
            crate::reader::NameReader::new(&["utf-8"]).unwrap(),
            crate::report::Assembler::new(
                mock(),
                crate::cache::NoCache,
                Default::default(),
            ),
        );
        let got = p.run(b"Aspirin\n\xff\xfe\xfd", |_| {}).await;
        assert!(matches!(
            got,
            Err(PipelineError::Decode(DecodeError::Unsupported(_)))
        ));
    }

    #[tokio::test]
    async fn names_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        std::fs::write(&path, "Aspirin\r\nNotARealDrug123\r\n").unwrap();

        let p = Pipeline::uncached(mock());
        let report = p.run_file(&path, |_| {}).await.unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].cid, "2244");

        let got = p.run_file(dir.path().join("missing.txt"), |_| {}).await;
        assert!(matches!(
            got,
            Err(PipelineError::Decode(DecodeError::Io(_)))
        ));
    }

    #[test]
    fn from_config() {
        let mut config = Config::default();
        assert!(Pipeline::from_config(&config, MemoryCache::new()).is_ok());

        config.encodings.push("klingon".to_owned());
        assert!(matches!(
            Pipeline::from_config(&config, MemoryCache::new()),
            Err(ConfigError::UnknownEncoding(_))
        ));
    }

    #[tokio::test]
    async fn identical_output_on_rerun() {
        let p = Pipeline::uncached(mock());
        let input = b"Ibuprofen\nAspirin\nNotARealDrug123\nAspirin\n";
        let first = p.run(input, |_| {}).await.unwrap().to_csv().unwrap();
        let second = p.run(input, |_| {}).await.unwrap().to_csv().unwrap();
        assert_eq!(first, second);
    }
}
