//! Look up every drug name in turn and collect the results into a CSV report.

use std::{path::Path, time::Duration};

use csv::{Terminator, WriterBuilder};
use log::{debug, info, warn};

use crate::{
    cache::LookupCache,
    config::{Config, EmptyRows, Placeholders},
    error::{LookupError, PipelineError},
    pubchem::{CompoundRecord, CompoundSource},
};

pub const HEADER: [&str; 4] =
    ["Drug Name", "Compound CID", "IUPAC Name", "SMILES"];

/// One line of the CSV, with placeholders already substituted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub cid: String,
    pub iupac_name: String,
    pub smiles: String,
}

impl ReportRow {
    pub fn new(
        name: &str,
        record: CompoundRecord,
        placeholders: &Placeholders,
    ) -> Self {
        Self {
            name: name.to_owned(),
            cid: record
                .cid
                .map(|cid| cid.to_string())
                .unwrap_or_else(|| placeholders.cid.clone()),
            iupac_name: record
                .iupac_name
                .unwrap_or_else(|| placeholders.iupac.clone()),
            smiles: record
                .smiles
                .unwrap_or_else(|| placeholders.smiles.clone()),
        }
    }

    fn fields(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.cid.as_str(),
            self.iupac_name.as_str(),
            self.smiles.as_str(),
        ]
    }
}

#[derive(Debug, Default)]
pub struct Report {
    pub rows: Vec<ReportRow>,

    /// one message per name that failed or came back empty, in input order
    pub warnings: Vec<String>,

    /// the number of names looked up, including the ones without a row
    pub processed: usize,
}

impl Report {
    /// serialize the header and rows as comma-separated UTF-8, quoting only
    /// the fields that need it
    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut w = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        w.write_record(HEADER)?;
        for row in &self.rows {
            w.write_record(row.fields())?;
        }
        w.into_inner().map_err(|e| e.into_error().into())
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        std::fs::write(path, self.to_csv()?)?;
        Ok(())
    }

    fn warn(&mut self, msg: String) {
        warn!("{msg}");
        self.warnings.push(msg);
    }
}

/// Sent to the caller after each name is processed.
#[derive(Clone, Copy, Debug)]
pub struct Progress<'a> {
    /// 1-based position of `name` in the input
    pub index: usize,
    pub total: usize,
    pub name: &'a str,
}

impl Progress<'_> {
    pub fn percent(&self) -> usize {
        100 * self.index / self.total.max(1)
    }
}

/// The subset of [Config] that shapes a report.
#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    pub placeholders: Placeholders,
    pub empty_rows: EmptyRows,

    /// pause before every remote lookup after the first
    pub delay: Duration,
}

impl From<&Config> for ReportOptions {
    fn from(config: &Config) -> Self {
        Self {
            placeholders: config.placeholders.clone(),
            empty_rows: config.empty_rows,
            delay: Duration::from_millis(config.delay_ms),
        }
    }
}

pub struct Assembler<S, C> {
    source: S,
    cache: C,
    options: ReportOptions,
}

impl<S: CompoundSource, C: LookupCache> Assembler<S, C> {
    pub fn new(source: S, cache: C, options: ReportOptions) -> Self {
        Self {
            source,
            cache,
            options,
        }
    }

    /// Look up each of `names` in order, one at a time. Failed lookups only
    /// produce a warning; the run as a whole fails when there are no names at
    /// all or when none of them returned any data.
    pub async fn assemble(
        &self,
        names: &[String],
        mut progress: impl FnMut(Progress<'_>),
    ) -> Result<Report, PipelineError> {
        if names.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let mut report = Report::default();
        let mut found = 0;
        let mut fetched = false;
        for (i, name) in names.iter().enumerate() {
            let looked_up = match self.cache.get(name) {
                Some(record) => {
                    debug!("cache hit for {name}");
                    Ok(record)
                }
                None => {
                    if fetched && !self.options.delay.is_zero() {
                        tokio::time::sleep(self.options.delay).await;
                    }
                    fetched = true;
                    self.fetch(name).await
                }
            };
            let record = match looked_up {
                Ok(record) => {
                    if record.is_empty() {
                        report.warn(format!("no data found for {name}"));
                    }
                    record
                }
                Err(e) => {
                    report.warn(format!(
                        "error retrieving data for {name}: {e}"
                    ));
                    CompoundRecord::default()
                }
            };

            report.processed += 1;
            progress(Progress {
                index: i + 1,
                total: names.len(),
                name,
            });

            if record.is_empty() {
                if self.options.empty_rows == EmptyRows::Omit {
                    continue;
                }
            } else {
                found += 1;
            }
            report.rows.push(ReportRow::new(
                name,
                record,
                &self.options.placeholders,
            ));
        }

        if found == 0 {
            return Err(PipelineError::NoResults);
        }
        info!(
            "{found} of {} names returned data, {} rows",
            names.len(),
            report.rows.len()
        );
        Ok(report)
    }

    /// successful lookups go into the cache, even when they found nothing
    async fn fetch(&self, name: &str) -> Result<CompoundRecord, LookupError> {
        let record = self.source.fetch(name).await?;
        self.cache.insert(name, &record);
        Ok(record)
    }
}
