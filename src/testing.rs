//! A scripted [CompoundSource] for exercising the pipeline without a network.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    error::LookupError,
    pubchem::{CompoundRecord, CompoundSource},
};

#[derive(Clone, Default)]
pub(crate) struct MockSource {
    /// `None` simulates a transport failure, names missing from the map are
    /// reported as having no compounds
    records: HashMap<String, Option<CompoundRecord>>,
    calls: Arc<AtomicUsize>,
}

impl MockSource {
    pub(crate) fn with(mut self, name: &str, record: CompoundRecord) -> Self {
        self.records.insert(name.to_owned(), Some(record));
        self
    }

    pub(crate) fn failing(mut self, name: &str) -> Self {
        self.records.insert(name.to_owned(), None);
        self
    }

    /// number of fetches so far, shared between clones
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl CompoundSource for MockSource {
    async fn fetch(&self, name: &str) -> Result<CompoundRecord, LookupError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.records.get(name) {
            Some(Some(record)) => Ok(record.clone()),
            Some(None) => Err(LookupError::Status(503)),
            None => Err(LookupError::NoCompounds),
        }
    }
}

pub(crate) fn aspirin() -> CompoundRecord {
    CompoundRecord {
        cid: Some(2244),
        iupac_name: Some("2-acetyloxybenzoic acid".to_owned()),
        smiles: Some("CC(=O)OC1=CC=CC=C1C(=O)O".to_owned()),
    }
}

pub(crate) fn ibuprofen_smiles() -> CompoundRecord {
    CompoundRecord {
        smiles: Some("CC(C)CC1=CC=C(C=C1)C(C)C(=O)O".to_owned()),
        ..Default::default()
    }
}
