//! Look up a compound by name in PubChem's PUG REST service.
//!
//! The JSON records returned by `compound/name/{name}/JSON` are deeply nested
//! and almost every level may be missing, so they are first deserialized into
//! the loose wire types below and then reduced to a [CompoundRecord] by
//! [parse_compound]. Nothing outside this module has to care about the shape
//! of the payload.

use std::{future::Future, time::Duration};

use log::{debug, trace};
use serde::Deserialize;
use url::Url;

use crate::{
    config::Config,
    error::{ConfigError, LookupError},
};

const SMILES_LABEL: &str = "SMILES";
const IUPAC_LABEL: &str = "IUPAC Name";

/// The three fields retrieved for one drug name. Each one is independent, so
/// a partially populated record is a valid result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundRecord {
    pub cid: Option<u64>,
    pub iupac_name: Option<String>,
    pub smiles: Option<String>,
}

impl CompoundRecord {
    /// true when none of the fields were found
    pub fn is_empty(&self) -> bool {
        self.cid.is_none() && self.iupac_name.is_none() && self.smiles.is_none()
    }
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(rename = "PC_Compounds")]
    compounds: Option<Vec<WireCompound>>,
}

#[derive(Deserialize)]
struct WireCompound {
    id: Option<WireCompoundId>,
    #[serde(default)]
    props: Vec<WireProp>,
}

#[derive(Deserialize)]
struct WireCompoundId {
    id: Option<WireCid>,
}

#[derive(Deserialize)]
struct WireCid {
    cid: Option<u64>,
}

#[derive(Deserialize)]
struct WireProp {
    urn: Option<WireUrn>,
    value: Option<WireValue>,
}

#[derive(Deserialize)]
struct WireUrn {
    label: Option<String>,
}

/// props also carry `ival`, `fval` and `binary` values, but only the string
/// form is used
#[derive(Deserialize)]
struct WireValue {
    sval: Option<String>,
}

impl WireProp {
    fn label(&self) -> Option<&str> {
        self.urn.as_ref()?.label.as_deref()
    }

    fn into_sval(self) -> Option<String> {
        self.value?.sval
    }
}

/// Reduce a PUG REST JSON body to a [CompoundRecord]. Only the first compound
/// is considered. When several props share a label, the last one with a
/// string value wins. A `cid` of zero is treated as missing.
pub fn parse_compound(body: &[u8]) -> Result<CompoundRecord, LookupError> {
    let resp: WireResponse = serde_json::from_slice(body)?;
    let compound = resp
        .compounds
        .and_then(|c| c.into_iter().next())
        .ok_or(LookupError::NoCompounds)?;

    let mut record = CompoundRecord {
        cid: compound
            .id
            .and_then(|id| id.id)
            .and_then(|id| id.cid)
            .filter(|&cid| cid > 0),
        ..Default::default()
    };

    for prop in compound.props {
        let slot = match prop.label() {
            Some(SMILES_LABEL) => &mut record.smiles,
            Some(IUPAC_LABEL) => &mut record.iupac_name,
            _ => continue,
        };
        if let Some(s) = prop.into_sval() {
            *slot = Some(s);
        }
    }

    Ok(record)
}

/// Anything that can turn a drug name into a [CompoundRecord]. The report
/// assembler only talks to this trait, so tests can swap the network out.
pub trait CompoundSource {
    fn fetch(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<CompoundRecord, LookupError>> + Send;
}

/// HTTP client for the PubChem PUG REST API.
#[derive(Clone)]
pub struct PubChem {
    http: reqwest::Client,
    base: Url,
}

impl PubChem {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base: Url::parse(&config.base_url)?,
        })
    }

    /// build `{base}/compound/name/{name}/JSON`, percent-encoding `name` as a
    /// single path segment
    pub fn url_for(&self, name: &str) -> Result<Url, LookupError> {
        // the url crate silently drops dot segments instead of encoding them
        if name == "." || name == ".." {
            return Err(LookupError::InvalidName(name.to_owned()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidName(name.to_owned()))?
            .pop_if_empty()
            .extend(["compound", "name", name, "JSON"]);
        Ok(url)
    }
}

impl CompoundSource for PubChem {
    async fn fetch(&self, name: &str) -> Result<CompoundRecord, LookupError> {
        let url = self.url_for(name)?;
        debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        trace!("received {} bytes for {name}", body.len());
        parse_compound(&body)
    }
}
