use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// what to do with a name that came back without any of the three fields
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyRows {
    /// leave the name out of the report entirely
    #[default]
    Omit,

    /// write a row made only of placeholders
    Placeholder,
}

/// The strings written into cells whose field could not be retrieved.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Placeholders {
    pub cid: String,
    pub iupac: String,
    pub smiles: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            cid: "CID not found".to_owned(),
            iupac: "IUPAC not found".to_owned(),
            smiles: "SMILES not found".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The root of the PUG REST API. Requests go to
    /// `{base_url}/compound/name/{name}/JSON`.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Pause between two remote lookups, in milliseconds. Cache hits are not
    /// delayed.
    pub delay_ms: u64,

    /// Sent as the `User-Agent` header.
    pub user_agent: String,

    /// WHATWG labels of the encodings to try on the input file, in order.
    pub encodings: Vec<String>,

    pub placeholders: Placeholders,

    pub empty_rows: EmptyRows,

    /// Default name of the CSV file produced by the CLI and offered for
    /// download by the server.
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://pubchem.ncbi.nlm.nih.gov/rest/pug".to_owned(),
            timeout_secs: 30,
            delay_ms: 200,
            user_agent: concat!("drugsmiles/", env!("CARGO_PKG_VERSION"))
                .to_owned(),
            encodings: vec!["UTF-8".to_owned(), "windows-1252".to_owned()],
            placeholders: Placeholders::default(),
            empty_rows: EmptyRows::default(),
            output: "Drug_Data_SMILES.csv".to_owned(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(toml::from_str(&read_to_string(path)?)?)
    }
}
