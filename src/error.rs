use thiserror::Error;

/// the uploaded bytes could not be turned into text
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input is not valid text in any of the encodings: {}", .0.join(", "))]
    Unsupported(Vec<String>),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// a single name could not be looked up. these never abort a run, the
/// assembler turns them into an empty record and a warning
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("no compounds in response")]
    NoCompounds,

    #[error("`{0}` cannot be used in a request path")]
    InvalidName(String),
}

/// the conditions that stop a whole run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("no drug names found in the input")]
    EmptyInput,

    #[error("none of the drug names returned any data")]
    NoResults,

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown encoding label `{0}`")]
    UnknownEncoding(String),

    #[error("invalid base_url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
