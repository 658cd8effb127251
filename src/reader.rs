//! Turn an uploaded text file into the list of drug names to look up.

use std::{borrow::Cow, path::Path};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::debug;

use crate::error::{ConfigError, DecodeError};

/// Decodes raw bytes by trying each of its encodings in order. A byte order
/// mark, when present, replaces the list: the text after it must be valid in
/// the encoding it names.
pub struct NameReader {
    encodings: Vec<&'static Encoding>,
}

impl Default for NameReader {
    fn default() -> Self {
        Self {
            encodings: vec![UTF_8, WINDOWS_1252],
        }
    }
}

impl NameReader {
    /// build a reader from WHATWG encoding labels like `utf-8` or `latin1`
    pub fn new(labels: &[impl AsRef<str>]) -> Result<Self, ConfigError> {
        let encodings = labels
            .iter()
            .map(|l| {
                let l = l.as_ref();
                Encoding::for_label(l.as_bytes())
                    .ok_or_else(|| ConfigError::UnknownEncoding(l.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { encodings })
    }

    /// decode `bytes` with the first encoding that accepts them without any
    /// malformed sequences
    pub fn decode<'a>(
        &self,
        bytes: &'a [u8],
    ) -> Result<Cow<'a, str>, DecodeError> {
        // a BOM pins the encoding, the configured list is not consulted
        if let Some((enc, bom)) = Encoding::for_bom(bytes) {
            debug!("decoding input as {} from its BOM", enc.name());
            return enc
                .decode_without_bom_handling_and_without_replacement(
                    &bytes[bom..],
                )
                .ok_or_else(|| {
                    DecodeError::Unsupported(vec![enc.name().to_owned()])
                });
        }
        for enc in &self.encodings {
            if let Some(text) =
                enc.decode_without_bom_handling_and_without_replacement(bytes)
            {
                debug!("decoded input as {}", enc.name());
                return Ok(text);
            }
        }
        Err(DecodeError::Unsupported(
            self.encodings.iter().map(|e| e.name().to_owned()).collect(),
        ))
    }

    /// decode `bytes` and return its trimmed, non-empty lines in order.
    /// duplicates are kept
    pub fn read(&self, bytes: &[u8]) -> Result<Vec<String>, DecodeError> {
        Ok(split_names(&self.decode(bytes)?))
    }

    pub fn read_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<String>, DecodeError> {
        self.read(&std::fs::read(path)?)
    }
}

/// split on any line ending, including a lone `\r`
pub fn split_names(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
