use crate::error::{ImportError, Result};
use crate::mapper::RawItem;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A data master document: a declared item type plus an ordered list of raw
/// items. No other top-level fields are read.
#[derive(Debug, Clone, Deserialize)]
pub struct MasterDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub items: Vec<RawItem>,
}

/// Supported master file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl FromStr for Format {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Loads a master document from a file in the given format.
pub fn load(path: &Path, format: Format) -> Result<MasterDocument> {
    let text = fs::read_to_string(path)?;
    parse(&text, format)
}

/// Parses a master document from a string in the given format.
pub fn parse(text: &str, format: Format) -> Result<MasterDocument> {
    let doc = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(doc)
}
