//! # Codec Adapters
//!
//! A [`Codec`] turns a typed value into a byte stream and back. The
//! storage layer never looks at the bytes; it only hands a sink or a
//! source to the codec for the format it was asked to use.
//!
//! | Codec | Extension | Backend | Unknown keys |
//! |-------|-----------|---------|--------------|
//! | [`Json`] | `json` | `serde_json` | ignored |
//! | [`Toml`] | `toml` | `toml` | reported |
//! | [`Yaml`] | `yml` | `serde_yaml` | ignored |
//! | [`Xml`] | `xml` | `quick-xml` | ignored |
//!
//! Strict codecs attach a [`StrictnessReport`] to every decode. The
//! loader turns a non-empty report into an unknown-keys error.

mod json;
mod toml;
mod xml;
mod yaml;

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use self::json::Json;
pub use self::toml::Toml;
pub use self::xml::Xml;
pub use self::yaml::Yaml;

/// Failure raised by a codec backend
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDecode(#[from] ::toml::de::Error),

    #[error(transparent)]
    TomlEncode(#[from] ::toml::ser::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    XmlMarkup(#[from] quick_xml::Error),

    #[error(transparent)]
    XmlDecode(#[from] quick_xml::DeError),

    #[error(transparent)]
    XmlEncode(#[from] quick_xml::SeError),
}

/// A stateless encode/decode pair for one file format
pub trait Codec {
    /// Human-readable format name used in error messages
    const NAME: &'static str;

    /// File extension used to tag temp files (without the dot)
    const EXTENSION: &'static str;

    /// Writes the encoded form of `value` into `writer`
    fn encode<T>(value: &T, writer: &mut dyn Write) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized;

    /// Decodes exactly one document from `reader`
    fn decode<T>(reader: &mut dyn Read) -> Result<Decoded<T>, CodecError>
    where
        T: DeserializeOwned;
}

/// A decoded value plus whatever the codec noticed but could not map
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    pub report: StrictnessReport,
}

impl<T> Decoded<T> {
    /// A decode from a codec that does not track unknown keys
    pub fn lenient(value: T) -> Self {
        Self {
            value,
            report: StrictnessReport::default(),
        }
    }
}

/// Dotted key paths present in the input but absent from the target type
///
/// Keys are kept sorted and deduplicated so diagnostics are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrictnessReport {
    unknown: Vec<String>,
}

impl StrictnessReport {
    pub fn from_keys(keys: impl IntoIterator<Item = String>) -> Self {
        let mut unknown: Vec<String> = keys.into_iter().collect();
        unknown.sort();
        unknown.dedup();
        Self { unknown }
    }

    /// True when every key in the input mapped to a field
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.unknown
    }

    pub fn into_keys(self) -> Vec<String> {
        self.unknown
    }
}
