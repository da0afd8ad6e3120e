//! config-io - strict, crash-safe configuration file I/O
//!
//! Saves and loads typed configuration values as JSON, TOML, YAML or XML
//! with one contract for every format: writes go through a synced temp file
//! and an atomic rename, and loads report missing files, malformed content
//! and (for TOML) unknown keys as distinct error kinds.
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Config {
//!     name: String,
//!     port: u16,
//! }
//!
//! config_io::json::save("config.json", &Config { name: "example".into(), port: 8080 })?;
//! let config: Config = config_io::json::load("config.json")?;
//! # Ok::<(), config_io::StoreError>(())
//! ```
//!
//! No format detection is done: the module (or [`ConfigStore`] codec) you
//! call is the format you get.

pub mod codec;
pub mod error;
pub mod storage;

pub use codec::{Codec, CodecError, Decoded, StrictnessReport};
pub use error::{ErrorKind, IoOp, Result, StoreError};
pub use storage::{ConfigStore, StagedWrite, WriteOptions};

macro_rules! format_api {
    ($(#[$doc:meta])* $module:ident => $codec:ident) => {
        $(#[$doc])*
        pub mod $module {
            use std::path::Path;

            use serde::de::DeserializeOwned;
            use serde::Serialize;

            use crate::codec::$codec;
            use crate::{ConfigStore, Result};

            /// Loads the document at `path`
            pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
                ConfigStore::<$codec>::new().load(path)
            }

            /// Loads the document at `path`, or `T::default()` if there is none
            pub fn load_or_default<T: DeserializeOwned + Default>(
                path: impl AsRef<Path>,
            ) -> Result<T> {
                ConfigStore::<$codec>::new().load_or_default(path)
            }

            /// Atomically replaces the document at `path`
            pub fn save<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
                ConfigStore::<$codec>::new().save(path, value)
            }
        }
    };
}

format_api!(
    /// JSON documents; unknown keys are ignored
    json => Json
);
format_api!(
    /// TOML documents; unknown keys are an error
    toml => Toml
);
format_api!(
    /// YAML documents; unknown keys are ignored
    yaml => Yaml
);
format_api!(
    /// XML documents; unknown elements are ignored
    xml => Xml
);
