//! The `load`/`save` surface, generic over value type and codec

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::atomic::{self, StagedWrite};
use super::loader;
use super::options::WriteOptions;
use crate::codec::Codec;
use crate::error::Result;

/// Loads and saves whole documents in the format of codec `C`
///
/// ```no_run
/// use config_io::{codec::Toml, ConfigStore};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Settings {
///     name: String,
///     port: u16,
/// }
///
/// let store = ConfigStore::<Toml>::new();
/// let mut settings: Settings = store.load_or_default("app/settings.toml")?;
/// settings.port = 8080;
/// store.save("app/settings.toml", &settings)?;
/// # Ok::<(), config_io::StoreError>(())
/// ```
pub struct ConfigStore<C> {
    options: WriteOptions,
    codec: PhantomData<fn() -> C>,
}

impl<C: Codec> ConfigStore<C> {
    pub fn new() -> Self {
        Self::with_options(WriteOptions::default())
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self {
            options,
            codec: PhantomData,
        }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Reads the document at `path`
    pub fn load<T>(&self, path: impl AsRef<Path>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        loader::load::<C, T>(path.as_ref())
    }

    /// Like [`load`](Self::load), but a missing file yields `T::default()`
    ///
    /// Only a not-found error is replaced; malformed or unreadable files
    /// still fail.
    pub fn load_or_default<T>(&self, path: impl AsRef<Path>) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.load(path) {
            Err(err) if err.is_not_found() => Ok(T::default()),
            other => other,
        }
    }

    /// Replaces the document at `path` with `value`, crash-safely
    pub fn save<T>(&self, path: impl AsRef<Path>, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        atomic::write::<C, _>(path.as_ref(), &self.options, |w| C::encode(value, w))
    }

    /// Encodes and syncs `value` next to `path` without replacing it yet
    pub fn stage<T>(&self, path: impl AsRef<Path>, value: &T) -> Result<StagedWrite>
    where
        T: Serialize + ?Sized,
    {
        atomic::stage::<C, _>(path.as_ref(), &self.options, |w| C::encode(value, w))
    }
}

impl<C: Codec> Default for ConfigStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ConfigStore<C> {
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            codec: PhantomData,
        }
    }
}

impl<C: Codec> fmt::Debug for ConfigStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("format", &C::NAME)
            .field("options", &self.options)
            .finish()
    }
}
