//! Single-document load with classified failures

use std::fs::File;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::path::normalize;
use crate::codec::{Codec, CodecError};
use crate::error::{IoOp, Result, StoreError};

/// Opens `path` and decodes one `T` from it with codec `C`
///
/// A strict codec that reports unmapped keys turns an otherwise successful
/// decode into [`StoreError::UnknownKeys`]. The file handle is released on
/// every return path.
pub fn load<C, T>(path: &Path) -> Result<T>
where
    C: Codec,
    T: DeserializeOwned,
{
    let path = normalize(path);

    let mut file = File::open(&path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.clone(),
                source,
            }
        } else {
            StoreError::io(IoOp::Open, &path, source)
        }
    })?;

    let decoded = C::decode::<T>(&mut file).map_err(|err| match err {
        CodecError::Io(source) => StoreError::io(IoOp::Read, &path, source),
        source => StoreError::Decode {
            path: path.clone(),
            format: C::NAME,
            source,
        },
    })?;

    if !decoded.report.is_clean() {
        return Err(StoreError::UnknownKeys {
            path,
            keys: decoded.report.into_keys(),
        });
    }

    debug!(path = %path.display(), format = C::NAME, "loaded");
    Ok(decoded.value)
}
