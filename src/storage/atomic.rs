//! Crash-safe write-replace
//!
//! A save never touches the target name until the new document is fully
//! written and synced:
//!
//! 1. create the parent directory if needed
//! 2. create a temp file next to the target (same filesystem)
//! 3. encode into the temp file
//! 4. fsync the temp file
//! 5. close it
//! 6. rename it over the target
//! 7. fsync the directory (best effort)
//!
//! Any failure in steps 3-6 removes the temp file before returning. Steps
//! 1-5 are exposed on their own through [`stage`] so a caller can hold a
//! fully synced document and decide later whether to [`StagedWrite::commit`].
//!
//! Concurrent saves to one path are not serialized. Each gets its own temp
//! file and the last rename wins.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, PathPersistError, TempPath};
use tracing::{debug, warn};

use super::options::WriteOptions;
use super::path::{normalize, parent_dir};
use crate::codec::{Codec, CodecError};
use crate::error::{IoOp, Result, StoreError};

/// A fully written and synced temp file waiting to replace its target
///
/// Dropping it without calling [`commit`](Self::commit) deletes the temp
/// file and leaves the target as it was.
#[derive(Debug)]
pub struct StagedWrite {
    temp: TempPath,
    target: PathBuf,
    dir: PathBuf,
    bytes: u64,
    sync_dir: bool,
}

impl StagedWrite {
    /// Location of the staged temp file
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Normalized path the document will be renamed to
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Size of the encoded document
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Atomically renames the staged file over the target
    pub fn commit(self) -> Result<()> {
        let StagedWrite {
            temp,
            target,
            dir,
            bytes,
            sync_dir,
        } = self;

        if let Err(PathPersistError { error, path: temp }) = temp.persist(&target) {
            let temp_path = temp.to_path_buf();
            discard_path(temp);
            return Err(StoreError::Io {
                op: IoOp::Rename,
                path: temp_path,
                target: Some(target),
                source: error,
            });
        }

        if sync_dir {
            sync_directory(&dir);
        }

        debug!(path = %target.display(), bytes, "saved");
        Ok(())
    }
}

/// Runs steps 1-5 and returns the synced temp file
pub fn stage<C, F>(path: &Path, options: &WriteOptions, encode: F) -> Result<StagedWrite>
where
    C: Codec,
    F: FnOnce(&mut dyn Write) -> std::result::Result<(), CodecError>,
{
    let target = normalize(path);
    let dir = parent_dir(&target).to_path_buf();

    create_parent_dir(&dir, options.dir_mode)?;

    let mut temp = create_temp::<C>(&target, &dir)?;
    let temp_path = temp.path().to_path_buf();

    let written = {
        let mut writer = CountingWriter::new(BufWriter::new(temp.as_file_mut()));
        match encode(&mut writer) {
            Ok(()) => writer
                .flush()
                .map(|()| writer.count)
                .map_err(|e| StoreError::io(IoOp::Write, &temp_path, e)),
            Err(err) => Err(encode_error::<C>(&temp_path, err)),
        }
    };
    let bytes = match written {
        Ok(bytes) => bytes,
        Err(err) => {
            discard(temp);
            return Err(err);
        }
    };

    if let Err(err) = temp.as_file().sync_all() {
        discard(temp);
        return Err(StoreError::io(IoOp::Sync, &temp_path, err));
    }

    // Releases the handle; the path is still deleted on drop until persisted
    let temp = temp.into_temp_path();

    Ok(StagedWrite {
        temp,
        target,
        dir,
        bytes,
        sync_dir: options.sync_dir,
    })
}

/// Stages and commits in one call
pub fn write<C, F>(path: &Path, options: &WriteOptions, encode: F) -> Result<()>
where
    C: Codec,
    F: FnOnce(&mut dyn Write) -> std::result::Result<(), CodecError>,
{
    stage::<C, F>(path, options, encode)?.commit()
}

/// Tallies bytes accepted by the inner writer
struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn create_parent_dir(dir: &Path, mode: u32) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
        .create(dir)
        .map_err(|e| StoreError::io(IoOp::CreateDir, dir, e))
}

/// `.<file name>.<random>.<ext>.tmp` in the target's directory
fn create_temp<C: Codec>(target: &Path, dir: &Path) -> Result<NamedTempFile> {
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = format!(".{file_name}.");
    let suffix = format!(".{}.tmp", C::EXTENSION);

    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|e| StoreError::io(IoOp::CreateTemp, dir, e))
}

fn encode_error<C: Codec>(temp_path: &Path, err: CodecError) -> StoreError {
    match err {
        CodecError::Io(source) => StoreError::io(IoOp::Write, temp_path, source),
        source => StoreError::Encode {
            path: temp_path.to_path_buf(),
            format: C::NAME,
            source,
        },
    }
}

fn discard(temp: NamedTempFile) {
    let path = temp.path().to_path_buf();
    if let Err(err) = temp.close() {
        warn!(path = %path.display(), error = %err, "failed to remove temp file");
    }
}

fn discard_path(temp: TempPath) {
    let path = temp.to_path_buf();
    if let Err(err) = temp.close() {
        warn!(path = %path.display(), error = %err, "failed to remove temp file");
    }
}

/// Makes the rename itself durable where the platform allows it
fn sync_directory(dir: &Path) {
    if let Err(err) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!(dir = %dir.display(), error = %err, "directory sync skipped");
    }
}
