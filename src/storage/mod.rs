//! # Storage Layer
//!
//! File-level load and save on top of a [`Codec`](crate::codec::Codec).
//!
//! ## Guarantees
//!
//! | Operation | Guarantee |
//! |-----------|-----------|
//! | Save | Target is the old or the new complete document, never a mix |
//! | Save | Failed saves remove their temp file before returning |
//! | Load | Exactly one decode per call; the handle is closed on every path |
//! | Load | Missing files are [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) for every format |
//!
//! ## Concurrency
//!
//! There is no locking. Readers only open the stable name and the rename
//! is the only synchronization point, so a concurrent load sees either
//! document. Two saves racing on one path both succeed and the later
//! rename wins.
//!
//! ## Key Types
//!
//! - [`ConfigStore`] - load/save for one format
//! - [`StagedWrite`] - a synced temp file waiting for its rename
//! - [`WriteOptions`] - directory mode and directory sync

mod atomic;
mod loader;
mod options;
mod path;
mod store;

pub use atomic::StagedWrite;
pub use options::WriteOptions;
pub use path::normalize;
pub use store::ConfigStore;
