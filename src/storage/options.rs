//! Write-side settings

use serde::{Deserialize, Serialize};

/// Settings for the save path
///
/// Deserializable so a host application can embed it in its own config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Mode for parent directories created on save (Unix only)
    pub dir_mode: u32,

    /// Sync the containing directory after the rename (best effort)
    pub sync_dir: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            dir_mode: 0o755,
            sync_dir: true,
        }
    }
}
