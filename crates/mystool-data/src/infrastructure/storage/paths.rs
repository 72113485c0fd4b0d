//! Locations of the plugin data files.
//!
//! ```text
//! data/nonebot-plugin-mystool/
//!   ├── plugin_data.json    ← loaded and written by ConfigStore
//!   └── deletedUsers.json   ← reserved for user management, never touched here
//! ```

use std::path::{Path, PathBuf};

use crate::domain::plugin_data::DEFAULT_DATA_DIR;

/// File name of the plugin data file inside the data directory.
pub const PLUGIN_DATA_FILE: &str = "plugin_data.json";

/// File name of the deleted-users snapshot.
pub const DELETED_USERS_FILE: &str = "deletedUsers.json";

/// Prefix for environment variable overrides.  Not read anywhere yet.
pub const ENV_PREFIX: Option<&str> = None;

/// Resolves the files kept in one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    data_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the plugin data file.
    pub fn plugin_data_file(&self) -> PathBuf {
        self.data_dir.join(PLUGIN_DATA_FILE)
    }

    /// Path reserved for the deleted-users snapshot.
    pub fn deleted_users_file(&self) -> PathBuf {
        self.data_dir.join(DELETED_USERS_FILE)
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
