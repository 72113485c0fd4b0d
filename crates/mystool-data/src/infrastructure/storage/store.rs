//! `ConfigStore`: the live plugin data and the procedure that loads it.
//!
//! # Load procedure
//!
//! ```text
//!            file missing
//!   NoFile ───────────────► write defaults ──────────────► Ready (Created)
//!     │
//!     │ file present
//!     ▼
//!   FileParsed ──► merge(live, parsed) ──► override guard ──► Ready (Merged)
//! ```
//!
//! Every failure on the way is fatal: it is logged with the file path and
//! returned, and the live plugin data is left exactly as it was before the
//! call.  After a successful load the store provisions the log directory.
//!
//! # Sharing
//!
//! The live value is an `Arc<PluginData<U>>`.  Readers take a snapshot with
//! [`ConfigStore::current`]; a load or update publishes a new `Arc` and does
//! not disturb snapshots already handed out.  Mutating methods take
//! `&mut self`; a multi-threaded host wraps the store in its own mutex.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use super::{
    codec::UserCodec,
    document::{decode_document, encode_document},
    error::PluginDataError,
    paths::DataPaths,
    persistence::{write_plugin_data, write_text},
};
use crate::application::reconcile::{apply_override_guard, merge, GuardOutcome, ParsedPluginData};
use crate::domain::{plugin_data::PluginData, preference::LogDirStatus};

/// How a successful [`ConfigStore::load`] reached the ready state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No file existed; a default file was written.
    Created,
    /// An existing file was parsed and merged.
    Merged {
        guard: GuardOutcome,
        /// `version` found in the file, if any.  The live version is never
        /// replaced by it.
        file_version: Option<String>,
    },
}

/// Summary of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub path: PathBuf,
    pub outcome: LoadOutcome,
    /// Result of provisioning the log directory after the load.
    pub log_dir: LogDirStatus,
}

/// Owns the plugin data file and the live [`PluginData`].
pub struct ConfigStore<U, C> {
    path: PathBuf,
    data_dir: PathBuf,
    codec: C,
    current: Arc<PluginData<U>>,
}

impl<U, C> ConfigStore<U, C>
where
    U: Clone,
    C: UserCodec<U>,
{
    /// Creates a store for the data file in `paths`, holding default data
    /// until [`load`](Self::load) is called.
    ///
    /// Defaults that name a location (log file, image cache) point into the
    /// data directory of `paths`.
    pub fn new(paths: &DataPaths, codec: C) -> Self {
        let data_dir = paths.data_dir().to_path_buf();
        Self {
            path: paths.plugin_data_file(),
            current: Arc::new(PluginData::with_data_dir(&data_dir)),
            data_dir,
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a snapshot of the live plugin data.
    pub fn current(&self) -> Arc<PluginData<U>> {
        Arc::clone(&self.current)
    }

    /// Replaces the live plugin data without touching the file.
    pub fn replace(&mut self, data: PluginData<U>) {
        self.current = Arc::new(data);
    }

    /// Applies `f` to the live plugin data without touching the file.
    ///
    /// Snapshots taken earlier keep the old value.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut PluginData<U>),
    {
        f(Arc::make_mut(&mut self.current));
    }

    /// Loads the data file, creating it with defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// - [`PluginDataError::Decode`] / [`PluginDataError::SchemaValidation`]
    ///   when the file content is malformed.
    /// - [`PluginDataError::ResourceAccess`] when the file cannot be read, or
    ///   the default file cannot be written.
    /// - [`PluginDataError::Serialization`] when the default file cannot be
    ///   serialized.
    ///
    /// On error the live plugin data is unchanged.
    pub fn load(&mut self) -> Result<LoadReport, PluginDataError> {
        let outcome = if self.path.is_file() {
            let parsed = self.read_file()?;
            self.reconcile(parsed)
        } else {
            self.create_default()?;
            LoadOutcome::Created
        };

        let log_dir = self.current.preference.ensure_log_directory();

        Ok(LoadReport {
            path: self.path.clone(),
            outcome,
            log_dir,
        })
    }

    /// Writes the live plugin data to the data file.
    ///
    /// Same contract as [`write_plugin_data`]: `Ok(false)` on serialization
    /// failure, `Err` on I/O failure.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDataError::ResourceAccess`] when the file cannot be
    /// written.
    pub fn write(&self) -> Result<bool, PluginDataError> {
        write_plugin_data(&self.path, &*self.current, &self.codec)
    }

    // ── Load states ───────────────────────────────────────────────────────────

    /// NoFile → Ready.
    fn create_default(&mut self) -> Result<(), PluginDataError> {
        let data = PluginData::with_data_dir(&self.data_dir);
        let written = encode_document(&data, &self.codec)
            .and_then(|text| write_text(&self.path, &text));
        if let Err(e) = written {
            error!(
                "failed to create plugin data file {}, check that the bot may read and \
                 write it: {e}",
                self.path.display()
            );
            return Err(e);
        }

        self.current = Arc::new(data);
        info!(
            "plugin data file {} did not exist; created it with default values",
            self.path.display()
        );
        Ok(())
    }

    /// NoFile → FileParsed.
    fn read_file(&self) -> Result<ParsedPluginData<U>, PluginDataError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| {
            error!(
                "failed to read plugin data file {}, check that it exists and that the bot \
                 may read and write it: {source}",
                self.path.display()
            );
            PluginDataError::ResourceAccess {
                path: self.path.clone(),
                source,
            }
        })?;

        decode_document(&text, &self.path, &self.data_dir, &self.codec).map_err(|e| {
            error!(
                "failed to read plugin data file {}, check that its format is correct: {e}",
                self.path.display()
            );
            e
        })
    }

    /// FileParsed → Ready.
    fn reconcile(&mut self, parsed: ParsedPluginData<U>) -> LoadOutcome {
        let file_version = parsed.version.clone();
        if let Some(version) = file_version.as_deref() {
            if version != self.current.version {
                debug!(
                    "plugin data file was created by {version}; running {}",
                    self.current.version
                );
            }
        }

        let merged = merge(&self.current, parsed);
        let (data, guard) = apply_override_guard(merged);
        self.current = Arc::new(data);

        LoadOutcome::Merged {
            guard,
            file_version,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::codec::SerdeUserCodec;
    use serde_json::Value;

    fn store_in(dir: &Path) -> ConfigStore<Value, SerdeUserCodec> {
        ConfigStore::new(&DataPaths::new(dir), SerdeUserCodec)
    }

    #[test]
    fn test_new_store_holds_defaults_for_its_data_dir() {
        let store = store_in(Path::new("/srv/bot"));
        assert_eq!(*store.current(), PluginData::with_data_dir(Path::new("/srv/bot")));
        assert_eq!(store.path(), Path::new("/srv/bot/plugin_data.json"));
    }

    #[test]
    fn test_load_without_file_creates_default_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());

        // Act
        let report = store.load().unwrap();

        // Assert
        assert_eq!(report.outcome, LoadOutcome::Created);
        assert_eq!(report.log_dir, LogDirStatus::Ready);
        assert!(store.path().is_file());
        assert_eq!(*store.current(), PluginData::with_data_dir(dir.path()));
    }

    #[test]
    fn test_load_without_file_resets_live_value_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.update(|data| data.preference.max_user = 1);

        store.load().unwrap();

        assert_eq!(store.current().preference.max_user, 10);
    }

    #[test]
    fn test_update_does_not_disturb_earlier_snapshot() {
        // Arrange
        let mut store = store_in(Path::new("unused"));
        let before = store.current();

        // Act
        store.update(|data| data.preference.max_user = 99);

        // Assert
        assert_eq!(before.preference.max_user, 10);
        assert_eq!(store.current().preference.max_user, 99);
    }

    #[test]
    fn test_load_reports_file_version_without_adopting_it() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        std::fs::write(store.path(), r#"{"version": "v0.2.0"}"#).unwrap();

        // Act
        let report = store.load().unwrap();

        // Assert
        assert_eq!(
            report.outcome,
            LoadOutcome::Merged {
                guard: GuardOutcome::Untouched,
                file_version: Some("v0.2.0".to_string()),
            }
        );
        assert_eq!(store.current().version, crate::domain::plugin_data::VERSION);
    }

    #[test]
    fn test_load_provisions_log_directory() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("bot-logs").join("mystool.log");
        let mut store = store_in(dir.path());
        let text = serde_json::json!({
            "preference": { "log_path": log_path }
        })
        .to_string();
        std::fs::write(store.path(), text).unwrap();

        // Act
        let report = store.load().unwrap();

        // Assert
        assert_eq!(report.log_dir, LogDirStatus::Ready);
        assert!(dir.path().join("bot-logs").is_dir());
    }

    #[test]
    fn test_load_fails_when_path_is_a_directory() {
        // Arrange: a directory where the file should be is neither readable as
        // a file nor writable, so first-run creation fails.
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        std::fs::create_dir(store.path()).unwrap();

        // Act
        let result = store.load();

        // Assert
        assert!(matches!(
            result,
            Err(PluginDataError::ResourceAccess { .. })
        ));
        assert_eq!(*store.current(), PluginData::with_data_dir(dir.path()));
    }

    #[test]
    fn test_store_write_persists_updates() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.load().unwrap();
        store.update(|data| data.preference.plan_time = "06:45".to_string());

        // Act
        let written = store.write().unwrap();

        // Assert
        assert!(written);
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"06:45\""));
    }

    #[test]
    fn test_replace_publishes_new_value_without_writing() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let before = store.current();
        let mut data = PluginData::with_data_dir(dir.path());
        data.preference.max_user = 2;

        // Act
        store.replace(data);

        // Assert
        assert_eq!(store.current().preference.max_user, 2);
        assert_eq!(before.preference.max_user, 10);
        assert!(!store.path().exists());
    }
}
