//! Error type for plugin data file operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::SchemaError;

/// Everything that can go wrong while loading or writing the data file.
///
/// | Variant            | Load          | First-run creation | `write_plugin_data` |
/// |--------------------|---------------|--------------------|---------------------|
/// | `SchemaValidation` | fatal         | –                  | –                   |
/// | `Decode`           | fatal         | –                  | –                   |
/// | `ResourceAccess`   | fatal         | fatal              | returned to caller  |
/// | `Serialization`    | –             | fatal              | logged, `Ok(false)` |
#[derive(Debug, Error)]
pub enum PluginDataError {
    /// A section has the wrong shape or a field fails its constraint.
    #[error("invalid plugin data file {path}: {source}")]
    SchemaValidation {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    /// The file is not valid JSON.
    #[error("plugin data file {path} is not valid JSON: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A file system I/O error occurred.
    #[error("I/O error accessing plugin data at {path}: {source}")]
    ResourceAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plugin data could not be converted to JSON.
    #[error("failed to serialize plugin data: {reason}")]
    Serialization { reason: String },
}

impl PluginDataError {
    /// `true` for the two variants that mean "the file content is wrong".
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::SchemaValidation { .. } | Self::Decode { .. })
    }
}
