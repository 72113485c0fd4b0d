//! Writing the plugin data file.
//!
//! The file is overwritten in place (truncate, then write).  A crash in the
//! middle of a write can leave a truncated file behind.

use std::path::Path;

use tracing::error;

use super::{codec::UserCodec, document::encode_document, error::PluginDataError};
use crate::domain::plugin_data::PluginData;

/// Serializes `data` and writes it to `path`.
///
/// Returns `Ok(false)` when `data` cannot be serialized; the failure is logged
/// and the file is left untouched.
///
/// # Errors
///
/// Returns [`PluginDataError::ResourceAccess`] when the directory cannot be
/// created or the file cannot be written.  I/O failures are never swallowed.
pub fn write_plugin_data<U, C>(
    path: &Path,
    data: &PluginData<U>,
    codec: &C,
) -> Result<bool, PluginDataError>
where
    C: UserCodec<U>,
{
    let text = match encode_document(data, codec) {
        Ok(text) => text,
        Err(e) => {
            error!(
                "failed to serialize plugin data, a field probably holds a value of the \
                 wrong type: {e}"
            );
            return Ok(false);
        }
    };
    write_text(path, &text)?;
    Ok(true)
}

/// Writes `text` to `path`, creating the parent directory first.
pub(crate) fn write_text(path: &Path, text: &str) -> Result<(), PluginDataError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| PluginDataError::ResourceAccess {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, text).map_err(|source| PluginDataError::ResourceAccess {
        path: path.to_path_buf(),
        source,
    })
}
