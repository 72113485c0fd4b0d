//! Domain layer: the schemas persisted in the plugin data file.
//!
//! Every schema is a plain value type with:
//!
//! - compiled-in defaults (`Default` + per-field serde defaults, so a file
//!   written by an older release still parses),
//! - structural equality (`PartialEq`), used by the device/salt override
//!   guard to detect divergence from the defaults,
//! - an optional pure `validate()` that reports the first offending field.
//!
//! Nothing in this layer reads or writes the plugin data file.

pub mod device;
pub mod plugin_data;
pub mod preference;
pub mod rendering;
pub mod salt;

use thiserror::Error;

/// A field failed its declared constraint.
///
/// `field` is the dotted path of the offending field relative to the document
/// root, e.g. `"preference.timeout"`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid value for `{field}`: {reason}")]
pub struct SchemaError {
    pub field: String,
    pub reason: String,
}

impl SchemaError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefixes `field` with the name of the enclosing section.
    pub fn within(self, section: &str) -> Self {
        Self {
            field: format!("{section}.{}", self.field),
            reason: self.reason,
        }
    }
}
