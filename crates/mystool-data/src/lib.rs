//! # mystool-data
//!
//! Plugin data store for the mystool bot plugin: the schemas that make up the
//! persisted configuration, the rules for reconciling them with the file on
//! disk, and the JSON persistence layer.
//!
//! # Architecture overview
//!
//! ```text
//! [mystool-data]
//!   ├── domain/           Schemas with defaults + pure validation, PluginData aggregate
//!   ├── application/      Reconciliation: merge + device/salt override guard
//!   └── infrastructure/
//!         └── storage/    Paths, JSON document codec, persistence, ConfigStore
//! ```
//!
//! - **`domain`** has no I/O except the explicit log-directory provisioning
//!   step on [`Preference`].
//! - **`application`** is pure: it takes values and returns values.
//! - **`infrastructure`** owns every file-system access.
//!
//! The user-account type stored in [`PluginData::users`] belongs to another
//! part of the bot.  This crate only sees it as a type parameter `U` and
//! (de)serializes it through an injected [`UserCodec`].

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::reconcile::{apply_override_guard, merge, GuardOutcome, ParsedPluginData};
pub use domain::device::DeviceConfig;
pub use domain::plugin_data::{PluginData, VERSION};
pub use domain::preference::{LogDirStatus, LogRotation, Preference};
pub use domain::rendering::GoodListImageConfig;
pub use domain::salt::SaltConfig;
pub use domain::SchemaError;
pub use infrastructure::storage::codec::{CodecError, SerdeUserCodec, UserCodec};
pub use infrastructure::storage::error::PluginDataError;
pub use infrastructure::storage::paths::DataPaths;
pub use infrastructure::storage::persistence::write_plugin_data;
pub use infrastructure::storage::store::{ConfigStore, LoadOutcome, LoadReport};
