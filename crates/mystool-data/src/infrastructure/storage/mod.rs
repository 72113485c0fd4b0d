//! Storage infrastructure: plugin data file persistence.
//!
//! - **`paths`**       – data directory and file locations.
//! - **`codec`**       – the injected (de)serializer for user accounts.
//! - **`document`**    – `PluginData` ↔ JSON document translation.
//! - **`persistence`** – writing the document to disk.
//! - **`store`**       – `ConfigStore`: load procedure, first-run creation and
//!   the live plugin data handle.
//! - **`error`**       – `PluginDataError`, the storage error taxonomy.

pub mod codec;
pub mod document;
pub mod error;
pub mod paths;
pub mod persistence;
pub mod store;
