//! Infrastructure layer: everything that touches the file system.
//!
//! The `storage` sub-module owns the plugin data file: where it lives, how it
//! is encoded, and the [`ConfigStore`](storage::store::ConfigStore) that loads,
//! reconciles and writes it.

pub mod storage;
