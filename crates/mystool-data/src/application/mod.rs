//! Application layer: rules that combine domain values.
//!
//! - **`reconcile`** – merges a parsed data file into the live plugin data and
//!   applies the device/salt override guard.
//!
//! Nothing here touches the file system; the storage layer feeds parsed values
//! in and writes the results out.

pub mod reconcile;
