//! Reconciling the live plugin data with a freshly parsed data file.
//!
//! Two steps, both pure:
//!
//! 1. [`merge`] copies every top-level section present in the file over the
//!    live value.  The copy is shallow: a parsed section replaces the live
//!    section wholesale.  Sections absent from the file keep their live value.
//!    `version` is never taken from the file.
//!
//! 2. [`apply_override_guard`] resets `device_config` and `salt_config` to the
//!    compiled defaults unless `preference.override_device_and_salt` is set.
//!
//! # Override guard
//!
//! ```text
//! override_device_and_salt?
//!   ├─ true  ──────────────────────────────► Bypassed  (file values kept)
//!   └─ false ─► device & salt == defaults?
//!                 ├─ yes ──────────────────► Untouched
//!                 └─ no  ─► reset both ────► Reset     (warning logged)
//! ```

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::{
    device::DeviceConfig, plugin_data::PluginData, preference::Preference,
    rendering::GoodListImageConfig, salt::SaltConfig,
};

/// Sections read from a data file.  `None` means the key was absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPluginData<U> {
    pub version: Option<String>,
    pub preference: Option<Preference>,
    pub salt_config: Option<SaltConfig>,
    pub device_config: Option<DeviceConfig>,
    pub good_list_image_config: Option<GoodListImageConfig>,
    pub users: Option<BTreeMap<i64, U>>,
}

impl<U> Default for ParsedPluginData<U> {
    fn default() -> Self {
        Self {
            version: None,
            preference: None,
            salt_config: None,
            device_config: None,
            good_list_image_config: None,
            users: None,
        }
    }
}

impl<U> From<PluginData<U>> for ParsedPluginData<U> {
    /// Treats every section of `data` as present.
    fn from(data: PluginData<U>) -> Self {
        Self {
            version: Some(data.version),
            preference: Some(data.preference),
            salt_config: Some(data.salt_config),
            device_config: Some(data.device_config),
            good_list_image_config: Some(data.good_list_image_config),
            users: Some(data.users),
        }
    }
}

/// What the override guard did during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Override disabled and device/salt already equal the defaults.
    Untouched,
    /// Override disabled and non-default values were replaced by defaults.
    Reset,
    /// Override enabled; the file's device/salt values are authoritative.
    Bypassed,
}

/// Returns `current` with every section present in `parsed` replaced.
///
/// `current.version` is always kept.
pub fn merge<U: Clone>(current: &PluginData<U>, parsed: ParsedPluginData<U>) -> PluginData<U> {
    PluginData {
        version: current.version.clone(),
        preference: parsed
            .preference
            .unwrap_or_else(|| current.preference.clone()),
        salt_config: parsed
            .salt_config
            .unwrap_or_else(|| current.salt_config.clone()),
        device_config: parsed
            .device_config
            .unwrap_or_else(|| current.device_config.clone()),
        good_list_image_config: parsed
            .good_list_image_config
            .unwrap_or_else(|| current.good_list_image_config.clone()),
        users: parsed.users.unwrap_or_else(|| current.users.clone()),
    }
}

/// Enforces the device/salt override policy on merged data.
pub fn apply_override_guard<U>(mut data: PluginData<U>) -> (PluginData<U>, GuardOutcome) {
    if data.preference.override_device_and_salt {
        info!(
            "override_device_and_salt is enabled; device_config and salt_config from the data \
             file replace the built-in defaults"
        );
        return (data, GuardOutcome::Bypassed);
    }

    if data.has_default_device_and_salt() {
        return (data, GuardOutcome::Untouched);
    }

    data.device_config = DeviceConfig::default();
    data.salt_config = SaltConfig::default();
    warn!(
        "device_config or salt_config holds non-default values; they were replaced by the \
         built-in defaults.  If you changed them on purpose, set \
         preference.override_device_and_salt to true.  Saving now will write the defaults \
         back to the data file."
    );
    (data, GuardOutcome::Reset)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
