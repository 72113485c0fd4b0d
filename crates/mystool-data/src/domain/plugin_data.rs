//! The `PluginData` aggregate: everything persisted in the plugin data file.

use std::collections::BTreeMap;
use std::path::Path;

use super::{
    device::DeviceConfig,
    preference::{Preference, LOG_FILE_NAME},
    rendering::GoodListImageConfig,
    salt::SaltConfig,
    SchemaError,
};

/// Release that creates a fresh data file.
pub const VERSION: &str = "v1.0.2-dev";

/// Default plugin data directory, relative to the bot's working directory.
pub const DEFAULT_DATA_DIR: &str = "data/nonebot-plugin-mystool";

/// All persisted plugin state.
///
/// `U` is the bot's user-account type.  It is opaque to this crate: the
/// storage layer (de)serializes it through an injected
/// [`UserCodec`](crate::UserCodec).
#[derive(Debug, Clone, PartialEq)]
pub struct PluginData<U> {
    /// Release that created the data file.
    pub version: String,
    pub preference: Preference,
    /// Sensitive: see [`PluginData::has_default_device_and_salt`].
    pub salt_config: SaltConfig,
    /// Sensitive: see [`PluginData::has_default_device_and_salt`].
    pub device_config: DeviceConfig,
    pub good_list_image_config: GoodListImageConfig,
    /// User accounts keyed by the chat platform's numeric user id.
    pub users: BTreeMap<i64, U>,
}

// Not derived: a derive would demand `U: Default`.
impl<U> Default for PluginData<U> {
    fn default() -> Self {
        Self {
            version: VERSION.to_string(),
            preference: Preference::default(),
            salt_config: SaltConfig::default(),
            device_config: DeviceConfig::default(),
            good_list_image_config: GoodListImageConfig::default(),
            users: BTreeMap::new(),
        }
    }
}

impl<U> PluginData<U> {
    /// Default plugin data whose log file and image cache live in `data_dir`.
    ///
    /// `PluginData::default()` is `with_data_dir(DEFAULT_DATA_DIR)`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        let mut data = Self::default();
        data.preference.log_path = Some(data_dir.join(LOG_FILE_NAME));
        data.good_list_image_config.save_path = data_dir.to_path_buf();
        data
    }

    /// Runs the pure validators of every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`], with `field` prefixed by the section
    /// name (e.g. `"preference.timeout"`).
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.preference
            .validate()
            .map_err(|e| e.within("preference"))?;
        self.good_list_image_config
            .validate()
            .map_err(|e| e.within("good_list_image_config"))?;
        Ok(())
    }

    /// `true` when both sensitive sections equal the compiled defaults.
    pub fn has_default_device_and_salt(&self) -> bool {
        self.device_config == DeviceConfig::default() && self.salt_config == SaltConfig::default()
    }
}
