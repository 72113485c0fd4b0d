//! Salt values used to compute the `DS` request header.
//!
//! These follow the upstream client releases and should not be edited by
//! hand.  A file carrying non-default values is only honoured when
//! `preference.override_device_and_salt` is set.

use serde::{Deserialize, Serialize};

const SALT_IOS: &str = "ulInCDohgEs557j0VsPDYnQaaz6KJcv5";
const SALT_ANDROID: &str = "n0KjuIrKgLHh08LWSCYP0WXlVXaYvV64";
const SALT_DATA: &str = "t0qEgfub6cvueAPgR5m9aQWWVciEer7v";
const SALT_PARAMS: &str = "xV8v4Qu54lUKrEYFZkJhB8cuOh9Asafs";
const SALT_PROD: &str = "JwYDpKvLj6MrMqqYU6jTKF17KNO2PXoS";

/// Salts for the `DS` header, keyed by client flavour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SaltConfig {
    /// iOS `DS` salt.
    pub salt_ios: String,
    /// Android `DS` salt.
    pub salt_android: String,
    /// Android salt used when the request body is part of the digest.
    pub salt_data: String,
    /// Android salt used when the URL query is part of the digest.
    pub salt_params: String,
    pub salt_prod: String,
}

impl Default for SaltConfig {
    fn default() -> Self {
        Self {
            salt_ios: SALT_IOS.to_string(),
            salt_android: SALT_ANDROID.to_string(),
            salt_data: SALT_DATA.to_string(),
            salt_params: SALT_PARAMS.to_string(),
            salt_prod: SALT_PROD.to_string(),
        }
    }
}
