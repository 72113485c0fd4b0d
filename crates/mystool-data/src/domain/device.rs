//! Device fingerprint values sent in request headers.
//!
//! Like [`SaltConfig`](super::salt::SaltConfig), these track the upstream
//! client release and are only read from the file when
//! `preference.override_device_and_salt` is set.

use serde::{Deserialize, Serialize};

/// Header values identifying the emulated client device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DeviceConfig {
    /// Mobile `User-Agent`.
    pub user_agent_mobile: String,
    /// Desktop `User-Agent`.
    pub user_agent_pc: String,
    /// `User-Agent` used when fetching an action ticket.
    pub user_agent_other: String,
    pub user_agent_android: String,
    /// Android `User-Agent` for coin tasks.
    pub user_agent_android_other: String,
    /// iOS widget `User-Agent` (real-time notes).
    pub user_agent_widget: String,

    pub x_rpc_device_model_mobile: String,
    pub x_rpc_device_model_pc: String,
    pub x_rpc_device_model_android: String,

    pub x_rpc_device_name_mobile: String,
    pub x_rpc_device_name_pc: String,
    pub x_rpc_device_name_android: String,

    pub x_rpc_sys_version: String,
    pub x_rpc_sys_version_android: String,

    pub x_rpc_channel: String,
    pub x_rpc_channel_android: String,

    pub x_rpc_app_version: String,
    pub x_rpc_platform: String,
    /// `sec-ch-ua` header.
    pub ua: String,
    /// `sec-ch-ua-platform` header.
    pub ua_platform: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            user_agent_mobile: "Mozilla/5.0 (iPhone; CPU iPhone OS 15_4 like Mac OS X) \
                AppleWebKit/605.1.15 (KHTML, like Gecko) miHoYoBBS/2.54.1"
                .to_string(),
            user_agent_pc: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Safari/605.1.15"
                .to_string(),
            user_agent_other: "Hyperion/275 CFNetwork/1402.0.8 Darwin/22.2.0".to_string(),
            user_agent_android: "Mozilla/5.0 (Linux; Android 11; MI 8 SE \
                Build/RQ3A.211001.001; wv) AppleWebKit/537.36 (KHTML, like Gecko) \
                Version/4.0 Chrome/104.0.5112.97 Mobile Safari/537.36 miHoYoBBS/2.54.1"
                .to_string(),
            user_agent_android_other: "okhttp/4.9.3".to_string(),
            user_agent_widget: "WidgetExtension/231 CFNetwork/1390 Darwin/22.0.0".to_string(),

            x_rpc_device_model_mobile: "iPhone10,2".to_string(),
            x_rpc_device_model_pc: "OS X 10.15.7".to_string(),
            x_rpc_device_model_android: "MI 8 SE".to_string(),

            x_rpc_device_name_mobile: "iPhone".to_string(),
            x_rpc_device_name_pc: "Microsoft Edge 103.0.1264.62".to_string(),
            x_rpc_device_name_android: "Xiaomi MI 8 SE".to_string(),

            x_rpc_sys_version: "15.4".to_string(),
            x_rpc_sys_version_android: "11".to_string(),

            x_rpc_channel: "appstore".to_string(),
            x_rpc_channel_android: "miyousheluodi".to_string(),

            x_rpc_app_version: "2.54.1".to_string(),
            x_rpc_platform: "ios".to_string(),
            ua: r#"".Not/A)Brand";v="99", "Microsoft Edge";v="103", "Chromium";v="103""#
                .to_string(),
            ua_platform: r#""macOS""#.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent_strings_are_single_line() {
        // The line continuations in `Default` must not leave stray whitespace.
        let device = DeviceConfig::default();
        assert!(device.user_agent_mobile.contains("OS X) AppleWebKit"));
        assert!(!device.user_agent_android.contains("  "));
    }

    #[test]
    fn test_device_config_json_keys() {
        let json = serde_json::to_value(DeviceConfig::default()).unwrap();
        assert_eq!(json["X_RPC_APP_VERSION"], "2.54.1");
        assert_eq!(json["UA_PLATFORM"], "\"macOS\"");
        assert_eq!(json["USER_AGENT_ANDROID_OTHER"], "okhttp/4.9.3");
    }

    #[test]
    fn test_device_config_equality_is_structural() {
        // Arrange
        let mut changed = DeviceConfig::default();
        changed.x_rpc_platform = "android".to_string();

        // Assert
        assert_eq!(DeviceConfig::default(), DeviceConfig::default());
        assert_ne!(changed, DeviceConfig::default());
    }
}
