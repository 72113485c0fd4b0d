//! User-tunable plugin preferences.
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the file.  This allows a data
//! file written by an older release (missing newer fields) to load cleanly.
//!
//! Validation is split in two:
//!
//! - [`Preference::validate`] is pure and runs whenever a file is parsed.
//! - [`Preference::ensure_log_directory`] creates the log directory.  It is an
//!   explicit provisioning step the store runs after a successful load and it
//!   never fails: problems are logged as warnings.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::{plugin_data::DEFAULT_DATA_DIR, SchemaError};

/// File name of the plugin log inside the data directory.
pub const LOG_FILE_NAME: &str = "mystool.log";

/// How long log files are kept before rotation.
///
/// Either a human-readable interval understood by the logging backend
/// (`"1 week"`, `"500 MB"`) or a plain number of seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum LogRotation {
    Seconds(u64),
    Text(String),
}

/// Result of [`Preference::ensure_log_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDirStatus {
    /// `log_path` is unset; nothing to provision.
    Disabled,
    /// The log file exists and is writable, or its directory is in place.
    Ready,
    /// The parent directory could not be created.
    CreateFailed,
    /// The log file exists but is read-only.
    NotWritable,
}

/// Plugin preferences (`preference` section of the data file).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preference {
    /// GitHub mirror prefixed to GitHub download links.
    #[serde(default = "default_github_proxy")]
    pub github_proxy: Option<String>,
    #[serde(default = "default_true")]
    pub enable_connection_test: bool,
    /// Seconds between connection tests.
    #[serde(default = "default_connection_test_interval")]
    pub connection_test_interval: Option<f64>,
    /// Network request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default = "default_max_retry_times")]
    pub max_retry_times: Option<u32>,
    /// Seconds between retries (exchange requests excluded).
    #[serde(default = "default_retry_interval")]
    pub retry_interval: f64,
    /// Time zone used to schedule exchanges.
    #[serde(default = "default_timezone")]
    pub timezone: Option<String>,
    #[serde(default = "default_exchange_thread_count")]
    pub exchange_thread_count: u32,
    /// Random delay range `[min, max]` in seconds added before each exchange
    /// request.
    #[serde(default = "default_exchange_latency")]
    pub exchange_latency: (f64, f64),
    #[serde(default = "default_true")]
    pub enable_log_output: bool,
    /// Prefix prepended to every log line.
    #[serde(default)]
    pub log_head: String,
    #[serde(default = "default_log_path")]
    pub log_path: Option<PathBuf>,
    #[serde(default = "default_log_rotation")]
    pub log_rotation: LogRotation,
    /// Module name of the plugin as loaded by the bot.
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,
    /// Text encoding for file reads and writes.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_max_user")]
    pub max_user: u32,
    #[serde(default = "default_true")]
    pub add_friend_accept: bool,
    /// Send usage instructions to a newly added friend.
    #[serde(default = "default_true")]
    pub add_friend_welcome: bool,
    /// Command prefix inside the plugin; empty disables it.
    #[serde(default)]
    pub command_start: String,
    /// Cool-down between task operations, in seconds.
    #[serde(default = "default_sleep_time")]
    pub sleep_time: f64,
    /// Daily check-in time, `HH:MM`.
    #[serde(default = "default_plan_time")]
    pub plan_time: String,
    /// Minutes between real-time note checks.
    #[serde(default = "default_resin_interval")]
    pub resin_interval: u32,
    /// Captcha solving endpoint.
    #[serde(default)]
    pub geetest_url: Option<String>,
    /// JSON body sent to `geetest_url`; `{gt}` and `{challenge}` are
    /// placeholders.
    #[serde(default = "default_geetest_json")]
    pub geetest_json: Option<Map<String, Value>>,
    /// Read `device_config` and `salt_config` from the file instead of the
    /// compiled defaults.
    #[serde(default)]
    pub override_device_and_salt: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_github_proxy() -> Option<String> {
    Some("https://ghproxy.com/".to_string())
}
fn default_connection_test_interval() -> Option<f64> {
    Some(30.0)
}
fn default_timeout() -> f64 {
    10.0
}
fn default_max_retry_times() -> Option<u32> {
    Some(3)
}
fn default_retry_interval() -> f64 {
    2.0
}
fn default_timezone() -> Option<String> {
    Some("Asia/Shanghai".to_string())
}
fn default_exchange_thread_count() -> u32 {
    2
}
fn default_exchange_latency() -> (f64, f64) {
    (0.0, 0.35)
}
fn default_log_path() -> Option<PathBuf> {
    Some(Path::new(DEFAULT_DATA_DIR).join(LOG_FILE_NAME))
}
fn default_log_rotation() -> LogRotation {
    LogRotation::Text("1 week".to_string())
}
fn default_plugin_name() -> String {
    "nonebot_plugin_mystool".to_string()
}
fn default_encoding() -> String {
    "utf-8".to_string()
}
fn default_max_user() -> u32 {
    10
}
fn default_sleep_time() -> f64 {
    5.0
}
fn default_plan_time() -> String {
    "00:30".to_string()
}
fn default_resin_interval() -> u32 {
    60
}
fn default_geetest_json() -> Option<Map<String, Value>> {
    let mut body = Map::new();
    body.insert("gt".to_string(), Value::String("{gt}".to_string()));
    body.insert("challenge".to_string(), Value::String("{challenge}".to_string()));
    Some(body)
}

impl Default for Preference {
    fn default() -> Self {
        Self {
            github_proxy: default_github_proxy(),
            enable_connection_test: default_true(),
            connection_test_interval: default_connection_test_interval(),
            timeout: default_timeout(),
            max_retry_times: default_max_retry_times(),
            retry_interval: default_retry_interval(),
            timezone: default_timezone(),
            exchange_thread_count: default_exchange_thread_count(),
            exchange_latency: default_exchange_latency(),
            enable_log_output: default_true(),
            log_head: String::new(),
            log_path: default_log_path(),
            log_rotation: default_log_rotation(),
            plugin_name: default_plugin_name(),
            encoding: default_encoding(),
            max_user: default_max_user(),
            add_friend_accept: default_true(),
            add_friend_welcome: default_true(),
            command_start: String::new(),
            sleep_time: default_sleep_time(),
            plan_time: default_plan_time(),
            resin_interval: default_resin_interval(),
            geetest_url: None,
            geetest_json: default_geetest_json(),
            override_device_and_salt: false,
        }
    }
}

impl Preference {
    /// Checks range and format constraints that the type system cannot
    /// express.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found; `field` is the bare field name.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err(SchemaError::new("timeout", "must be a positive number of seconds"));
        }
        non_negative("retry_interval", self.retry_interval)?;
        non_negative("sleep_time", self.sleep_time)?;
        if let Some(interval) = self.connection_test_interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(SchemaError::new(
                    "connection_test_interval",
                    "must be a positive number of seconds",
                ));
            }
        }
        if self.exchange_thread_count == 0 {
            return Err(SchemaError::new("exchange_thread_count", "must be at least 1"));
        }

        let (min, max) = self.exchange_latency;
        non_negative("exchange_latency", min)?;
        non_negative("exchange_latency", max)?;
        if min > max {
            return Err(SchemaError::new(
                "exchange_latency",
                format!("lower bound {min} exceeds upper bound {max}"),
            ));
        }

        if parse_plan_time(&self.plan_time).is_none() {
            return Err(SchemaError::new(
                "plan_time",
                format!("`{}` is not a 24-hour HH:MM time", self.plan_time),
            ));
        }
        if let LogRotation::Text(text) = &self.log_rotation {
            if text.trim().is_empty() {
                return Err(SchemaError::new("log_rotation", "must not be empty"));
            }
        }
        if self.encoding.trim().is_empty() {
            return Err(SchemaError::new("encoding", "must not be empty"));
        }
        if self.plugin_name.trim().is_empty() {
            return Err(SchemaError::new("plugin_name", "must not be empty"));
        }
        Ok(())
    }

    /// Returns `plan_time` as `(hour, minute)`.
    ///
    /// `None` only for a value that [`validate`](Self::validate) would reject.
    pub fn plan_time_hm(&self) -> Option<(u8, u8)> {
        parse_plan_time(&self.plan_time)
    }

    /// Makes sure the directory holding `log_path` exists.
    ///
    /// If `log_path` is not an existing file, its parent directory is created.
    /// If it is an existing file, it is checked for write access.  Either
    /// failure is logged at `warn` level and reported through the returned
    /// status; this method never fails.
    ///
    /// An existing log file counts as writable only when its read-only bit is
    /// clear and it can actually be opened for appending (ACLs, privileged
    /// users).  A file whose metadata cannot be read counts as not writable.
    pub fn ensure_log_directory(&self) -> LogDirStatus {
        let Some(path) = self.log_path.as_deref() else {
            return LogDirStatus::Disabled;
        };

        if path.is_file() {
            if is_writable_file(path) {
                return LogDirStatus::Ready;
            }
            warn!("no permission to write log file {}", path.display());
            return LogDirStatus::NotWritable;
        }

        let Some(parent) = path.parent() else {
            return LogDirStatus::Ready;
        };
        match std::fs::create_dir_all(parent) {
            Ok(()) => LogDirStatus::Ready,
            Err(e) => {
                warn!(
                    "no permission to create log directory {}: {e}",
                    parent.display()
                );
                LogDirStatus::CreateFailed
            }
        }
    }
}

/// Read-only bit clear and openable for appending.  Never creates the file.
fn is_writable_file(path: &Path) -> bool {
    let mode_allows = std::fs::metadata(path)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false);
    mode_allows && OpenOptions::new().append(true).open(path).is_ok()
}

fn non_negative(field: &str, value: f64) -> Result<(), SchemaError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SchemaError::new(field, "must be a non-negative number"))
    }
}

fn parse_plan_time(text: &str) -> Option<(u8, u8)> {
    let (hour, minute) = text.split_once(':')?;
    let is_two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !is_two_digits(hour) || !is_two_digits(minute) {
        return None;
    }
    let hour: u8 = hour.parse().ok()?;
    let minute: u8 = minute.parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preference_is_valid() {
        assert_eq!(Preference::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_override_flag_is_off() {
        assert!(!Preference::default().override_device_and_salt);
    }

    #[test]
    fn test_default_geetest_json_has_placeholders() {
        let body = Preference::default().geetest_json.unwrap();
        assert_eq!(body["gt"], "{gt}");
        assert_eq!(body["challenge"], "{challenge}");
    }

    #[test]
    fn test_empty_object_deserializes_to_defaults() {
        // Arrange / Act
        let pref: Preference = serde_json::from_str("{}").expect("deserialize empty");

        // Assert
        assert_eq!(pref, Preference::default());
    }

    #[test]
    fn test_partial_object_overrides_only_given_fields() {
        let pref: Preference =
            serde_json::from_str(r#"{"timeout": 30, "plan_time": "07:15"}"#).unwrap();
        assert_eq!(pref.timeout, 30.0);
        assert_eq!(pref.plan_time_hm(), Some((7, 15)));
        assert_eq!(pref.retry_interval, 2.0);
    }

    #[test]
    fn test_timeout_as_string_is_rejected_by_serde() {
        let result: Result<Preference, _> = serde_json::from_str(r#"{"timeout": "ten"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_exchange_latency_serializes_as_array() {
        let json = serde_json::to_value(Preference::default()).unwrap();
        assert_eq!(json["exchange_latency"], serde_json::json!([0.0, 0.35]));
    }

    #[test]
    fn test_log_rotation_accepts_seconds_or_text() {
        let seconds: Preference = serde_json::from_str(r#"{"log_rotation": 86400}"#).unwrap();
        let text: Preference = serde_json::from_str(r#"{"log_rotation": "3 days"}"#).unwrap();
        assert_eq!(seconds.log_rotation, LogRotation::Seconds(86400));
        assert_eq!(text.log_rotation, LogRotation::Text("3 days".to_string()));
    }

    #[test]
    fn test_validate_rejects_non_positive_timeout() {
        let pref = Preference {
            timeout: 0.0,
            ..Preference::default()
        };
        let err = pref.validate().unwrap_err();
        assert_eq!(err.field, "timeout");
    }

    #[test]
    fn test_validate_rejects_inverted_latency_range() {
        let pref = Preference {
            exchange_latency: (1.0, 0.5),
            ..Preference::default()
        };
        assert_eq!(pref.validate().unwrap_err().field, "exchange_latency");
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let pref = Preference {
            exchange_thread_count: 0,
            ..Preference::default()
        };
        assert_eq!(pref.validate().unwrap_err().field, "exchange_thread_count");
    }

    #[test]
    fn test_validate_rejects_malformed_plan_time() {
        for bad in ["24:00", "7:30", "07-30", "07:60", "", "ab:cd"] {
            let pref = Preference {
                plan_time: bad.to_string(),
                ..Preference::default()
            };
            assert_eq!(
                pref.validate().unwrap_err().field,
                "plan_time",
                "plan_time {bad:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_empty_rotation_text() {
        let pref = Preference {
            log_rotation: LogRotation::Text("  ".to_string()),
            ..Preference::default()
        };
        assert_eq!(pref.validate().unwrap_err().field, "log_rotation");
    }

    #[test]
    fn test_ensure_log_directory_disabled_without_path() {
        let pref = Preference {
            log_path: None,
            ..Preference::default()
        };
        assert_eq!(pref.ensure_log_directory(), LogDirStatus::Disabled);
    }

    #[test]
    fn test_ensure_log_directory_creates_missing_parent() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nested").join("logs").join("mystool.log");
        let pref = Preference {
            log_path: Some(log_path.clone()),
            ..Preference::default()
        };

        // Act
        let status = pref.ensure_log_directory();

        // Assert
        assert_eq!(status, LogDirStatus::Ready);
        assert!(log_path.parent().unwrap().is_dir());
        assert!(!log_path.exists(), "only the directory is created");
    }

    #[test]
    fn test_ensure_log_directory_warns_instead_of_failing() {
        // Arrange: the "parent directory" is a regular file, so it cannot be
        // created as a directory.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let pref = Preference {
            log_path: Some(blocker.join("mystool.log")),
            ..Preference::default()
        };

        // Act / Assert
        assert_eq!(pref.ensure_log_directory(), LogDirStatus::CreateFailed);
    }

    #[test]
    fn test_ensure_log_directory_existing_writable_file_is_ready() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("mystool.log");
        std::fs::write(&log_path, b"").unwrap();
        let pref = Preference {
            log_path: Some(log_path),
            ..Preference::default()
        };
        assert_eq!(pref.ensure_log_directory(), LogDirStatus::Ready);
    }

    #[test]
    fn test_ensure_log_directory_read_only_file_is_not_writable() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("mystool.log");
        std::fs::write(&log_path, b"previous lines\n").unwrap();
        let mut perms = std::fs::metadata(&log_path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&log_path, perms).unwrap();
        let pref = Preference {
            log_path: Some(log_path.clone()),
            ..Preference::default()
        };

        // Act
        let status = pref.ensure_log_directory();

        // Assert: reported, not raised, and the file is left as it was.
        assert_eq!(status, LogDirStatus::NotWritable);
        assert_eq!(std::fs::read(&log_path).unwrap(), b"previous lines\n");
    }
}
