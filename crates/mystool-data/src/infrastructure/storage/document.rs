//! Translation between [`PluginData`] and the JSON data file.
//!
//! # File layout
//!
//! ```json
//! {
//!     "version": "v1.0.2-dev",
//!     "preference": { ... },
//!     "salt_config": { ... },
//!     "device_config": { ... },
//!     "good_list_image_config": { ... },
//!     "users": { "10001": { ... } }
//! }
//! ```
//!
//! The file is written with a four-space indent.  User map keys are integers
//! stored as JSON strings; user values go through the injected [`UserCodec`].
//!
//! # Decoding
//!
//! Decoding happens in two passes so the two kinds of format failure stay
//! distinguishable:
//!
//! 1. Text → `serde_json::Value`.  Failure is a [`PluginDataError::Decode`].
//! 2. Each top-level section → its schema, then the schema's validator.
//!    Failure is a [`PluginDataError::SchemaValidation`] naming the section
//!    (or the dotted field path when a validator rejects a value).
//!
//! A missing top-level key is not an error: it yields `None` in
//! [`ParsedPluginData`], and the merge keeps the live section.
//!
//! Fields missing inside a present section take their defaults, except the
//! two location fields (`preference.log_path`, `good_list_image_config.
//! SAVE_PATH`), which resolve against the data directory passed to
//! [`decode_document`] rather than the compiled default directory.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{ser::PrettyFormatter, Map, Value};
use tracing::debug;

use super::{codec::UserCodec, error::PluginDataError};
use crate::application::reconcile::ParsedPluginData;
use crate::domain::{
    device::DeviceConfig,
    plugin_data::PluginData,
    preference::{Preference, LOG_FILE_NAME},
    rendering::GoodListImageConfig,
    salt::SaltConfig,
    SchemaError,
};

const INDENT: &[u8] = b"    ";

const KEY_VERSION: &str = "version";
const KEY_PREFERENCE: &str = "preference";
const KEY_SALT: &str = "salt_config";
const KEY_DEVICE: &str = "device_config";
const KEY_GOOD_LIST_IMAGE: &str = "good_list_image_config";
const KEY_USERS: &str = "users";

const FIELD_LOG_PATH: &str = "log_path";
const FIELD_SAVE_PATH: &str = "SAVE_PATH";

/// Borrowed view of `PluginData` in file order, users already encoded.
#[derive(Serialize)]
struct DocumentOut<'a> {
    version: &'a str,
    preference: &'a Preference,
    salt_config: &'a SaltConfig,
    device_config: &'a DeviceConfig,
    good_list_image_config: &'a GoodListImageConfig,
    users: BTreeMap<i64, Value>,
}

/// Serializes `data` to the indented JSON text of the data file.
///
/// # Errors
///
/// Returns [`PluginDataError::Serialization`] when a user account cannot be
/// encoded or JSON serialization fails.
pub fn encode_document<U, C>(data: &PluginData<U>, codec: &C) -> Result<String, PluginDataError>
where
    C: UserCodec<U>,
{
    let users = data
        .users
        .iter()
        .map(|(id, user)| {
            codec
                .encode(user)
                .map(|value| (*id, value))
                .map_err(|e| PluginDataError::Serialization {
                    reason: format!("user {id}: {e}"),
                })
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let doc = DocumentOut {
        version: &data.version,
        preference: &data.preference,
        salt_config: &data.salt_config,
        device_config: &data.device_config,
        good_list_image_config: &data.good_list_image_config,
        users,
    };

    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    doc.serialize(&mut ser)
        .map_err(|e| PluginDataError::Serialization {
            reason: e.to_string(),
        })?;
    String::from_utf8(buf).map_err(|e| PluginDataError::Serialization {
        reason: e.to_string(),
    })
}

/// Parses the text of the data file at `path`.
///
/// `path` is only used to label errors.  `data_dir` is where a missing
/// `log_path` or `SAVE_PATH` points (see the module docs).
///
/// # Errors
///
/// [`PluginDataError::Decode`] for malformed JSON and
/// [`PluginDataError::SchemaValidation`] for anything that is valid JSON but
/// not a valid data file.
pub fn decode_document<U, C>(
    text: &str,
    path: &Path,
    data_dir: &Path,
    codec: &C,
) -> Result<ParsedPluginData<U>, PluginDataError>
where
    C: UserCodec<U>,
{
    let root: Value = serde_json::from_str(text).map_err(|source| PluginDataError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    parse_root(root, data_dir, codec).map_err(|source| PluginDataError::SchemaValidation {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_root<U, C>(
    root: Value,
    data_dir: &Path,
    codec: &C,
) -> Result<ParsedPluginData<U>, SchemaError>
where
    C: UserCodec<U>,
{
    let Value::Object(mut root) = root else {
        return Err(SchemaError::new("<root>", "expected a JSON object"));
    };

    let version = take_section::<String>(&mut root, KEY_VERSION)?;

    let log_path_missing = section_lacks(&root, KEY_PREFERENCE, FIELD_LOG_PATH);
    let mut preference = take_section::<Preference>(&mut root, KEY_PREFERENCE)?;
    if let Some(preference) = &mut preference {
        if log_path_missing {
            preference.log_path = Some(data_dir.join(LOG_FILE_NAME));
        }
        preference
            .validate()
            .map_err(|e| e.within(KEY_PREFERENCE))?;
    }

    let salt_config = take_section::<SaltConfig>(&mut root, KEY_SALT)?;
    let device_config = take_section::<DeviceConfig>(&mut root, KEY_DEVICE)?;

    let save_path_missing = section_lacks(&root, KEY_GOOD_LIST_IMAGE, FIELD_SAVE_PATH);
    let mut good_list_image_config =
        take_section::<GoodListImageConfig>(&mut root, KEY_GOOD_LIST_IMAGE)?;
    if let Some(cfg) = &mut good_list_image_config {
        if save_path_missing {
            cfg.save_path = data_dir.to_path_buf();
        }
        cfg.validate().map_err(|e| e.within(KEY_GOOD_LIST_IMAGE))?;
    }

    let users = match root.remove(KEY_USERS) {
        Some(value) => Some(parse_users(value, codec)?),
        None => None,
    };

    for key in root.keys() {
        debug!("ignoring unknown top-level key `{key}` in plugin data file");
    }

    Ok(ParsedPluginData {
        version,
        preference,
        salt_config,
        device_config,
        good_list_image_config,
        users,
    })
}

/// `true` when section `key` is an object without `field`.
fn section_lacks(root: &Map<String, Value>, key: &str, field: &str) -> bool {
    matches!(root.get(key), Some(Value::Object(section)) if !section.contains_key(field))
}

/// Removes `key` from `root` and deserializes it; `Ok(None)` if absent.
fn take_section<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, SchemaError> {
    root.remove(key)
        .map(|value| {
            serde_json::from_value(value).map_err(|e| SchemaError::new(key, e.to_string()))
        })
        .transpose()
}

fn parse_users<U, C>(value: Value, codec: &C) -> Result<BTreeMap<i64, U>, SchemaError>
where
    C: UserCodec<U>,
{
    let Value::Object(entries) = value else {
        return Err(SchemaError::new(KEY_USERS, "expected an object keyed by user id"));
    };

    let mut users = BTreeMap::new();
    for (key, value) in entries {
        let field = format!("{KEY_USERS}.{key}");
        let id: i64 = key
            .parse()
            .map_err(|_| SchemaError::new(&field, "user id must be an integer"))?;
        let user = codec
            .decode(value)
            .map_err(|e| SchemaError::new(&field, e.to_string()))?;
        if users.insert(id, user).is_some() {
            return Err(SchemaError::new(field, format!("duplicate user id {id}")));
        }
    }
    Ok(users)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
