//! Injected (de)serializer for user accounts.
//!
//! The user-account type is owned by the bot's user-management code.  The
//! storage layer never looks inside it: every account passes through a
//! [`UserCodec`], which converts it to and from a JSON value.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A user account could not be converted to or from JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CodecError(pub String);

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

/// Converts user accounts of type `U` to and from JSON values.
pub trait UserCodec<U> {
    /// # Errors
    ///
    /// Returns [`CodecError`] when `user` holds a value with no JSON form.
    fn encode(&self, user: &U) -> Result<Value, CodecError>;

    /// # Errors
    ///
    /// Returns [`CodecError`] when `value` does not have the account shape.
    fn decode(&self, value: Value) -> Result<U, CodecError>;
}

/// Codec for account types that implement serde's traits themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeUserCodec;

impl<U> UserCodec<U> for SerdeUserCodec
where
    U: Serialize + DeserializeOwned,
{
    fn encode(&self, user: &U) -> Result<Value, CodecError> {
        Ok(serde_json::to_value(user)?)
    }

    fn decode(&self, value: Value) -> Result<U, CodecError> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Account {
        cookie: String,
        bbs_uid: u64,
    }

    #[test]
    fn test_serde_codec_round_trips_account() {
        // Arrange
        let account = Account {
            cookie: "ltoken=abc".to_string(),
            bbs_uid: 123,
        };

        // Act
        let value = SerdeUserCodec.encode(&account).unwrap();
        let decoded: Account = SerdeUserCodec.decode(value.clone()).unwrap();

        // Assert
        assert_eq!(value["bbs_uid"], 123);
        assert_eq!(decoded, account);
    }

    #[test]
    fn test_serde_codec_reports_shape_mismatch() {
        let result: Result<Account, _> = SerdeUserCodec.decode(serde_json::json!({"cookie": 1}));
        assert!(result.is_err());
    }
}
