//! Flat string-keyed request maps.
//!
//! Requests are JSON objects whose values are strings. Nested finders are
//! themselves encoded as JSON strings inside the outer map, so every request
//! stays one level deep. Clients that send numbers, booleans or nested objects
//! are tolerated: scalars are stringified and objects are re-encoded.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;

use crate::error::DecodeError;

/// Field carrying the command discriminator.
pub const COMMAND_KEY: &str = "command";

/// Field carrying an optional timeout in milliseconds.
pub const TIMEOUT_KEY: &str = "timeout";

/// A request exactly as it travels: a flat map of string fields.
pub type RawCommand = BTreeMap<String, String>;

/// Parses request bytes into a [`RawCommand`].
///
/// Leading and trailing ASCII whitespace (including a JSONL newline) is
/// ignored.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] if the bytes are empty, are not valid
/// JSON, or do not hold a JSON object.
pub fn parse_raw(bytes: &[u8]) -> Result<RawCommand, DecodeError> {
    let trimmed = bytes.trim_ascii();
    if trimmed.is_empty() {
        return Err(DecodeError::malformed("empty request"));
    }

    let value: Value =
        serde_json::from_slice(trimmed).map_err(|error| DecodeError::from_json_error(&error))?;
    raw_from_value(value)
}

/// Flattens a decoded JSON value into a [`RawCommand`].
///
/// `null` fields are dropped, which makes them indistinguishable from absent
/// fields.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] if the value is not a JSON object.
pub fn raw_from_value(value: Value) -> Result<RawCommand, DecodeError> {
    let Value::Object(map) = value else {
        return Err(DecodeError::malformed("request is not a JSON object"));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, field)| flatten(field).map(|text| (key, text)))
        .collect())
}

/// Encodes a [`RawCommand`] as a JSON object string.
pub(crate) fn raw_to_json(raw: &RawCommand) -> String {
    let map = raw
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(map).to_string()
}

fn flatten(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Typed read access to the fields of one command.
///
/// The reader remembers the command kind so every error names the command it
/// came from.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    kind: &'a str,
    raw: &'a RawCommand,
}

impl<'a> FieldReader<'a> {
    /// Creates a reader over `raw` for the given command kind.
    #[must_use]
    pub const fn new(kind: &'a str, raw: &'a RawCommand) -> Self {
        Self { kind, raw }
    }

    /// Returns the command kind this reader decodes for.
    #[must_use]
    pub const fn kind(&self) -> &'a str {
        self.kind
    }

    /// Returns the raw value of a field, if present.
    #[must_use]
    pub fn optional(&self, field: &str) -> Option<&'a str> {
        self.raw.get(field).map(String::as_str)
    }

    /// Returns the raw value of a field that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingField`] if the field is absent.
    pub fn required(&self, field: &str) -> Result<&'a str, DecodeError> {
        self.optional(field)
            .ok_or_else(|| DecodeError::missing_field(self.kind, field))
    }

    /// Parses an optional field with [`FromStr`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidField`] if the field is present but does
    /// not parse.
    pub fn parse_optional<T>(&self, field: &str) -> Result<Option<T>, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(field)
            .map(|text| self.parse_text(field, text))
            .transpose()
    }

    /// Parses a required field with [`FromStr`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingField`] if the field is absent, or
    /// [`DecodeError::InvalidField`] if it does not parse.
    pub fn parse_required<T>(&self, field: &str) -> Result<T, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let text = self.required(field)?;
        self.parse_text(field, text)
    }

    /// Reads a `"true"`/`"false"` flag, falling back to `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidField`] for any other value.
    pub fn flag(&self, field: &str, default: bool) -> Result<bool, DecodeError> {
        Ok(self.parse_optional(field)?.unwrap_or(default))
    }

    /// Reads the optional millisecond `timeout` field.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidField`] if the value is not a
    /// non-negative integer.
    pub fn timeout(&self) -> Result<Option<Duration>, DecodeError> {
        Ok(self
            .parse_optional::<u64>(TIMEOUT_KEY)?
            .map(Duration::from_millis))
    }

    fn parse_text<T>(&self, field: &str, text: &str) -> Result<T, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        text.trim()
            .parse()
            .map_err(|error: T::Err| {
                DecodeError::invalid_field(self.kind, field, text, error.to_string())
            })
    }
}
