//! Decode failures for incoming requests.

use thiserror::Error;

/// Errors surfaced while turning wire bytes into a typed [`crate::Command`].
///
/// Every variant is reported to the client as a malformed command; none of
/// them is fatal to the extension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The request bytes were not a JSON object.
    #[error("malformed request: {message}")]
    Malformed {
        /// Description of the parse failure.
        message: String,
    },

    /// The request carried no `command` discriminator.
    #[error("missing 'command' discriminator")]
    MissingKind,

    /// The discriminator named a command nobody recognises.
    #[error("unknown command kind '{kind}'")]
    UnknownKind {
        /// The unrecognised discriminator value.
        kind: String,
    },

    /// A field required by the command kind was absent.
    #[error("{kind}: missing required field '{field}'")]
    MissingField {
        /// Command kind being decoded.
        kind: String,
        /// Name of the absent field.
        field: String,
    },

    /// A field was present but could not be interpreted.
    #[error("{kind}: invalid value '{value}' for field '{field}': {reason}")]
    InvalidField {
        /// Command kind being decoded.
        kind: String,
        /// Name of the offending field.
        field: String,
        /// Raw value as received.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The `finderType` field named an unsupported finder.
    #[error("unknown finder type '{finder_type}'")]
    UnknownFinder {
        /// The unrecognised finder type.
        finder_type: String,
    },
}

impl DecodeError {
    /// Creates a malformed request error from a JSON parse failure.
    #[must_use]
    pub fn from_json_error(source: &serde_json::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
        }
    }

    /// Creates a malformed request error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates an unknown kind error.
    #[must_use]
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind { kind: kind.into() }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(kind: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            kind: kind.into(),
            field: field.into(),
        }
    }

    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid_field(
        kind: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            kind: kind.into(),
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown finder error.
    #[must_use]
    pub fn unknown_finder(finder_type: impl Into<String>) -> Self {
        Self::UnknownFinder {
            finder_type: finder_type.into(),
        }
    }
}
