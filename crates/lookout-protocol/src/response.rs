//! Response payloads and the `{isError, response}` envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::DiagnosticsNode;
use crate::error::DecodeError;

/// Payload of a successful `GetSemanticsId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticsIdResult {
    /// Semantics node identifier.
    pub id: i64,
}

/// Payload of a successful `GetOffset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetResult {
    /// Horizontal coordinate in logical pixels.
    pub dx: f64,
    /// Vertical coordinate in logical pixels.
    pub dy: f64,
}

/// Payload of a successful `GetText`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResult {
    /// Text content of the element.
    pub text: String,
}

/// Payload of a successful `RequestData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDataResult {
    /// Reply from the application's data handler.
    pub message: String,
}

/// Health of the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The extension is responsive.
    Ok,
    /// The extension is unable to serve commands.
    Bad,
}

/// Payload of a successful `GetHealth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResult {
    /// Reported health.
    pub status: HealthStatus,
}

/// The typed result of a command that succeeded.
///
/// Serialises as the bare payload object; [`ResponsePayload::Empty`] is
/// `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    /// No payload.
    Empty,
    /// See [`SemanticsIdResult`].
    SemanticsId(SemanticsIdResult),
    /// See [`OffsetResult`].
    Offset(OffsetResult),
    /// See [`TextResult`].
    Text(TextResult),
    /// See [`RequestDataResult`].
    RequestData(RequestDataResult),
    /// A diagnostics dump.
    Diagnostics(DiagnosticsNode),
    /// See [`HealthResult`].
    Health(HealthResult),
    /// Arbitrary JSON produced by an extension command handler.
    Extension(Value),
}

/// Outcome of one command, as produced by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverResponse {
    /// The command succeeded with the given payload.
    Success(ResponsePayload),
    /// The command failed with the given message.
    Failure(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Wire<'a> {
    is_error: bool,
    response: WireBody<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireBody<'a> {
    Payload(&'a ResponsePayload),
    Message(&'a str),
}

impl DriverResponse {
    /// Creates a successful response.
    #[must_use]
    pub const fn success(payload: ResponsePayload) -> Self {
        Self::Success(payload)
    }

    /// Creates a failed response.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Returns `true` for failures.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    fn wire(&self) -> Wire<'_> {
        let response = match self {
            Self::Success(payload) => WireBody::Payload(payload),
            Self::Failure(message) => WireBody::Message(message.as_str()),
        };
        Wire {
            is_error: self.is_error(),
            response,
        }
    }

    /// Encodes the `{isError, response}` envelope as JSON bytes.
    ///
    /// A payload that cannot be serialised is reported as a failure
    /// envelope instead.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(&self.wire()).unwrap_or_else(|error| encoding_failure(&error))
    }
}

fn encoding_failure(error: &serde_json::Error) -> Vec<u8> {
    let message = Value::String(format!("failed to encode response: {error}"));
    format!(r#"{{"isError":true,"response":{message}}}"#).into_bytes()
}

/// The response envelope as seen by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Whether `response` holds an error message.
    pub is_error: bool,
    /// The success payload, or the error message when `is_error` is set.
    #[serde(default)]
    pub response: Value,
}

impl ResponseEnvelope {
    /// Parses response bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] if the bytes are not a valid
    /// envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(bytes.trim_ascii()).map_err(|error| DecodeError::from_json_error(&error))
    }

    /// Deserialises the success payload.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] if the envelope carries an error or
    /// the payload does not have the expected shape.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        if let Some(message) = self.error_message() {
            return Err(DecodeError::malformed(format!(
                "response is an error: {message}"
            )));
        }
        T::deserialize(&self.response).map_err(|error| DecodeError::from_json_error(&error))
    }

    /// Returns the error message if the envelope reports a failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.is_error
            .then(|| self.response.as_str().unwrap_or_default())
    }
}
