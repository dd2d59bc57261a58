//! Application-supplied `RequestData` handling.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Answers free-form `RequestData` messages on behalf of the application.
///
/// Without a registered data handler the extension reports `RequestData` as
/// an unknown command.
#[async_trait(?Send)]
pub trait DataHandler {
    /// Replies to `message`.
    ///
    /// # Errors
    ///
    /// Returns [`DataHandlerError`] when the application cannot answer.
    async fn request_data(&self, message: String) -> Result<String, DataHandlerError>;
}

/// Failures reported back to the client for `RequestData`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataHandlerError {
    /// The application rejected the message.
    #[error("{0}")]
    Failed(String),

    /// No reply arrived before the command's timeout.
    #[error("data handler did not reply within {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl DataHandlerError {
    /// Creates a `Failed` error carrying the application's message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
