//! Error types for command dispatch failures.
//!
//! Every variant is reported to the client as an `isError: true` envelope
//! whose `response` is the variant's message. None of them affects later
//! commands.

use lookout_protocol::{DecodeError, Finder};
use lookout_tree::{ResolveError, TreeError};
use thiserror::Error;

use crate::data::DataHandlerError;
use crate::sync::WaitTimedOut;

/// Errors surfaced while decoding or executing a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The request could not be decoded.
    #[error("malformed command: {0}")]
    MalformedCommand(#[from] DecodeError),

    /// The kind is known but no handler is registered for it.
    #[error("unknown command: {kind}")]
    UnknownCommand { kind: String },

    /// A finder did not resolve as the command required.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A quiescence wait passed its deadline.
    #[error(transparent)]
    Timeout(#[from] WaitTimedOut),

    /// `WaitForAbsent` found the element still in the tree.
    #[error("element still present for {finder}")]
    StillPresent { finder: String },

    /// The element cannot answer the command.
    #[error("unsupported element for {finder}: {reason}")]
    UnsupportedElement { finder: String, reason: String },

    /// The element has not been laid out.
    #[error("no paint bounds for {finder}")]
    MissingGeometry { finder: String },

    /// Neither the element nor any ancestor carries semantics.
    #[error("no semantics node at or above {finder}")]
    MissingSemantics { finder: String },

    /// A render object dump was requested for an element without one.
    #[error("no render object for {finder}")]
    MissingRenderObject { finder: String },

    /// Building a diagnostics dump failed.
    #[error("diagnostics unavailable: {0}")]
    Diagnostics(#[from] TreeError),

    /// The application's data handler failed.
    #[error("request data failed: {0}")]
    DataHandler(#[from] DataHandlerError),

    /// A handler panicked.
    #[error("handler for {kind} failed: {message}")]
    HandlerFault { kind: String, message: String },

    /// Internal error (e.g. a handler received a command of another kind).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl DispatchError {
    /// Creates an `UnknownCommand` error.
    pub fn unknown_command(kind: impl Into<String>) -> Self {
        Self::UnknownCommand { kind: kind.into() }
    }

    /// Creates a `StillPresent` error for `finder`.
    pub fn still_present(finder: &Finder) -> Self {
        Self::StillPresent {
            finder: finder.to_string(),
        }
    }

    /// Creates an `UnsupportedElement` error for `finder`.
    pub fn unsupported_element(finder: &Finder, reason: impl Into<String>) -> Self {
        Self::UnsupportedElement {
            finder: finder.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `MissingGeometry` error for `finder`.
    pub fn missing_geometry(finder: &Finder) -> Self {
        Self::MissingGeometry {
            finder: finder.to_string(),
        }
    }

    /// Creates a `MissingSemantics` error for `finder`.
    pub fn missing_semantics(finder: &Finder) -> Self {
        Self::MissingSemantics {
            finder: finder.to_string(),
        }
    }

    /// Creates a `MissingRenderObject` error for `finder`.
    pub fn missing_render_object(finder: &Finder) -> Self {
        Self::MissingRenderObject {
            finder: finder.to_string(),
        }
    }

    /// Creates a `HandlerFault` error.
    pub fn handler_fault(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandlerFault {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Creates an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns whether a later attempt against a fresh snapshot may succeed.
    ///
    /// Only "not there yet" outcomes are retried. Ambiguity is terminal.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Resolve(ResolveError::NoMatchingElement { .. }) | Self::StillPresent { .. }
        )
    }
}
