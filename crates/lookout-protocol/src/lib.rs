//! Wire protocol for the Lookout driver extension.
//!
//! A test driver talks to the extension by sending flat, string-keyed maps.
//! This crate owns that format in both directions:
//!
//! - [`RawCommand`] is the map exactly as it travels, and [`parse_raw`] turns
//!   request bytes into one.
//! - [`Command`] is the typed, decoded request. Each kind carries its own
//!   fields, including recursive [`Finder`] specifications for locating
//!   elements.
//! - [`DriverResponse`] is the typed outcome of a command. It encodes into
//!   the `{ "isError": bool, "response": ... }` envelope and never fails to
//!   encode. [`ResponseEnvelope`] is the client-side view of the same bytes.
//! - [`DiagnosticsNode`] is the serialisable snapshot returned by
//!   `GetDiagnosticsTree`.
//!
//! # Example
//!
//! ```
//! use lookout_protocol::{Command, Finder};
//!
//! let request = br#"{"command":"GetText","finderType":"ByValueKey","keyValueString":"title","keyValueType":"String"}"#;
//! let command = Command::from_bytes(request).expect("valid request");
//! assert_eq!(command.finder(), Some(&Finder::by_key("title")));
//! ```

mod codec;
mod command;
mod diagnostics;
mod error;
mod finder;
mod response;

pub use codec::{COMMAND_KEY, FieldReader, RawCommand, TIMEOUT_KEY, parse_raw, raw_from_value};
pub use command::{
    Command, CommandKind, ExtensionCommand, FinderRequest, GetDiagnosticsTree, GetOffset,
    OffsetType, RequestData, SetFrameSync, TreeType, WaitRequest,
};
pub use diagnostics::{DiagnosticsNode, DiagnosticsProperty};
pub use error::DecodeError;
pub use finder::{Finder, LabelPattern, Relation, ValueKey};
pub use response::{
    DriverResponse, HealthResult, HealthStatus, OffsetResult, RequestDataResult, ResponseEnvelope,
    ResponsePayload, SemanticsIdResult, TextResult,
};
