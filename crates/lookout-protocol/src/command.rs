//! Typed commands decoded from [`RawCommand`] maps.
//!
//! Every command carries a `command` discriminator naming its kind. Built-in
//! kinds are enumerated by [`CommandKind`]; any other kind can still travel
//! as an [`ExtensionCommand`] when the receiving dispatcher knows about it.

use std::fmt;
use std::time::Duration;

use crate::codec::{COMMAND_KEY, FieldReader, RawCommand, TIMEOUT_KEY, parse_raw};
use crate::error::DecodeError;
use crate::finder::Finder;

const MESSAGE_KEY: &str = "message";
const OFFSET_TYPE_KEY: &str = "offsetType";
const TREE_TYPE_KEY: &str = "treeType";
const SUBTREE_DEPTH_KEY: &str = "subtreeDepth";
const INCLUDE_PROPERTIES_KEY: &str = "includeProperties";
const ENABLED_KEY: &str = "enabled";

/// Built-in command kinds understood by the driver extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Wait until no transient (animation) callbacks are pending.
    WaitUntilNoTransientCallbacks,
    /// Wait until no transient callbacks are pending and no frame is scheduled.
    WaitUntilFrameSync,
    /// Forward a message to the application's data handler.
    RequestData,
    /// Read the semantics id of one element.
    GetSemanticsId,
    /// Read a point on the paint bounds of one element.
    GetOffset,
    /// Read the text content of one element.
    GetText,
    /// Dump a bounded-depth diagnostics tree for one element.
    GetDiagnosticsTree,
    /// Wait until a finder matches at least one element.
    WaitFor,
    /// Wait until a finder matches nothing.
    WaitForAbsent,
    /// Report that the extension is responsive.
    GetHealth,
    /// Toggle whether finder commands wait for quiescence first.
    SetFrameSync,
}

impl CommandKind {
    /// Every built-in kind, in registration order.
    pub const ALL: [Self; 11] = [
        Self::WaitUntilNoTransientCallbacks,
        Self::WaitUntilFrameSync,
        Self::RequestData,
        Self::GetSemanticsId,
        Self::GetOffset,
        Self::GetText,
        Self::GetDiagnosticsTree,
        Self::WaitFor,
        Self::WaitForAbsent,
        Self::GetHealth,
        Self::SetFrameSync,
    ];

    /// Looks up a built-in kind by its wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WaitUntilNoTransientCallbacks => "WaitUntilNoTransientCallbacks",
            Self::WaitUntilFrameSync => "WaitUntilFrameSync",
            Self::RequestData => "RequestData",
            Self::GetSemanticsId => "GetSemanticsId",
            Self::GetOffset => "GetOffset",
            Self::GetText => "GetText",
            Self::GetDiagnosticsTree => "GetDiagnosticsTree",
            Self::WaitFor => "WaitFor",
            Self::WaitForAbsent => "WaitForAbsent",
            Self::GetHealth => "GetHealth",
            Self::SetFrameSync => "SetFrameSync",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corner or centre of an element's paint bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetType {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Centre point.
    Center,
}

impl OffsetType {
    /// Looks up an offset type by its wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "topLeft" => Some(Self::TopLeft),
            "topRight" => Some(Self::TopRight),
            "bottomLeft" => Some(Self::BottomLeft),
            "bottomRight" => Some(Self::BottomRight),
            "center" => Some(Self::Center),
            _ => None,
        }
    }

    /// Returns the wire name of this offset type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "topLeft",
            Self::TopRight => "topRight",
            Self::BottomLeft => "bottomLeft",
            Self::BottomRight => "bottomRight",
            Self::Center => "center",
        }
    }
}

/// Which of the two trees a diagnostics dump walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeType {
    /// The logical widget tree.
    Widget,
    /// The physical render-object tree.
    RenderObject,
}

impl TreeType {
    /// Looks up a tree type by its wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "widget" => Some(Self::Widget),
            "renderObject" => Some(Self::RenderObject),
            _ => None,
        }
    }

    /// Returns the wire name of this tree type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Widget => "widget",
            Self::RenderObject => "renderObject",
        }
    }
}

/// Fields of the two quiescence waits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitRequest {
    /// Upper bound on the wait.
    pub timeout: Option<Duration>,
}

/// Fields of `RequestData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestData {
    /// Message forwarded to the data handler.
    pub message: String,
    /// Upper bound on the data handler's reply.
    pub timeout: Option<Duration>,
}

/// Fields shared by commands that locate one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderRequest {
    /// How to locate the element.
    pub finder: Finder,
    /// How long to keep polling for a match.
    pub timeout: Option<Duration>,
}

impl FinderRequest {
    /// Creates a request without an explicit timeout.
    #[must_use]
    pub const fn new(finder: Finder) -> Self {
        Self {
            finder,
            timeout: None,
        }
    }

    /// Sets the polling timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Fields of `GetOffset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOffset {
    /// How to locate the element.
    pub finder: Finder,
    /// Which point of the bounds to report.
    pub offset_type: OffsetType,
    /// How long to keep polling for a match.
    pub timeout: Option<Duration>,
}

/// Fields of `GetDiagnosticsTree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDiagnosticsTree {
    /// How to locate the element.
    pub finder: Finder,
    /// Which tree to walk.
    pub tree_type: TreeType,
    /// Number of child levels to include. `0` omits children entirely.
    pub subtree_depth: u32,
    /// Whether to attach property lists.
    pub include_properties: bool,
}

/// Fields of `SetFrameSync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetFrameSync {
    /// The new frame-sync setting.
    pub enabled: bool,
}

/// A command whose kind is not built in.
///
/// The fields are handed to the registered handler undecoded, minus the
/// discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCommand {
    /// The command kind.
    pub kind: String,
    /// Remaining request fields.
    pub fields: RawCommand,
}

impl ExtensionCommand {
    /// Returns a typed reader over the command's fields.
    #[must_use]
    pub fn reader(&self) -> FieldReader<'_> {
        FieldReader::new(&self.kind, &self.fields)
    }
}

/// A decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// See [`CommandKind::WaitUntilNoTransientCallbacks`].
    WaitUntilNoTransientCallbacks(WaitRequest),
    /// See [`CommandKind::WaitUntilFrameSync`].
    WaitUntilFrameSync(WaitRequest),
    /// See [`CommandKind::RequestData`].
    RequestData(RequestData),
    /// See [`CommandKind::GetSemanticsId`].
    GetSemanticsId(FinderRequest),
    /// See [`CommandKind::GetOffset`].
    GetOffset(GetOffset),
    /// See [`CommandKind::GetText`].
    GetText(FinderRequest),
    /// See [`CommandKind::GetDiagnosticsTree`].
    GetDiagnosticsTree(GetDiagnosticsTree),
    /// See [`CommandKind::WaitFor`].
    WaitFor(FinderRequest),
    /// See [`CommandKind::WaitForAbsent`].
    WaitForAbsent(FinderRequest),
    /// See [`CommandKind::GetHealth`].
    GetHealth,
    /// See [`CommandKind::SetFrameSync`].
    SetFrameSync(SetFrameSync),
    /// A command of a registered, non-built-in kind.
    Extension(ExtensionCommand),
}

impl Command {
    /// Parses and decodes request bytes.
    ///
    /// Only built-in kinds are accepted; extension kinds must be routed by a
    /// dispatcher that knows them.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the bytes are not a JSON object, the kind
    /// is missing or unknown, or a field is missing or invalid.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw = parse_raw(bytes)?;
        Self::decode(&raw)
    }

    /// Decodes a raw map holding a built-in command kind.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingKind`] without a discriminator,
    /// [`DecodeError::UnknownKind`] for a kind that is not built in, or a
    /// field error from the kind's decoder.
    pub fn decode(raw: &RawCommand) -> Result<Self, DecodeError> {
        let name = Self::kind_of(raw)?;
        let kind = CommandKind::parse(name).ok_or_else(|| DecodeError::unknown_kind(name))?;
        Self::decode_kind(kind, raw)
    }

    /// Returns the discriminator of a raw map.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingKind`] if the map has no usable
    /// discriminator.
    pub fn kind_of(raw: &RawCommand) -> Result<&str, DecodeError> {
        raw.get(COMMAND_KEY)
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .ok_or(DecodeError::MissingKind)
    }

    /// Decodes the fields of `raw` as a command of the given kind.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if a field is missing or invalid.
    pub fn decode_kind(kind: CommandKind, raw: &RawCommand) -> Result<Self, DecodeError> {
        let fields = FieldReader::new(kind.as_str(), raw);
        let command = match kind {
            CommandKind::WaitUntilNoTransientCallbacks => {
                Self::WaitUntilNoTransientCallbacks(decode_wait(&fields)?)
            }
            CommandKind::WaitUntilFrameSync => Self::WaitUntilFrameSync(decode_wait(&fields)?),
            CommandKind::RequestData => Self::RequestData(RequestData {
                message: fields.required(MESSAGE_KEY)?.to_owned(),
                timeout: fields.timeout()?,
            }),
            CommandKind::GetSemanticsId => Self::GetSemanticsId(decode_finder_request(&fields)?),
            CommandKind::GetOffset => Self::GetOffset(GetOffset {
                finder: Finder::decode(&fields)?,
                offset_type: decode_choice(&fields, OFFSET_TYPE_KEY, OffsetType::parse)?,
                timeout: fields.timeout()?,
            }),
            CommandKind::GetText => Self::GetText(decode_finder_request(&fields)?),
            CommandKind::GetDiagnosticsTree => Self::GetDiagnosticsTree(GetDiagnosticsTree {
                finder: Finder::decode(&fields)?,
                tree_type: decode_choice(&fields, TREE_TYPE_KEY, TreeType::parse)?,
                subtree_depth: fields.parse_optional(SUBTREE_DEPTH_KEY)?.unwrap_or(0),
                include_properties: fields.flag(INCLUDE_PROPERTIES_KEY, true)?,
            }),
            CommandKind::WaitFor => Self::WaitFor(decode_finder_request(&fields)?),
            CommandKind::WaitForAbsent => Self::WaitForAbsent(decode_finder_request(&fields)?),
            CommandKind::GetHealth => Self::GetHealth,
            CommandKind::SetFrameSync => Self::SetFrameSync(SetFrameSync {
                enabled: fields.parse_required(ENABLED_KEY)?,
            }),
        };
        Ok(command)
    }

    /// Wraps a raw map as an extension command of the given kind.
    #[must_use]
    pub fn extension(kind: impl Into<String>, mut fields: RawCommand) -> Self {
        fields.remove(COMMAND_KEY);
        Self::Extension(ExtensionCommand {
            kind: kind.into(),
            fields,
        })
    }

    /// Returns the wire name of this command's kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Extension(extension) => &extension.kind,
            other => other
                .command_kind()
                .map_or("Extension", CommandKind::as_str),
        }
    }

    /// Returns the built-in kind, or `None` for extension commands.
    #[must_use]
    pub const fn command_kind(&self) -> Option<CommandKind> {
        let kind = match self {
            Self::WaitUntilNoTransientCallbacks(_) => CommandKind::WaitUntilNoTransientCallbacks,
            Self::WaitUntilFrameSync(_) => CommandKind::WaitUntilFrameSync,
            Self::RequestData(_) => CommandKind::RequestData,
            Self::GetSemanticsId(_) => CommandKind::GetSemanticsId,
            Self::GetOffset(_) => CommandKind::GetOffset,
            Self::GetText(_) => CommandKind::GetText,
            Self::GetDiagnosticsTree(_) => CommandKind::GetDiagnosticsTree,
            Self::WaitFor(_) => CommandKind::WaitFor,
            Self::WaitForAbsent(_) => CommandKind::WaitForAbsent,
            Self::GetHealth => CommandKind::GetHealth,
            Self::SetFrameSync(_) => CommandKind::SetFrameSync,
            Self::Extension(_) => return None,
        };
        Some(kind)
    }

    /// Returns the finder carried by this command, if any.
    #[must_use]
    pub const fn finder(&self) -> Option<&Finder> {
        match self {
            Self::GetSemanticsId(request)
            | Self::GetText(request)
            | Self::WaitFor(request)
            | Self::WaitForAbsent(request) => Some(&request.finder),
            Self::GetOffset(request) => Some(&request.finder),
            Self::GetDiagnosticsTree(request) => Some(&request.finder),
            _ => None,
        }
    }

    /// Returns the explicit timeout carried by this command, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        match self {
            Self::WaitUntilNoTransientCallbacks(request) | Self::WaitUntilFrameSync(request) => {
                request.timeout
            }
            Self::RequestData(request) => request.timeout,
            Self::GetSemanticsId(request)
            | Self::GetText(request)
            | Self::WaitFor(request)
            | Self::WaitForAbsent(request) => request.timeout,
            Self::GetOffset(request) => request.timeout,
            _ => None,
        }
    }

    /// Encodes this command as the flat map [`Command::decode`] accepts.
    #[must_use]
    pub fn encode(&self) -> RawCommand {
        let mut raw = match self {
            Self::Extension(extension) => extension.fields.clone(),
            _ => RawCommand::new(),
        };
        raw.insert(COMMAND_KEY.to_owned(), self.kind().to_owned());

        if let Some(finder) = self.finder() {
            finder.encode_into(&mut raw);
        }
        if let Some(timeout) = self.timeout() {
            raw.insert(TIMEOUT_KEY.to_owned(), timeout.as_millis().to_string());
        }

        match self {
            Self::RequestData(request) => {
                raw.insert(MESSAGE_KEY.to_owned(), request.message.clone());
            }
            Self::GetOffset(request) => {
                raw.insert(
                    OFFSET_TYPE_KEY.to_owned(),
                    request.offset_type.as_str().to_owned(),
                );
            }
            Self::GetDiagnosticsTree(request) => {
                raw.insert(TREE_TYPE_KEY.to_owned(), request.tree_type.as_str().to_owned());
                raw.insert(
                    SUBTREE_DEPTH_KEY.to_owned(),
                    request.subtree_depth.to_string(),
                );
                raw.insert(
                    INCLUDE_PROPERTIES_KEY.to_owned(),
                    request.include_properties.to_string(),
                );
            }
            Self::SetFrameSync(request) => {
                raw.insert(ENABLED_KEY.to_owned(), request.enabled.to_string());
            }
            _ => {}
        }
        raw
    }
}

fn decode_wait(fields: &FieldReader<'_>) -> Result<WaitRequest, DecodeError> {
    Ok(WaitRequest {
        timeout: fields.timeout()?,
    })
}

fn decode_finder_request(fields: &FieldReader<'_>) -> Result<FinderRequest, DecodeError> {
    Ok(FinderRequest {
        finder: Finder::decode(fields)?,
        timeout: fields.timeout()?,
    })
}

fn decode_choice<T>(
    fields: &FieldReader<'_>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, DecodeError> {
    let value = fields.required(field)?;
    parse(value).ok_or_else(|| {
        DecodeError::invalid_field(fields.kind(), field, value, "unrecognised value")
    })
}
