//! Finder specifications.
//!
//! A [`Finder`] is pure data describing how to locate elements. Base finders
//! match on one observable property of an element; relational finders combine
//! two nested finders with ancestor or descendant semantics. Finder fields are
//! merged into the command map, with nested finders encoded as JSON strings.

use std::fmt;

use regex::Regex;

use crate::codec::{FieldReader, RawCommand, parse_raw, raw_to_json};
use crate::error::DecodeError;

const FINDER_TYPE_KEY: &str = "finderType";
const KEY_VALUE_STRING: &str = "keyValueString";
const KEY_VALUE_TYPE: &str = "keyValueType";
const TEXT_KEY: &str = "text";
const TYPE_KEY: &str = "type";
const LABEL_KEY: &str = "label";
const IS_REGEXP_KEY: &str = "isRegExp";
const OF_KEY: &str = "of";
const MATCHING_KEY: &str = "matching";
const MATCH_ROOT_KEY: &str = "matchRoot";

/// Nesting limit for relational finders received over the wire.
const MAX_NESTING: usize = 32;

/// Key attached to an element for lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    /// A string-valued key.
    String(String),
    /// An integer-valued key.
    Int(i64),
}

impl ValueKey {
    /// Creates a string-valued key.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Creates an integer-valued key.
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::Int(value)
    }

    const fn type_tag(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Int(_) => "int",
        }
    }

    fn value_string(&self) -> String {
        match self {
            Self::String(value) => value.clone(),
            Self::Int(value) => value.to_string(),
        }
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "[<'{value}'>]"),
            Self::Int(value) => write!(f, "[<{value}>]"),
        }
    }
}

/// Semantics label to match, either literally or as a regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPattern {
    /// Label text or pattern source.
    pub label: String,
    /// Whether `label` is a regular expression.
    pub is_regex: bool,
}

/// The two halves of an ancestor or descendant query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Finder for the anchor element. It must resolve to exactly one element.
    pub of: Box<Finder>,
    /// Finder the related elements must satisfy.
    pub matching: Box<Finder>,
    /// Whether the anchor itself is eligible as a match.
    pub match_root: bool,
}

/// Description of how to locate elements in the live tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finder {
    /// Elements whose key equals the given key.
    ByValueKey(ValueKey),
    /// Elements whose text content equals the given string.
    ByText(String),
    /// Elements whose runtime type name equals the given string.
    ByType(String),
    /// Elements whose tooltip message equals the given string.
    ByTooltipMessage(String),
    /// Elements whose semantics label matches.
    BySemanticsLabel(LabelPattern),
    /// The nearest ancestor of `of` satisfying `matching`.
    Ancestor(Relation),
    /// Descendants of `of` satisfying `matching`.
    Descendant(Relation),
}

impl Finder {
    /// Finds elements by a string key.
    #[must_use]
    pub fn by_key(key: impl Into<String>) -> Self {
        Self::ByValueKey(ValueKey::string(key))
    }

    /// Finds elements by an integer key.
    #[must_use]
    pub const fn by_int_key(key: i64) -> Self {
        Self::ByValueKey(ValueKey::int(key))
    }

    /// Finds elements by text content.
    #[must_use]
    pub fn by_text(text: impl Into<String>) -> Self {
        Self::ByText(text.into())
    }

    /// Finds elements by runtime type name.
    #[must_use]
    pub fn by_type(type_name: impl Into<String>) -> Self {
        Self::ByType(type_name.into())
    }

    /// Finds elements by tooltip message.
    #[must_use]
    pub fn by_tooltip(message: impl Into<String>) -> Self {
        Self::ByTooltipMessage(message.into())
    }

    /// Finds elements whose semantics label equals `label`.
    #[must_use]
    pub fn by_semantics_label(label: impl Into<String>) -> Self {
        Self::BySemanticsLabel(LabelPattern {
            label: label.into(),
            is_regex: false,
        })
    }

    /// Finds elements whose semantics label matches the regular expression.
    #[must_use]
    pub fn by_semantics_pattern(pattern: impl Into<String>) -> Self {
        Self::BySemanticsLabel(LabelPattern {
            label: pattern.into(),
            is_regex: true,
        })
    }

    /// Finds the nearest ancestor of `of` that satisfies `matching`.
    #[must_use]
    pub fn ancestor(of: Self, matching: Self, match_root: bool) -> Self {
        Self::Ancestor(Relation::new(of, matching, match_root))
    }

    /// Finds descendants of `of` that satisfy `matching`.
    #[must_use]
    pub fn descendant(of: Self, matching: Self, match_root: bool) -> Self {
        Self::Descendant(Relation::new(of, matching, match_root))
    }

    /// Returns the wire name of this finder's type.
    #[must_use]
    pub const fn finder_type(&self) -> &'static str {
        match self {
            Self::ByValueKey(_) => "ByValueKey",
            Self::ByText(_) => "ByText",
            Self::ByType(_) => "ByType",
            Self::ByTooltipMessage(_) => "ByTooltipMessage",
            Self::BySemanticsLabel(_) => "BySemanticsLabel",
            Self::Ancestor(_) => "Ancestor",
            Self::Descendant(_) => "Descendant",
        }
    }

    /// Decodes a finder from the fields of a command.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if `finderType` is missing or unknown, a
    /// required finder field is absent, a nested finder cannot be parsed, or a
    /// semantics pattern is not a valid regular expression.
    pub fn decode(fields: &FieldReader<'_>) -> Result<Self, DecodeError> {
        Self::decode_nested(fields, 0)
    }

    fn decode_nested(fields: &FieldReader<'_>, depth: usize) -> Result<Self, DecodeError> {
        let finder_type = fields.required(FINDER_TYPE_KEY)?;
        match finder_type {
            "ByValueKey" => decode_value_key(fields).map(Self::ByValueKey),
            "ByText" => Ok(Self::ByText(fields.required(TEXT_KEY)?.to_owned())),
            "ByType" => Ok(Self::ByType(fields.required(TYPE_KEY)?.to_owned())),
            "ByTooltipMessage" => Ok(Self::ByTooltipMessage(
                fields.required(TEXT_KEY)?.to_owned(),
            )),
            "BySemanticsLabel" => decode_label(fields).map(Self::BySemanticsLabel),
            "Ancestor" => Relation::decode(fields, depth).map(Self::Ancestor),
            "Descendant" => Relation::decode(fields, depth).map(Self::Descendant),
            other => Err(DecodeError::unknown_finder(other)),
        }
    }

    /// Writes this finder's fields into `raw`.
    pub fn encode_into(&self, raw: &mut RawCommand) {
        raw.insert(FINDER_TYPE_KEY.to_owned(), self.finder_type().to_owned());
        match self {
            Self::ByValueKey(key) => {
                raw.insert(KEY_VALUE_STRING.to_owned(), key.value_string());
                raw.insert(KEY_VALUE_TYPE.to_owned(), key.type_tag().to_owned());
            }
            Self::ByText(text) | Self::ByTooltipMessage(text) => {
                raw.insert(TEXT_KEY.to_owned(), text.clone());
            }
            Self::ByType(type_name) => {
                raw.insert(TYPE_KEY.to_owned(), type_name.clone());
            }
            Self::BySemanticsLabel(pattern) => {
                raw.insert(LABEL_KEY.to_owned(), pattern.label.clone());
                raw.insert(IS_REGEXP_KEY.to_owned(), pattern.is_regex.to_string());
            }
            Self::Ancestor(relation) | Self::Descendant(relation) => relation.encode_into(raw),
        }
    }

    /// Encodes this finder as a standalone field map.
    #[must_use]
    pub fn encode(&self) -> RawCommand {
        let mut raw = RawCommand::new();
        self.encode_into(&mut raw);
        raw
    }
}

impl fmt::Display for Finder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByValueKey(key) => write!(f, "key {key}"),
            Self::ByText(text) => write!(f, "text \"{text}\""),
            Self::ByType(type_name) => write!(f, "type \"{type_name}\""),
            Self::ByTooltipMessage(text) => write!(f, "tooltip \"{text}\""),
            Self::BySemanticsLabel(LabelPattern {
                label,
                is_regex: true,
            }) => write!(f, "semantics label /{label}/"),
            Self::BySemanticsLabel(LabelPattern { label, .. }) => {
                write!(f, "semantics label \"{label}\"")
            }
            Self::Ancestor(relation) => write!(f, "ancestor {relation}"),
            Self::Descendant(relation) => write!(f, "descendant {relation}"),
        }
    }
}

impl Relation {
    /// Creates a relation between an anchor and a matching finder.
    #[must_use]
    pub fn new(of: Finder, matching: Finder, match_root: bool) -> Self {
        Self {
            of: Box::new(of),
            matching: Box::new(matching),
            match_root,
        }
    }

    fn decode(fields: &FieldReader<'_>, depth: usize) -> Result<Self, DecodeError> {
        if depth >= MAX_NESTING {
            return Err(DecodeError::invalid_field(
                fields.kind(),
                OF_KEY,
                "<nested finder>",
                format!("finders may nest at most {MAX_NESTING} levels"),
            ));
        }

        let of = decode_nested_field(fields, OF_KEY, depth)?;
        let matching = decode_nested_field(fields, MATCHING_KEY, depth)?;
        let match_root = fields.flag(MATCH_ROOT_KEY, false)?;
        Ok(Self::new(of, matching, match_root))
    }

    fn encode_into(&self, raw: &mut RawCommand) {
        raw.insert(OF_KEY.to_owned(), raw_to_json(&self.of.encode()));
        raw.insert(MATCHING_KEY.to_owned(), raw_to_json(&self.matching.encode()));
        raw.insert(MATCH_ROOT_KEY.to_owned(), self.match_root.to_string());
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "of ({}) matching ({})", self.of, self.matching)?;
        if self.match_root {
            f.write_str(" including root")?;
        }
        Ok(())
    }
}

fn decode_value_key(fields: &FieldReader<'_>) -> Result<ValueKey, DecodeError> {
    let value = fields.required(KEY_VALUE_STRING)?;
    match fields.required(KEY_VALUE_TYPE)? {
        "String" => Ok(ValueKey::string(value)),
        "int" => fields.parse_required(KEY_VALUE_STRING).map(ValueKey::Int),
        other => Err(DecodeError::invalid_field(
            fields.kind(),
            KEY_VALUE_TYPE,
            other,
            "expected 'String' or 'int'",
        )),
    }
}

fn decode_label(fields: &FieldReader<'_>) -> Result<LabelPattern, DecodeError> {
    let label = fields.required(LABEL_KEY)?;
    let is_regex = fields.flag(IS_REGEXP_KEY, false)?;
    if is_regex {
        Regex::new(label).map_err(|error| {
            DecodeError::invalid_field(fields.kind(), LABEL_KEY, label, error.to_string())
        })?;
    }
    Ok(LabelPattern {
        label: label.to_owned(),
        is_regex,
    })
}

fn decode_nested_field(
    fields: &FieldReader<'_>,
    field: &str,
    depth: usize,
) -> Result<Finder, DecodeError> {
    let encoded = fields.required(field)?;
    let nested = parse_raw(encoded.as_bytes()).map_err(|error| {
        DecodeError::invalid_field(fields.kind(), field, encoded, error.to_string())
    })?;
    Finder::decode_nested(&FieldReader::new(fields.kind(), &nested), depth + 1)
}
