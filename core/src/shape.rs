//! Parameter shapes and their matching rules.
//!
//! A [`ParameterShape`] is the structural contract of one command parameter.
//! It is one of three closed variants ([`ShapeKind`]):
//!
//! - **Positional**: one bare value, matched by position.
//! - **Named**: `--long value` or `-s value`; exactly one value.
//! - **Switch**: `--long` or `-s`; no value.
//!
//! Each shape can match from a token cursor ([`ParameterShape::match_tokens`])
//! or from one entry of a preparsed name→values map
//! ([`ParameterShape::match_entry`]).

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::options::{KeyComparison, SearchOptions};
use crate::token::{Token, TokenKind, Tokenizer};

/// Declared value type of a parameter.
///
/// The core carries this tag through to bound results without interpreting
/// it; converting raw strings into typed values is the type reader's job.
///
/// # Examples
///
/// ```
/// use command_tree_core::ValueType;
///
/// assert_eq!(ValueType::default(), ValueType::Any);
/// let tag: ValueType = serde_json::from_str(r#"{"custom":"user_id"}"#).unwrap();
/// assert_eq!(tag, ValueType::Custom("user_id".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text.
    String,
    /// Whole number.
    Integer,
    /// Floating-point number.
    Float,
    /// Boolean; the implied type of switches.
    Bool,
    /// One of a fixed set of strings.
    Choice(Vec<String>),
    /// Host-defined type, identified by name.
    Custom(String),
    /// Unknown/any type (the default).
    #[default]
    Any,
}

/// Name(s) of a named or switch parameter.
///
/// At least one of the short and long forms is always present; the
/// "neither" case cannot be represented.
///
/// # Examples
///
/// ```
/// use command_tree_core::ShapeName;
///
/// let name = ShapeName::new(Some('v'), Some("verbose".into())).unwrap();
/// assert_eq!(name.short(), Some('v'));
/// assert_eq!(name.long(), Some("verbose"));
///
/// assert!(ShapeName::new(None, None).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeName {
    /// Short form only (`-v`).
    Short(char),
    /// Long form only (`--verbose`).
    Long(String),
    /// Both forms.
    Both(char, String),
}

impl ShapeName {
    /// Builds a name from optional parts, or `None` if both are missing.
    pub fn new(short: Option<char>, long: Option<String>) -> Option<Self> {
        match (short, long) {
            (Some(s), Some(l)) => Some(Self::Both(s, l)),
            (Some(s), None) => Some(Self::Short(s)),
            (None, Some(l)) => Some(Self::Long(l)),
            (None, None) => None,
        }
    }

    /// Returns the short form, if any.
    pub fn short(&self) -> Option<char> {
        match self {
            Self::Short(s) | Self::Both(s, _) => Some(*s),
            Self::Long(_) => None,
        }
    }

    /// Returns the long form, if any.
    pub fn long(&self) -> Option<&str> {
        match self {
            Self::Long(l) | Self::Both(_, l) => Some(l),
            Self::Short(_) => None,
        }
    }

    /// Checks a [`TokenKind::LongName`] or [`TokenKind::ShortName`] token.
    fn matches_token(&self, token: &Token<'_>, comparison: KeyComparison) -> bool {
        match token.kind {
            TokenKind::LongName => self
                .long()
                .is_some_and(|long| comparison.eq_str(token.text, long)),
            TokenKind::ShortName => self.matches_short(token.text, comparison),
            TokenKind::Value => false,
        }
    }

    /// Checks a map key, which may spell either form without dashes.
    fn matches_key(&self, key: &str, comparison: KeyComparison) -> bool {
        self.long().is_some_and(|long| comparison.eq_str(key, long))
            || self.matches_short(key, comparison)
    }

    fn matches_short(&self, text: &str, comparison: KeyComparison) -> bool {
        let mut chars = text.chars();
        match (chars.next(), chars.next(), self.short()) {
            (Some(c), None, Some(short)) => comparison.eq_char(c, short),
            _ => false,
        }
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short(s) => write!(f, "-{s}"),
            Self::Long(l) => write!(f, "--{l}"),
            Self::Both(s, l) => write!(f, "-{s}|--{l}"),
        }
    }
}

/// The closed set of parameter shape variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// A bare value matched by position.
    Positional,
    /// A named parameter carrying exactly one value.
    Named(ShapeName),
    /// A named flag carrying no value.
    Switch(ShapeName),
}

/// Successful token match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch<'a> {
    /// Number of tokens claimed (1 or 2).
    pub consumed: usize,
    /// The raw value, for positional and named shapes.
    pub value: Option<&'a str>,
}

/// Outcome of matching one preparsed map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMatch {
    /// Name and arity both match.
    Matched,
    /// The entry is not for this shape.
    Unmatched,
    /// The name matches but the arity is wrong; the overload is unusable.
    Fatal,
}

/// Structural contract of one command parameter.
///
/// # Examples
///
/// ```
/// use command_tree_core::{
///     MapMatch, ParameterShape, SearchOptions, ShapeName, Tokenizer, ValueType,
/// };
///
/// let reason = ParameterShape::named(
///     "reason",
///     ShapeName::new(Some('r'), Some("reason".into())).unwrap(),
///     ValueType::String,
/// );
/// let options = SearchOptions::default();
///
/// let m = reason
///     .match_tokens(&mut Tokenizer::new("--reason spam"), &options)
///     .unwrap();
/// assert_eq!(m.consumed, 2);
/// assert_eq!(m.value, Some("spam"));
///
/// assert_eq!(reason.match_entry("r", &["spam".into()], &options), MapMatch::Matched);
/// assert_eq!(reason.match_entry("r", &[], &options), MapMatch::Fatal);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterShape {
    kind: ShapeKind,
    parameter_name: String,
    optional: bool,
    value_type: ValueType,
    description: Option<String>,
    attributes: Vec<serde_json::Value>,
    conditions: Vec<serde_json::Value>,
}

impl ParameterShape {
    fn with_kind(kind: ShapeKind, parameter_name: &str, value_type: ValueType) -> Self {
        Self {
            kind,
            parameter_name: parameter_name.to_string(),
            optional: false,
            value_type,
            description: None,
            attributes: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Creates a required positional shape.
    pub fn positional(parameter_name: &str, value_type: ValueType) -> Self {
        Self::with_kind(ShapeKind::Positional, parameter_name, value_type)
    }

    /// Creates a required named shape.
    pub fn named(parameter_name: &str, name: ShapeName, value_type: ValueType) -> Self {
        Self::with_kind(ShapeKind::Named(name), parameter_name, value_type)
    }

    /// Creates a required switch shape typed as [`ValueType::Bool`].
    pub fn switch(parameter_name: &str, name: ShapeName) -> Self {
        Self::with_kind(ShapeKind::Switch(name), parameter_name, ValueType::Bool)
    }

    /// Marks the shape as having a default value.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Overrides the value type tag.
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Appends an opaque attribute payload.
    pub fn with_attribute(mut self, attribute: serde_json::Value) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Appends an opaque condition payload.
    pub fn with_condition(mut self, condition: serde_json::Value) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Variant and names.
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Name of the underlying parameter.
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    /// Whether the parameter has a default value.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Declared value type tag.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn attributes(&self) -> &[serde_json::Value] {
        &self.attributes
    }

    pub fn conditions(&self) -> &[serde_json::Value] {
        &self.conditions
    }

    /// Returns the switch/named names, or `None` for positional shapes.
    pub fn name(&self) -> Option<&ShapeName> {
        match &self.kind {
            ShapeKind::Named(name) | ShapeKind::Switch(name) => Some(name),
            ShapeKind::Positional => None,
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.kind, ShapeKind::Positional)
    }

    /// Name shown to users: long form, else short form, else parameter name.
    pub fn hint_name(&self) -> Cow<'_, str> {
        match self.name() {
            Some(name) => match (name.long(), name.short()) {
                (Some(long), _) => Cow::Borrowed(long),
                (None, Some(short)) => Cow::Owned(short.to_string()),
                (None, None) => Cow::Borrowed(&self.parameter_name),
            },
            None => Cow::Borrowed(&self.parameter_name),
        }
    }

    /// Attempts to claim tokens starting at the cursor's current position.
    ///
    /// The cursor is advanced past whatever was inspected, matched or not;
    /// pass a clone when the position must be kept on failure.
    pub fn match_tokens<'a>(
        &self,
        tokens: &mut Tokenizer<'a>,
        options: &SearchOptions,
    ) -> Option<TokenMatch<'a>> {
        let first = tokens.next()?;
        match &self.kind {
            ShapeKind::Positional => match first.kind {
                TokenKind::Value => Some(TokenMatch {
                    consumed: 1,
                    value: Some(first.text),
                }),
                TokenKind::LongName | TokenKind::ShortName => None,
            },
            ShapeKind::Named(name) => {
                if !name.matches_token(&first, options.key_comparison) {
                    return None;
                }
                let value = tokens.next().filter(|t| t.kind == TokenKind::Value)?;
                Some(TokenMatch {
                    consumed: 2,
                    value: Some(value.text),
                })
            }
            ShapeKind::Switch(name) => name
                .matches_token(&first, options.key_comparison)
                .then_some(TokenMatch {
                    consumed: 1,
                    value: None,
                }),
        }
    }

    /// Matches one `name → values` entry of a preparsed map.
    ///
    /// Positional shapes never match here; they take values from the
    /// separate positional list.
    pub fn match_entry(&self, key: &str, values: &[String], options: &SearchOptions) -> MapMatch {
        let (name, expected) = match &self.kind {
            ShapeKind::Positional => return MapMatch::Unmatched,
            ShapeKind::Named(name) => (name, 1),
            ShapeKind::Switch(name) => (name, 0),
        };

        if !name.matches_key(key, options.key_comparison) {
            return MapMatch::Unmatched;
        }
        if values.len() == expected {
            MapMatch::Matched
        } else {
            MapMatch::Fatal
        }
    }

    /// Whether an overload may succeed without this shape being matched.
    pub fn is_omissible(&self, _options: &SearchOptions) -> bool {
        self.optional
    }
}

impl fmt::Display for ParameterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.kind {
            ShapeKind::Positional => format!("<{}>", self.parameter_name),
            ShapeKind::Named(name) => format!("{name} <{}>", self.parameter_name),
            ShapeKind::Switch(name) => name.to_string(),
        };
        if self.optional {
            write!(f, "[{body}]")
        } else {
            f.write_str(&body)
        }
    }
}
