//! Search configuration shared by every comparison in one search call.

use serde::{Deserialize, Serialize};

/// How routing keys, aliases and parameter names are compared.
///
/// # Examples
///
/// ```
/// use command_tree_core::KeyComparison;
///
/// assert!(!KeyComparison::CaseSensitive.eq_str("Ping", "ping"));
/// assert!(KeyComparison::CaseInsensitive.eq_str("Ping", "ping"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyComparison {
    /// Ordinal, case-sensitive comparison (the default).
    #[default]
    CaseSensitive,
    /// Ordinal comparison after Unicode lowercasing.
    CaseInsensitive,
}

impl KeyComparison {
    /// Compares two strings under this mode.
    pub fn eq_str(self, a: &str, b: &str) -> bool {
        match self {
            Self::CaseSensitive => a == b,
            Self::CaseInsensitive => a
                .chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase)),
        }
    }

    /// Compares two characters under this mode.
    pub fn eq_char(self, a: char, b: char) -> bool {
        match self {
            Self::CaseSensitive => a == b,
            Self::CaseInsensitive => a.to_lowercase().eq(b.to_lowercase()),
        }
    }
}

/// What to do with input left over after an overload is otherwise complete.
///
/// Leftover input is unconsumed tokens in a raw search, or unclaimed named
/// entries and positional values in a preparsed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingPolicy {
    /// Accept the overload and ignore the remainder (the default).
    #[default]
    Tolerate,
    /// Reject the overload unless the input was fully consumed.
    Reject,
}

/// Options for one search call.
///
/// # Examples
///
/// ```
/// use command_tree_core::{KeyComparison, SearchOptions, TrailingPolicy};
///
/// let options = SearchOptions::default();
/// assert_eq!(options.key_comparison, KeyComparison::CaseSensitive);
/// assert_eq!(options.trailing, TrailingPolicy::Tolerate);
///
/// let strict = SearchOptions::new(KeyComparison::CaseInsensitive)
///     .with_trailing(TrailingPolicy::Reject);
/// assert_eq!(strict.trailing, TrailingPolicy::Reject);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Comparison used for keys, aliases and parameter names.
    pub key_comparison: KeyComparison,
    /// Handling of leftover input.
    pub trailing: TrailingPolicy,
}

impl SearchOptions {
    /// Creates options with the given comparison and the default trailing policy.
    pub fn new(key_comparison: KeyComparison) -> Self {
        Self {
            key_comparison,
            trailing: TrailingPolicy::default(),
        }
    }

    /// Sets the trailing-input policy.
    pub fn with_trailing(mut self, trailing: TrailingPolicy) -> Self {
        self.trailing = trailing;
        self
    }
}
