//! Label pools, label sets and the canonical label key.
//!
//! A [`LabelSet`] renders to a canonical key of the form
//! `{name="value", name2="value2"}` with names in sorted order. The key is
//! both the display form of the set and the grouping key for streams in a
//! [`Batch`](crate::Batch).
//!
//! Values are quoted with backslash escapes for `\`, `"` and newline, so
//! values containing `=`, `,` or `"` survive [`parse_label_key`] unchanged.
//! Label names are restricted to `[a-zA-Z_][a-zA-Z0-9_]*`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Reserved label identifying the issuing client instance.
pub const INSTANCE_LABEL: &str = "instance";

/// Label selecting the log line format of a stream.
pub const FORMAT_LABEL: &str = "format";

/// Check whether `name` is a valid label name.
pub fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ============================================================================
// Label Pool
// ============================================================================

/// Candidate values for each label name.
///
/// Every candidate list is non-empty and the `format` label is always
/// present. Names iterate in sorted order, which keeps sampling reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct LabelPool {
    labels: BTreeMap<String, Vec<String>>,
}

impl LabelPool {
    /// Create a label pool, rejecting empty candidate lists and invalid names.
    pub fn new(labels: BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError> {
        for (name, values) in &labels {
            if !is_valid_label_name(name) {
                return Err(ConfigError::InvalidLabelName(name.clone()));
            }
            if values.is_empty() {
                return Err(ConfigError::EmptyCandidates(name.clone()));
            }
        }
        if !labels.contains_key(FORMAT_LABEL) {
            return Err(ConfigError::MissingFormatLabel);
        }
        Ok(Self { labels })
    }

    /// Create a label pool from borrowed name/value slices.
    pub fn from_slices(labels: &[(&str, &[&str])]) -> Result<Self, ConfigError> {
        let map = labels
            .iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect();
        Self::new(map)
    }

    /// Get the candidate values for a label.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.labels.get(name).map(Vec::as_slice)
    }

    /// Whether the pool has candidates for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    /// Number of distinct candidate values configured for `name`.
    pub fn cardinality(&self, name: &str) -> Option<usize> {
        self.labels.get(name).map(Vec::len)
    }

    /// Candidate values of the `format` label.
    pub fn format_values(&self) -> &[String] {
        self.get(FORMAT_LABEL).unwrap_or_default()
    }

    /// Iterate over label names and their candidates in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.labels
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of label names in the pool.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the pool has no labels. Always false for a constructed pool.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for LabelPool {
    type Error = ConfigError;

    fn try_from(labels: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<LabelPool> for BTreeMap<String, Vec<String>> {
    fn from(pool: LabelPool) -> Self {
        pool.labels
    }
}

// ============================================================================
// Label Set
// ============================================================================

/// One chosen value per label name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    /// Create an empty label set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a label value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over labels in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the canonical key, e.g. `{app="api", format="json"}`.
    pub fn canonical_key(&self) -> String {
        self.to_string()
    }

    /// Parse a canonical key back into a label set.
    pub fn parse(key: &str) -> Result<Self, LabelKeyError> {
        parse_label_key(key)
    }

    /// Consume the set, returning the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}=\"")?;
            for c in value.chars() {
                match c {
                    '\\' => f.write_str("\\\\")?,
                    '"' => f.write_str("\\\"")?,
                    '\n' => f.write_str("\\n")?,
                    c => write!(f, "{c}")?,
                }
            }
            f.write_str("\"")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for LabelSet {
    fn from(labels: BTreeMap<String, String>) -> Self {
        Self(labels)
    }
}

// ============================================================================
// Canonical Key Parsing
// ============================================================================

/// Error parsing a canonical label key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelKeyError {
    #[error("label key must be wrapped in braces: {0}")]
    MissingBraces(String),

    #[error("invalid label name at byte {pos} in {key}")]
    InvalidName { key: String, pos: usize },

    #[error("expected '{expected}' at byte {pos} in {key}")]
    Expected {
        key: String,
        pos: usize,
        expected: char,
    },

    #[error("unterminated label value in {0}")]
    UnterminatedValue(String),

    #[error("unsupported escape '\\{escape}' in {key}")]
    UnsupportedEscape { key: String, escape: char },

    #[error("duplicate label '{name}' in {key}")]
    DuplicateLabel { key: String, name: String },
}

/// Parse a canonical label key into a [`LabelSet`].
///
/// Exactly inverts [`LabelSet::canonical_key`]. Whitespace between pairs is
/// ignored, a trailing comma is not.
pub fn parse_label_key(key: &str) -> Result<LabelSet, LabelKeyError> {
    let inner = key
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| LabelKeyError::MissingBraces(key.to_string()))?;

    let mut parser = KeyParser {
        key,
        inner,
        chars: inner.char_indices().peekable(),
    };
    let mut labels = BTreeMap::new();

    parser.skip_whitespace();
    if parser.chars.peek().is_none() {
        return Ok(LabelSet(labels));
    }

    loop {
        parser.skip_whitespace();
        let name = parser.name()?;
        parser.expect('=')?;
        parser.expect('"')?;
        let value = parser.quoted_value()?;
        if labels.insert(name.to_string(), value).is_some() {
            return Err(LabelKeyError::DuplicateLabel {
                key: key.to_string(),
                name: name.to_string(),
            });
        }

        parser.skip_whitespace();
        match parser.chars.next() {
            None => break,
            Some((_, ',')) => continue,
            Some((pos, _)) => return Err(parser.expected(pos, ',')),
        }
    }

    Ok(LabelSet(labels))
}

struct KeyParser<'a> {
    key: &'a str,
    inner: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> KeyParser<'a> {
    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn name(&mut self) -> Result<&'a str, LabelKeyError> {
        let start = self.position();
        while matches!(self.chars.peek(), Some((_, c)) if c.is_ascii_alphanumeric() || *c == '_')
        {
            self.chars.next();
        }
        let name = &self.inner[start..self.position()];
        if !is_valid_label_name(name) {
            return Err(LabelKeyError::InvalidName {
                key: self.key.to_string(),
                pos: start + 1,
            });
        }
        Ok(name)
    }

    fn quoted_value(&mut self) -> Result<String, LabelKeyError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None => return Err(LabelKeyError::UnterminatedValue(self.key.to_string())),
                Some((_, '"')) => return Ok(value),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, escape)) => {
                        return Err(LabelKeyError::UnsupportedEscape {
                            key: self.key.to_string(),
                            escape,
                        })
                    }
                    None => return Err(LabelKeyError::UnterminatedValue(self.key.to_string())),
                },
                Some((_, c)) => value.push(c),
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LabelKeyError> {
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((pos, _)) => Err(self.expected(pos, expected)),
            None => Err(self.expected(self.inner.len(), expected)),
        }
    }

    fn expected(&self, pos: usize, expected: char) -> LabelKeyError {
        LabelKeyError::Expected {
            key: self.key.to_string(),
            pos: pos + 1,
            expected,
        }
    }

    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(pos, _)| *pos)
            .unwrap_or(self.inner.len())
    }
}
