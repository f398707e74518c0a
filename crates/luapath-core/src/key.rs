//! Typed table keys.
//!
//! A table entry is named either by a string field (`name = ...`) or by an
//! integer index (`[5] = ...`, or the implicit indices of array elements).
//! Both are stored as text so numeric keys keep the exact form they were
//! written in.
//!
//! # Ordering
//!
//! Keys order tables for iteration, rendering and array extraction:
//!
//! - every NUMBER key sorts before every STRING key
//! - NUMBER keys compare as integers (`[9] < [10]`)
//! - STRING keys compare lexicographically

use std::cmp::Ordering;
use std::fmt;

use crate::error::{LuaPathError, Result};
use crate::path::{NUMBER_MARKER, STRING_MARKER};

/// Which kind of field a [`Key`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Integer index, explicit or implicit.
    Number,
    /// Named field.
    String,
}

/// Identifies one entry within a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    kind: KeyKind,
    text: String,
}

impl Key {
    /// Build a key from an explicit kind and its text form.
    ///
    /// The text of a NUMBER key is not validated here; a key that does not
    /// parse as an integer simply never matches a real table entry.
    pub fn new(kind: KeyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// A NUMBER key for the given index.
    pub fn number(index: i64) -> Self {
        Self::new(KeyKind::Number, index.to_string())
    }

    /// A STRING key for the given field name.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(KeyKind::String, name)
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    /// Canonical text of the key (decimal digits for NUMBER keys).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_number(&self) -> bool {
        self.kind == KeyKind::Number
    }

    /// Convert a NUMBER key to its integer index.
    ///
    /// # Errors
    ///
    /// Returns [`LuaPathError::TypeMismatch`] for STRING keys and for NUMBER
    /// keys whose text is not an integer.
    pub fn to_int(&self) -> Result<i64> {
        match self.kind {
            KeyKind::String => Err(LuaPathError::TypeMismatch(format!(
                "string key '{}' cannot be converted to an integer",
                self.text
            ))),
            KeyKind::Number => self.text.parse().map_err(|_| {
                LuaPathError::TypeMismatch(format!(
                    "number key '{}' is not a valid integer",
                    self.text
                ))
            }),
        }
    }

    /// Render this key as one segment of a search path, e.g. `#5` or `.name`.
    pub fn path_segment(&self) -> String {
        let marker = match self.kind {
            KeyKind::Number => NUMBER_MARKER,
            KeyKind::String => STRING_MARKER,
        };
        format!("{marker}{}", self.text)
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.kind, other.kind) {
            (KeyKind::Number, KeyKind::String) => Ordering::Less,
            (KeyKind::String, KeyKind::Number) => Ordering::Greater,
            (KeyKind::String, KeyKind::String) => self.text.cmp(&other.text),
            (KeyKind::Number, KeyKind::Number) => {
                match (self.text.parse::<i64>(), other.text.parse::<i64>()) {
                    // Equal indices written differently ("01" vs "1") fall back
                    // to the text so that Ord stays consistent with Eq.
                    (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.text.cmp(&other.text)),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => self.text.cmp(&other.text),
                }
            }
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            KeyKind::Number => write!(f, "[{}]", self.text),
            KeyKind::String => f.write_str(&self.text),
        }
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Self::number(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::string(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::string(name)
    }
}
