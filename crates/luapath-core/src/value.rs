//! Typed scalar leaves.
//!
//! Every leaf keeps its kind and a canonical text form:
//!
//! | Kind     | Text                              |
//! |----------|-----------------------------------|
//! | `Bool`   | `true` / `false`                  |
//! | `Number` | decimal (`5`, `40.8`, `-1`)       |
//! | `String` | raw text                          |
//! | `Table`  | `->` (classification marker only) |
//!
//! Conversions to Rust types go through the text, so a STRING leaf holding
//! `"10"` converts to an integer just like a NUMBER leaf does.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{LuaPathError, Result};

/// Text carried by the table marker.
pub const TABLE_MARKER_TEXT: &str = "->";

/// Kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    String,
    Number,
    /// Marks a foreign entry that is itself a table. Only produced while
    /// classifying source entries; a built [`Table`](crate::Table) never
    /// stores it as a leaf.
    Table,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Table => "table",
        }
    }

    /// Tiebreak between kinds whose texts are equal.
    fn rank(self) -> u8 {
        match self {
            ValueKind::Bool => 0,
            ValueKind::Number => 1,
            ValueKind::String => 2,
            ValueKind::Table => 3,
        }
    }
}

/// A scalar leaf of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    kind: ValueKind,
    text: String,
}

impl Value {
    /// Build a value from a kind and its text. TABLE values always carry the
    /// marker text regardless of `text`.
    pub fn new(kind: ValueKind, text: impl Into<String>) -> Self {
        let text = match kind {
            ValueKind::Table => TABLE_MARKER_TEXT.to_string(),
            _ => text.into(),
        };
        Self { kind, text }
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ValueKind::Bool, if value { "true" } else { "false" })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ValueKind::String, value)
    }

    pub fn integer(value: i64) -> Self {
        Self::new(ValueKind::Number, value.to_string())
    }

    /// A NUMBER value from a float. Integral floats render without a
    /// fractional part (`5.0` becomes `5`).
    pub fn number(value: f64) -> Self {
        Self::new(ValueKind::Number, format!("{value}"))
    }

    pub fn table_marker() -> Self {
        Self::new(ValueKind::Table, TABLE_MARKER_TEXT)
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_table_marker(&self) -> bool {
        self.kind == ValueKind::Table
    }

    /// Convert to an integer.
    ///
    /// Integer text converts directly. Other numeric text is truncated
    /// toward zero, so `"40.4"` yields `40`.
    ///
    /// # Errors
    ///
    /// [`LuaPathError::TypeMismatch`] if the text is not numeric or the
    /// truncated number lies outside the `i64` range.
    pub fn to_i64(&self) -> Result<i64> {
        if let Ok(int) = self.text.parse::<i64>() {
            return Ok(int);
        }
        let truncated = self
            .text
            .parse::<f64>()
            .map_err(|_| self.mismatch("an integer"))?
            .trunc();
        // 2^63 itself is not representable, hence `>=` on the upper bound.
        if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
            return Err(self.mismatch("a 64-bit integer"));
        }
        Ok(truncated as i64)
    }

    /// Convert to an `i32`, failing on non-numeric text or overflow.
    pub fn to_i32(&self) -> Result<i32> {
        let wide = self.to_i64()?;
        i32::try_from(wide).map_err(|_| self.mismatch("a 32-bit integer"))
    }

    /// Convert to a float.
    pub fn to_f64(&self) -> Result<f64> {
        self.text
            .parse::<f64>()
            .map_err(|_| self.mismatch("a number"))
    }

    pub fn to_f32(&self) -> Result<f32> {
        self.to_f64().map(|float| float as f32)
    }

    /// Convert to a bool. Only the exact texts `true` and `false` convert.
    pub fn to_bool(&self) -> Result<bool> {
        match self.text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(self.mismatch("a boolean")),
        }
    }

    fn mismatch(&self, target: &str) -> LuaPathError {
        LuaPathError::TypeMismatch(format!(
            "{} value '{}' cannot be converted to {target}",
            self.kind.name(),
            self.text
        ))
    }
}

impl PartialOrd for Value {
    /// NUMBER values compare numerically and BOOL values compare
    /// `false < true`. Any other pairing, including mixed kinds, compares
    /// the text forms. Numeric ties between distinct texts (`5` vs `5.0`)
    /// are broken by the text, and equal texts of different kinds by the
    /// kind, so the ordering agrees with `==`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let typed = match (self.kind, other.kind) {
            (ValueKind::Number, ValueKind::Number) => match (self.to_f64(), other.to_f64()) {
                (Ok(a), Ok(b)) => a.partial_cmp(&b),
                _ => None,
            },
            (ValueKind::Bool, ValueKind::Bool) => match (self.to_bool(), other.to_bool()) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => None,
            },
            _ => None,
        };
        Some(match typed {
            Some(Ordering::Equal) | None => self
                .text
                .cmp(&other.text)
                .then_with(|| self.kind.rank().cmp(&other.kind.rank())),
            Some(ordering) => ordering,
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::String => write!(f, "\"{}\"", self.text),
            ValueKind::Number => match self.to_f64() {
                Ok(number) => write!(f, "{number}"),
                Err(_) => f.write_str(&self.text),
            },
            ValueKind::Bool | ValueKind::Table => f.write_str(&self.text),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.kind {
            ValueKind::Bool => match self.to_bool() {
                Ok(flag) => serializer.serialize_bool(flag),
                Err(_) => serializer.serialize_str(&self.text),
            },
            ValueKind::Number => {
                if let Ok(int) = self.text.parse::<i64>() {
                    serializer.serialize_i64(int)
                } else {
                    match self.to_f64() {
                        Ok(float) if float.is_finite() => serializer.serialize_f64(float),
                        _ => serializer.serialize_str(&self.text),
                    }
                }
            }
            ValueKind::String | ValueKind::Table => serializer.serialize_str(&self.text),
        }
    }
}

/// Conversion from a leaf [`Value`] into a Rust type.
///
/// Drives [`Table::to_array`](crate::Table::to_array).
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.text.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_bool()
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_i32()
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_i64()
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_f32()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.to_f64()
    }
}
