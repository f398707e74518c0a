//! The foreign data source contract.
//!
//! A scripting engine (or any other dynamically typed tree) exposes its data
//! through [`TableSource`]: a global scope of named entries, and for table
//! nodes an enumeration of `(key, value)` pairs in the source's own order.
//! Raw keys and values are reified once into [`Key`] and [`Value`] by
//! [`ForeignKey::into_key`] and [`classify`]; everything downstream works on
//! the typed tree only.

use crate::builder::{Build, BuildOptions, TreeBuilder};
use crate::error::{LuaPathError, Result};
use crate::key::Key;
use crate::table::Table;
use crate::value::Value;

/// A raw key as enumerated by a source.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignKey {
    Integer(i64),
    /// A numeric key that may or may not be integral.
    Number(f64),
    Text(String),
    /// Any other key kind; carries the source's type name.
    Unsupported(String),
}

impl ForeignKey {
    /// Classify a raw key: integral numbers become NUMBER keys, text and
    /// non-integral numbers become STRING keys.
    ///
    /// # Errors
    ///
    /// [`LuaPathError::TypeMismatch`] for unsupported key kinds.
    pub fn into_key(self) -> Result<Key> {
        match self {
            ForeignKey::Integer(index) => Ok(Key::number(index)),
            ForeignKey::Number(number)
                if number.fract() == 0.0 && number.abs() < i64::MAX as f64 =>
            {
                Ok(Key::number(number as i64))
            }
            ForeignKey::Number(number) => Ok(Key::string(format!("{number}"))),
            ForeignKey::Text(text) => Ok(Key::string(text)),
            ForeignKey::Unsupported(kind) => Err(LuaPathError::TypeMismatch(format!(
                "cannot build a key from a {kind} value, only numbers and strings"
            ))),
        }
    }
}

/// A raw value as read from a source. `N` is the source's handle to a
/// nested table.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignValue<N> {
    Nil,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Table(N),
    /// Any other value kind; carries the source's type name.
    Unsupported(String),
}

/// One enumerated table entry. Entries fail individually so that a single
/// unreadable entry does not hide its siblings.
pub type ForeignEntry<N> = Result<(ForeignKey, ForeignValue<N>)>;

/// Classify a raw value into a typed [`Value`].
///
/// Tables classify to the table marker and hand back their node so the
/// caller can descend into it.
///
/// # Errors
///
/// [`LuaPathError::TypeMismatch`] for nil and unsupported kinds.
pub fn classify<N>(value: ForeignValue<N>) -> Result<(Value, Option<N>)> {
    match value {
        ForeignValue::Bool(flag) => Ok((Value::bool(flag), None)),
        ForeignValue::Integer(int) => Ok((Value::integer(int), None)),
        ForeignValue::Number(number) => Ok((Value::number(number), None)),
        ForeignValue::String(text) => Ok((Value::string(text), None)),
        ForeignValue::Table(node) => Ok((Value::table_marker(), Some(node))),
        ForeignValue::Nil => Err(LuaPathError::TypeMismatch(
            "nil has no typed representation".to_string(),
        )),
        ForeignValue::Unsupported(kind) => Err(LuaPathError::TypeMismatch(format!(
            "value of type {kind} is not one of: string, number, boolean or table"
        ))),
    }
}

/// A dynamically typed tree that can be materialized into [`Table`]s.
pub trait TableSource {
    /// Handle to a table node inside the source.
    type Node;

    /// Fetch the raw global entry called `name`. An undefined global is
    /// reported as [`ForeignValue::Nil`], not as an error.
    fn global(&self, name: &str) -> Result<ForeignValue<Self::Node>>;

    /// Enumerate the direct entries of `node` in the source's native order.
    fn entries(&self, node: &Self::Node) -> Result<Vec<ForeignEntry<Self::Node>>>;

    /// Read a global scalar.
    ///
    /// # Errors
    ///
    /// - [`LuaPathError::PathLookup`] if the global is undefined
    /// - [`LuaPathError::TypeMismatch`] if it is a table or has an
    ///   unsupported kind
    fn global_value(&self, name: &str) -> Result<Value> {
        match self.global(name)? {
            ForeignValue::Nil => Err(not_found(name)),
            ForeignValue::Table(_) => Err(LuaPathError::TypeMismatch(format!(
                "global '{name}' is a table, not one of: string, number or boolean"
            ))),
            other => classify(other).map(|(value, _)| value),
        }
    }

    /// Materialize a global table with default [`BuildOptions`].
    ///
    /// Per-entry problems are logged and skipped; use
    /// [`TableSource::build_global`] to inspect them.
    fn global_table(&self, name: &str) -> Result<Table>
    where
        Self: Sized,
    {
        self.build_global(name, BuildOptions::default())
            .map(|build| build.table)
    }

    /// Materialize a global table and return it together with the
    /// diagnostics collected while building it.
    ///
    /// # Errors
    ///
    /// - [`LuaPathError::PathLookup`] if the global is undefined
    /// - [`LuaPathError::TypeMismatch`] if it is not a table
    fn build_global(&self, name: &str, options: BuildOptions) -> Result<Build>
    where
        Self: Sized,
    {
        match self.global(name)? {
            ForeignValue::Table(node) => {
                Ok(TreeBuilder::new(self, options).build(Key::string(name), &node))
            }
            ForeignValue::Nil => Err(not_found(name)),
            _ => Err(LuaPathError::TypeMismatch(format!(
                "global '{name}' is not a table"
            ))),
        }
    }
}

fn not_found(name: &str) -> LuaPathError {
    LuaPathError::PathLookup(format!("the search field - {name} - could not be found"))
}
