//! The typed table tree and path resolution.
//!
//! A [`Table`] mirrors one foreign table. Its entries are split in two
//! key-ordered maps: scalar `leaves` and nested `children`. A key lives in
//! exactly one of them.
//!
//! # Resolution
//!
//! [`Table::value`] walks the tokenized path one key at a time. At each
//! level the key is checked against the leaves first:
//!
//! 1. **Leaf hit, path exhausted**: the leaf is the result.
//! 2. **Leaf hit, keys remaining**: failure, a leaf has no children.
//! 3. **Leaf miss**: the key must name a child table, which becomes the
//!    current table; otherwise the lookup fails.
//!
//! A path that ends on a table fails for value lookups. [`Table::table`]
//! walks children only and returns the table the path ends on.
//!
//! Both lookups come in three calling conventions sharing one code path:
//! borrowing (`value`, `table`), owning (`get_value`, `get_table`), and
//! boolean with an output slot (`get_value_into`, `get_table_into`).

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{LuaPathError, Result};
use crate::key::Key;
use crate::path::tokenize;
use crate::value::{FromValue, Value};

/// Spaces of indentation per nesting level in the text rendering.
pub const INDENT_SIZE: usize = 5;

/// A node of the typed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    key: Key,
    leaves: BTreeMap<Key, Value>,
    children: BTreeMap<Key, Table>,
}

impl Table {
    /// An empty table named by `key` in its parent (or by its global name
    /// for a root table).
    pub fn new(key: Key) -> Self {
        Self {
            key,
            leaves: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Scalar entries in key order.
    pub fn leaves(&self) -> &BTreeMap<Key, Value> {
        &self.leaves
    }

    /// Nested tables in key order.
    pub fn children(&self) -> &BTreeMap<Key, Table> {
        &self.children
    }

    pub fn leaf(&self, key: &Key) -> Option<&Value> {
        self.leaves.get(key)
    }

    pub fn child(&self, key: &Key) -> Option<&Table> {
        self.children.get(key)
    }

    /// True if `key` names either a leaf or a child of this table.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.leaves.contains_key(key) || self.children.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.children.is_empty()
    }

    /// Number of direct entries, leaves and children together.
    pub fn len(&self) -> usize {
        self.leaves.len() + self.children.len()
    }

    /// Insert a leaf. The first entry for a key wins; returns false if the
    /// key was already taken by a leaf or a child.
    pub(crate) fn insert_leaf(&mut self, key: Key, value: Value) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.leaves.insert(key, value);
        true
    }

    /// Insert a finished child table under its own key.
    pub(crate) fn insert_child(&mut self, child: Table) -> bool {
        if self.contains_key(&child.key) {
            return false;
        }
        self.children.insert(child.key.clone(), child);
        true
    }

    /// Borrow the leaf value at `path`.
    ///
    /// # Errors
    ///
    /// [`LuaPathError::PathLookup`] if the path is empty or malformed, a key
    /// is missing at some level, a leaf is reached before the path ends, or
    /// the path ends on a table.
    pub fn value(&self, path: &str) -> Result<&Value> {
        if path.is_empty() {
            return Err(LuaPathError::PathLookup(
                "empty search path is not allowed for a value lookup".to_string(),
            ));
        }

        let mut keys = tokenize(path)?;
        let mut current = self;

        while let Some(key) = keys.pop_front() {
            if let Some(value) = current.leaves.get(&key) {
                if !keys.is_empty() {
                    return Err(LuaPathError::PathLookup(format!(
                        "found value at '{key}' but path \"{path}\" continues"
                    )));
                }
                return Ok(value);
            }

            current = current.children.get(&key).ok_or_else(|| {
                LuaPathError::PathLookup(format!(
                    "could not find '{key}' in table '{}' (path \"{path}\")",
                    current.key
                ))
            })?;
        }

        Err(LuaPathError::PathLookup(format!(
            "path \"{path}\" ends on table '{}', not on a value",
            current.key
        )))
    }

    /// Owned copy of the leaf value at `path`. See [`Table::value`].
    pub fn get_value(&self, path: &str) -> Result<Value> {
        self.value(path).cloned()
    }

    /// Look up the leaf value at `path` without propagating errors.
    ///
    /// On success the value is written to `out` and `true` is returned. On
    /// any failure that [`Table::value`] would report, `out` is cleared and
    /// `false` is returned.
    pub fn get_value_into(&self, path: &str, out: &mut Option<Value>) -> bool {
        into_slot(self.value(path).cloned(), path, out)
    }

    /// Borrow the table at `path`, descending through children only.
    ///
    /// An empty path returns this table.
    ///
    /// # Errors
    ///
    /// [`LuaPathError::PathLookup`] if the path is malformed or any key does
    /// not name a child table (including keys naming leaves).
    pub fn table(&self, path: &str) -> Result<&Table> {
        let keys = tokenize(path)?;
        let mut current = self;

        for key in &keys {
            current = current.children.get(key).ok_or_else(|| {
                LuaPathError::PathLookup(format!(
                    "could not find table '{key}' in table '{}' (path \"{path}\")",
                    current.key
                ))
            })?;
        }

        Ok(current)
    }

    /// Owned copy of the table at `path`. See [`Table::table`].
    pub fn get_table(&self, path: &str) -> Result<Table> {
        self.table(path).cloned()
    }

    /// Look up the table at `path` without propagating errors, mirroring
    /// [`Table::get_value_into`].
    pub fn get_table_into(&self, path: &str, out: &mut Option<Table>) -> bool {
        into_slot(self.table(path).cloned(), path, out)
    }

    /// Convert every leaf, in key order, to `T`.
    ///
    /// Nested children are ignored.
    ///
    /// # Errors
    ///
    /// [`LuaPathError::TypeMismatch`] at the first leaf that does not
    /// convert.
    ///
    /// # Examples
    ///
    /// ```
    /// use luapath_core::{JsonSource, TableSource};
    ///
    /// let source: JsonSource = r#"{"scores": [10, 20, 40.4]}"#.parse().unwrap();
    /// let scores = source.global_table("scores").unwrap();
    /// assert_eq!(scores.to_array::<f64>().unwrap(), vec![10.0, 20.0, 40.4]);
    /// ```
    pub fn to_array<T: FromValue>(&self) -> Result<Vec<T>> {
        self.leaves.values().map(T::from_value).collect()
    }

    fn render(&self, out: &mut impl fmt::Write, level: usize) -> fmt::Result {
        let outer = " ".repeat((level - 1) * INDENT_SIZE);
        let inner = " ".repeat(level * INDENT_SIZE);

        writeln!(out, "{outer}{} = {{", self.key)?;

        let last = self.leaves.len().saturating_sub(1);
        for (index, (key, value)) in self.leaves.iter().enumerate() {
            let separator = if index == last { "" } else { "," };
            writeln!(out, "{inner}{key} = {value}{separator}")?;
        }

        for child in self.children.values() {
            child.render(out, level + 1)?;
        }

        writeln!(out, "{outer}}}")
    }
}

/// Shared adapter behind the boolean-returning lookups.
fn into_slot<T>(result: Result<T>, path: &str, out: &mut Option<T>) -> bool {
    match result {
        Ok(found) => {
            *out = Some(found);
            true
        }
        Err(error) => {
            tracing::debug!(path, %error, "lookup failed");
            *out = None;
            false
        }
    }
}

impl fmt::Display for Table {
    /// Diagnostic rendering: an indented, brace-delimited block with leaves
    /// first and nested tables after them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 1)
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in &self.leaves {
            map.serialize_entry(key.text(), value)?;
        }
        for (key, child) in &self.children {
            map.serialize_entry(key.text(), child)?;
        }
        map.end()
    }
}
