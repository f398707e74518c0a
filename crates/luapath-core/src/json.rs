//! A [`TableSource`] over a JSON document.
//!
//! The members of the root JSON object are the globals. Nested values map
//! onto script-style tables:
//!
//! - objects are tables with STRING keys, in document order
//! - arrays are tables with NUMBER keys starting at 1
//! - `null` behaves like an undefined variable: a `null` global is absent
//!   and `null` members are not enumerated
//!
//! Nested tables are handed to the builder as a [`JsonNode`] location into
//! the document, so enumerating a table never copies its subtree.

use std::str::FromStr;

use serde_json::{Map, Value as Json};

use crate::error::{LuaPathError, Result};
use crate::source::{ForeignEntry, ForeignKey, ForeignValue, TableSource};

/// JSON document exposed as a global scope.
#[derive(Debug, Clone, Default)]
pub struct JsonSource {
    globals: Map<String, Json>,
}

/// Location of a nested table: the global it belongs to and an RFC 6901
/// JSON Pointer below that global (empty for the global itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonNode {
    global: String,
    pointer: String,
}

impl JsonNode {
    fn root(global: &str) -> Self {
        Self {
            global: global.to_string(),
            pointer: String::new(),
        }
    }

    fn member(&self, name: &str) -> Self {
        let escaped = name.replace('~', "~0").replace('/', "~1");
        self.descend(&escaped)
    }

    fn element(&self, index: usize) -> Self {
        self.descend(&index.to_string())
    }

    fn descend(&self, token: &str) -> Self {
        Self {
            global: self.global.clone(),
            pointer: format!("{}/{token}", self.pointer),
        }
    }
}

impl JsonSource {
    /// Use an already parsed document as the global scope.
    ///
    /// # Errors
    ///
    /// [`LuaPathError::SourceUnavailable`] if the document root is not an
    /// object.
    pub fn from_json(document: Json) -> Result<Self> {
        match document {
            Json::Object(globals) => Ok(Self { globals }),
            other => Err(LuaPathError::SourceUnavailable(format!(
                "JSON root must be an object of globals, found {}",
                json_type(&other)
            ))),
        }
    }

    /// Names of all defined globals, in document order.
    pub fn global_names(&self) -> impl Iterator<Item = &str> {
        self.globals
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, _)| name.as_str())
    }

    fn resolve(&self, node: &JsonNode) -> Option<&Json> {
        self.globals.get(&node.global)?.pointer(&node.pointer)
    }
}

impl FromStr for JsonSource {
    type Err = LuaPathError;

    fn from_str(text: &str) -> Result<Self> {
        let document: Json = serde_json::from_str(text)
            .map_err(|error| LuaPathError::SourceUnavailable(format!("invalid JSON: {error}")))?;
        Self::from_json(document)
    }
}

impl TableSource for JsonSource {
    type Node = JsonNode;

    fn global(&self, name: &str) -> Result<ForeignValue<JsonNode>> {
        Ok(self
            .globals
            .get(name)
            .map_or(ForeignValue::Nil, |value| foreign(value, || JsonNode::root(name))))
    }

    fn entries(&self, node: &JsonNode) -> Result<Vec<ForeignEntry<JsonNode>>> {
        let table = self.resolve(node).ok_or_else(|| {
            LuaPathError::SourceUnavailable(format!(
                "no JSON value at '{}{}'",
                node.global, node.pointer
            ))
        })?;

        match table {
            Json::Object(map) => Ok(map
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| {
                    Ok((
                        ForeignKey::Text(key.clone()),
                        foreign(value, || node.member(key)),
                    ))
                })
                .collect()),
            Json::Array(items) => Ok(items
                .iter()
                .enumerate()
                .filter(|(_, value)| !value.is_null())
                .map(|(offset, value)| {
                    let index = i64::try_from(offset + 1).map_err(|_| {
                        LuaPathError::TypeMismatch(format!("array index {offset} out of range"))
                    })?;
                    Ok((
                        ForeignKey::Integer(index),
                        foreign(value, || node.element(offset)),
                    ))
                })
                .collect()),
            other => Err(LuaPathError::TypeMismatch(format!(
                "cannot enumerate a JSON {}",
                json_type(other)
            ))),
        }
    }
}

/// Classify a JSON value. `locate` is only called for objects and arrays.
fn foreign(value: &Json, locate: impl FnOnce() -> JsonNode) -> ForeignValue<JsonNode> {
    match value {
        Json::Null => ForeignValue::Nil,
        Json::Bool(flag) => ForeignValue::Bool(*flag),
        Json::Number(number) => match number.as_i64() {
            Some(int) => ForeignValue::Integer(int),
            None => number
                .as_f64()
                .map_or_else(|| ForeignValue::Unsupported("number".to_string()), ForeignValue::Number),
        },
        Json::String(text) => ForeignValue::String(text.clone()),
        Json::Object(_) | Json::Array(_) => ForeignValue::Table(locate()),
    }
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
