//! # luapath-core
//!
//! Typed trees and path queries over script-style nested tables.
//!
//! A dynamically typed source (a Lua state, a JSON document) is read once
//! into a [`Table`]: a tree of key-ordered scalar leaves and nested tables.
//! Values are then looked up with short search paths where `.` introduces a
//! string field and `#` an integer index.
//!
//! ## Quick start
//!
//! ```rust
//! use luapath_core::{JsonSource, TableSource};
//!
//! let source: JsonSource = r#"{"cars": {"bmw": {"price": 40}, "fleet": ["a", "b"]}}"#
//!     .parse()
//!     .unwrap();
//! let cars = source.global_table("cars").unwrap();
//!
//! assert_eq!(cars.get_value(".bmw.price").unwrap().to_i64().unwrap(), 40);
//! assert_eq!(cars.get_value(".fleet#2").unwrap().text(), "b");
//! ```
//!
//! ## Modules
//!
//! - [`key`]: `Key`, STRING or NUMBER table keys and their ordering
//! - [`value`]: `Value`, typed scalar leaves and conversions
//! - [`path`]: search path tokenizer (`tokenize`, `render_path`)
//! - [`table`]: `Table` tree, path resolution, array extraction, rendering
//! - [`source`]: `TableSource` contract for foreign data
//! - [`builder`]: best-effort tree materialization with diagnostics
//! - [`json`]: `JsonSource`
//! - [`lua`]: `LuaSource` (feature `lua`)
//! - [`error`]: Error types

pub mod builder;
pub mod error;
pub mod json;
pub mod key;
pub mod lua;
pub mod path;
pub mod source;
pub mod table;
pub mod value;

pub use builder::{Build, BuildOptions, Diagnostic, TreeBuilder, DEFAULT_MAX_DEPTH};
pub use error::LuaPathError;
pub use json::{JsonNode, JsonSource};
pub use key::{Key, KeyKind};
#[cfg(feature = "lua")]
pub use lua::LuaSource;
pub use path::{render_path, tokenize, KeyPath, NUMBER_MARKER, STRING_MARKER};
pub use source::{classify, ForeignEntry, ForeignKey, ForeignValue, TableSource};
pub use table::{Table, INDENT_SIZE};
pub use value::{FromValue, Value, ValueKind};
