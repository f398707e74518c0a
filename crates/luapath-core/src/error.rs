//! Error types for path lookup, value conversion and source loading.

use thiserror::Error;

/// Errors that can occur while building or querying a [`Table`](crate::Table).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LuaPathError {
    /// A value could not be converted to the requested type, or a foreign
    /// value has a kind that has no typed counterpart.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A structural failure while following a path: empty or malformed path,
    /// missing key, or a leaf reached before the path ended.
    #[error("Path lookup error: {0}")]
    PathLookup(String),

    /// The foreign source could not be loaded or parsed.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Convenience alias used throughout luapath-core.
pub type Result<T> = std::result::Result<T, LuaPathError>;
