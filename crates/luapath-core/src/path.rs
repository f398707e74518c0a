//! Search path tokenizer.
//!
//! A search path is a sequence of fields, each introduced by a marker that
//! selects the key kind:
//!
//! ```text
//! path   := (marker field)*
//! marker := '.' | '#'
//! field  := any characters up to the next marker or the end of input
//! ```
//!
//! - `.name` selects the STRING key `name`
//! - `#5` selects the NUMBER key `5`
//!
//! `"#1.level2#3.4.5"` tokenizes to `[1]`, `level2`, `[3]`, `4`, `5`.
//!
//! Marker characters cannot be escaped, so a field name containing `.` or
//! `#` cannot be addressed.

use std::collections::VecDeque;

use crate::error::{LuaPathError, Result};
use crate::key::{Key, KeyKind};

/// Marker introducing a STRING key.
pub const STRING_MARKER: char = '.';

/// Marker introducing a NUMBER key.
pub const NUMBER_MARKER: char = '#';

/// Keys produced by [`tokenize`], consumed front to back during resolution.
pub type KeyPath = VecDeque<Key>;

fn is_marker(c: char) -> bool {
    c == STRING_MARKER || c == NUMBER_MARKER
}

/// Split a search path into its typed keys.
///
/// An empty path yields an empty [`KeyPath`]. Two consecutive markers yield
/// a key with empty text, which is accepted here and fails later during
/// resolution.
///
/// # Errors
///
/// [`LuaPathError::PathLookup`] if the path is non-empty and does not start
/// with a marker.
///
/// # Examples
///
/// ```
/// use luapath_core::{tokenize, Key};
///
/// let keys = tokenize("#5.class.model").unwrap();
/// assert_eq!(
///     Vec::from(keys),
///     vec![Key::number(5), Key::string("class"), Key::string("model")]
/// );
/// ```
pub fn tokenize(path: &str) -> Result<KeyPath> {
    let mut keys = KeyPath::new();

    match path.chars().next() {
        None => return Ok(keys),
        Some(first) if !is_marker(first) => {
            return Err(LuaPathError::PathLookup(format!(
                "invalid starting token character '{first}' in path \"{path}\""
            )));
        }
        Some(_) => {}
    }

    let mut rest = path;
    while let Some(marker) = rest.chars().next() {
        let body = &rest[marker.len_utf8()..];
        let end = body.find(is_marker).unwrap_or(body.len());
        let field = &body[..end];

        let kind = if marker == NUMBER_MARKER {
            KeyKind::Number
        } else {
            KeyKind::String
        };
        keys.push_back(Key::new(kind, field));
        rest = &body[end..];
    }

    Ok(keys)
}

/// Render keys back into search path syntax.
///
/// For keys whose text contains no marker characters this is the inverse of
/// [`tokenize`].
pub fn render_path<'a>(keys: impl IntoIterator<Item = &'a Key>) -> String {
    keys.into_iter().map(Key::path_segment).collect()
}
