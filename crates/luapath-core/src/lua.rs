//! Optional Lua 5.4 source via the `mlua` crate.
//!
//! Enabled with the `lua` Cargo feature:
//! ```text
//! cargo build --features lua
//! cargo test  --features lua
//! ```
//!
//! Load a script with [`LuaSource::load_string`] or
//! [`LuaSource::load_file`], then read its globals through
//! [`TableSource`](crate::TableSource).

#[cfg(feature = "lua")]
pub use lua_impl::LuaSource;

#[cfg(feature = "lua")]
mod lua_impl {
    use std::path::Path;

    use mlua::prelude::*;

    use crate::error::{LuaPathError, Result};
    use crate::source::{ForeignEntry, ForeignKey, ForeignValue, TableSource};

    /// A Lua interpreter whose global scope is read as a table source.
    pub struct LuaSource {
        lua: Lua,
        loaded: bool,
    }

    impl LuaSource {
        /// Create a fresh interpreter with nothing loaded.
        pub fn new() -> Self {
            Self {
                lua: Lua::new(),
                loaded: false,
            }
        }

        /// Execute a chunk of Lua source.
        ///
        /// # Errors
        ///
        /// [`LuaPathError::SourceUnavailable`] with the interpreter's
        /// message. The state is closed on failure.
        pub fn load_string(&mut self, chunk: &str) -> Result<()> {
            let outcome = self.lua.load(chunk).exec();
            self.finish_load(outcome)
        }

        /// Execute a Lua source file.
        ///
        /// # Errors
        ///
        /// [`LuaPathError::SourceUnavailable`] if the file cannot be read or
        /// fails to run. The state is closed on failure.
        pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
            let outcome = self.lua.load(path.as_ref()).exec();
            self.finish_load(outcome)
        }

        /// True once a load has succeeded and the state has not been closed.
        pub fn is_loaded(&self) -> bool {
            self.loaded
        }

        /// Discard the interpreter state and everything loaded into it.
        pub fn close(&mut self) {
            self.lua = Lua::new();
            self.loaded = false;
        }

        fn finish_load(&mut self, outcome: LuaResult<()>) -> Result<()> {
            match outcome {
                Ok(()) => {
                    self.loaded = true;
                    Ok(())
                }
                Err(error) => {
                    self.close();
                    Err(LuaPathError::SourceUnavailable(error.to_string()))
                }
            }
        }
    }

    impl Default for LuaSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TableSource for LuaSource {
        type Node = LuaTable;

        fn global(&self, name: &str) -> Result<ForeignValue<LuaTable>> {
            let value: LuaValue = self
                .lua
                .globals()
                .get(name)
                .map_err(|error| LuaPathError::SourceUnavailable(error.to_string()))?;
            Ok(foreign_value(value))
        }

        fn entries(&self, node: &LuaTable) -> Result<Vec<ForeignEntry<LuaTable>>> {
            Ok(node
                .pairs::<LuaValue, LuaValue>()
                .map(|pair| {
                    pair.map(|(key, value)| (foreign_key(key), foreign_value(value)))
                        .map_err(|error| LuaPathError::TypeMismatch(error.to_string()))
                })
                .collect())
        }
    }

    fn foreign_key(key: LuaValue) -> ForeignKey {
        match key {
            LuaValue::Integer(index) => ForeignKey::Integer(index),
            LuaValue::Number(number) => ForeignKey::Number(number),
            LuaValue::String(text) => ForeignKey::Text(text.to_string_lossy()),
            other => ForeignKey::Unsupported(other.type_name().to_string()),
        }
    }

    fn foreign_value(value: LuaValue) -> ForeignValue<LuaTable> {
        match value {
            LuaValue::Nil => ForeignValue::Nil,
            LuaValue::Boolean(flag) => ForeignValue::Bool(flag),
            LuaValue::Integer(int) => ForeignValue::Integer(int),
            LuaValue::Number(number) => ForeignValue::Number(number),
            LuaValue::String(text) => ForeignValue::String(text.to_string_lossy()),
            LuaValue::Table(table) => ForeignValue::Table(table),
            other => ForeignValue::Unsupported(other.type_name().to_string()),
        }
    }
}
