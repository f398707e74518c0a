//! Shared fixtures: an in-memory `TableSource` written like a script.
//!
//! `Script` values are built with the small constructor helpers below and
//! listed in deliberately unsorted order so tests also cover key ordering.

#![allow(dead_code)]

use luapath_core::error::Result;
use luapath_core::{ForeignEntry, ForeignKey, ForeignValue, LuaPathError, TableSource};

#[derive(Debug, Clone)]
pub enum Script {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Table(Vec<(ForeignKey, Script)>),
    /// A function value: has no typed counterpart.
    Function,
    /// An entry whose read fails.
    Unreadable,
    /// A table whose contents cannot be enumerated.
    Sealed,
}

pub fn b(flag: bool) -> Script {
    Script::Bool(flag)
}

pub fn n(int: i64) -> Script {
    Script::Int(int)
}

pub fn f(float: f64) -> Script {
    Script::Float(float)
}

pub fn s(text: &str) -> Script {
    Script::Str(text.to_string())
}

/// A table from explicit `(key, value)` pairs.
pub fn t(entries: Vec<(ForeignKey, Script)>) -> Script {
    Script::Table(entries)
}

/// An array-style table: implicit keys 1, 2, 3, ...
pub fn arr(items: Vec<Script>) -> Script {
    Script::Table(
        items
            .into_iter()
            .zip(1i64..)
            .map(|(item, index)| (ForeignKey::Integer(index), item))
            .collect(),
    )
}

/// Field key `name = ...`.
pub fn k(name: &str) -> ForeignKey {
    ForeignKey::Text(name.to_string())
}

/// Index key `[index] = ...`.
pub fn i(index: i64) -> ForeignKey {
    ForeignKey::Integer(index)
}

#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    globals: Vec<(String, Script)>,
}

impl ScriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: Script) -> Self {
        self.globals.push((name.to_string(), value));
        self
    }
}

fn foreign(script: &Script) -> ForeignValue<Script> {
    match script {
        Script::Bool(flag) => ForeignValue::Bool(*flag),
        Script::Int(int) => ForeignValue::Integer(*int),
        Script::Float(float) => ForeignValue::Number(*float),
        Script::Str(text) => ForeignValue::String(text.clone()),
        Script::Table(_) | Script::Sealed => ForeignValue::Table(script.clone()),
        Script::Function | Script::Unreadable => ForeignValue::Unsupported("function".to_string()),
    }
}

impl TableSource for ScriptSource {
    type Node = Script;

    fn global(&self, name: &str) -> Result<ForeignValue<Script>> {
        Ok(self
            .globals
            .iter()
            .find(|(global, _)| global == name)
            .map_or(ForeignValue::Nil, |(_, value)| foreign(value)))
    }

    fn entries(&self, node: &Script) -> Result<Vec<ForeignEntry<Script>>> {
        match node {
            Script::Table(entries) => Ok(entries
                .iter()
                .map(|(key, value)| match value {
                    Script::Unreadable => Err(LuaPathError::TypeMismatch(
                        "entry could not be read".to_string(),
                    )),
                    other => Ok((key.clone(), foreign(other))),
                })
                .collect()),
            Script::Sealed => Err(LuaPathError::SourceUnavailable(
                "table is sealed".to_string(),
            )),
            _ => Err(LuaPathError::TypeMismatch("not a table".to_string())),
        }
    }
}

/// The reference fixture: the same shape as the script used across the
/// test suite.
///
/// ```lua
/// cars = {
///     honda = { price = 40.8, speed = 20, owner = "Jack" },
///     bmw = { price = 40, speed = 250 },
///     [5] = { price = 0, class = { model = "S", engine = 1.5, 8, 9 }, old = true },
///     ["yello"] = "hey",
///     "x",
/// }
/// N1 = 5.0
/// bool1 = false
/// str1 = "hello"
/// table1 = {}
/// company = { ... }
/// superStructure = { [1] = { level2 = { arrays = { ... }, [3] = { ["4"] = { ... } } } } }
/// ```
pub fn fixture() -> ScriptSource {
    ScriptSource::new()
        .with(
            "cars",
            t(vec![
                (k("honda"), t(vec![(k("price"), f(40.8)), (k("speed"), n(20)), (k("owner"), s("Jack"))])),
                (k("bmw"), t(vec![(k("price"), n(40)), (k("speed"), n(250))])),
                (
                    i(5),
                    t(vec![
                        (k("price"), n(0)),
                        (
                            k("class"),
                            t(vec![
                                (k("model"), s("S")),
                                (k("engine"), f(1.5)),
                                (i(1), n(8)),
                                (i(2), n(9)),
                            ]),
                        ),
                        (k("old"), b(true)),
                    ]),
                ),
                (k("yello"), s("hey")),
                (i(1), s("x")),
            ]),
        )
        .with("N1", f(5.0))
        .with("bool1", b(false))
        .with("str1", s("hello"))
        .with("table1", t(vec![]))
        .with("handler", Script::Function)
        .with(
            "company",
            t(vec![
                (k("what"), s("Business")),
                (k("really"), b(false)),
                (k("why?"), s("its fictional")),
                (k("established"), n(2014)),
                (k("sector"), s("Construction")),
                (
                    k("buildings"),
                    arr(vec![
                        t(vec![
                            (k("city"), s("Dublin")),
                            (k("employees"), n(200)),
                            (k("revenue"), f(5.0)),
                            (k("bosses"), arr(vec![s("Jack"), s("John")])),
                        ]),
                        t(vec![(k("city"), s("Carlow")), (k("bosses"), n(0))]),
                    ]),
                ),
                (k("empty"), t(vec![])),
                (i(1), arr(vec![n(1), n(2), n(3)])),
                (i(-1), s("ten")),
                (k("good"), b(true)),
            ]),
        )
        .with(
            "superStructure",
            t(vec![(
                i(1),
                t(vec![(
                    k("level2"),
                    t(vec![
                        (
                            k("arrays"),
                            t(vec![
                                (i(6), arr(vec![n(10), n(20), n(30), f(40.4), n(50)])),
                                (i(7), arr(vec![n(10), n(20), n(30), f(40.4), n(50), b(true)])),
                                (
                                    i(8),
                                    t(vec![
                                        (i(1), n(10)),
                                        (i(2), n(20)),
                                        (k("allowed"), n(30)),
                                        (i(3), f(40.4)),
                                        (i(4), n(50)),
                                    ]),
                                ),
                                (
                                    i(9),
                                    t(vec![
                                        (i(1), n(10)),
                                        (i(2), n(20)),
                                        (k("notAllowed"), s("wrong")),
                                        (i(3), f(40.4)),
                                        (i(4), n(50)),
                                    ]),
                                ),
                                (i(10), arr(vec![s("10"), s("20"), s("30"), s("40"), s("50")])),
                                (i(11), arr(vec![b(true)])),
                            ]),
                        ),
                        (
                            i(3),
                            t(vec![(
                                k("4"),
                                t(vec![
                                    (k("5"), n(6)),
                                    (k("5.1"), arr(vec![s("x"), s("y"), s("z")])),
                                    (k("5#2"), arr(vec![b(false), b(false)])),
                                ]),
                            )]),
                        ),
                    ]),
                )]),
            )]),
        )
}
