//! `LuaSource` against a real Lua 5.4 state. Run with `--features lua`.

#![cfg(feature = "lua")]

use std::io::Write;

use luapath_core::{BuildOptions, LuaPathError, LuaSource, TableSource, Value, ValueKind};

const SCRIPT: &str = r#"
cars = {
    honda = { price = 40.8, speed = 20, owner = "Jack" },
    bmw = { price = 40, speed = 250 },
    [5] = { price = 0, class = { model = "S", engine = 1.5, 8, 9 }, old = true },
    ["yello"] = "hey",
    "x",
    y = nil
}

N1 = 5.0
bool1 = false
str1 = "hello"
table1 = {}
handler = function() end

company = {
    what = "Business",
    really = false,
    ["why?"] = "its fictional",
    established = 2014,
    buildings = {
        { city = "Dublin", employees = 200, bosses = { "Jack", "John" } },
        { city = "Carlow", bosses = 0 }
    },
    empty = {},
    { 1, 2, 3 },
    [-1] = "ten",
    hook = print,
    [1.5] = "fractional",
}

superStructure = {
    [1] = {
        level2 = {
            arrays = {
                [6] = { 10, 20, 30, 40.4, 50 },
                [8] = { 10, 20, allowed = 30, 40.4, 50 },
                [9] = { 10, 20, notAllowed = "wrong", 40.4, 50 },
                [10] = { "10", "20", "30", "40", "50" },
                [11] = { true }
            },
            [3] = {
                ["4"] = {
                    ["5"] = 6,
                    ["5.1"] = { "x", "y", "z" },
                    ["5#2"] = { false, false }
                }
            }
        }
    }
}
"#;

fn loaded() -> LuaSource {
    let mut source = LuaSource::new();
    source.load_string(SCRIPT).unwrap();
    assert!(source.is_loaded());
    source
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn new_state_is_not_loaded() {
    assert!(!LuaSource::new().is_loaded());
}

#[test]
fn syntax_error_is_source_unavailable_and_closes() {
    let mut source = loaded();
    let result = source.load_string("this is not lua");

    assert!(matches!(result, Err(LuaPathError::SourceUnavailable(_))));
    assert!(!source.is_loaded());
    // The failed load discarded the previous state.
    assert!(matches!(
        source.global_value("str1"),
        Err(LuaPathError::PathLookup(_))
    ));
}

#[test]
fn runtime_error_is_source_unavailable() {
    let mut source = LuaSource::new();
    let result = source.load_string("error('boom')");

    match result {
        Err(LuaPathError::SourceUnavailable(message)) => assert!(message.contains("boom")),
        other => panic!("expected SourceUnavailable, got {other:?}"),
    }
}

#[test]
fn load_file_executes_script() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "answer = 42").unwrap();

    let mut source = LuaSource::new();
    source.load_file(file.path()).unwrap();

    assert!(source.is_loaded());
    assert_eq!(source.global_value("answer").unwrap().to_i64().unwrap(), 42);
}

#[test]
fn missing_file_is_source_unavailable() {
    let mut source = LuaSource::new();
    let result = source.load_file("/definitely/not/here.lua");
    assert!(matches!(result, Err(LuaPathError::SourceUnavailable(_))));
}

#[test]
fn close_discards_globals() {
    let mut source = loaded();
    source.close();

    assert!(!source.is_loaded());
    assert!(source.global_value("str1").is_err());
}

// ============================================================================
// Globals
// ============================================================================

#[test]
fn reads_global_values() {
    let source = loaded();

    let number = source.global_value("N1").unwrap();
    assert_eq!(number.kind(), ValueKind::Number);
    assert!((number.to_f64().unwrap() - 5.0).abs() < 1e-9);
    assert_eq!(number.to_i64().unwrap(), 5);

    assert_eq!(source.global_value("str1").unwrap(), Value::string("hello"));
    assert!(!source.global_value("bool1").unwrap().to_bool().unwrap());
}

#[test]
fn global_value_errors() {
    let source = loaded();

    assert!(matches!(
        source.global_value("company"),
        Err(LuaPathError::TypeMismatch(_))
    ));
    assert!(matches!(
        source.global_value("handler"),
        Err(LuaPathError::TypeMismatch(_))
    ));
    assert!(matches!(
        source.global_value("nonExistent"),
        Err(LuaPathError::PathLookup(_))
    ));
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn reads_table_values() {
    let source = loaded();

    let company = source.global_table("company").unwrap();
    assert_eq!(company.get_value(".what").unwrap(), Value::string("Business"));
    assert_eq!(company.get_value(".established").unwrap().to_i64().unwrap(), 2014);
    assert!(!company.get_value(".really").unwrap().to_bool().unwrap());
    assert_eq!(company.get_value("#-1").unwrap(), Value::string("ten"));
    assert_eq!(company.get_value(".buildings#1.bosses#2").unwrap(), Value::string("John"));

    let cars = source.global_table("cars").unwrap();
    let price = cars.get_table(".honda").unwrap().get_value(".price").unwrap();
    assert!((price.to_f64().unwrap() - 40.8).abs() < 1e-9);
    assert_eq!(cars.get_value(".bmw.price").unwrap().to_i64().unwrap(), 40);
    assert_eq!(cars.get_value("#5.class.model").unwrap(), Value::string("S"));
    assert_eq!(cars.get_value("#1").unwrap(), Value::string("x"));

    let super_structure = source.global_table("superStructure").unwrap();
    assert_eq!(
        super_structure.get_value("#1.level2#3.4.5").unwrap().to_i64().unwrap(),
        6
    );
}

#[test]
fn fractional_number_key_becomes_string_key() {
    let company = loaded().global_table("company").unwrap();
    // The path syntax cannot address "1.5": it splits into `1` and `5`.
    assert!(company.get_value(".1.5").is_err());
    assert!(company
        .leaves()
        .keys()
        .any(|key| !key.is_number() && key.text() == "1.5"));
}

#[test]
fn function_entries_are_skipped_with_diagnostic() {
    let build = loaded()
        .build_global("company", BuildOptions::default())
        .unwrap();

    assert_eq!(build.diagnostics.len(), 1);
    assert!(build.diagnostics[0].message.contains("hook"));
    assert!(build.table.get_value(".what").is_ok());
}

#[test]
fn lookup_failures_match_across_adapters() {
    let cars = loaded().global_table("cars").unwrap();

    for path in [
        "",
        ".honda.price.JUNK",
        "#5.NON_EXISTANT_TABLE.class.model",
        "#5.class",
        "Wrong",
        "#5..class",
    ] {
        assert!(matches!(cars.get_value(path), Err(LuaPathError::PathLookup(_))));
        let mut out = None;
        assert!(!cars.get_value_into(path, &mut out), "path {path:?}");
    }

    let mut table = None;
    assert!(!cars.get_table_into("#5.class.NON_EXISTANT_TABLE", &mut table));
}

#[test]
fn reads_arrays() {
    let arrays = loaded()
        .global_table("superStructure")
        .unwrap()
        .get_table("#1.level2.arrays")
        .unwrap();

    let strings = arrays.get_table("#10").unwrap().to_array::<String>().unwrap();
    assert_eq!(strings, vec!["10", "20", "30", "40", "50"]);

    let floats = arrays.get_table("#6").unwrap().to_array::<f64>().unwrap();
    assert_eq!(floats, vec![10.0, 20.0, 30.0, 40.4, 50.0]);

    let ints = arrays.get_table("#8").unwrap().to_array::<i32>().unwrap();
    for expected in [10, 20, 30, 40, 50] {
        assert!(ints.contains(&expected), "missing {expected}");
    }

    assert_eq!(arrays.get_table("#11").unwrap().to_array::<bool>().unwrap().len(), 1);

    assert!(matches!(
        arrays.get_table("#9").unwrap().to_array::<f32>(),
        Err(LuaPathError::TypeMismatch(_))
    ));
    assert!(matches!(
        arrays.get_table("#10").unwrap().to_array::<bool>(),
        Err(LuaPathError::TypeMismatch(_))
    ));
}

#[test]
fn renders_loaded_table() {
    let cars = loaded().global_table("cars").unwrap();
    let rendered = cars.to_string();

    assert!(rendered.starts_with("cars = {\n"));
    assert!(rendered.contains("[1] = \"x\""));
    assert!(rendered.ends_with("}\n"));
}
