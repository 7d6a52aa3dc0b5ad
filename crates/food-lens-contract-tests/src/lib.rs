//! Helpers for validating wire payloads against the JSON schemas under
//! `contracts/`.

use jsonschema::JSONSchema;
use serde_json::Value;

/// Absolute path of a file under the repository `contracts/` directory.
pub fn contract_path(relative: &str) -> String {
    format!("{}/../../contracts/{relative}", env!("CARGO_MANIFEST_DIR"))
}

/// Reads and parses a JSON file.
///
/// # Panics
/// Panics when the file is missing or not JSON; only test code calls this.
pub fn load_json(path: &str) -> Value {
    let raw = std::fs::read_to_string(path)
        .unwrap_or_else(|error| panic!("{path} should be readable: {error}"));
    serde_json::from_str(&raw).unwrap_or_else(|error| panic!("{path} should be json: {error}"))
}

/// Compiles `contracts/<name>.schema.json`.
///
/// # Panics
/// Panics when the schema does not compile.
pub fn compile_schema(name: &str) -> JSONSchema {
    let schema = load_json(&contract_path(&format!("{name}.schema.json")));
    JSONSchema::compile(&schema)
        .unwrap_or_else(|error| panic!("{name} schema should compile: {error}"))
}

/// Loads `contracts/fixtures/<name>`.
pub fn load_fixture(name: &str) -> Value {
    load_json(&contract_path(&format!("fixtures/{name}")))
}
