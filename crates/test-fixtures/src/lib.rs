//! Dialogue fixtures for mmos tests.
//!
//! Fixture JSON lives next to this crate under `short_memory/`. Any crate in
//! the workspace can load it by relative path.

use std::path::PathBuf;

use serde::de::DeserializeOwned;

/// Directory holding the fixture folders, found by walking up from the
/// calling crate's manifest directory.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    loop {
        let candidate = path.join("test-fixtures");
        if candidate.join("short_memory").is_dir() {
            return candidate;
        }
        if path.ends_with("test-fixtures") && path.join("short_memory").is_dir() {
            return path;
        }
        if !path.pop() {
            panic!("no test-fixtures directory above {manifest_dir}");
        }
    }
}

/// Load and deserialize a JSON fixture.
///
/// # Panics
/// If the file is missing or does not deserialize into `T`.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
}

pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// JSON files directly inside `subdir`, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}
