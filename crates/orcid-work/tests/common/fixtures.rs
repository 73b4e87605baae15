//! Test fixture loading utilities

use std::path::PathBuf;

use orcid_work::Metadata;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a mock resolver response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    load_fixture(&format!("responses/{}", name))
}

/// Parse a resolver response fixture
#[allow(dead_code)]
pub fn load_metadata_fixture(name: &str) -> Metadata {
    Metadata::from_json(&load_response_fixture(name))
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path() {
        let path = fixture_path("responses/example_work.json");
        assert!(path.to_string_lossy().contains("test_fixtures"));
    }

    #[test]
    fn test_load_metadata_fixture() {
        let metadata = load_metadata_fixture("example_work.json");
        assert_eq!(metadata.title(), Some("Example Paper"));
    }
}
