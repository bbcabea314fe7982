//! `package.json` inspection.

use serde_json::Value;
use std::fs;
use std::path::Path;

/// Mappings that may declare a dependency, checked independently.
const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// Whether `package` is declared in `manifest` under either mapping.
///
/// A mapping with an unexpected shape is skipped without hiding the other.
pub fn declares(manifest: &Value, package: &str) -> bool {
    DEPENDENCY_SECTIONS.iter().any(|section| {
        manifest
            .get(section)
            .and_then(|deps| deps.as_object())
            .and_then(|deps| deps.get(package))
            .is_some_and(is_declared_version)
    })
}

fn is_declared_version(value: &Value) -> bool {
    match value {
        Value::String(version) => !version.is_empty(),
        Value::Null | Value::Bool(false) => false,
        _ => true,
    }
}

/// Check the manifest at `path` for `package`.
///
/// A missing or malformed manifest counts as "not declared".
pub fn is_dependency_declared(path: &Path, package: &str) -> bool {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("No manifest at {}: {e}", path.display());
            return false;
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(manifest) => declares(&manifest, package),
        Err(e) => {
            log::warn!("Ignoring malformed manifest {}: {e}", path.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("package.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_runtime_dependency() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"dependencies": {"dotenv": "^16.0.0"}}"#);
        assert!(is_dependency_declared(&path, "dotenv"));
    }

    #[test]
    fn test_dev_dependency() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"devDependencies": {"dotenv": "16.4.5"}}"#);
        assert!(is_dependency_declared(&path, "dotenv"));
    }

    #[test]
    fn test_absent_dependency() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"{"name": "app", "dependencies": {"express": "^4"}, "devDependencies": null}"#,
        );
        assert!(!is_dependency_declared(&path, "dotenv"));
    }

    #[test]
    fn test_other_mapping_with_odd_shape() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"{"dependencies": {"dotenv": "^16.0.0"}, "devDependencies": []}"#,
        );
        assert!(is_dependency_declared(&path, "dotenv"));

        let path = write_manifest(
            &dir,
            r#"{"dependencies": "x", "devDependencies": {"dotenv": "16.4.5"}}"#,
        );
        assert!(is_dependency_declared(&path, "dotenv"));

        let path = write_manifest(&dir, r#"{"dependencies": ["dotenv"]}"#);
        assert!(!is_dependency_declared(&path, "dotenv"));
    }

    #[test]
    fn test_empty_version_is_not_declared() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"dependencies": {"dotenv": ""}}"#);
        assert!(!is_dependency_declared(&path, "dotenv"));
    }

    #[test]
    fn test_missing_or_malformed_manifest() {
        let dir = TempDir::new().unwrap();
        assert!(!is_dependency_declared(&dir.path().join("package.json"), "dotenv"));

        let path = write_manifest(&dir, "{ not json");
        assert!(!is_dependency_declared(&path, "dotenv"));

        let path = write_manifest(&dir, "null");
        assert!(!is_dependency_declared(&path, "dotenv"));
    }
}
