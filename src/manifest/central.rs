//! Centrally managed version resolution (Directory.Packages.props)
//!
//! A reference without a version is resolved by walking from the project's
//! directory upward toward the scan root, loading a
//! `Directory.Packages.props` at each level and returning the first match.
//! The walk stops once the scan root has been checked, even if a parent
//! beyond it exists.

use crate::error::ManifestError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File name of the centrally-managed-versions declaration
pub const CENTRAL_VERSIONS_FILE: &str = "Directory.Packages.props";

/// Load the id → version map declared in a directory's props file
///
/// A missing file is an empty map. Both `<PackageVersion>` and
/// `<PackageReference>` elements are accepted as entries, wherever they
/// appear in the document.
pub fn load_central_versions(dir: &Path) -> Result<HashMap<String, String>, ManifestError> {
    let path = dir.join(CENTRAL_VERSIONS_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Ok(HashMap::new()),
    };

    let mut versions = HashMap::new();
    let mut reader = Reader::from_str(&content);

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                let name = element.local_name();
                if name.as_ref() != b"PackageVersion" && name.as_ref() != b"PackageReference" {
                    continue;
                }

                let mut id = None;
                let mut version = None;
                for attribute in element.attributes() {
                    let attribute =
                        attribute.map_err(|e| ManifestError::xml_error(&path, e.to_string()))?;
                    let value = attribute
                        .unescape_value()
                        .map_err(|e| ManifestError::xml_error(&path, e.to_string()))?
                        .into_owned();
                    match attribute.key.as_ref() {
                        b"Include" => id = Some(value),
                        b"Version" => version = Some(value),
                        _ => {}
                    }
                }

                if let (Some(id), Some(version)) = (id, version) {
                    if !id.is_empty() && !version.is_empty() {
                        versions.insert(id, version);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ManifestError::xml_error(&path, e.to_string())),
            _ => {}
        }
    }

    Ok(versions)
}

/// Resolve a package's centrally managed version
///
/// Walks from `start_dir` up to and including `root`; the first directory
/// declaring the package wins. A malformed props file along the way is
/// treated as declaring nothing. Returns `None` when no level declares the
/// package, in which case the caller reports the package as skipped.
pub fn resolve_central_version(package_id: &str, start_dir: &Path, root: &Path) -> Option<String> {
    let mut current = Some(start_dir);

    while let Some(dir) = current {
        if let Ok(versions) = load_central_versions(dir) {
            if let Some(version) = versions.get(package_id) {
                return Some(version.clone());
            }
        }

        // Stop once the scan root has been checked; a project outside the
        // root must not trigger an unbounded walk
        if dir == root {
            break;
        }

        current = dir.parent();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_props(dir: &Path, entries: &[(&str, &str)]) {
        fs::create_dir_all(dir).unwrap();
        let items: String = entries
            .iter()
            .map(|(id, v)| format!("    <PackageVersion Include=\"{}\" Version=\"{}\" />\n", id, v))
            .collect();
        let content = format!(
            "<Project>\n  <ItemGroup>\n{}  </ItemGroup>\n</Project>\n",
            items
        );
        fs::write(dir.join(CENTRAL_VERSIONS_FILE), content).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let versions = load_central_versions(dir.path()).unwrap();
        assert!(versions.is_empty());
    }

    #[test]
    fn test_load_package_version_elements() {
        let dir = TempDir::new().unwrap();
        write_props(dir.path(), &[("Serilog", "3.1.1"), ("Polly", "8.2.0")]);

        let versions = load_central_versions(dir.path()).unwrap();
        assert_eq!(versions.get("Serilog"), Some(&"3.1.1".to_string()));
        assert_eq!(versions.get("Polly"), Some(&"8.2.0".to_string()));
    }

    #[test]
    fn test_load_accepts_package_reference_elements() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CENTRAL_VERSIONS_FILE),
            r#"<Project>
  <ItemGroup>
    <PackageReference Include="Dapper" Version="2.1.35" />
  </ItemGroup>
</Project>"#,
        )
        .unwrap();

        let versions = load_central_versions(dir.path()).unwrap();
        assert_eq!(versions.get("Dapper"), Some(&"2.1.35".to_string()));
    }

    #[test]
    fn test_load_malformed_props() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CENTRAL_VERSIONS_FILE),
            "<Project><ItemGroup></Wrong></Project>",
        )
        .unwrap();
        assert!(load_central_versions(dir.path()).is_err());
    }

    #[test]
    fn test_resolve_from_nearest_level() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("services/api");
        write_props(root.path(), &[("Serilog", "2.0.0")]);
        write_props(&nested, &[("Serilog", "3.1.1")]);

        let version = resolve_central_version("Serilog", &nested, root.path());
        assert_eq!(version.as_deref(), Some("3.1.1"));
    }

    #[test]
    fn test_resolve_walks_up_to_root() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("services/api");
        fs::create_dir_all(&nested).unwrap();
        write_props(root.path(), &[("Polly", "8.2.0")]);

        let version = resolve_central_version("Polly", &nested, root.path());
        assert_eq!(version.as_deref(), Some("8.2.0"));
    }

    #[test]
    fn test_resolve_stops_at_root() {
        let outer = TempDir::new().unwrap();
        let root = outer.path().join("repo");
        let nested = root.join("src");
        fs::create_dir_all(&nested).unwrap();
        // Declared above the scan root: must not be found
        write_props(outer.path(), &[("Serilog", "9.9.9")]);

        let version = resolve_central_version("Serilog", &nested, &root);
        assert!(version.is_none());
    }

    #[test]
    fn test_resolve_unknown_package() {
        let root = TempDir::new().unwrap();
        write_props(root.path(), &[("Serilog", "3.1.1")]);

        assert!(resolve_central_version("Unknown.Package", root.path(), root.path()).is_none());
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let root = TempDir::new().unwrap();
        write_props(root.path(), &[("Serilog", "3.1.1")]);

        assert!(resolve_central_version("serilog", root.path(), root.path()).is_none());
    }
}
