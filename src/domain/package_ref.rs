//! Package reference structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `<PackageReference>` extracted from a project file
///
/// `version` is `None` when the project defers to centrally managed
/// versions (Directory.Packages.props).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReference {
    /// Package id as declared (NuGet ids are case-insensitive)
    pub id: String,
    /// The declared version or range, if any
    pub version: Option<String>,
}

impl PackageReference {
    /// Creates a reference with an explicit version
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: Some(version.into()),
        }
    }

    /// Creates a reference that relies on centrally managed versions
    pub fn centrally_managed(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
        }
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.id, version),
            None => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_version() {
        let reference = PackageReference::new("Serilog", "3.1.1");
        assert_eq!(reference.id, "Serilog");
        assert_eq!(reference.version.as_deref(), Some("3.1.1"));
    }

    #[test]
    fn test_centrally_managed_has_no_version() {
        let reference = PackageReference::centrally_managed("Serilog");
        assert!(reference.version.is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PackageReference::new("Polly", "8.0.0").to_string(),
            "Polly 8.0.0"
        );
        assert_eq!(
            PackageReference::centrally_managed("Polly").to_string(),
            "Polly"
        );
    }
}
