//! PackageReference extraction from csproj files
//!
//! A project file is read as `Project/ItemGroup/PackageReference` items.
//! The version may be declared as a `Version` attribute or a nested
//! `Version` element; references without either defer to centrally managed
//! versions. Other item types and unknown attributes are ignored.

use crate::domain::PackageReference;
use crate::error::ManifestError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProjectXml {
    #[serde(rename = "ItemGroup", default)]
    item_groups: Vec<ItemGroupXml>,
}

#[derive(Debug, Deserialize)]
struct ItemGroupXml {
    #[serde(rename = "PackageReference", default)]
    package_references: Vec<PackageReferenceXml>,
}

#[derive(Debug, Deserialize)]
struct PackageReferenceXml {
    #[serde(rename = "@Include")]
    include: Option<String>,
    #[serde(rename = "@Version")]
    version_attribute: Option<String>,
    #[serde(rename = "Version")]
    version_element: Option<String>,
}

/// Parse a project file into its package references
///
/// Malformed XML is a local failure: the caller reports it and moves on to
/// the next manifest.
pub fn parse_project(path: &Path) -> Result<Vec<PackageReference>, ManifestError> {
    let content =
        fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    parse_project_content(&content).map_err(|message| ManifestError::xml_error(path, message))
}

/// Parse csproj content; separated from file IO for testability
pub fn parse_project_content(content: &str) -> Result<Vec<PackageReference>, String> {
    let project: ProjectXml = quick_xml::de::from_str(content).map_err(|e| e.to_string())?;

    let references = project
        .item_groups
        .into_iter()
        .flat_map(|group| group.package_references)
        .filter_map(|reference| {
            // References without Include (e.g. Update/Remove items) are not ours
            let id = reference.include?;
            let version = reference
                .version_attribute
                .or(reference.version_element)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            Some(match version {
                Some(version) => PackageReference::new(id, version),
                None => PackageReference::centrally_managed(id),
            })
        })
        .collect();

    Ok(references)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_attribute() {
        let content = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Serilog" Version="3.1.1" />
    <PackageReference Include="Polly" Version="8.2.0" />
  </ItemGroup>
</Project>"#;

        let refs = parse_project_content(content).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], PackageReference::new("Serilog", "3.1.1"));
        assert_eq!(refs[1], PackageReference::new("Polly", "8.2.0"));
    }

    #[test]
    fn test_parse_version_element() {
        let content = r#"<Project>
  <ItemGroup>
    <PackageReference Include="Dapper">
      <Version>2.1.35</Version>
    </PackageReference>
  </ItemGroup>
</Project>"#;

        let refs = parse_project_content(content).unwrap();
        assert_eq!(refs, vec![PackageReference::new("Dapper", "2.1.35")]);
    }

    #[test]
    fn test_parse_multiple_item_groups() {
        let content = r#"<Project>
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Serilog" Version="3.1.1" />
  </ItemGroup>
  <ItemGroup>
    <PackageReference Include="xunit" Version="2.6.6" />
  </ItemGroup>
</Project>"#;

        let refs = parse_project_content(content).unwrap();
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_parse_centrally_managed_reference() {
        let content = r#"<Project>
  <ItemGroup>
    <PackageReference Include="Serilog" />
  </ItemGroup>
</Project>"#;

        let refs = parse_project_content(content).unwrap();
        assert_eq!(refs, vec![PackageReference::centrally_managed("Serilog")]);
    }

    #[test]
    fn test_parse_blank_version_is_centrally_managed() {
        let content = r#"<Project>
  <ItemGroup>
    <PackageReference Include="Serilog" Version="  " />
  </ItemGroup>
</Project>"#;

        let refs = parse_project_content(content).unwrap();
        assert!(refs[0].version.is_none());
    }

    #[test]
    fn test_parse_skips_update_items() {
        let content = r#"<Project>
  <ItemGroup>
    <PackageReference Update="Serilog" Version="3.1.1" />
    <PackageReference Include="Polly" Version="8.2.0" />
  </ItemGroup>
</Project>"#;

        let refs = parse_project_content(content).unwrap();
        assert_eq!(refs, vec![PackageReference::new("Polly", "8.2.0")]);
    }

    #[test]
    fn test_parse_ignores_other_items_and_metadata() {
        let content = r#"<Project>
  <ItemGroup>
    <ProjectReference Include="../Lib/Lib.csproj" />
    <PackageReference Include="coverlet.collector" Version="6.0.0">
      <PrivateAssets>all</PrivateAssets>
    </PackageReference>
  </ItemGroup>
</Project>"#;

        let refs = parse_project_content(content).unwrap();
        assert_eq!(refs, vec![PackageReference::new("coverlet.collector", "6.0.0")]);
    }

    #[test]
    fn test_parse_no_item_groups() {
        let content = "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>";
        let refs = parse_project_content(content).unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn test_parse_malformed_xml() {
        let content = "<Project><ItemGroup></Project>";
        assert!(parse_project_content(content).is_err());
    }

    #[test]
    fn test_parse_project_missing_file() {
        let err = parse_project(Path::new("/no/such/dir/App.csproj")).unwrap_err();
        assert!(matches!(err, ManifestError::ReadError { .. }));
    }
}
