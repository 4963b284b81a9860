//! Project manifest discovery and parsing
//!
//! This module provides:
//! - csproj discovery honoring an ignore list (`locator`)
//! - PackageReference extraction from project XML (`project`)
//! - Centrally managed version resolution via Directory.Packages.props
//!   ancestor walking (`central`)

mod central;
mod locator;
mod project;

pub use central::{load_central_versions, resolve_central_version, CENTRAL_VERSIONS_FILE};
pub use locator::{is_ignored, locate_projects, resolve_ignore_dirs, IGNORE_FILE};
pub use project::{parse_project, parse_project_content};
