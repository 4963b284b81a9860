//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: project file reading and XML parsing
//! - VersionError: declared version strings that cannot be resolved
//! - FeedError: package feed communication
//! - ToolError: `dotnet add package` invocation failures
//!
//! Per-manifest, per-package and per-source errors are caught and reported
//! at their own scope; only a ToolError from a non-zero mutation tool exit
//! aborts the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to project file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read a project or props file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML parsing error
    #[error("failed to parse {path}: {message}")]
    XmlError { path: PathBuf, message: String },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new XmlError
    pub fn xml_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::XmlError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors related to declared version strings
#[derive(Error, Debug)]
pub enum VersionError {
    /// The string is neither a valid exact version nor a valid range
    #[error("unrecognized version '{value}'")]
    Unparsable { value: String },

    /// A range with no lower bound has no usable current version
    #[error("version range '{value}' has no lower bound")]
    UnboundedRange { value: String },
}

impl VersionError {
    /// Creates a new Unparsable error
    pub fn unparsable(value: impl Into<String>) -> Self {
        VersionError::Unparsable {
            value: value.into(),
        }
    }

    /// Creates a new UnboundedRange error
    pub fn unbounded(value: impl Into<String>) -> Self {
        VersionError::UnboundedRange {
            value: value.into(),
        }
    }
}

/// Errors related to package feed communication
///
/// Fields hold the source's display name, not an underlying error value.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The feed rejected the request as unauthenticated or forbidden
    #[error("authentication failed for source '{source_name}'")]
    Unauthorized { source_name: String },

    /// The feed has never heard of the package
    #[error("package '{package}' not found on {source_name}")]
    NotFound {
        package: String,
        source_name: String,
    },

    /// Network request failed
    #[error("failed to query '{package}' on {source_name}: {message}")]
    NetworkError {
        package: String,
        source_name: String,
        message: String,
    },

    /// The feed answered with something other than the expected JSON
    #[error("invalid response from {source_name} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        source_name: String,
        message: String,
    },

    /// The service index carries no flat-container resource
    #[error("source '{source_name}' does not expose a package base address")]
    MissingResource { source_name: String },
}

impl FeedError {
    /// Creates a new Unauthorized error
    pub fn unauthorized(source_name: impl Into<String>) -> Self {
        FeedError::Unauthorized {
            source_name: source_name.into(),
        }
    }

    /// Creates a new NotFound error
    pub fn not_found(package: impl Into<String>, source_name: impl Into<String>) -> Self {
        FeedError::NotFound {
            package: package.into(),
            source_name: source_name.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FeedError::NetworkError {
            package: package.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FeedError::InvalidResponse {
            package: package.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error should remove the source from the working set
    pub fn is_authentication(&self) -> bool {
        matches!(self, FeedError::Unauthorized { .. })
    }
}

/// Errors related to the external mutation tool
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool could not be started at all
    #[error("failed to run dotnet: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited non-zero; the workspace state is ambiguous
    #[error("dotnet add package exited with status {code}")]
    Failed {
        code: i32,
        stdout: String,
        stderr: String,
    },
}
