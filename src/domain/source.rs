//! Package source (feed) structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials for an authenticated feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// An enabled package source with a stable identity
///
/// The orchestrator holds a working set of these per manifest; the set only
/// shrinks (on authentication failure) and is reseeded for the next
/// manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display name (e.g. `nuget.org` or the key from nuget.config)
    pub name: String,
    /// Feed URL, typically a V3 service index ending in `index.json`
    pub url: String,
    /// Optional credentials from packageSourceCredentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl Source {
    /// Creates a new source
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            credentials: None,
        }
    }

    /// Attaches credentials (builder pattern)
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// The default public feed used when no configuration is found
    pub fn nuget_org() -> Self {
        Self::new("nuget.org", "https://api.nuget.org/v3/index.json")
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}
