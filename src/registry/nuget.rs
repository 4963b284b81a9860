//! NuGet V3 feed adapter
//!
//! A source URL ending in `index.json` is treated as a V3 service index:
//! its `PackageBaseAddress/3.0.0` resource is resolved (once per source
//! per run) and the flat container queried at
//! `{base}/{lowercase id}/index.json`. A bare URL is used as a flat
//! container root directly. An unknown package (404) is an empty version
//! list, not an error.

use crate::domain::{PackageVersion, Source};
use crate::error::FeedError;
use crate::registry::{HttpClient, VersionFeed};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Resource type of the flat container in a V3 service index
const FLAT_CONTAINER_TYPE: &str = "PackageBaseAddress/3.0.0";

/// NuGet V3 feed adapter
pub struct NugetFeed {
    client: HttpClient,
    /// Service-index resolution cached per source URL, for this run only
    base_cache: Mutex<HashMap<String, String>>,
}

/// V3 service index response
#[derive(Debug, Deserialize)]
struct ServiceIndex {
    resources: Vec<ServiceResource>,
}

#[derive(Debug, Deserialize)]
struct ServiceResource {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    resource_type: String,
}

/// Flat container version list response
#[derive(Debug, Deserialize)]
struct VersionIndex {
    versions: Vec<String>,
}

impl NugetFeed {
    /// Create a new feed adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the flat container base URL for a source
    async fn flat_container_base(&self, source: &Source) -> Result<String, FeedError> {
        if let Some(base) = self.base_cache.lock().unwrap().get(&source.url) {
            return Ok(base.clone());
        }

        let base = if source.url.ends_with("index.json") {
            let index: ServiceIndex = self
                .client
                .get_json(&source.url, "", &source.name, source.credentials.as_ref())
                .await
                .map_err(|e| match e {
                    FeedError::NotFound { .. } => FeedError::MissingResource {
                        source_name: source.name.clone(),
                    },
                    other => other,
                })?;

            let resource = index
                .resources
                .into_iter()
                .find(|r| r.resource_type.starts_with(FLAT_CONTAINER_TYPE))
                .ok_or_else(|| FeedError::MissingResource {
                    source_name: source.name.clone(),
                })?;
            with_trailing_slash(resource.id)
        } else {
            with_trailing_slash(source.url.clone())
        };

        self.base_cache
            .lock()
            .unwrap()
            .insert(source.url.clone(), base.clone());
        Ok(base)
    }

    fn version_list_url(base: &str, package_id: &str) -> String {
        format!("{}{}/index.json", base, package_id.to_lowercase())
    }
}

#[async_trait]
impl VersionFeed for NugetFeed {
    async fn list_versions(
        &self,
        source: &Source,
        package_id: &str,
    ) -> Result<Vec<PackageVersion>, FeedError> {
        let base = self.flat_container_base(source).await?;
        let url = Self::version_list_url(&base, package_id);

        let index: VersionIndex = match self
            .client
            .get_json(&url, package_id, &source.name, source.credentials.as_ref())
            .await
        {
            Ok(index) => index,
            Err(FeedError::NotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        // Published entries the version parser does not understand are not
        // upgrade candidates; drop them rather than failing the source
        let mut versions: Vec<PackageVersion> = index
            .versions
            .iter()
            .filter_map(|v| PackageVersion::parse(v).ok())
            .collect();
        versions.sort();

        Ok(versions)
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
