//! Package source configuration (nuget.config)
//!
//! The working source set for a manifest is seeded from the nearest
//! `nuget.config` found walking up from the manifest's directory:
//! `<packageSources>` entries minus `<disabledPackageSources>`, with
//! `<packageSourceCredentials>` attached. No config (or one that yields no
//! usable HTTP sources) means the public nuget.org V3 feed.

use crate::domain::{Credentials, Source};
use crate::error::ManifestError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Case variants under which the configuration file is commonly found
const CONFIG_FILE_NAMES: &[&str] = &["nuget.config", "NuGet.config", "NuGet.Config"];

/// Find the nearest configuration file, walking up from `start_dir`
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        current = dir.parent();
    }
    None
}

#[derive(Debug, Default)]
struct PartialCredentials {
    username: Option<String>,
    password: Option<String>,
}

/// Parse a nuget.config into the enabled source list
pub fn parse_config(path: &Path) -> Result<Vec<Source>, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;

    let mut entries: Vec<(String, String)> = Vec::new();
    let mut disabled: Vec<String> = Vec::new();
    let mut credentials: HashMap<String, PartialCredentials> = HashMap::new();

    #[derive(PartialEq)]
    enum Section {
        Other,
        PackageSources,
        DisabledSources,
        Credentials,
    }

    let mut section = Section::Other;
    let mut credential_source: Option<String> = None;
    let mut reader = Reader::from_str(&content);

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ManifestError::xml_error(path, e.to_string()))?;
        match event {
            // <add>/<clear> are usually self-closing but both spellings occur
            Event::Start(ref element) | Event::Empty(ref element)
                if matches!(element.local_name().as_ref(), b"add" | b"clear") =>
            {
                if element.local_name().as_ref() == b"clear" {
                    if section == Section::PackageSources {
                        entries.clear();
                    }
                    continue;
                }

                let mut key = None;
                let mut value = None;
                for attribute in element.attributes() {
                    let attribute =
                        attribute.map_err(|e| ManifestError::xml_error(path, e.to_string()))?;
                    let text = attribute
                        .unescape_value()
                        .map_err(|e| ManifestError::xml_error(path, e.to_string()))?
                        .into_owned();
                    match attribute.key.as_ref() {
                        b"key" => key = Some(text),
                        b"value" => value = Some(text),
                        _ => {}
                    }
                }

                match section {
                    Section::PackageSources => {
                        if let (Some(key), Some(value)) = (key, value) {
                            entries.push((key, value));
                        }
                    }
                    Section::DisabledSources => {
                        if let Some(key) = key {
                            disabled.push(key);
                        }
                    }
                    Section::Credentials => {
                        if let (Some(source), Some(key), Some(value)) =
                            (credential_source.as_ref(), key, value)
                        {
                            let entry = credentials.entry(source.clone()).or_default();
                            if key.eq_ignore_ascii_case("Username") {
                                entry.username = Some(value);
                            } else if key.eq_ignore_ascii_case("ClearTextPassword") {
                                entry.password = Some(value);
                            }
                        }
                    }
                    Section::Other => {}
                }
            }
            Event::Start(element) => match element.local_name().as_ref() {
                b"packageSources" => section = Section::PackageSources,
                b"disabledPackageSources" => section = Section::DisabledSources,
                b"packageSourceCredentials" => section = Section::Credentials,
                name => {
                    if section == Section::Credentials && credential_source.is_none() {
                        // Child element names inside the credentials section
                        // are the source names themselves
                        credential_source = Some(String::from_utf8_lossy(name).into_owned());
                    }
                }
            },
            Event::End(element) => match element.local_name().as_ref() {
                b"packageSources" | b"disabledPackageSources" => section = Section::Other,
                b"packageSourceCredentials" => {
                    section = Section::Other;
                    credential_source = None;
                }
                name => {
                    if credential_source.as_deref()
                        == Some(String::from_utf8_lossy(name).as_ref())
                    {
                        credential_source = None;
                    }
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let sources = entries
        .into_iter()
        .filter(|(name, _)| !disabled.iter().any(|d| d.eq_ignore_ascii_case(name)))
        // The in-process feed client speaks HTTP only; folder feeds are
        // left to the mutation tool's own resolution
        .filter(|(_, url)| url.starts_with("http://") || url.starts_with("https://"))
        .map(|(name, url)| {
            let mut source = Source::new(&name, url);
            if let Some(partial) = credentials
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&name))
                .map(|(_, v)| v)
            {
                if let (Some(username), Some(password)) =
                    (partial.username.clone(), partial.password.clone())
                {
                    source = source.with_credentials(Credentials::new(username, password));
                }
            }
            source
        })
        .collect();

    Ok(sources)
}

/// The enabled source set for a manifest's directory
///
/// Configuration problems are contained here: an unreadable or unusable
/// config falls back to the default public feed rather than failing the
/// manifest.
pub fn load_sources(manifest_dir: &Path) -> Vec<Source> {
    if let Some(config) = find_config(manifest_dir) {
        if let Ok(sources) = parse_config(&config) {
            if !sources.is_empty() {
                return sources;
            }
        }
    }
    vec![Source::nuget_org()]
}
