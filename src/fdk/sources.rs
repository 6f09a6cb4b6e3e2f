//! Upstream registries that publish FDK releases.
//!
//! Each source is one step of the resolver's fallback chain. A source either
//! yields a version string or a [`SourceError`]; the resolver treats every
//! error the same way and moves on to the next source.

use super::VersionSource;
use roxmltree::Document;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Malformed response from {url}: {message}")]
    Parse { url: String, message: String },
    #[error("{url} did not list any versions")]
    Empty { url: String },
}

/// One strategy in the version fallback chain
pub trait VersionStrategy: Send + Sync {
    /// Which registry this strategy queries
    fn source(&self) -> VersionSource;

    fn endpoint(&self) -> &str;

    /// Fetch the latest published version from this registry
    fn fetch_latest(&self) -> Result<String, SourceError>;
}

/// Primary registry: a Maven repository `maven-metadata.xml` document.
pub struct MavenMetadataSource {
    url: String,
    timeout: Duration,
}

impl MavenMetadataSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl VersionStrategy for MavenMetadataSource {
    fn source(&self) -> VersionSource {
        VersionSource::Primary
    }

    fn endpoint(&self) -> &str {
        &self.url
    }

    fn fetch_latest(&self) -> Result<String, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| SourceError::Http {
                url: self.url.clone(),
                source: e,
            })?;

        let body = fetch_body(&client, &self.url)?;
        parse_maven_metadata(&body).map_err(|e| e.at(&self.url))
    }
}

/// Secondary registry: a package search endpoint returning a JSON array of
/// package descriptors.
///
/// Certificate verification is disabled for this endpoint only, because its
/// certificate chain cannot be verified from every client environment. The
/// relaxed client is built here and never shared with other requests.
pub struct PackageSearchSource {
    url: String,
    timeout: Duration,
}

impl PackageSearchSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl VersionStrategy for PackageSearchSource {
    fn source(&self) -> VersionSource {
        VersionSource::Secondary
    }

    fn endpoint(&self) -> &str {
        &self.url
    }

    fn fetch_latest(&self) -> Result<String, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| SourceError::Http {
                url: self.url.clone(),
                source: e,
            })?;

        let body = fetch_body(&client, &self.url)?;
        parse_package_search(&body).map_err(|e| e.at(&self.url))
    }
}

fn fetch_body(client: &reqwest::blocking::Client, url: &str) -> Result<String, SourceError> {
    debug!(url, "Fetching FDK version metadata");

    let response = client.get(url).send().map_err(|e| SourceError::Http {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|e| SourceError::Http {
        url: url.to_string(),
        source: e,
    })
}

/// Parse failure before the endpoint URL is attached
#[derive(Debug, PartialEq)]
pub(crate) enum BodyError {
    Malformed(String),
    NoVersions,
}

impl BodyError {
    fn at(self, url: &str) -> SourceError {
        match self {
            BodyError::Malformed(message) => SourceError::Parse {
                url: url.to_string(),
                message,
            },
            BodyError::NoVersions => SourceError::Empty {
                url: url.to_string(),
            },
        }
    }
}

/// Extract the latest version from a `maven-metadata.xml` document.
///
/// The document is only accepted when `versioning/versions` lists at least
/// one `version`. `versioning/latest` is authoritative; when it is blank the
/// last listed version is used.
pub(crate) fn parse_maven_metadata(body: &str) -> Result<String, BodyError> {
    let doc = Document::parse(body).map_err(|e| BodyError::Malformed(e.to_string()))?;

    let root = doc.root_element();
    if !root.has_tag_name("metadata") {
        return Err(BodyError::Malformed(format!(
            "expected <metadata> root, found <{}>",
            root.tag_name().name()
        )));
    }

    let versioning = root
        .children()
        .find(|n| n.has_tag_name("versioning"))
        .ok_or(BodyError::NoVersions)?;

    let versions: Vec<&str> = versioning
        .children()
        .filter(|n| n.has_tag_name("versions"))
        .flat_map(|n| n.children().filter(|c| c.has_tag_name("version")))
        .filter_map(|n| n.text())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();

    if versions.is_empty() {
        return Err(BodyError::NoVersions);
    }

    let latest = versioning
        .children()
        .find(|n| n.has_tag_name("latest"))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match latest {
        Some(latest) => Ok(latest.to_string()),
        None => Ok(versions[versions.len() - 1].to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct PackageDescriptor {
    #[serde(default)]
    latest_version: Option<String>,
}

/// Extract `latest_version` from the first descriptor of a search response.
pub(crate) fn parse_package_search(body: &str) -> Result<String, BodyError> {
    let descriptors: Vec<PackageDescriptor> =
        serde_json::from_str(body).map_err(|e| BodyError::Malformed(e.to_string()))?;

    descriptors
        .into_iter()
        .next()
        .and_then(|d| d.latest_version)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(BodyError::NoVersions)
}
