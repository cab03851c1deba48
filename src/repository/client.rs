// src/repository/client.rs

//! Maven-layout repository client
//!
//! Implements the [`RepositoryClient`] capability over two kinds of
//! repositories: locally accessible trees (plain paths or `file://` URLs,
//! readable and writable) and remote HTTP endpoints (read-only, used as
//! staging sources). Remote fetches retry transient transport failures.

use crate::coordinate::{group_path, ArtifactCoordinate};
use crate::error::{Error, Result};
use crate::repository::{local, metadata, RemoteRepository, RepositoryClient, ResolvedArtifact};
use crate::version::compare_version_strings;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts for failed remote fetches
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Repository client for Maven-layout repositories
pub struct MavenRepositoryClient {
    http: Client,
    max_retries: u32,
}

impl MavenRepositoryClient {
    /// Create a new client
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            max_retries: MAX_RETRIES,
        })
    }

    /// Fetch a remote URL with retry support
    ///
    /// `Ok(None)` means the resource does not exist (HTTP 404); transport
    /// errors are retried up to the limit before failing.
    fn fetch_remote(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.http.get(url).send() {
                Ok(response) => {
                    if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Ok(None);
                    }
                    if !response.status().is_success() {
                        return Err(Error::Io(std::io::Error::other(format!(
                            "HTTP {} from {}",
                            response.status(),
                            url
                        ))));
                    }
                    let bytes = response.bytes().map_err(|e| {
                        Error::Io(std::io::Error::other(format!(
                            "failed to read response from {}: {}",
                            url, e
                        )))
                    })?;
                    return Ok(Some(bytes.to_vec()));
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::Io(std::io::Error::other(format!(
                            "failed to fetch {} after {} attempts: {}",
                            url, attempt, e
                        ))));
                    }
                    warn!("Fetch attempt {} for {} failed: {}, retrying...", attempt, url, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }
}

fn join_url(base: &str, relative: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), relative)
}

impl RepositoryClient for MavenRepositoryClient {
    fn resolve(
        &self,
        coordinate: &ArtifactCoordinate,
        repository: &RemoteRepository,
    ) -> Result<Vec<u8>> {
        debug!("Resolving {} from {}", coordinate, repository.url);

        if let Some(root) = repository.local_path() {
            return local::resolve(&root, coordinate);
        }

        let url = join_url(&repository.url, &coordinate.repository_path());
        self.fetch_remote(&url)?.ok_or_else(|| Error::Resolution {
            coordinates: coordinate.to_string(),
            repository: repository.url.clone(),
        })
    }

    fn deploy(&self, artifacts: &[ResolvedArtifact], repository: &RemoteRepository) -> Result<()> {
        let root = repository.local_path().ok_or_else(|| Error::Deployment {
            repository: repository.url.clone(),
            reason: "only locally accessible repositories can be deployed to".to_string(),
        })?;

        debug!("Deploying {} artifacts to {}", artifacts.len(), repository.url);

        local::deploy(&root, artifacts).map_err(|e| match e {
            already @ Error::Deployment { .. } => already,
            other => Error::Deployment {
                repository: repository.url.clone(),
                reason: other.to_string(),
            },
        })
    }

    fn highest_version(
        &self,
        group_id: &str,
        artifact_id: &str,
        repository: &RemoteRepository,
    ) -> Result<Option<String>> {
        let versions = if let Some(root) = repository.local_path() {
            local::list_versions(&root, group_id, artifact_id)?
        } else {
            let url = join_url(
                &repository.url,
                &format!(
                    "{}/{}/{}",
                    group_path(group_id),
                    artifact_id,
                    metadata::METADATA_FILE_NAME
                ),
            );
            match self.fetch_remote(&url)? {
                None => Vec::new(),
                Some(bytes) => {
                    let xml = String::from_utf8(bytes).map_err(|e| {
                        Error::Format(format!("invalid repository metadata at {}: {}", url, e))
                    })?;
                    metadata::read_versions(&xml)?
                }
            }
        };

        Ok(versions
            .into_iter()
            .max_by(|a, b| compare_version_strings(a, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_and_deploy_local() {
        let dir = tempdir().unwrap();
        let repository = RemoteRepository::new("target", dir.path().display().to_string());
        let client = MavenRepositoryClient::new().unwrap();

        let coordinate = ArtifactCoordinate::new("foo", "bar", "1.2.3");
        let artifact = ResolvedArtifact {
            coordinate: coordinate.clone(),
            data: b"payload".to_vec(),
        };

        client.deploy(&[artifact], &repository).unwrap();
        assert_eq!(client.resolve(&coordinate, &repository).unwrap(), b"payload");
        assert_eq!(
            client
                .highest_version("foo", "bar", &repository)
                .unwrap()
                .as_deref(),
            Some("1.2.3")
        );
    }

    #[test]
    fn test_deploy_to_remote_rejected() {
        let repository = RemoteRepository::new("central", "https://repo.example.com/maven2");
        let client = MavenRepositoryClient::new().unwrap();

        let artifact = ResolvedArtifact {
            coordinate: ArtifactCoordinate::new("foo", "bar", "1.2.3"),
            data: Vec::new(),
        };

        let result = client.deploy(&[artifact], &repository);
        assert!(matches!(result, Err(Error::Deployment { .. })));
    }

    #[test]
    fn test_highest_version_prefers_manifest_order() {
        let dir = tempdir().unwrap();
        let repository = RemoteRepository::new("target", dir.path().display().to_string());
        let client = MavenRepositoryClient::new().unwrap();

        for version in ["1.0.0.Final-rev00000002", "1.0.0.Final-rev00000010"] {
            let artifact = ResolvedArtifact {
                coordinate: ArtifactCoordinate::with_details(
                    "test",
                    "channel",
                    Some("channel".to_string()),
                    Some("toml".to_string()),
                    version,
                ),
                data: b"manifest".to_vec(),
            };
            client.deploy(&[artifact], &repository).unwrap();
        }

        assert_eq!(
            client
                .highest_version("test", "channel", &repository)
                .unwrap()
                .as_deref(),
            Some("1.0.0.Final-rev00000010")
        );
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://host/repo/", "a/b"), "http://host/repo/a/b");
        assert_eq!(join_url("http://host/repo", "a/b"), "http://host/repo/a/b");
    }
}
