// src/repository/mod.rs

//! Repository handles and the repository client capability
//!
//! This module provides:
//! - Repository endpoint handles and local/remote classification
//! - The client trait the promotion orchestrator is written against
//! - A concrete client for Maven-layout repositories (local filesystem
//!   for read/write, HTTP for read-only source repositories)
//! - `maven-metadata.xml` reading and writing

mod client;
mod local;
mod metadata;

pub use client::MavenRepositoryClient;
pub use local::{artifact_file, list_versions};
pub use metadata::{read_versions, render_metadata, METADATA_FILE_NAME};

use crate::coordinate::ArtifactCoordinate;
use crate::error::Result;
use std::path::PathBuf;
use url::Url;

/// A named repository endpoint
///
/// The URL may be an `http(s)://` endpoint, a `file://` URL, or a plain
/// filesystem path. Only the latter two are writable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
}

impl RemoteRepository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    /// Filesystem root of this repository, if it is locally accessible
    pub fn local_path(&self) -> Option<PathBuf> {
        match Url::parse(&self.url) {
            Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
            Ok(_) => None,
            // not a URL at all - treat it as a plain filesystem path
            Err(_) => Some(PathBuf::from(&self.url)),
        }
    }

    /// Whether this repository supports direct read-after-write access
    pub fn is_local(&self) -> bool {
        self.local_path().is_some()
    }
}

/// An artifact resolved to its bytes, ready to deploy
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub coordinate: ArtifactCoordinate,
    pub data: Vec<u8>,
}

/// Repository client capability consumed by the promotion orchestrator
///
/// Injected as an explicit collaborator so tests can substitute doubles.
pub trait RepositoryClient {
    /// Resolve a concrete artifact to its bytes
    fn resolve(
        &self,
        coordinate: &ArtifactCoordinate,
        repository: &RemoteRepository,
    ) -> Result<Vec<u8>>;

    /// Deploy a batch of artifacts
    ///
    /// Returns only once every artifact in the batch is durably stored.
    fn deploy(&self, artifacts: &[ResolvedArtifact], repository: &RemoteRepository) -> Result<()>;

    /// Highest available version of an artifact, evaluated over an
    /// open-ended lower-bound range
    ///
    /// Absence (artifact never deployed) is `Ok(None)`, not an error.
    fn highest_version(
        &self,
        group_id: &str,
        artifact_id: &str,
        repository: &RemoteRepository,
    ) -> Result<Option<String>>;
}
