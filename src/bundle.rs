// src/bundle.rs

//! Promotable artifact bundles
//!
//! A bundle is the hand-off format between a build pipeline and the
//! promotion step: a `.tar.gz` archive carrying `artifact-list.toml` (the
//! coordinates to promote) and `repository/` (a Maven-layout tree
//! containing them). Opening a bundle extracts it to a scratch directory
//! that doubles as the promotion source repository and is removed when the
//! bundle is dropped.

use crate::coordinate::ArtifactCoordinate;
use crate::error::{Error, Result};
use crate::repository::{artifact_file, RemoteRepository};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tar::{Archive, Builder, Header};
use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;

/// Name of the listing file inside a bundle
pub const BUNDLE_LISTING: &str = "artifact-list.toml";

/// Directory inside a bundle holding the Maven-layout tree
pub const BUNDLE_REPOSITORY_DIR: &str = "repository";

#[derive(Debug, Serialize, Deserialize)]
struct BundleListing {
    artifacts: Vec<ArtifactCoordinate>,
}

/// An opened artifact bundle
///
/// Holds the scratch directory alive for as long as promotion needs the
/// extracted repository.
#[derive(Debug)]
pub struct ArtifactBundle {
    scratch: TempDir,
    artifacts: Vec<ArtifactCoordinate>,
}

impl ArtifactBundle {
    /// Extract a bundle archive into a scratch directory
    pub fn open(path: &Path) -> Result<Self> {
        let scratch = TempDir::new()?;

        let file = File::open(path).map_err(|e| {
            Error::Format(format!("cannot open bundle {}: {}", path.display(), e))
        })?;
        let mut archive = Archive::new(GzDecoder::new(file));
        archive.unpack(scratch.path()).map_err(|e| {
            Error::Format(format!("cannot unpack bundle {}: {}", path.display(), e))
        })?;

        let listing_path = scratch.path().join(BUNDLE_LISTING);
        if !listing_path.is_file() {
            return Err(Error::Format(format!(
                "bundle {} is missing {}",
                path.display(),
                BUNDLE_LISTING
            )));
        }

        let listing: BundleListing = toml::from_str(&fs::read_to_string(&listing_path)?)
            .map_err(|e| {
                Error::Format(format!(
                    "invalid {} in bundle {}: {}",
                    BUNDLE_LISTING,
                    path.display(),
                    e
                ))
            })?;

        debug!(
            "Opened bundle {} with {} artifacts",
            path.display(),
            listing.artifacts.len()
        );

        Ok(Self {
            scratch,
            artifacts: listing.artifacts,
        })
    }

    /// Coordinates listed for promotion
    pub fn artifacts(&self) -> &[ArtifactCoordinate] {
        &self.artifacts
    }

    /// The extracted Maven-layout tree as a source repository handle
    pub fn source_repository(&self) -> RemoteRepository {
        RemoteRepository::new(
            "bundle",
            self.scratch
                .path()
                .join(BUNDLE_REPOSITORY_DIR)
                .display()
                .to_string(),
        )
    }

    /// Pack a listing and a local repository tree into a bundle archive
    ///
    /// Every listed artifact must be present under `repository_root`; the
    /// whole tree is packed so checksums and metadata travel with it.
    pub fn create(
        dest: &Path,
        artifacts: &[ArtifactCoordinate],
        repository_root: &Path,
    ) -> Result<()> {
        let mut missing = Vec::new();
        for coordinate in artifacts {
            if !artifact_file(repository_root, coordinate).is_file() {
                missing.push(coordinate.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(Error::Resolution {
                coordinates: missing.join(", "),
                repository: repository_root.display().to_string(),
            });
        }

        let file = File::create(dest)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(encoder);

        let listing = BundleListing {
            artifacts: artifacts.to_vec(),
        };
        let listing = toml::to_string_pretty(&listing)
            .map_err(|e| Error::Format(format!("failed to encode bundle listing: {}", e)))?;
        let bytes = listing.as_bytes();

        let mut header = Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, BUNDLE_LISTING, bytes)?;

        for entry in WalkDir::new(repository_root) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(repository_root)
                .map_err(|e| Error::Format(format!("unexpected path in repository: {}", e)))?;
            builder.append_path_with_name(
                entry.path(),
                Path::new(BUNDLE_REPOSITORY_DIR).join(relative),
            )?;
        }

        let encoder = builder.into_inner()?;
        encoder.finish()?;

        debug!(
            "Created bundle {} with {} artifacts",
            dest.display(),
            artifacts.len()
        );
        Ok(())
    }
}
