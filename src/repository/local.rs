// src/repository/local.rs

//! Local Maven-layout repository access
//!
//! Artifacts live at `group/segments/artifact/version/file`. Deploys stage
//! to a temporary file and atomically rename into place, write a SHA-256
//! sidecar next to each artifact, and refresh the per-artifact
//! `maven-metadata.xml` once the batch has landed.

use crate::coordinate::{group_path, ArtifactCoordinate};
use crate::error::{Error, Result};
use crate::repository::{metadata, ResolvedArtifact};
use crate::version::compare_version_strings;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of checksum sidecar files
const CHECKSUM_EXTENSION: &str = "sha256";

/// Absolute path of an artifact inside a local repository
pub fn artifact_file(root: &Path, coordinate: &ArtifactCoordinate) -> PathBuf {
    root.join(coordinate.repository_path())
}

/// Directory holding all versions of one artifact
fn artifact_dir(root: &Path, group_id: &str, artifact_id: &str) -> PathBuf {
    root.join(group_path(group_id)).join(artifact_id)
}

fn checksum_file(artifact: &Path) -> PathBuf {
    let mut name = artifact.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(CHECKSUM_EXTENSION);
    artifact.with_file_name(name)
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Read an artifact's bytes, verifying its checksum sidecar when present
pub fn resolve(root: &Path, coordinate: &ArtifactCoordinate) -> Result<Vec<u8>> {
    let path = artifact_file(root, coordinate);
    if !path.is_file() {
        return Err(Error::Resolution {
            coordinates: coordinate.to_string(),
            repository: root.display().to_string(),
        });
    }

    let data = fs::read(&path)?;

    let sidecar = checksum_file(&path);
    if sidecar.is_file() {
        let expected = fs::read_to_string(&sidecar)?.trim().to_string();
        let actual = sha256_hex(&data);
        if expected != actual {
            return Err(Error::ChecksumMismatch {
                path: path.display().to_string(),
                expected,
                actual,
            });
        }
    }

    Ok(data)
}

/// Deploy a batch of artifacts into a local repository
///
/// Every artifact is staged and renamed into place before the version
/// listings are refreshed, so a consumer never observes a listed version
/// whose file is still being written.
pub fn deploy(root: &Path, artifacts: &[ResolvedArtifact]) -> Result<()> {
    for artifact in artifacts {
        let dest = artifact_file(root, &artifact.coordinate);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let staging = dest.with_extension("tmp");
        fs::write(&staging, &artifact.data)?;
        fs::rename(&staging, &dest)?;
        fs::write(checksum_file(&dest), sha256_hex(&artifact.data))?;

        debug!("Deployed {} to {}", artifact.coordinate, dest.display());
    }

    let touched: BTreeSet<(&str, &str)> = artifacts
        .iter()
        .map(|a| (a.coordinate.group_id.as_str(), a.coordinate.artifact_id.as_str()))
        .collect();
    for (group_id, artifact_id) in touched {
        refresh_metadata(root, group_id, artifact_id)?;
    }

    Ok(())
}

/// Versions of an artifact available in a local repository
///
/// Prefers the metadata document; falls back to scanning version
/// directories for repositories populated without one.
pub fn list_versions(root: &Path, group_id: &str, artifact_id: &str) -> Result<Vec<String>> {
    let dir = artifact_dir(root, group_id, artifact_id);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let metadata_path = dir.join(metadata::METADATA_FILE_NAME);
    if metadata_path.is_file() {
        return metadata::read_versions(&fs::read_to_string(metadata_path)?);
    }

    scan_versions(&dir)
}

fn scan_versions(dir: &Path) -> Result<Vec<String>> {
    let mut versions = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            versions.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    versions.sort_by(|a, b| compare_version_strings(a, b));
    Ok(versions)
}

/// Rewrite an artifact's metadata document from the versions on disk
fn refresh_metadata(root: &Path, group_id: &str, artifact_id: &str) -> Result<()> {
    let dir = artifact_dir(root, group_id, artifact_id);
    let versions = scan_versions(&dir)?;
    let xml = metadata::render_metadata(group_id, artifact_id, &versions)?;
    fs::write(dir.join(metadata::METADATA_FILE_NAME), xml)?;
    Ok(())
}
