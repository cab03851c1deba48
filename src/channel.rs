// src/channel.rs

//! Channel manifest model and codec
//!
//! A channel manifest is a named document pinning specific versions for a
//! set of artifact streams. It is stored in the target repository as a
//! regular artifact under the channel's `group:artifact` pair, using the
//! reserved classifier/extension pair for channel documents, and never
//! mutated in place: every change is published as a new manifest version.
//!
//! The interchange format is TOML:
//!
//! ```toml
//! name = "custom-channel"
//! description = "Customization channel"
//!
//! [[streams]]
//! group_id = "org.example"
//! artifact_id = "widgets"
//! version = "1.2.3"
//! ```

use crate::coordinate::{ArtifactCoordinate, ChannelCoordinate};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name given to a channel manifest created from scratch
pub const DEFAULT_CHANNEL_NAME: &str = "custom-channel";

/// Classifier reserved for channel documents
pub const CHANNEL_CLASSIFIER: &str = "channel";

/// Extension reserved for channel documents
pub const CHANNEL_EXTENSION: &str = "toml";

/// A trackable artifact lineage pinned by a channel manifest
///
/// Uniqueness key is (`group_id`, `artifact_id`); a manifest holds at most
/// one stream per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stream {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Stream {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Uniqueness key of this stream within a manifest
    pub fn key(&self) -> (&str, &str) {
        (&self.group_id, &self.artifact_id)
    }
}

/// A named, versioned document pinning stream versions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelManifest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub streams: Vec<Stream>,
}

impl ChannelManifest {
    /// Create an empty manifest
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            streams: Vec::new(),
        }
    }

    /// Parse a manifest from its TOML form
    ///
    /// Unknown fields are ignored for forward compatibility; duplicate
    /// stream keys are rejected.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: ChannelManifest = toml::from_str(content)
            .map_err(|e| Error::Format(format!("invalid channel manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from raw bytes
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(data)
            .map_err(|e| Error::Format(format!("channel manifest is not valid UTF-8: {}", e)))?;
        Self::parse(content)
    }

    /// Serialize to the TOML interchange form
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Format(format!("failed to encode channel manifest: {}", e)))
    }

    /// Validate the no-duplicate-keys invariant
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for stream in &self.streams {
            if !seen.insert(stream.key()) {
                return Err(Error::Format(format!(
                    "duplicate stream {}:{} in channel manifest '{}'",
                    stream.group_id, stream.artifact_id, self.name
                )));
            }
        }
        Ok(())
    }

    /// Look up the stream pinned for a (group, artifact) key
    pub fn find(&self, group_id: &str, artifact_id: &str) -> Option<&Stream> {
        self.streams
            .iter()
            .find(|s| s.group_id == group_id && s.artifact_id == artifact_id)
    }

    /// Merge incoming streams into the manifest
    ///
    /// Appends every stream whose key is not already present; an existing
    /// key is never overwritten, and identical-key duplicates within the
    /// incoming batch collapse to the first occurrence. Returns how many
    /// streams were actually added.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Stream>) -> usize {
        let mut added = 0;
        for stream in incoming {
            if self.find(&stream.group_id, &stream.artifact_id).is_none() {
                self.streams.push(stream);
                added += 1;
            }
        }
        added
    }

    /// Compare manifests by record set, ignoring stream order
    pub fn same_streams(&self, other: &ChannelManifest) -> bool {
        let mine: HashSet<&Stream> = self.streams.iter().collect();
        let theirs: HashSet<&Stream> = other.streams.iter().collect();
        mine == theirs
    }
}

/// Artifact coordinate of a channel document at a specific manifest version
pub fn document_coordinate(channel: &ChannelCoordinate, version: &str) -> ArtifactCoordinate {
    ArtifactCoordinate::with_details(
        channel.group_id.clone(),
        channel.artifact_id.clone(),
        Some(CHANNEL_CLASSIFIER.to_string()),
        Some(CHANNEL_EXTENSION.to_string()),
        version,
    )
}
