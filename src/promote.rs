// src/promote.rs

//! Artifact promotion orchestrator
//!
//! Promotion moves staged artifacts from a source repository into a
//! permanent target repository and records them in the channel's manifest.
//! The manifest is only published after every referenced artifact has been
//! durably deployed, so a published manifest never advertises an artifact
//! that failed to land.
//!
//! Ordering within one call is fixed: resolve all, deploy all, query the
//! current manifest version, fetch and merge, publish. Nothing is retried
//! internally; every failure leaves the call safe to re-run as a whole.
//!
//! Concurrent promotions against the same channel are NOT coordinated:
//! there is no compare-and-swap on the "read current version, publish next
//! version" step, and callers must serialize writers per channel (e.g. a
//! single-threaded release pipeline or an external lock).

use crate::channel::{self, ChannelManifest, Stream, DEFAULT_CHANNEL_NAME};
use crate::coordinate::{ArtifactCoordinate, ChannelCoordinate};
use crate::error::{Error, Result};
use crate::repository::{RemoteRepository, RepositoryClient, ResolvedArtifact};
use crate::version::{next_version, ManifestVersion};
use tracing::{debug, info};

/// Result of a successful promotion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// The artifact list was empty; nothing was touched.
    NothingToPromote,
    /// Every requested stream already existed in the manifest; artifacts
    /// were deployed but no new manifest version was published.
    NoNewStreams,
    /// A new manifest version was published.
    Published { version: ManifestVersion },
}

/// Promotes artifacts into a channel on a target repository
pub struct ArtifactPromoter<'a, C: RepositoryClient> {
    client: &'a C,
    target: RemoteRepository,
}

impl<'a, C: RepositoryClient> ArtifactPromoter<'a, C> {
    /// Create a promoter for a target repository
    ///
    /// The target must be locally accessible: the promotion protocol reads
    /// back the manifest it just wrote, a consistency guarantee arbitrary
    /// remote write endpoints do not provide.
    pub fn new(client: &'a C, target: RemoteRepository) -> Result<Self> {
        if !target.is_local() {
            return Err(Error::Config(format!(
                "promoting to non-local repository {} is not currently supported",
                target.url
            )));
        }
        Ok(Self { client, target })
    }

    /// Promote artifacts from a source repository into a channel
    ///
    /// Resolution is all-or-nothing: if any artifact is missing from the
    /// source, nothing is deployed and the manifest is untouched. An empty
    /// artifact list is a deliberate no-op, not an error.
    pub fn promote(
        &self,
        artifacts: &[ArtifactCoordinate],
        channel: &ChannelCoordinate,
        source: &RemoteRepository,
    ) -> Result<PromotionOutcome> {
        if artifacts.is_empty() {
            debug!("No artifacts to promote");
            return Ok(PromotionOutcome::NothingToPromote);
        }

        let resolved = self.resolve_from_source(artifacts, source)?;

        debug!(
            "Deploying {} artifacts to {}",
            resolved.len(),
            self.target.url
        );
        self.client.deploy(&resolved, &self.target)?;

        // streams come from the requested coordinates, not the resolved
        // results, so resolved-but-different metadata never leaks in
        let streams: Vec<Stream> = artifacts
            .iter()
            .map(|a| Stream::new(a.group_id.clone(), a.artifact_id.clone(), a.version.clone()))
            .collect();

        let current = self
            .client
            .highest_version(&channel.group_id, &channel.artifact_id, &self.target)?;

        let mut manifest = self.fetch_manifest(channel, current.as_deref())?;

        let added = manifest.merge(streams);
        if added == 0 {
            debug!("All promoted streams already present in channel {}", channel);
            return Ok(PromotionOutcome::NoNewStreams);
        }

        let version = next_version(current.as_deref())?;
        self.deploy_manifest(channel, &manifest, &version)?;

        info!(
            "Published channel {} version {} ({} new streams)",
            channel, version, added
        );
        Ok(PromotionOutcome::Published { version })
    }

    /// Resolve every requested coordinate from the source repository
    ///
    /// Collects all missing coordinates before failing so the diagnostic
    /// names everything that needs attention, not just the first miss.
    fn resolve_from_source(
        &self,
        artifacts: &[ArtifactCoordinate],
        source: &RemoteRepository,
    ) -> Result<Vec<ResolvedArtifact>> {
        debug!(
            "Resolving {} artifacts from staging repository {}",
            artifacts.len(),
            source.url
        );

        let mut resolved = Vec::with_capacity(artifacts.len());
        let mut missing = Vec::new();

        for coordinate in artifacts {
            match self.client.resolve(coordinate, source) {
                Ok(data) => resolved.push(ResolvedArtifact {
                    coordinate: coordinate.clone(),
                    data,
                }),
                Err(Error::Resolution { .. }) => missing.push(coordinate.to_string()),
                Err(other) => return Err(other),
            }
        }

        if !missing.is_empty() {
            return Err(Error::Resolution {
                coordinates: missing.join(", "),
                repository: source.url.clone(),
            });
        }

        Ok(resolved)
    }

    /// Fetch and decode the currently published manifest
    ///
    /// A channel that has never been published yields an empty manifest
    /// with the conventional default name.
    fn fetch_manifest(
        &self,
        channel: &ChannelCoordinate,
        current: Option<&str>,
    ) -> Result<ChannelManifest> {
        match current {
            Some(version) => {
                debug!("Found existing channel {} with version {}", channel, version);
                let coordinate = channel::document_coordinate(channel, version);
                let data = self.client.resolve(&coordinate, &self.target)?;
                ChannelManifest::from_slice(&data)
            }
            None => {
                debug!("No existing channel {} found, creating new channel", channel);
                let mut manifest = ChannelManifest::new(DEFAULT_CHANNEL_NAME);
                manifest.description = Some("Customization channel".to_string());
                Ok(manifest)
            }
        }
    }

    /// Encode and deploy the merged manifest as a new channel version
    fn deploy_manifest(
        &self,
        channel: &ChannelCoordinate,
        manifest: &ChannelManifest,
        version: &ManifestVersion,
    ) -> Result<()> {
        debug!(
            "Deploying new channel {} as version {} to {}",
            channel, version, self.target.url
        );

        let document = ResolvedArtifact {
            coordinate: channel::document_coordinate(channel, &version.to_string()),
            data: manifest.to_toml()?.into_bytes(),
        };
        self.client.deploy(&[document], &self.target)
    }
}
