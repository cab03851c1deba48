// src/lib.rs

//! Stagehand
//!
//! Artifact promotion and channel manifest versioning for Maven-style
//! repositories: resolve staged artifacts from a source repository, deploy
//! them into a permanent target repository, and publish a new version of
//! the channel manifest pinning the promoted streams.
//!
//! # Architecture
//!
//! - Channels: named manifests pinning one version per artifact stream
//! - Append-only versioning: every publication is a new `-revNNNNNNNN`
//!   manifest version, never an in-place edit
//! - Publish-after-deploy: the manifest is written only once all referenced
//!   artifacts are durably stored
//! - Injected repository clients: all repository access goes through an
//!   explicit collaborator, swappable in tests

pub mod bundle;
pub mod channel;
pub mod coordinate;
mod error;
pub mod promote;
pub mod repository;
pub mod version;

pub use bundle::ArtifactBundle;
pub use channel::{
    document_coordinate, ChannelManifest, Stream, CHANNEL_CLASSIFIER, CHANNEL_EXTENSION,
    DEFAULT_CHANNEL_NAME,
};
pub use coordinate::{ArtifactCoordinate, ChannelCoordinate, DEFAULT_EXTENSION};
pub use error::{Error, Result, MAX_CAUSE_DEPTH};
pub use promote::{ArtifactPromoter, PromotionOutcome};
pub use repository::{
    MavenRepositoryClient, RemoteRepository, RepositoryClient, ResolvedArtifact,
};
pub use version::{next_version, ManifestVersion, INITIAL_VERSION, MAX_COUNTER};
