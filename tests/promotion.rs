// tests/promotion.rs

//! End-to-end promotion tests against throwaway filesystem repositories
//!
//! Each test builds a source and a target repository in a temp directory,
//! runs a real promotion through the Maven-layout client, and asserts on
//! the files and manifest versions left in the target.

use stagehand::{
    channel, ArtifactBundle, ArtifactCoordinate, ArtifactPromoter, ChannelCoordinate,
    ChannelManifest, Error, MavenRepositoryClient, PromotionOutcome, RemoteRepository,
    RepositoryClient, Stream,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Harness {
    temp: TempDir,
    source_path: PathBuf,
    target_path: PathBuf,
    source: RemoteRepository,
    target: RemoteRepository,
    client: MavenRepositoryClient,
}

impl Harness {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let source_path = temp.path().join("source");
        let target_path = temp.path().join("target");
        fs::create_dir_all(&source_path).unwrap();
        fs::create_dir_all(&target_path).unwrap();

        let source = RemoteRepository::new("source", source_path.display().to_string());
        let target = RemoteRepository::new("target", target_path.display().to_string());

        Self {
            temp,
            source_path,
            target_path,
            source,
            target,
            client: MavenRepositoryClient::new().unwrap(),
        }
    }

    fn promote(
        &self,
        artifacts: &[ArtifactCoordinate],
        channel: &ChannelCoordinate,
    ) -> stagehand::Result<PromotionOutcome> {
        let promoter = ArtifactPromoter::new(&self.client, self.target.clone()).unwrap();
        promoter.promote(artifacts, channel, &self.source)
    }

    fn seed_artifact(&self, root: &Path, coordinate: &ArtifactCoordinate, data: &[u8]) {
        let path = root.join(coordinate.repository_path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    /// Publish a channel manifest directly into the target repository,
    /// bypassing the promoter, the way an earlier release pipeline would
    /// have left it.
    fn seed_channel(&self, channel: &ChannelCoordinate, streams: Vec<Stream>, version: &str) {
        let mut manifest = ChannelManifest::new("custom-channel");
        manifest.streams = streams;

        let coordinate = channel::document_coordinate(channel, version);
        self.seed_artifact(
            &self.target_path,
            &coordinate,
            manifest.to_toml().unwrap().as_bytes(),
        );
    }

    fn channel_versions(&self, channel: &ChannelCoordinate) -> Vec<String> {
        let dir = self
            .target_path
            .join(channel.group_id.replace('.', "/"))
            .join(&channel.artifact_id);
        if !dir.is_dir() {
            return Vec::new();
        }
        let mut versions: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| {
                let entry = entry.unwrap();
                entry
                    .file_type()
                    .unwrap()
                    .is_dir()
                    .then(|| entry.file_name().to_string_lossy().into_owned())
            })
            .collect();
        versions.sort();
        versions
    }

    fn read_manifest(&self, channel: &ChannelCoordinate) -> ChannelManifest {
        let version = self
            .client
            .highest_version(&channel.group_id, &channel.artifact_id, &self.target)
            .unwrap()
            .expect("channel manifest should be published");
        let coordinate = channel::document_coordinate(channel, &version);
        let data = self.client.resolve(&coordinate, &self.target).unwrap();
        ChannelManifest::from_slice(&data).unwrap()
    }

    fn assert_stream(&self, channel: &ChannelCoordinate, group: &str, artifact: &str, version: &str) {
        let manifest = self.read_manifest(channel);
        let stream = manifest
            .find(group, artifact)
            .unwrap_or_else(|| panic!("stream {}:{} not found in manifest", group, artifact));
        assert_eq!(stream.version, version);
    }
}

fn channel_ga() -> ChannelCoordinate {
    ChannelCoordinate::new("test", "channel")
}

#[test]
fn test_promote_single_artifact_into_empty_channel() {
    let harness = Harness::new();
    let artifact = ArtifactCoordinate::new("foo", "bar", "1.2.3");
    harness.seed_artifact(&harness.source_path, &artifact, b"artifact-bytes");

    let outcome = harness.promote(&[artifact.clone()], &channel_ga()).unwrap();

    match outcome {
        PromotionOutcome::Published { version } => {
            assert_eq!(version.to_string(), "1.0.0.Final-rev00000001");
        }
        other => panic!("expected published outcome, got {:?}", other),
    }

    // the artifact lands at the standard layout path
    let deployed = harness.target_path.join("foo/bar/1.2.3/bar-1.2.3.jar");
    assert!(deployed.is_file());
    assert_eq!(fs::read(deployed).unwrap(), b"artifact-bytes");

    harness.assert_stream(&channel_ga(), "foo", "bar", "1.2.3");
}

#[test]
fn test_promote_single_artifact_into_pre_existing_channel() {
    let harness = Harness::new();
    let artifact = ArtifactCoordinate::new("stream", "two", "1.2.3");
    harness.seed_artifact(&harness.source_path, &artifact, b"two-bytes");

    harness.seed_channel(
        &channel_ga(),
        vec![Stream::new("stream", "one", "1.2.3")],
        "1.0.0.Final-rev00000001",
    );

    let outcome = harness.promote(&[artifact], &channel_ga()).unwrap();

    assert_eq!(
        outcome,
        PromotionOutcome::Published {
            version: "1.0.0.Final-rev00000002".parse().unwrap()
        }
    );
    harness.assert_stream(&channel_ga(), "stream", "one", "1.2.3");
    harness.assert_stream(&channel_ga(), "stream", "two", "1.2.3");
}

#[test]
fn test_promote_no_artifacts() {
    let harness = Harness::new();

    let outcome = harness.promote(&[], &channel_ga()).unwrap();

    assert_eq!(outcome, PromotionOutcome::NothingToPromote);
    assert!(
        harness.channel_versions(&channel_ga()).is_empty(),
        "no channel manifest may be created when no artifacts are given"
    );
}

#[test]
fn test_artifact_not_available_in_source() {
    let harness = Harness::new();
    let present = ArtifactCoordinate::new("foo", "present", "1.2.3");
    let missing = ArtifactCoordinate::new("foo", "bar", "1.2.3");
    harness.seed_artifact(&harness.source_path, &present, b"present");

    let result = harness.promote(&[present, missing], &channel_ga());

    assert!(matches!(result, Err(Error::Resolution { .. })));
    // all-or-nothing: the resolvable artifact must not have been deployed
    assert!(!harness
        .target_path
        .join("foo/present/1.2.3/present-1.2.3.jar")
        .exists());
    assert!(harness.channel_versions(&channel_ga()).is_empty());
}

#[test]
fn test_promote_artifact_already_in_target() {
    let harness = Harness::new();
    let artifact = ArtifactCoordinate::new("foo", "bar", "1.2.3");
    harness.seed_artifact(&harness.source_path, &artifact, b"artifact-bytes");
    harness.seed_artifact(&harness.target_path, &artifact, b"artifact-bytes");

    let outcome = harness.promote(&[artifact], &channel_ga()).unwrap();

    assert!(matches!(outcome, PromotionOutcome::Published { .. }));
    harness.assert_stream(&channel_ga(), "foo", "bar", "1.2.3");
}

#[test]
fn test_promote_artifact_with_no_channel_changes() {
    let harness = Harness::new();
    let artifact = ArtifactCoordinate::new("stream", "one", "1.2.3");
    harness.seed_artifact(&harness.source_path, &artifact, b"bytes");
    harness.seed_artifact(&harness.target_path, &artifact, b"bytes");

    harness.seed_channel(
        &channel_ga(),
        vec![Stream::new("stream", "one", "1.2.3")],
        "1.0.0.Final-rev00000001",
    );

    let outcome = harness.promote(&[artifact], &channel_ga()).unwrap();

    assert_eq!(outcome, PromotionOutcome::NoNewStreams);
    assert_eq!(
        harness.channel_versions(&channel_ga()),
        vec!["1.0.0.Final-rev00000001"],
        "no new manifest version may be published when nothing changed"
    );
}

#[test]
fn test_promoting_same_artifact_twice_is_idempotent() {
    let harness = Harness::new();
    let artifact = ArtifactCoordinate::new("foo", "bar", "1.2.3");
    harness.seed_artifact(&harness.source_path, &artifact, b"bytes");

    let first = harness.promote(&[artifact.clone()], &channel_ga()).unwrap();
    let second = harness.promote(&[artifact], &channel_ga()).unwrap();

    assert!(matches!(first, PromotionOutcome::Published { .. }));
    assert_eq!(second, PromotionOutcome::NoNewStreams);

    let manifest = harness.read_manifest(&channel_ga());
    assert_eq!(manifest.streams.len(), 1);
    assert_eq!(
        harness.channel_versions(&channel_ga()),
        vec!["1.0.0.Final-rev00000001"]
    );
}

#[test]
fn test_too_many_channel_versions() {
    let harness = Harness::new();
    let artifact = ArtifactCoordinate::new("stream", "two", "1.2.3");
    harness.seed_artifact(&harness.source_path, &artifact, b"bytes");

    harness.seed_channel(
        &channel_ga(),
        vec![Stream::new("stream", "one", "1.2.3")],
        "1.0.0.Final-rev99999999",
    );

    let result = harness.promote(&[artifact], &channel_ga());

    assert!(matches!(result, Err(Error::Capacity { .. })));
    assert_eq!(
        harness.channel_versions(&channel_ga()),
        vec!["1.0.0.Final-rev99999999"],
        "no manifest version may be added beyond the exhausted one"
    );
}

#[test]
fn test_existing_channel_has_unexpected_version_format() {
    let harness = Harness::new();
    let artifact = ArtifactCoordinate::new("stream", "two", "1.2.3");
    harness.seed_artifact(&harness.source_path, &artifact, b"bytes");

    harness.seed_channel(
        &channel_ga(),
        vec![Stream::new("stream", "one", "1.2.3")],
        "1.0.0.Final-wrongsuffix",
    );

    let result = harness.promote(&[artifact], &channel_ga());

    assert!(matches!(result, Err(Error::Format(_))));
    // deploys precede the version computation, so the artifact has landed
    assert!(harness
        .target_path
        .join("stream/two/1.2.3/two-1.2.3.jar")
        .is_file());
    // but the manifest history is untouched
    assert_eq!(
        harness.channel_versions(&channel_ga()),
        vec!["1.0.0.Final-wrongsuffix"]
    );
}

#[test]
fn test_promote_multiple_artifacts_in_one_call() {
    let harness = Harness::new();
    let first = ArtifactCoordinate::new("org.example", "alpha", "1.0.0");
    let second = ArtifactCoordinate::with_details(
        "org.example",
        "beta",
        Some("sources".to_string()),
        Some("jar".to_string()),
        "2.0.0",
    );
    harness.seed_artifact(&harness.source_path, &first, b"alpha");
    harness.seed_artifact(&harness.source_path, &second, b"beta-sources");

    let outcome = harness
        .promote(&[first, second], &channel_ga())
        .unwrap();

    assert!(matches!(outcome, PromotionOutcome::Published { .. }));
    assert!(harness
        .target_path
        .join("org/example/beta/2.0.0/beta-2.0.0-sources.jar")
        .is_file());

    let manifest = harness.read_manifest(&channel_ga());
    assert_eq!(manifest.streams.len(), 2);
    harness.assert_stream(&channel_ga(), "org.example", "alpha", "1.0.0");
    harness.assert_stream(&channel_ga(), "org.example", "beta", "2.0.0");
}

#[test]
fn test_promote_from_bundle() {
    let harness = Harness::new();
    let artifact = ArtifactCoordinate::new("foo", "bar", "1.2.3");
    harness.seed_artifact(&harness.source_path, &artifact, b"bundled-bytes");

    let bundle_path = harness.temp.path().join("promotion.tar.gz");
    ArtifactBundle::create(&bundle_path, &[artifact.clone()], &harness.source_path).unwrap();

    let bundle = ArtifactBundle::open(&bundle_path).unwrap();
    let promoter = ArtifactPromoter::new(&harness.client, harness.target.clone()).unwrap();
    let outcome = promoter
        .promote(bundle.artifacts(), &channel_ga(), &bundle.source_repository())
        .unwrap();

    assert!(matches!(outcome, PromotionOutcome::Published { .. }));
    assert!(harness
        .target_path
        .join("foo/bar/1.2.3/bar-1.2.3.jar")
        .is_file());
    harness.assert_stream(&channel_ga(), "foo", "bar", "1.2.3");
}
