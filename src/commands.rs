// src/commands.rs

//! Command implementations for the stagehand CLI
//!
//! Each function maps one subcommand onto the library API, wrapping
//! failures with enough context for the one-line diagnostics printed by
//! `main`.

use anyhow::{bail, Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use stagehand::{
    document_coordinate, ArtifactBundle, ArtifactCoordinate, ArtifactPromoter, ChannelCoordinate,
    ChannelManifest, MavenRepositoryClient, PromotionOutcome, RemoteRepository, RepositoryClient,
};
use std::path::Path;
use tracing::info;

use crate::cli::Cli;

/// Promote artifacts into a channel, from either an explicit source
/// repository or a promotable bundle
pub fn promote(
    channel: &str,
    target_repo: &str,
    artifacts: &[String],
    source_repo: Option<&str>,
    bundle: Option<&Path>,
) -> Result<()> {
    let channel = ChannelCoordinate::parse(channel)?;
    let client = MavenRepositoryClient::new()?;
    let target = RemoteRepository::new("target", target_repo);
    let promoter = ArtifactPromoter::new(&client, target)?;

    let outcome = match (bundle, source_repo) {
        (Some(path), _) => {
            let bundle = ArtifactBundle::open(path)
                .with_context(|| format!("failed to open bundle {}", path.display()))?;
            info!(
                "Promoting {} artifacts from bundle {}",
                bundle.artifacts().len(),
                path.display()
            );
            promoter.promote(bundle.artifacts(), &channel, &bundle.source_repository())?
        }
        (None, Some(source)) => {
            let coordinates = parse_coordinates(artifacts)?;
            let source = RemoteRepository::new("source", source);
            promoter.promote(&coordinates, &channel, &source)?
        }
        (None, None) => bail!("either --bundle or --source-repo is required"),
    };

    match outcome {
        PromotionOutcome::Published { version } => {
            println!("Published channel {} version {}", channel, version);
        }
        PromotionOutcome::NoNewStreams => {
            println!(
                "Channel {} already pins all promoted streams; no new version published",
                channel
            );
        }
        PromotionOutcome::NothingToPromote => {
            println!("No artifacts to promote");
        }
    }
    Ok(())
}

/// Print the current manifest version and stream pins of a channel
pub fn streams(channel: &str, target_repo: &str) -> Result<()> {
    let channel = ChannelCoordinate::parse(channel)?;
    let client = MavenRepositoryClient::new()?;
    let target = RemoteRepository::new("target", target_repo);

    let Some(version) =
        client.highest_version(&channel.group_id, &channel.artifact_id, &target)?
    else {
        println!("No channel manifest published for {}", channel);
        return Ok(());
    };

    let document = document_coordinate(&channel, &version);
    let data = client
        .resolve(&document, &target)
        .with_context(|| format!("failed to fetch channel manifest {}", document))?;
    let manifest = ChannelManifest::from_slice(&data)?;

    println!("{} version {} ({})", channel, version, manifest.name);
    for stream in &manifest.streams {
        println!(
            "  {}:{}@{}",
            stream.group_id, stream.artifact_id, stream.version
        );
    }
    Ok(())
}

/// Pack a promotable bundle from a local repository
pub fn bundle(output: &Path, repository: &Path, artifacts: &[String]) -> Result<()> {
    let coordinates = parse_coordinates(artifacts)?;
    ArtifactBundle::create(output, &coordinates, repository)
        .with_context(|| format!("failed to create bundle {}", output.display()))?;
    println!(
        "Created bundle {} with {} artifacts",
        output.display(),
        coordinates.len()
    );
    Ok(())
}

/// Generate shell completions on stdout
pub fn completions(shell: Shell) {
    clap_complete::generate(
        shell,
        &mut Cli::command(),
        "stagehand",
        &mut std::io::stdout(),
    );
}

fn parse_coordinates(artifacts: &[String]) -> Result<Vec<ArtifactCoordinate>> {
    artifacts
        .iter()
        .map(|s| ArtifactCoordinate::parse(s).map_err(Into::into))
        .collect()
}
