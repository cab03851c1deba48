// src/error.rs

//! Crate-wide error type for promotion operations
//!
//! Every failure class a promotion call can surface is a distinct variant,
//! so callers can map them to exit codes or retry decisions without string
//! matching. None of these are recovered internally; they propagate to the
//! caller with the coordinates, repository, or version that triggered them.

use thiserror::Error;

/// Convenience result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Upper bound when walking an error's cause chain
///
/// Guards against self-referential cause links.
pub const MAX_CAUSE_DEPTH: usize = 16;

#[derive(Error, Debug)]
pub enum Error {
    /// One or more artifacts could not be resolved from a repository.
    ///
    /// The whole promotion call failed without deploying anything; it is
    /// safe to retry as a whole.
    #[error("failed to resolve {coordinates} from {repository}")]
    Resolution {
        coordinates: String,
        repository: String,
    },

    /// Writing artifacts or the channel manifest to the target repository failed.
    ///
    /// Safe to retry: re-deploying an already-present artifact overwrites it.
    #[error("failed to deploy to {repository}: {reason}")]
    Deployment { repository: String, reason: String },

    /// A manifest document or version string does not match the expected shape.
    ///
    /// Signals corruption or foreign data; surfaced verbatim, never retried.
    #[error("{0}")]
    Format(String),

    /// The channel version counter is exhausted.
    ///
    /// Requires manual intervention, e.g. rotating the channel's core version.
    #[error("custom channel version exceeded limit {version}")]
    Capacity { version: String },

    /// A deployed artifact does not match its recorded checksum.
    #[error("checksum mismatch for {path}: expected {expected}, actual {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// The promoter was constructed with an unusable configuration.
    ///
    /// Raised at construction time, never during a promotion call.
    #[error("{0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Find a promotion error buried in an error's cause chain
    ///
    /// Walks `source()` links looking for an [`Error`], visiting at most
    /// [`MAX_CAUSE_DEPTH`] causes. Callers that wrap promotion errors in
    /// ambient context (e.g. `anyhow`) use this to recover the original
    /// variant for exit-code mapping.
    pub fn find_in<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a Error> {
        let mut current: Option<&'a (dyn std::error::Error + 'static)> = Some(err);
        for _ in 0..MAX_CAUSE_DEPTH {
            let e = current?;
            if let Some(found) = e.downcast_ref::<Error>() {
                return Some(found);
            }
            current = e.source();
        }
        None
    }
}
