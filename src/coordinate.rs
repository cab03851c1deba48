// src/coordinate.rs

//! Artifact and channel coordinates
//!
//! Coordinates identify deployable units using the format:
//! `group:artifact[:extension[:classifier]]:version`
//!
//! Examples:
//! - `org.example:widgets:1.2.3` - plain jar artifact
//! - `org.example:widgets:zip:1.2.3` - explicit extension
//! - `org.example:widgets:jar:sources:1.2.3` - extension and classifier
//!
//! A channel coordinate is the `group:artifact` pair naming the channel
//! document; concrete manifest versions of it are regular artifacts with a
//! reserved classifier/extension pair.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extension assumed when a coordinate does not carry one
pub const DEFAULT_EXTENSION: &str = "jar";

/// Identity of a single deployable unit
///
/// Immutable value type; equality covers all fields. Absent classifier and
/// extension are `None`, never empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub version: String,
}

impl ArtifactCoordinate {
    /// Create a coordinate with default extension and no classifier
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: None,
            extension: None,
            version: version.into(),
        }
    }

    /// Create a fully qualified coordinate
    pub fn with_details(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        classifier: Option<String>,
        extension: Option<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: normalize(classifier),
            extension: normalize(extension),
            version: version.into(),
        }
    }

    /// Parse a coordinate from `group:artifact[:extension[:classifier]]:version`
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let coordinate = match parts.as_slice() {
            [group, artifact, version] => Self::with_details(*group, *artifact, None, None, *version),
            [group, artifact, extension, version] => {
                Self::with_details(*group, *artifact, None, Some((*extension).to_string()), *version)
            }
            [group, artifact, extension, classifier, version] => Self::with_details(
                *group,
                *artifact,
                Some((*classifier).to_string()),
                Some((*extension).to_string()),
                *version,
            ),
            _ => {
                return Err(Error::Format(format!(
                    "invalid artifact coordinate '{}': expected group:artifact[:extension[:classifier]]:version",
                    s
                )));
            }
        };

        if coordinate.group_id.is_empty()
            || coordinate.artifact_id.is_empty()
            || coordinate.version.is_empty()
        {
            return Err(Error::Format(format!(
                "invalid artifact coordinate '{}': group, artifact and version must not be empty",
                s
            )));
        }

        Ok(coordinate)
    }

    /// Extension to use when resolving or deploying this artifact
    ///
    /// Falls back to [`DEFAULT_EXTENSION`] when the coordinate carries none.
    pub fn effective_extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    /// File name of this artifact in a repository layout
    ///
    /// Format: `artifactId-version[-classifier].extension`
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact_id,
                self.version,
                classifier,
                self.effective_extension()
            ),
            None => format!(
                "{}-{}.{}",
                self.artifact_id,
                self.version,
                self.effective_extension()
            ),
        }
    }

    /// Relative repository path of this artifact
    ///
    /// Standard layout: group segments / artifact id / version / file name.
    /// This layout is a compatibility contract with the provisioning tools
    /// that later consume the repository.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            group_path(&self.group_id),
            self.artifact_id,
            self.version,
            self.file_name()
        )
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        match (&self.extension, &self.classifier) {
            (_, Some(classifier)) => {
                write!(f, ":{}:{}", self.effective_extension(), classifier)?;
            }
            (Some(extension), None) => write!(f, ":{}", extension)?,
            (None, None) => {}
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ArtifactCoordinate::parse(s)
    }
}

/// Identity of a channel document: the `group:artifact` pair it is
/// published under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelCoordinate {
    pub group_id: String,
    pub artifact_id: String,
}

impl ChannelCoordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Parse a channel coordinate from `group:artifact`
    pub fn parse(s: &str) -> Result<Self> {
        match s.split(':').collect::<Vec<_>>().as_slice() {
            [group, artifact] if !group.is_empty() && !artifact.is_empty() => {
                Ok(Self::new(*group, *artifact))
            }
            _ => Err(Error::Format(format!(
                "invalid channel coordinate '{}': expected group:artifact",
                s
            ))),
        }
    }
}

impl fmt::Display for ChannelCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl FromStr for ChannelCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ChannelCoordinate::parse(s)
    }
}

/// Convert a group id to its repository path segments
pub fn group_path(group_id: &str) -> String {
    group_id.replace('.', "/")
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let coordinate = ArtifactCoordinate::parse("org.example:widgets:1.2.3").unwrap();
        assert_eq!(coordinate.group_id, "org.example");
        assert_eq!(coordinate.artifact_id, "widgets");
        assert_eq!(coordinate.classifier, None);
        assert_eq!(coordinate.extension, None);
        assert_eq!(coordinate.version, "1.2.3");
    }

    #[test]
    fn test_parse_with_extension() {
        let coordinate = ArtifactCoordinate::parse("org.example:widgets:zip:1.2.3").unwrap();
        assert_eq!(coordinate.extension.as_deref(), Some("zip"));
        assert_eq!(coordinate.classifier, None);
    }

    #[test]
    fn test_parse_full() {
        let coordinate = ArtifactCoordinate::parse("org.example:widgets:jar:sources:1.2.3").unwrap();
        assert_eq!(coordinate.extension.as_deref(), Some("jar"));
        assert_eq!(coordinate.classifier.as_deref(), Some("sources"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(ArtifactCoordinate::parse("only-one-part").is_err());
        assert!(ArtifactCoordinate::parse("g:a").is_err());
        assert!(ArtifactCoordinate::parse("g:a:e:c:v:extra").is_err());
        assert!(ArtifactCoordinate::parse(":a:1.0").is_err());
        assert!(ArtifactCoordinate::parse("g:a:").is_err());
    }

    #[test]
    fn test_default_extension() {
        let coordinate = ArtifactCoordinate::new("foo", "bar", "1.2.3");
        assert_eq!(coordinate.effective_extension(), "jar");

        let empty = ArtifactCoordinate::with_details("foo", "bar", None, Some(String::new()), "1.2.3");
        assert_eq!(empty.extension, None);
        assert_eq!(empty.effective_extension(), "jar");
    }

    #[test]
    fn test_file_name() {
        let plain = ArtifactCoordinate::new("foo", "bar", "1.2.3");
        assert_eq!(plain.file_name(), "bar-1.2.3.jar");

        let classified = ArtifactCoordinate::with_details(
            "foo",
            "bar",
            Some("sources".to_string()),
            Some("jar".to_string()),
            "1.2.3",
        );
        assert_eq!(classified.file_name(), "bar-1.2.3-sources.jar");
    }

    #[test]
    fn test_repository_path() {
        let coordinate = ArtifactCoordinate::new("org.example.deep", "widgets", "1.2.3");
        assert_eq!(
            coordinate.repository_path(),
            "org/example/deep/widgets/1.2.3/widgets-1.2.3.jar"
        );
    }

    #[test]
    fn test_display_round_trip() {
        for input in [
            "org.example:widgets:1.2.3",
            "org.example:widgets:zip:1.2.3",
            "org.example:widgets:jar:sources:1.2.3",
        ] {
            let coordinate = ArtifactCoordinate::parse(input).unwrap();
            assert_eq!(coordinate.to_string(), input);
        }
    }

    #[test]
    fn test_channel_coordinate_parse() {
        let channel = ChannelCoordinate::parse("test:channel").unwrap();
        assert_eq!(channel.group_id, "test");
        assert_eq!(channel.artifact_id, "channel");

        assert!(ChannelCoordinate::parse("test").is_err());
        assert!(ChannelCoordinate::parse("test:channel:extra").is_err());
        assert!(ChannelCoordinate::parse(":channel").is_err());
    }

    #[test]
    fn test_group_path() {
        assert_eq!(group_path("org.example.deep"), "org/example/deep");
        assert_eq!(group_path("flat"), "flat");
    }
}
