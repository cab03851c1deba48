// src/repository/metadata.rs

//! `maven-metadata.xml` reading and writing
//!
//! Each artifact directory in a repository carries a metadata document
//! listing its available versions. Promotion keeps these in sync so that
//! version-range queries by external consumers see newly deployed
//! versions.

use crate::error::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// File name of the per-artifact version listing
pub const METADATA_FILE_NAME: &str = "maven-metadata.xml";

/// Extract the version list from a metadata document
///
/// Only `<version>` elements are consulted; unknown elements are skipped
/// so documents written by other tools stay readable.
pub fn read_versions(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut versions = Vec::new();
    let mut in_version = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"version" => in_version = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"version" => in_version = false,
            Ok(Event::Text(text)) if in_version => {
                let value = text
                    .unescape()
                    .map_err(|e| Error::Format(format!("invalid repository metadata: {}", e)))?;
                let value = value.trim();
                if !value.is_empty() {
                    versions.push(value.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::Format(format!("invalid repository metadata: {}", e)));
            }
        }
    }

    Ok(versions)
}

/// Render a metadata document for an artifact
///
/// `versions` must already be in ascending order; the last entry becomes
/// `<latest>` and `<release>`.
pub fn render_metadata(group_id: &str, artifact_id: &str, versions: &[String]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    open(&mut writer, "metadata")?;
    text_element(&mut writer, "groupId", group_id)?;
    text_element(&mut writer, "artifactId", artifact_id)?;

    open(&mut writer, "versioning")?;
    if let Some(latest) = versions.last() {
        text_element(&mut writer, "latest", latest)?;
        text_element(&mut writer, "release", latest)?;
    }
    open(&mut writer, "versions")?;
    for version in versions {
        text_element(&mut writer, "version", version)?;
    }
    close(&mut writer, "versions")?;
    close(&mut writer, "versioning")?;
    close(&mut writer, "metadata")?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Format(format!("failed to render repository metadata: {}", e)))
}

fn open(writer: &mut Writer<Vec<u8>>, tag: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(render_error)
}

fn close(writer: &mut Writer<Vec<u8>>, tag: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(render_error)
}

fn text_element(writer: &mut Writer<Vec<u8>>, tag: &str, value: &str) -> Result<()> {
    open(writer, tag)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(render_error)?;
    close(writer, tag)
}

fn render_error(e: impl std::fmt::Display) -> Error {
    Error::Format(format!("failed to render repository metadata: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let versions = vec![
            "1.0.0.Final-rev00000001".to_string(),
            "1.0.0.Final-rev00000002".to_string(),
        ];
        let xml = render_metadata("test", "channel", &versions).unwrap();
        assert!(xml.contains("<latest>1.0.0.Final-rev00000002</latest>"));

        let parsed = read_versions(&xml).unwrap();
        assert_eq!(parsed, versions);
    }

    #[test]
    fn test_read_hand_written_metadata() {
        let xml = "<metadata><groupId>test</groupId><artifactId>channel</artifactId>\
                   <versioning><versions><version>1.0.0.Final-rev00000001</version></versions>\
                   </versioning></metadata>";
        let parsed = read_versions(xml).unwrap();
        assert_eq!(parsed, vec!["1.0.0.Final-rev00000001"]);
    }

    #[test]
    fn test_read_empty_versioning() {
        let xml = render_metadata("test", "channel", &[]).unwrap();
        assert!(read_versions(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_read_malformed() {
        let result = read_versions("<metadata><version>1</wrong></metadata>");
        assert!(matches!(result, Err(Error::Format(_))));
    }
}
