use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

pub const DEFAULT_ARTIFACT_NAME: &str = "semester_organizer_generated_schedules.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Hands a generated artifact to the user. Called once per successful generation.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn deliver(&self, artifact: Artifact) -> Result<PathBuf>;
}

pub struct DirectoryArtifactSink {
    dir: PathBuf,
}

impl DirectoryArtifactSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactSink for DirectoryArtifactSink {
    async fn deliver(&self, artifact: Artifact) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create '{}'", self.dir.display()))?;
        let path = self.dir.join(sanitize_filename(&artifact.filename));
        tokio::fs::write(&path, &artifact.bytes)
            .await
            .with_context(|| format!("failed to write artifact to '{}'", path.display()))?;
        Ok(path)
    }
}

/// Keeps only the final path component so a server-supplied name cannot escape the target dir.
pub fn sanitize_filename(raw: &str) -> String {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"');
    if name.is_empty() || name == "." || name == ".." {
        DEFAULT_ARTIFACT_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Extracts `filename=` from a `Content-Disposition` header value.
pub fn filename_from_content_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
