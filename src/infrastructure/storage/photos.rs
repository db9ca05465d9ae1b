//! Candidate photo storage on the local filesystem
//!
//! Files land in the configured upload directory as `<uuid>_<sanitized name>`
//! and are referenced as `uploads/<file>`, which the HTTP layer serves
//! statically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, PhotoStore};

pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// 4 MiB
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 4 * 1024 * 1024;

const MAX_STEM_LEN: usize = 64;

pub struct LocalPhotoStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl LocalPhotoStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

/// Lower-cased extension if it is on the allow-list
fn allowed_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_PHOTO_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Keep only the final path component; the stem keeps `[A-Za-z0-9._-]`,
/// whitespace becomes `_` and leading dots are stripped.
fn sanitize_stem(name: &str) -> String {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let cleaned: String = stem
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned: String = cleaned.trim_start_matches('.').chars().take(MAX_STEM_LEN).collect();

    if cleaned.trim_matches('_').is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> DomainResult<String> {
        let ext = allowed_extension(original_name).ok_or_else(|| {
            DomainError::Validation(format!(
                "Photo must be one of: {}",
                ALLOWED_PHOTO_EXTENSIONS.join(", ")
            ))
        })?;

        if bytes.is_empty() {
            return Err(DomainError::Validation("Photo is empty".into()));
        }
        if bytes.len() > self.max_bytes {
            return Err(DomainError::Validation(format!(
                "Photo exceeds {} bytes",
                self.max_bytes
            )));
        }

        let file_name = format!("{}_{}.{}", Uuid::new_v4().simple(), sanitize_stem(original_name), ext);
        debug!(file = %file_name, size = bytes.len(), "Storing photo");

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::Storage(format!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(self.dir.join(&file_name), bytes)
            .await
            .map_err(|e| DomainError::Storage(format!("Failed to write photo: {}", e)))?;

        info!(file = %file_name, "Photo stored");
        Ok(format!("uploads/{}", file_name))
    }

    async fn remove(&self, reference: &str) -> DomainResult<()> {
        let file = reference.trim_start_matches("uploads/");
        if file.is_empty() || file.contains(['/', '\\']) || file.starts_with('.') {
            return Err(DomainError::Validation(format!(
                "Invalid photo reference '{}'",
                reference
            )));
        }

        match tokio::fs::remove_file(self.dir.join(file)).await {
            Ok(()) => {
                info!(file = %file, "Photo removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(format!("Failed to remove photo: {}", e))),
        }
    }
}
