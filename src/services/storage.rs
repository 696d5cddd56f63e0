use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("upload directory unavailable: {0}")]
    Directory(std::io::Error),

    #[error("failed to persist upload: {0}")]
    Write(#[from] std::io::Error),
}

/// A file tracked in the upload directory. The path is derived from
/// `id` + `extension` and is never reused while the file exists.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: Uuid,
    pub path: PathBuf,
    pub extension: String,
    pub created_at: DateTime<Utc>,
}

impl StoredFile {
    /// Sibling path with the extension swapped, e.g. `{id}.pdf` -> `{id}.docx`
    pub fn with_extension(&self, ext: &str) -> PathBuf {
        self.path.with_extension(ext)
    }

    /// Sibling path with a suffix appended to the stem, e.g. `{id}_rotated.pdf`
    pub fn with_suffix(&self, suffix: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.id.to_string());
        self.path.with_file_name(format!("{stem}{suffix}"))
    }
}

/// Flat directory of `{uuid}{ext}` files. Existence and mtime in the
/// filesystem are the only metadata; there is no index.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(StorageError::Directory)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an inbound file under a fresh collision-free name, keeping
    /// the original extension so converters can dispatch on suffix.
    pub async fn store(&self, bytes: &[u8], original_name: &str) -> Result<StoredFile, StorageError> {
        let stored = self.allocate(&extension_of(original_name));
        tokio::fs::write(&stored.path, bytes).await?;
        Ok(stored)
    }

    /// Reserve a unique path for a converter output. Nothing is written;
    /// the converter creates the file itself.
    pub fn allocate(&self, extension: &str) -> StoredFile {
        let id = Uuid::new_v4();
        let path = self.root.join(format!("{id}{extension}"));
        StoredFile {
            id,
            path,
            extension: extension.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Final `.suffix` of a filename, dot included; empty when there is none.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
