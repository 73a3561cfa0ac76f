//! Payment proof file store
//!
//! Stores uploaded proof images under `<work_dir>/uploads` and hands out
//! `/uploads/<name>` references, which are also the public URLs the files
//! are served under.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Public URL prefix of stored files
pub const REF_PREFIX: &str = "/uploads/";

/// Longest sanitised original file name kept in the stored name
const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum ProofStoreError {
    #[error("Empty file provided")]
    Empty,

    #[error("File too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid file reference: {0}")]
    InvalidRef(String),

    #[error("File storage failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ProofStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ProofStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Persist one upload and return its reference
    ///
    /// Names are `<millis>-<uuid>-<original>`, so two uploads in the same
    /// millisecond with the same original name still get distinct files.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        data: &[u8],
    ) -> Result<String, ProofStoreError> {
        if data.is_empty() {
            return Err(ProofStoreError::Empty);
        }
        if data.len() > self.max_bytes {
            return Err(ProofStoreError::TooLarge {
                size: data.len(),
                max: self.max_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!(
            "{}-{}-{}",
            shared::util::now_millis(),
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        let path = self.root.join(&file_name);

        if let Err(e) = tokio::fs::write(&path, data).await {
            // Partial writes must not stay behind
            if let Err(cleanup) = tokio::fs::remove_file(&path).await
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
            }
            return Err(e.into());
        }

        tracing::debug!(file = %file_name, size = data.len(), "Payment proof stored");
        Ok(format!("{REF_PREFIX}{file_name}"))
    }

    /// Map a reference back to its path inside the store root
    pub fn resolve(&self, file_ref: &str) -> Result<PathBuf, ProofStoreError> {
        let name = file_ref
            .strip_prefix(REF_PREFIX)
            .ok_or_else(|| ProofStoreError::InvalidRef(file_ref.to_string()))?;

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => Ok(self.root.join(part)),
            _ => Err(ProofStoreError::InvalidRef(file_ref.to_string())),
        }
    }

    pub async fn exists(&self, file_ref: &str) -> bool {
        match self.resolve(file_ref) {
            Ok(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Remove a stored file; a file that is already gone counts as removed
    pub async fn delete(&self, file_ref: &str) -> Result<(), ProofStoreError> {
        let path = self.resolve(file_ref)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(file_ref = %file_ref, "Payment proof deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keep `[A-Za-z0-9._-]` of the base name, replace the rest with `_`
fn sanitize_file_name(original: Option<&str>) -> String {
    let base = original
        .map(|n| n.rsplit(['/', '\\']).next().unwrap_or(n))
        .unwrap_or("")
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "proof".to_string()
    } else {
        cleaned
    }
}
