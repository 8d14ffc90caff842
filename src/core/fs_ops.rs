// src/core/fs_ops.rs
//! File system helpers used by the durable configuration store

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Read a file, treating a missing file as empty content
    pub async fn read_file_or_empty(path: &Path) -> Result<String> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read file: {}", path.display()))
            }
        }
    }

    /// Replace a file's content in one step: write a sibling temp file,
    /// flush it to disk, then rename it over the target.
    pub async fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        let tmp_path = Self::temp_sibling(path);
        let mut file = fs::File::create(&tmp_path)
            .await
            .with_context(|| format!("Failed to create temp file: {}", tmp_path.display()))?;
        file.write_all(content.as_bytes())
            .await
            .with_context(|| format!("Failed to write file: {}", tmp_path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("Failed to flush file: {}", tmp_path.display()))?;
        drop(file);

        fs::rename(&tmp_path, path).await.with_context(|| {
            format!(
                "Failed to move {} over {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        debug!("Written file: {}", path.display());
        Ok(())
    }

    fn temp_sibling(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "config".to_string());
        path.with_file_name(format!("{}.tmp", name))
    }
}
