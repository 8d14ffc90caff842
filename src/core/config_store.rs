// src/core/config_store.rs
//! Durable key-value configuration storage (`.env` style file)

use crate::core::FsOps;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

pub const CLIENT_ID_KEY: &str = "UPWORK_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "UPWORK_CLIENT_SECRET";
pub const REDIRECT_URI_KEY: &str = "UPWORK_REDIRECT_URI";
pub const ACCESS_TOKEN_KEY: &str = "UPWORK_ACCESS_TOKEN";
pub const REFRESH_TOKEN_KEY: &str = "UPWORK_REFRESH_TOKEN";
pub const DEFAULT_TENANT_ID_KEY: &str = "UPWORK_DEFAULT_TENANT_ID";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Fs(#[from] anyhow::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: dotenvy::Error,
    },

    #[error("value for {key} cannot be stored: {reason}")]
    InvalidValue { key: String, reason: &'static str },

    #[error("config store is read-only")]
    ReadOnly,
}

/// Injected capability for reading and persisting configuration values.
#[rocket::async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Persist all entries in a single durable write.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_many(&[(key, value)]).await
    }

    /// Re-read the backing storage, picking up external edits.
    async fn reload(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// File-backed store compatible with `.env` files.
pub struct DotenvStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
    write_lock: Mutex<()>,
}

impl DotenvStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            warn!(
                "Config file not found at {}, it will be created on first write",
                path.display()
            );
        }
        let values = read_values(&path).await?;
        info!("Loaded {} config entries from {}", values.len(), path.display());

        Ok(Self {
            path,
            values: RwLock::new(values),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[rocket::async_trait]
impl ConfigStore for DotenvStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            validate_value(key, value)?;
        }

        let _guard = self.write_lock.lock().await;

        let current = FsOps::read_file_or_empty(&self.path).await?;
        let updated = rewrite_entries(&current, entries);
        FsOps::write_file_atomic(&self.path, &updated).await?;

        let mut values = self.values.write().await;
        for (key, value) in entries {
            values.insert((*key).to_string(), (*value).to_string());
        }

        info!(
            "Persisted {} config entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn reload(&self) -> Result<(), StoreError> {
        let fresh = read_values(&self.path).await?;
        *self.values.write().await = fresh;
        Ok(())
    }
}

/// In-process store, used when nothing should touch the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            read_only: false,
        }
    }

    /// Reject every write with `StoreError::ReadOnly`.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

#[rocket::async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let mut values = self.values.write().await;
        for (key, value) in entries {
            values.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }
}

async fn read_values(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    let content = FsOps::read_file_or_empty(path).await?;
    let mut values = BTreeMap::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        let (key, value) = item.map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        values.insert(key, value);
    }
    Ok(values)
}

fn validate_value(key: &str, value: &str) -> Result<(), StoreError> {
    if value.contains('\'') {
        return Err(StoreError::InvalidValue {
            key: key.to_string(),
            reason: "single quotes are not supported",
        });
    }
    if value.contains('\n') || value.contains('\r') {
        return Err(StoreError::InvalidValue {
            key: key.to_string(),
            reason: "line breaks are not supported",
        });
    }
    Ok(())
}

fn render_entry(key: &str, value: &str) -> String {
    format!("{}='{}'", key, value)
}

fn line_key(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    trimmed.split_once('=').map(|(key, _)| key.trim())
}

/// Replace existing assignments for the given keys in place and append the
/// rest, leaving comments and unrelated entries untouched.
fn rewrite_entries(current: &str, entries: &[(&str, &str)]) -> String {
    let mut written = HashSet::new();
    let mut lines: Vec<String> = Vec::new();

    for line in current.lines() {
        let replacement = line_key(line)
            .and_then(|key| entries.iter().find(|(k, _)| *k == key))
            .map(|(key, value)| (*key, render_entry(key, value)));

        match replacement {
            Some((key, rendered)) if !written.contains(key) => {
                written.insert(key);
                lines.push(rendered);
            }
            // duplicate assignment of a key that was just rewritten
            Some(_) => {}
            None => lines.push(line.to_string()),
        }
    }

    for (key, value) in entries {
        if written.insert(*key) {
            lines.push(render_entry(key, value));
        }
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}
