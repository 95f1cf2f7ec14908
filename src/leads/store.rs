//! Flat-file lead persistence.
//!
//! The whole file is one JSON array. Every append reads it, pushes a record
//! and replaces the file through a temp-file rename, so readers never see a
//! half-written array.

use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::leads::types::Lead;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not contain a JSON array of leads: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode lead: {0}")]
    Encode(#[from] serde_json::Error),
}

/// JSON-array file holding every lead.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one lead and return the new record count.
    pub async fn append(&self, lead: &Lead) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_raw().await?;
        records.push(serde_json::to_value(lead)?);

        let encoded = serde_json::to_vec_pretty(&records)?;
        self.replace_file(&encoded).await?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "Lead file rewritten");
        Ok(records.len())
    }

    /// All records that decode as leads, in file order.
    pub async fn list(&self) -> Result<Vec<Lead>, StoreError> {
        let records = self.read_raw().await?;
        let total = records.len();
        let leads: Vec<Lead> = records
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        if leads.len() != total {
            tracing::warn!(
                path = %self.path.display(),
                skipped = total - leads.len(),
                "Skipped records that are not leads"
            );
        }
        Ok(leads)
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read_raw().await?.len())
    }

    async fn read_raw(&self) -> Result<Vec<Value>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn replace_file(&self, contents: &[u8]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).await.map_err(|e| self.io_err(e))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "leads.json".to_string());
        let tmp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        if let Err(e) = fs::write(&tmp, contents).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.io_err(e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.io_err(e));
        }
        Ok(())
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
