//! Audit stores: in-memory (process lifetime) and JSON-lines file.

use leadpool_types::{AuditListOptions, AuditLogEntry, AuditStore, AuditStoreError};
use tokio::io::AsyncWriteExt;

/// In-memory implementation of AuditStore (process lifetime only).
pub struct InMemoryAuditStore {
    entries: tokio::sync::RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self {
            entries: tokio::sync::RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, entry: AuditLogEntry) -> Result<(), AuditStoreError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn list(&self, opts: &AuditListOptions) -> Result<Vec<AuditLogEntry>, AuditStoreError> {
        let mut out = self.entries.read().await.clone();
        opts.apply(&mut out);
        Ok(out)
    }
}

/// JSONL file-backed AuditStore (persists across restarts).
pub struct JsonlAuditStore {
    path: std::path::PathBuf,
    append_lock: tokio::sync::Mutex<()>,
}

impl JsonlAuditStore {
    pub fn new(path: impl AsRef<std::path::Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            append_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl AuditStore for JsonlAuditStore {
    async fn append(&self, entry: AuditLogEntry) -> Result<(), AuditStoreError> {
        let _guard = self.append_lock.lock().await;
        let line =
            serde_json::to_string(&entry).map_err(|e| AuditStoreError::Other(e.to_string()))?;
        let mut f = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AuditStoreError::Other(e.to_string()))?;
        f.write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(|e| AuditStoreError::Other(e.to_string()))?;
        Ok(())
    }

    async fn list(&self, opts: &AuditListOptions) -> Result<Vec<AuditLogEntry>, AuditStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AuditStoreError::Other(e.to_string())),
        };
        let mut out: Vec<AuditLogEntry> = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => out.push(entry),
                Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "skipping malformed audit line"),
            }
        }
        opts.apply(&mut out);
        Ok(out)
    }
}
