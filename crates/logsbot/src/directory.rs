//! JSON snapshot of host data used for name and group lookups.
//!
//! The host keeps the file up to date, so every lookup re-reads it. Live
//! group queries fail when the file cannot be read. Stored-group and user
//! lookups fall back to the last copy read successfully.
//!
//! ```json
//! {
//!   "users":      { "42": "Alice" },
//!   "threads":    { "9000": { "threadName": "Crabs", "participantIDs": ["1"], "isSubscribed": false } },
//!   "threadData": { "9000": { "threadName": "Crabs", "members": ["1"] } }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use logsbot_core::{LogsbotError, Result};
use logsbot_runtime::ports::{
    ThreadData, ThreadInfo, ThreadInfoSource, ThreadStore, UserDirectory,
};
use parking_lot::RwLock;
use serde::Deserialize;

/// File contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub users: HashMap<String, String>,
    #[serde(default)]
    pub threads: HashMap<String, ThreadInfo>,
    #[serde(default)]
    pub thread_data: HashMap<String, ThreadData>,
}

impl DirectorySnapshot {
    async fn read(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// User, live-group and stored-group lookups backed by one JSON file.
pub struct SnapshotDirectory {
    path: Option<PathBuf>,
    cached: RwLock<DirectorySnapshot>,
}

impl SnapshotDirectory {
    /// A directory with nothing cached yet; the file is first read on lookup.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            cached: RwLock::new(DirectorySnapshot::default()),
        }
    }

    /// Read `path` up front; without a path every lookup comes back empty.
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let dir = Self::new(path);
        if let Some(p) = dir.path.as_deref() {
            let snapshot = DirectorySnapshot::read(p).await?;
            tracing::debug!(
                users = snapshot.users.len(),
                threads = snapshot.threads.len(),
                stored = snapshot.thread_data.len(),
                "directory loaded"
            );
            *dir.cached.write() = snapshot;
        }
        Ok(dir)
    }

    /// Re-read the file into the cache.
    async fn refresh(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let fresh = DirectorySnapshot::read(path).await?;
        *self.cached.write() = fresh;
        Ok(())
    }

    /// Like [`SnapshotDirectory::refresh`], keeping the cached copy on failure.
    async fn refresh_or_keep(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "directory unreadable; using last snapshot");
        }
    }
}

#[async_trait]
impl UserDirectory for SnapshotDirectory {
    /// Unknown users are shown by id.
    async fn name_of(&self, user_id: &str) -> Result<String> {
        self.refresh_or_keep().await;
        let name = self.cached.read().users.get(user_id).cloned();
        Ok(name.unwrap_or_else(|| {
            tracing::debug!(user_id, "no name on record");
            user_id.to_string()
        }))
    }
}

#[async_trait]
impl ThreadInfoSource for SnapshotDirectory {
    async fn thread_info(&self, thread_id: &str) -> Result<ThreadInfo> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| LogsbotError::Lookup("no directory file configured".to_string()))?;

        let fresh = DirectorySnapshot::read(path).await?;
        let info = fresh.threads.get(thread_id).cloned();
        *self.cached.write() = fresh;

        info.ok_or_else(|| LogsbotError::Lookup(format!("thread {thread_id} not in directory")))
    }
}

#[async_trait]
impl ThreadStore for SnapshotDirectory {
    async fn thread_data(&self, thread_id: &str) -> Result<Option<ThreadData>> {
        self.refresh_or_keep().await;
        Ok(self.cached.read().thread_data.get(thread_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
        "users": { "42": "Alice" },
        "threads": { "9000": { "threadName": "Crabs", "participantIDs": ["1", "2"], "isSubscribed": true } },
        "threadData": { "9001": { "threadName": "Old Crabs", "members": ["1"] } }
    }"#;

    fn write(tmp: &TempDir, body: &str) -> PathBuf {
        let path = tmp.path().join("directory.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_lookups_from_file() {
        let tmp = TempDir::new().unwrap();
        let dir = SnapshotDirectory::load(Some(write(&tmp, SNAPSHOT))).await.unwrap();

        assert_eq!(dir.name_of("42").await.unwrap(), "Alice");
        assert_eq!(dir.name_of("77").await.unwrap(), "77");

        let info = dir.thread_info("9000").await.unwrap();
        assert_eq!(info.participant_ids.len(), 2);
        assert!(info.is_subscribed);
        assert!(dir.thread_info("9001").await.is_err());

        let stored = dir.thread_data("9001").await.unwrap().unwrap();
        assert_eq!(stored.thread_name.as_deref(), Some("Old Crabs"));
        assert!(dir.thread_data("9000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_live_lookup_sees_file_changes() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "{}");
        let dir = SnapshotDirectory::load(Some(path.clone())).await.unwrap();
        assert!(dir.thread_info("9000").await.is_err());

        std::fs::write(&path, SNAPSHOT).unwrap();
        assert_eq!(
            dir.thread_info("9000").await.unwrap().thread_name.as_deref(),
            Some("Crabs")
        );
        // The refresh also updates stored data and names.
        assert_eq!(dir.name_of("42").await.unwrap(), "Alice");
    }

    #[tokio::test]
    async fn test_stored_and_user_lookups_see_file_changes() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "{}");
        let dir = SnapshotDirectory::load(Some(path.clone())).await.unwrap();

        std::fs::write(&path, SNAPSHOT).unwrap();
        let stored = dir.thread_data("9001").await.unwrap().unwrap();
        assert_eq!(stored.members, vec!["1"]);
        assert_eq!(dir.name_of("42").await.unwrap(), "Alice");
    }

    #[tokio::test]
    async fn test_unreadable_file_keeps_last_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, SNAPSHOT);
        let dir = SnapshotDirectory::load(Some(path.clone())).await.unwrap();

        std::fs::write(&path, "truncated {").unwrap();
        assert_eq!(dir.name_of("42").await.unwrap(), "Alice");
        assert!(dir.thread_data("9001").await.unwrap().is_some());
        assert!(dir.thread_info("9000").await.is_err());
    }

    #[tokio::test]
    async fn test_new_reads_file_on_first_lookup() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("directory.json");
        let dir = SnapshotDirectory::new(Some(path.clone()));
        assert_eq!(dir.name_of("42").await.unwrap(), "42");

        std::fs::write(&path, SNAPSHOT).unwrap();
        assert_eq!(dir.name_of("42").await.unwrap(), "Alice");
    }

    #[tokio::test]
    async fn test_without_file() {
        let dir = SnapshotDirectory::load(None).await.unwrap();
        assert_eq!(dir.name_of("42").await.unwrap(), "42");
        assert!(dir.thread_info("9000").await.is_err());
        assert!(dir.thread_data("9000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_file_fails_to_load() {
        let tmp = TempDir::new().unwrap();
        let err = SnapshotDirectory::load(Some(write(&tmp, "nope")))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, LogsbotError::JsonParse(_)));
    }
}
