use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::TokenStore;

// On-disk and in-memory shape of the persisted session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<Value>,
}

impl StoredSession {
    fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }
}

// Process-local store; nothing survives a restart.
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    session: Arc<Mutex<StoredSession>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn token(&self) -> Result<Option<String>, String> {
        Ok(self.session.lock().await.token.clone())
    }

    async fn save_token(&self, token: String) -> Result<(), String> {
        // Same rule as the file store: a new login never inherits the old profile.
        *self.session.lock().await = StoredSession {
            token: Some(token),
            user: None,
        };
        Ok(())
    }

    async fn cached_user(&self) -> Result<Option<Value>, String> {
        Ok(self.session.lock().await.user.clone())
    }

    async fn cache_user(&self, user: Value) -> Result<(), String> {
        self.session.lock().await.user = Some(user);
        Ok(())
    }

    async fn clear(&self) -> Result<(), String> {
        *self.session.lock().await = StoredSession::default();
        Ok(())
    }
}

// JSON file store so the session outlives a single CLI invocation.
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<StoredSession, String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                format!("corrupt session file {}: {err}", self.path.display())
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(err) => Err(format!(
                "failed to read session file {}: {err}",
                self.path.display()
            )),
        }
    }

    async fn write(&self, session: &StoredSession) -> Result<(), String> {
        if session.is_empty() {
            return self.remove().await;
        }

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
        }

        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|err| format!("failed to encode session: {err}"))?;
        // Write a private sibling file, then rename it over the session file.
        let staging = self.staging_path();
        self.discard(&staging).await?;
        write_private(&staging, &bytes)
            .await
            .map_err(|err| format!("failed to write {}: {err}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|err| format!("failed to replace {}: {err}", self.path.display()))
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn discard(&self, path: &Path) -> Result<(), String> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(format!("failed to remove {}: {err}", path.display())),
        }
    }

    async fn remove(&self) -> Result<(), String> {
        self.discard(&self.path).await
    }
}

// The file holds a bearer credential; it is created owner-only.
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn token(&self) -> Result<Option<String>, String> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.token)
    }

    async fn save_token(&self, token: String) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        // A fresh login replaces whatever the old session held.
        let session = StoredSession {
            token: Some(token),
            user: None,
        };
        self.write(&session).await
    }

    async fn cached_user(&self) -> Result<Option<Value>, String> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.user)
    }

    async fn cache_user(&self, user: Value) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let mut session = self.read().await.unwrap_or_default();
        session.user = Some(user);
        self.write(&session).await
    }

    async fn clear(&self) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        self.remove().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn when_token_is_saved_then_a_new_store_on_the_same_file_reads_it() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");

        FileTokenStore::new(&path)
            .save_token("abc123".to_string())
            .await
            .expect("save should succeed");
        let reopened = FileTokenStore::new(&path);

        assert_eq!(
            reopened.token().await.expect("read should succeed"),
            Some("abc123".to_string())
        );
    }

    #[tokio::test]
    async fn when_file_is_missing_then_there_is_no_token() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path().join("absent.json"));

        assert_eq!(store.token().await.expect("read should succeed"), None);
    }

    #[tokio::test]
    async fn when_cleared_twice_then_file_is_gone_and_no_error_is_returned() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path);
        store
            .save_token("abc123".to_string())
            .await
            .expect("save should succeed");
        store
            .cache_user(json!({ "name": "Ana" }))
            .await
            .expect("cache should succeed");

        store.clear().await.expect("first clear should succeed");
        store.clear().await.expect("second clear should succeed");

        assert!(!path.exists());
        assert_eq!(store.cached_user().await.expect("read should succeed"), None);
    }

    #[tokio::test]
    async fn when_file_is_corrupt_then_token_read_fails_but_clear_recovers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{ not json").expect("write corrupt file");
        let store = FileTokenStore::new(&path);

        assert!(store.token().await.is_err());
        store.clear().await.expect("clear should succeed");
        assert_eq!(store.token().await.expect("read should succeed"), None);
    }

    #[tokio::test]
    async fn when_new_token_is_saved_then_cached_user_is_dropped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));
        store
            .save_token("first".to_string())
            .await
            .expect("save should succeed");
        store
            .cache_user(json!({ "name": "Ana" }))
            .await
            .expect("cache should succeed");

        store
            .save_token("second".to_string())
            .await
            .expect("save should succeed");

        assert_eq!(
            store.token().await.expect("read should succeed"),
            Some("second".to_string())
        );
        assert_eq!(store.cached_user().await.expect("read should succeed"), None);
    }

    #[tokio::test]
    async fn when_memory_store_is_cleared_then_token_and_user_are_gone() {
        let store = InMemoryTokenStore::new();
        store
            .save_token("abc123".to_string())
            .await
            .expect("save should succeed");
        store
            .cache_user(json!({ "name": "Ana" }))
            .await
            .expect("cache should succeed");

        store.clear().await.expect("clear should succeed");

        assert_eq!(store.token().await.expect("read should succeed"), None);
        assert_eq!(store.cached_user().await.expect("read should succeed"), None);
    }

    #[tokio::test]
    async fn when_memory_store_saves_a_new_token_then_cached_user_is_dropped() {
        let store = InMemoryTokenStore::new();
        store
            .save_token("first".to_string())
            .await
            .expect("save should succeed");
        store
            .cache_user(json!({ "name": "Ana" }))
            .await
            .expect("cache should succeed");

        store
            .save_token("second".to_string())
            .await
            .expect("save should succeed");

        assert_eq!(
            store.token().await.expect("read should succeed"),
            Some("second".to_string())
        );
        assert_eq!(store.cached_user().await.expect("read should succeed"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn when_session_is_written_then_file_is_owner_only_and_no_staging_file_remains() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path);
        store
            .save_token("abc123".to_string())
            .await
            .expect("save should succeed");
        store
            .cache_user(json!({ "name": "Ana" }))
            .await
            .expect("cache should succeed");

        let mode = std::fs::metadata(&path).expect("session file").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!store.staging_path().exists());
    }
}
