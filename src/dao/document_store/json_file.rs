use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::{
    document_store::DocumentStore,
    models::DocumentEntity,
    storage::{StorageError, StorageResult},
};

/// Document store persisting the whole document as one JSON file on disk.
///
/// Writes go through a sibling temp file followed by a rename, so a crash
/// mid-write leaves the previous document intact and a concurrent `load`
/// never sees a half-written file.
#[derive(Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
}

impl JsonFileStore {
    /// Create a store backed by the given file path. Nothing is touched on
    /// disk until the first `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    async fn read_document(path: &PathBuf) -> StorageResult<DocumentEntity> {
        let contents = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(DocumentEntity::default());
            }
            Err(err) => {
                return Err(StorageError::unavailable(
                    format!("reading {}", path.display()),
                    err,
                ));
            }
        };

        serde_json::from_slice(&contents)
            .map_err(|err| StorageError::corrupt(format!("decoding {}", path.display()), err))
    }

    async fn write_document(path: &PathBuf, document: &DocumentEntity) -> StorageResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.map_err(|err| {
                StorageError::unavailable(format!("creating {}", parent.display()), err)
            })?;
        }

        let payload = serde_json::to_vec_pretty(document)
            .map_err(|err| StorageError::unavailable("encoding document".into(), err))?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &payload).await.map_err(|err| {
            StorageError::unavailable(format!("writing {}", tmp.display()), err)
        })?;
        fs::rename(&tmp, path).await.map_err(|err| {
            StorageError::unavailable(format!("renaming into {}", path.display()), err)
        })?;

        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<DocumentEntity>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move { Self::read_document(&path).await })
    }

    fn save(&self, document: DocumentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move { Self::write_document(&path, &document).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::GroupEntity;
    use std::time::SystemTime;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("four21-back-{}", Uuid::new_v4().simple()))
            .join("db.json")
    }

    fn sample_group() -> GroupEntity {
        GroupEntity {
            id: Uuid::new_v4(),
            name: "Thursday crew".into(),
            password_hash: "abc123".into(),
            password_salt: Some("feed".into()),
            player_names: vec!["Alice".into(), "Bob".into()],
            games: Vec::new(),
            created_at: SystemTime::UNIX_EPOCH,
            updated_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty_document() {
        let store = JsonFileStore::new(scratch_path());
        let document = store.load().await.unwrap();
        assert!(document.groups.is_empty());
    }

    #[tokio::test]
    async fn save_creates_parent_directory_and_reloads() {
        let path = scratch_path();
        let store = JsonFileStore::new(path.clone());

        let mut document = DocumentEntity::default();
        document.groups.push(sample_group());
        store.save(document.clone()).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, document);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_not_reset() {
        let path = scratch_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{ not json").unwrap();

        let store = JsonFileStore::new(path.clone());
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
