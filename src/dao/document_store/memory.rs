use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;

use crate::dao::{document_store::DocumentStore, models::DocumentEntity, storage::StorageResult};

/// Document store keeping the document in process memory only.
///
/// Exists for tests and throwaway runs; every clone shares the same
/// underlying document.
#[derive(Clone, Default)]
pub struct MemoryStore {
    document: Arc<Mutex<DocumentEntity>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing document.
    pub fn with_document(document: DocumentEntity) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
        }
    }

    /// Snapshot the current document without going through the trait.
    pub fn snapshot(&self) -> DocumentEntity {
        self.document.lock().expect("memory store poisoned").clone()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<DocumentEntity>> {
        let document = Arc::clone(&self.document);
        Box::pin(async move { Ok(document.lock().expect("memory store poisoned").clone()) })
    }

    fn save(&self, next: DocumentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let document = Arc::clone(&self.document);
        Box::pin(async move {
            *document.lock().expect("memory store poisoned") = next;
            Ok(())
        })
    }
}
