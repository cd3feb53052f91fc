/// Whole-document JSON file backend.
pub mod json_file;
/// Volatile in-memory backend used by tests.
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::{models::DocumentEntity, storage::StorageResult};

/// Abstraction over whole-document persistence.
///
/// Callers follow a read-modify-write discipline: `load` the full document,
/// mutate it in memory, then `save` it back. `save` must not return before
/// the document is durable, and a `load` must never observe a torn write.
/// Serializing concurrent cycles is the caller's job (see `AppState`).
pub trait DocumentStore: Send + Sync {
    /// Load the current document, or the empty default when none exists yet.
    fn load(&self) -> BoxFuture<'static, StorageResult<DocumentEntity>>;
    /// Persist the document durably before resolving.
    fn save(&self, document: DocumentEntity) -> BoxFuture<'static, StorageResult<()>>;
}
