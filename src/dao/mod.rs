/// Document persistence backends and the `DocumentStore` abstraction.
pub mod document_store;
/// Persisted entity definitions.
pub mod models;
/// Storage abstraction error types.
pub mod storage;
