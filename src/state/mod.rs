//! Shared application state: the document store handle, the write gate
//! serializing read-modify-write cycles, and the event hub.

mod sse;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{config::AppConfig, dao::document_store::DocumentStore};

pub use self::sse::{EventHub, Subscription};

/// Cheaply cloneable handle to the process-wide state.
pub type SharedState = Arc<AppState>;

/// Central application state owned for the process lifetime.
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    document_gate: Mutex<()>,
    events: EventHub,
    config: AppConfig,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> SharedState {
        Arc::new(Self {
            store,
            document_gate: Mutex::new(()),
            events: EventHub::new(),
            config,
        })
    }

    /// Handle to the document store backend.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Event hub fanning out mutation events to live viewers.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Acquire the gate serializing every load-mutate-save cycle.
    ///
    /// One coarse lock is deliberate: the store holds a single document and
    /// the expected load is a handful of players around a table, so
    /// partial-document visibility is traded away instead of throughput.
    /// Nothing network-bound runs under this lock except the durable write.
    pub async fn lock_document(&self) -> MutexGuard<'_, ()> {
        self.document_gate.lock().await
    }
}
