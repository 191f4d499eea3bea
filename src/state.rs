//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{config::Config, store::SubmitStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// The file-backed store
    pub store: SubmitStore,

    /// Session signing secret, read once at startup
    pub session_secret: String,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: SubmitStore, config: Config) -> Self {
        let session_secret = store.session_secret();
        Self {
            inner: Arc::new(AppStateInner {
                store,
                session_secret,
                config,
            }),
        }
    }

    /// Get a reference to the store
    pub fn store(&self) -> &SubmitStore {
        &self.inner.store
    }

    /// Get the session signing secret
    pub fn session_secret(&self) -> &str {
        &self.inner.session_secret
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
