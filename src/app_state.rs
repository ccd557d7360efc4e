//! Application State Management
//!
//! This module provides the application state that contains the image
//! service and its dependencies, following the dependency injection pattern.

use log::info;
use std::io;
use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::service::image_service::ImageService;
use crate::storage::ImageStore;

/// Application state shared by all HTTP workers
#[derive(Clone)]
pub struct AppState {
    pub image_service: Arc<ImageService>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from configuration
    pub fn from_config(config: AppConfig) -> io::Result<Self> {
        info!(
            "Initializing application state with {:?} storage at {}",
            config.storage.backend, config.storage.base_path
        );
        let store = config.storage.create_store()?;
        Ok(Self::with_store(store, config))
    }

    /// Create application state around an existing store
    pub fn with_store(store: ImageStore, config: AppConfig) -> Self {
        Self {
            image_service: Arc::new(ImageService::new(Arc::new(store))),
            config,
        }
    }

    /// Create application state for testing with the in-memory backend
    pub fn new_for_testing() -> Self {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        let store = config
            .storage
            .create_store()
            .expect("in-memory store creation does not touch the filesystem");
        Self::with_store(store, config)
    }
}
