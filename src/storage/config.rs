//! Builds the image store for the configured backend

use crate::config::{StorageBackend, StorageConfig};
use crate::storage::local_store::{prepare_storage_directory, LocalFileOpener};
use crate::storage::mock_store::MemoryFileOpener;
use crate::storage::naming::UuidNameGenerator;
use crate::storage::ImageStore;
use log::info;
use std::io;
use std::path::Path;
use std::sync::Arc;

impl StorageConfig {
    /// Create an image store instance based on the configuration
    pub fn create_store(&self) -> io::Result<ImageStore> {
        match self.backend {
            StorageBackend::LocalFs => {
                let storage_path = prepare_storage_directory(Path::new(&self.base_path))?;
                info!("Using local filesystem image storage at {}", storage_path.display());
                Ok(ImageStore::with_dependencies(
                    storage_path,
                    Arc::new(UuidNameGenerator),
                    Arc::new(LocalFileOpener),
                ))
            }
            StorageBackend::Memory => {
                info!("Using in-memory image storage");
                Ok(ImageStore::with_dependencies(
                    &self.base_path,
                    Arc::new(UuidNameGenerator),
                    Arc::new(MemoryFileOpener::new()),
                ))
            }
        }
    }
}
