//! Image storage engine: saves uploads under generated names and opens them again

use crate::error::StorageError;
use crate::storage::local_store::LocalFileOpener;
use crate::storage::naming::{extension_for, ImageName, NameGenerator, UuidNameGenerator};
use crate::storage::{FileOpener, ImageReader, CHUNK_SIZE_BYTES};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// Stores images in a single flat directory
pub struct ImageStore {
    storage_path: PathBuf,
    name_generator: Arc<dyn NameGenerator>,
    opener: Arc<dyn FileOpener>,
}

impl ImageStore {
    /// Create a store on the local filesystem with random UUID names
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self::with_dependencies(
            storage_path,
            Arc::new(UuidNameGenerator),
            Arc::new(LocalFileOpener),
        )
    }

    /// Create a store with injected name generation and file access
    pub fn with_dependencies(
        storage_path: impl Into<PathBuf>,
        name_generator: Arc<dyn NameGenerator>,
        opener: Arc<dyn FileOpener>,
    ) -> Self {
        Self {
            storage_path: storage_path.into(),
            name_generator,
            opener,
        }
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Copy `stream` into a new stored image and return its generated name.
    ///
    /// The stream is consumed in `CHUNK_SIZE_BYTES` reads until it reports
    /// end of data. On failure the partially written file is removed.
    pub async fn save(
        &self,
        stream: &mut (dyn AsyncRead + Unpin),
        content_type: &str,
    ) -> Result<ImageName, StorageError> {
        let extension = extension_for(content_type);
        let name = ImageName::new(self.name_generator.generate(), extension);
        let image_path = self.storage_path.join(name.as_str());
        debug!("Saving {} as {}", content_type, name);

        let mut image_file = self.opener.create(&image_path).await.map_err(|source| {
            StorageError::Write {
                name: name.to_string(),
                source,
            }
        })?;

        let mut chunk = [0u8; CHUNK_SIZE_BYTES];
        let mut written: u64 = 0;
        let copied = loop {
            let n = match stream.read(&mut chunk).await {
                Ok(0) => break Ok(()),
                Ok(n) => n,
                Err(source) => {
                    break Err(StorageError::Upload {
                        name: name.to_string(),
                        source,
                    })
                }
            };

            if let Err(source) = image_file.write_all(&chunk[..n]).await {
                break Err(StorageError::Write {
                    name: name.to_string(),
                    source,
                });
            }
            written += n as u64;
        };

        let result = match copied {
            Ok(()) => image_file.shutdown().await.map_err(|source| StorageError::Write {
                name: name.to_string(),
                source,
            }),
            Err(e) => Err(e),
        };
        drop(image_file);

        if let Err(e) = result {
            warn!("Saving {} failed after {} bytes: {}", name, written, e);
            if let Err(remove_err) = self.opener.remove(&image_path).await {
                warn!("Failed to remove partial image {}: {}", name, remove_err);
            }
            return Err(e);
        }

        info!("Stored image {} ({} bytes)", name, written);
        Ok(name)
    }

    /// Open a stored image by untrusted name, returning a reader at offset 0
    /// and the image length in bytes.
    ///
    /// The name is validated before any filesystem access.
    pub async fn open(&self, name: &str) -> Result<(ImageReader, u64), StorageError> {
        let name = ImageName::parse(name)?;
        let image_path = self.storage_path.join(name.as_str());

        let (stream, content_length) =
            self.opener
                .open(&image_path)
                .await
                .map_err(|source| StorageError::NotFound {
                    name: name.to_string(),
                    source,
                })?;

        debug!("Opened image {} ({} bytes)", name, content_length);
        Ok((stream, content_length))
    }
}
