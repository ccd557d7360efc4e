//! Image service layer that provides a clean interface to the image store

use crate::error::StorageError;
use crate::storage::{ImageName, ImageReader, ImageStore};
use log::{info, warn};
use std::sync::Arc;
use tokio::io::AsyncRead;

/// Path prefix under which stored images are served
pub const IMAGES_PATH: &str = "/images";

/// An opened image ready to be streamed back to a client
pub struct ImageDownload {
    pub name: ImageName,
    pub content_type: String,
    pub length: u64,
    pub reader: ImageReader,
}

/// Image service wrapping the storage engine
pub struct ImageService {
    store: Arc<ImageStore>,
}

impl ImageService {
    /// Create a new image service with an injected store
    pub fn new(store: Arc<ImageStore>) -> Self {
        Self { store }
    }

    /// Store an uploaded image and return its generated name
    pub async fn upload(
        &self,
        stream: &mut (dyn AsyncRead + Unpin),
        content_type: &str,
    ) -> Result<ImageName, StorageError> {
        match self.store.save(stream, content_type).await {
            Ok(name) => {
                info!("Uploaded image {} with content type {:?}", name, content_type);
                Ok(name)
            }
            Err(e) => {
                warn!("Upload with content type {:?} failed: {}", content_type, e);
                Err(e)
            }
        }
    }

    /// Open an image for download. The content type comes from the name's
    /// extension, not from what was declared at upload time.
    pub async fn download(&self, name: &str) -> Result<ImageDownload, StorageError> {
        let name = ImageName::parse(name).map_err(|e| {
            warn!("Rejected image name {:?}", name);
            e
        })?;

        let (reader, length) = self.store.open(name.as_str()).await.map_err(|e| {
            warn!("Image {} could not be opened: {:?}", name, e);
            e
        })?;

        Ok(ImageDownload {
            content_type: name.content_type(),
            name,
            length,
            reader,
        })
    }

    /// Location reference for a stored image
    pub fn location(name: &ImageName) -> String {
        format!("{}/{}", IMAGES_PATH, name)
    }
}
