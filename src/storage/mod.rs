//! Image Storage Layer
//!
//! This module provides the image storage engine together with the
//! file-opening abstraction it writes through, allowing the engine to run
//! against the local filesystem or an in-memory backend without affecting
//! higher-level services.

pub mod config;
pub mod image_store;
pub mod local_store;
pub mod mock_store;
pub mod naming;


use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite};

pub use image_store::ImageStore;
pub use naming::{ImageName, NameGenerator};

/// Chunk size used when copying an upload into storage
pub const CHUNK_SIZE_BYTES: usize = 4096;

/// Readable handle to a stored image
pub type ImageReader = Box<dyn AsyncRead + Send + Unpin>;

/// Writable handle to a stored image being created
pub type ImageWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Trait defining the file access the storage engine relies on
#[async_trait(?Send)]
pub trait FileOpener: Send + Sync {
    /// Create a new file for writing. Fails if the file already exists.
    async fn create(&self, path: &Path) -> io::Result<ImageWriter>;

    /// Open an existing file for reading, returning the handle and its length
    async fn open(&self, path: &Path) -> io::Result<(ImageReader, u64)>;

    /// Remove a file, used to clean up partially written images
    async fn remove(&self, path: &Path) -> io::Result<()>;
}
