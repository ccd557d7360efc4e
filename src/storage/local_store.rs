//! Local filesystem file access for the image store

use crate::storage::{FileOpener, ImageReader, ImageWriter};
use async_trait::async_trait;
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};

/// Make sure the storage directory exists, creating it if needed
pub fn prepare_storage_directory(path: &Path) -> io::Result<PathBuf> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created storage directory: {}", path.display());
    }
    info!("Using storage directory: {}", path.display());
    Ok(path.to_path_buf())
}

/// File access backed by `tokio::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileOpener;

#[async_trait(?Send)]
impl FileOpener for LocalFileOpener {
    async fn create(&self, path: &Path) -> io::Result<ImageWriter> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        Ok(Box::new(file))
    }

    async fn open(&self, path: &Path) -> io::Result<(ImageReader, u64)> {
        let file = File::open(path).await?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not a regular file"));
        }
        Ok((Box::new(file), metadata.len()))
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}
