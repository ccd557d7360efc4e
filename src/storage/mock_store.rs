//! In-memory implementation of FileOpener, used by the memory backend and tests

use crate::storage::{FileOpener, ImageReader, ImageWriter};
use async_trait::async_trait;
use log::info;
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

type SharedFile = Arc<Mutex<Vec<u8>>>;

/// In-memory file access keyed by path
#[derive(Default)]
pub struct MemoryFileOpener {
    files: Arc<Mutex<HashMap<PathBuf, SharedFile>>>,
}

impl MemoryFileOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently held
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    /// Check if a file exists
    pub fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    /// Snapshot of a file's contents
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        let files = self.files.lock().unwrap();
        files.get(path).map(|file| file.lock().unwrap().clone())
    }

    /// Remove every file
    pub fn clear(&self) {
        self.files.lock().unwrap().clear();
    }
}

/// Writer appending into a shared in-memory file
struct MemoryWriter {
    file: SharedFile,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.file.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[async_trait(?Send)]
impl FileOpener for MemoryFileOpener {
    async fn create(&self, path: &Path) -> io::Result<ImageWriter> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }

        let file = SharedFile::default();
        files.insert(path.to_path_buf(), file.clone());
        info!("Memory: Created {}", path.display());
        Ok(Box::new(MemoryWriter { file }))
    }

    async fn open(&self, path: &Path) -> io::Result<(ImageReader, u64)> {
        let data = self.contents(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })?;
        let length = data.len() as u64;
        Ok((Box::new(Cursor::new(data)), length))
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        match self.files.lock().unwrap().remove(path) {
            Some(_) => {
                info!("Memory: Removed {}", path.display());
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_memory_file_opener_basic_operations() {
        let opener = MemoryFileOpener::new();
        let path = Path::new("/store/a.png");

        assert_eq!(opener.file_count(), 0);
        assert!(!opener.exists(path));

        let mut writer = opener.create(path).await.unwrap();
        writer.write_all(b"Hello, ").await.unwrap();
        writer.write_all(b"Memory Storage!").await.unwrap();
        writer.shutdown().await.unwrap();

        assert_eq!(opener.file_count(), 1);
        assert!(opener.exists(path));

        let (mut reader, length) = opener.open(path).await.unwrap();
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await.unwrap();
        assert_eq!(length, 22);
        assert_eq!(data, b"Hello, Memory Storage!");

        opener.remove(path).await.unwrap();
        assert_eq!(opener.file_count(), 0);
    }

    #[tokio::test]
    async fn test_memory_file_opener_error_cases() {
        let opener = MemoryFileOpener::new();
        let path = Path::new("/store/b.png");

        assert!(opener.open(path).await.is_err());
        assert!(opener.remove(path).await.is_err());

        let _writer = opener.create(path).await.unwrap();
        let err = opener.create(path).await.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);

        opener.clear();
        assert!(!opener.exists(path));
    }
}
