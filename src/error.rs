//! Error types for the image storage engine and configuration loading

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::io;
use thiserror::Error;

/// Errors surfaced by the storage engine
///
/// Malformed names and missing files share the same message so callers
/// cannot tell them apart.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Requested name does not match the image name pattern
    #[error("File not found")]
    InvalidName(String),

    /// Name is well formed but the file is missing or unreadable
    #[error("File not found")]
    NotFound {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Writing the stored item failed
    #[error("Failed to write image {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Reading the uploaded byte stream failed
    #[error("Failed to read upload for image {name}: {source}")]
    Upload {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// True for the errors that should look like a missing file to callers
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::InvalidName(_) | StorageError::NotFound { .. })
    }
}

impl ResponseError for StorageError {
    fn status_code(&self) -> StatusCode {
        match self {
            StorageError::InvalidName(_) | StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            StorageError::Upload { .. } => StatusCode::BAD_REQUEST,
            StorageError::Write { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            StorageError::Write { .. } => "Failed to store image".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).body(body)
    }
}

/// Errors raised while loading the application configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
