//! Image name generation, validation and content type mapping

use crate::error::StorageError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use uuid::Uuid;

/// Extension used when a content type has no known mapping
pub const FALLBACK_EXTENSION: &str = "bin";

lazy_static! {
    static ref IMAGE_NAME_PATTERN: Regex = Regex::new(
        r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\.[a-z]{2,4}$"
    )
    .unwrap();
    static ref EXTENSION_PATTERN: Regex = Regex::new(r"^[a-z]{2,4}$").unwrap();
}

// Preferred extensions for common image types. mime_guess lists candidates
// alphabetically, which would give "jfif" for image/jpeg.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/pjpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tiff"),
    ("image/svg+xml", "svg"),
    ("image/x-icon", "ico"),
    ("image/vnd.microsoft.icon", "ico"),
    ("image/avif", "avif"),
    ("image/heic", "heic"),
];

/// Source of random identifiers for new image names
pub trait NameGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// Default generator backed by random version 4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNameGenerator;

impl NameGenerator for UuidNameGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Generator that always hands out the same identifier
#[derive(Debug, Clone, Copy)]
pub struct FixedNameGenerator(pub Uuid);

impl NameGenerator for FixedNameGenerator {
    fn generate(&self) -> Uuid {
        self.0
    }
}

/// A validated stored image name: `<uuid>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName(String);

impl ImageName {
    /// Build a name from a fresh identifier and an extension
    pub(crate) fn new(id: Uuid, extension: &str) -> Self {
        Self(format!("{}.{}", id.hyphenated(), extension))
    }

    /// Validate an untrusted name. The whole string must match the pattern.
    pub fn parse(name: &str) -> Result<Self, StorageError> {
        if IMAGE_NAME_PATTERN.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(StorageError::InvalidName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn extension(&self) -> &str {
        self.0.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default()
    }

    /// Content type inferred from the extension alone
    pub fn content_type(&self) -> String {
        mime_guess::from_ext(self.extension())
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Map a declared content type to a file extension.
///
/// Parameters such as `; charset=...` are ignored and the type is compared
/// case-insensitively. The result always satisfies the name pattern, falling
/// back to [`FALLBACK_EXTENSION`] when nothing suitable is known.
pub fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence.is_empty() {
        return FALLBACK_EXTENSION;
    }

    if let Some((_, ext)) = PREFERRED_EXTENSIONS.iter().find(|(mime, _)| *mime == essence) {
        return *ext;
    }

    mime_guess::get_mime_extensions_str(&essence)
        .and_then(|exts| exts.iter().copied().find(|ext| EXTENSION_PATTERN.is_match(ext)))
        .unwrap_or(FALLBACK_EXTENSION)
}
