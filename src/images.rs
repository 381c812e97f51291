// src/images.rs
//! Resolve the page's images for the print copy.
//!
//! Readable images are inlined as data URIs so the renderer never has to
//! reach the network or the original directory. An image that cannot be
//! resolved is reported as an [`ImageIssue`] and hidden, never fatal.

use anyhow::{Context, Result};
use base64::Engine;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::utils::get_file_extension;

const MAX_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ImageIssue {
    pub source: String,
    pub kind: ImageIssueKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageIssueKind {
    NotFound,
    Unreadable,
    Empty,
    TooLarge,
    UnknownFormat,
    Timeout,
    Http,
}

impl ImageIssueKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "IMAGE_NOT_FOUND",
            Self::Unreadable => "IMAGE_UNREADABLE",
            Self::Empty => "IMAGE_EMPTY",
            Self::TooLarge => "IMAGE_TOO_LARGE",
            Self::UnknownFormat => "IMAGE_UNKNOWN_FORMAT",
            Self::Timeout => "IMAGE_TIMEOUT",
            Self::Http => "IMAGE_HTTP_ERROR",
        }
    }
}

impl std::fmt::Display for ImageIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.code(), self.source, self.message)
    }
}

#[derive(Debug, Clone)]
pub enum ResolvedImage {
    /// Already embedded in the page
    Keep,
    Inline(String),
    Hide(ImageIssue),
}

pub struct ImageResolver {
    client: Client,
    base_dir: PathBuf,
}

impl ImageResolver {
    pub fn new(base_dir: PathBuf, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_dir })
    }

    pub async fn resolve(&self, src: &str) -> ResolvedImage {
        if src.starts_with("data:") {
            return ResolvedImage::Keep;
        }

        let loaded = if is_remote(src) {
            self.fetch_remote(src).await
        } else {
            self.read_local(src).await
        };

        match loaded.and_then(|bytes| to_data_uri(src, &bytes)) {
            Ok(uri) => {
                debug!("Inlined image {}", src);
                ResolvedImage::Inline(uri)
            }
            Err(issue) => {
                warn!("Hiding image in print copy: {}", issue);
                ResolvedImage::Hide(issue)
            }
        }
    }

    /// Resolve every source concurrently, keeping the input order.
    pub async fn resolve_all(self: &Arc<Self>, sources: Vec<String>) -> Vec<(String, ResolvedImage)> {
        let mut tasks = JoinSet::new();
        for (index, src) in sources.into_iter().enumerate() {
            let resolver = Arc::clone(self);
            tasks.spawn(async move {
                let resolved = resolver.resolve(&src).await;
                (index, src, resolved)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => warn!("Image resolution task failed: {}", e),
            }
        }

        results.sort_by_key(|(index, _, _)| *index);
        results
            .into_iter()
            .map(|(_, src, resolved)| (src, resolved))
            .collect()
    }

    async fn fetch_remote(&self, src: &str) -> Result<Vec<u8>, ImageIssue> {
        let url = if src.starts_with("//") {
            format!("https:{}", src)
        } else {
            src.to_string()
        };

        let response = self.client.get(&url).send().await.map_err(|e| ImageIssue {
            source: src.to_string(),
            kind: if e.is_timeout() {
                ImageIssueKind::Timeout
            } else {
                ImageIssueKind::Http
            },
            message: format!("Failed to fetch image: {}", e),
        })?;

        if !response.status().is_success() {
            return Err(ImageIssue {
                source: src.to_string(),
                kind: ImageIssueKind::Http,
                message: format!("HTTP error: {}", response.status()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| ImageIssue {
            source: src.to_string(),
            kind: if e.is_timeout() {
                ImageIssueKind::Timeout
            } else {
                ImageIssueKind::Http
            },
            message: format!("Failed to read image body: {}", e),
        })?;

        Ok(bytes.to_vec())
    }

    async fn read_local(&self, src: &str) -> Result<Vec<u8>, ImageIssue> {
        let path = self.local_path(src);

        if !path.exists() {
            return Err(ImageIssue {
                source: src.to_string(),
                kind: ImageIssueKind::NotFound,
                message: format!("Image file not found: {}", path.display()),
            });
        }

        fs::read(&path).await.map_err(|e| ImageIssue {
            source: src.to_string(),
            kind: ImageIssueKind::Unreadable,
            message: format!("Cannot read image file: {}", e),
        })
    }

    fn local_path(&self, src: &str) -> PathBuf {
        let trimmed = src
            .split(['?', '#'])
            .next()
            .unwrap_or(src);
        let trimmed = trimmed.strip_prefix("file://").unwrap_or(trimmed);

        let path = Path::new(trimmed);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("//")
}

/// MIME type from the file signature, falling back to the extension for SVG
pub fn sniff_mime(bytes: &[u8], src: &str) -> Option<&'static str> {
    const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    if bytes.starts_with(PNG_SIGNATURE) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if looks_like_svg(bytes, src) {
        Some("image/svg+xml")
    } else {
        None
    }
}

fn looks_like_svg(bytes: &[u8], src: &str) -> bool {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    if get_file_extension(path).as_deref() == Some("svg") {
        return true;
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    head.contains("<svg")
}

fn to_data_uri(src: &str, bytes: &[u8]) -> Result<String, ImageIssue> {
    if bytes.is_empty() {
        return Err(ImageIssue {
            source: src.to_string(),
            kind: ImageIssueKind::Empty,
            message: "Image file is empty".to_string(),
        });
    }

    if bytes.len() > MAX_SIZE {
        return Err(ImageIssue {
            source: src.to_string(),
            kind: ImageIssueKind::TooLarge,
            message: format!(
                "Image too large: {:.1}MB (max 10MB)",
                bytes.len() as f64 / 1024.0 / 1024.0
            ),
        });
    }

    let mime = sniff_mime(bytes, src).ok_or_else(|| ImageIssue {
        source: src.to_string(),
        kind: ImageIssueKind::UnknownFormat,
        message: "Unsupported or corrupted image".to_string(),
    })?;

    Ok(format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn resolver(dir: &Path) -> ImageResolver {
        ImageResolver::new(dir.to_path_buf(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(PNG_BYTES, "a.png"), Some("image/png"));
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0], "a.png"), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a....", "x"), Some("image/gif"));
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 ", "x"), Some("image/webp"));
        assert_eq!(sniff_mime(b"<?xml version=\"1.0\"?><svg/>", "logo"), Some("image/svg+xml"));
        assert_eq!(sniff_mime(b"not an image", "photo.jpg"), None);
    }

    #[test]
    fn test_issue_codes() {
        assert_eq!(ImageIssueKind::NotFound.code(), "IMAGE_NOT_FOUND");
        assert_eq!(ImageIssueKind::Timeout.code(), "IMAGE_TIMEOUT");
    }

    #[tokio::test]
    async fn test_data_uri_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolver(dir.path()).resolve("data:image/png;base64,AAAA").await;
        assert!(matches!(resolved, ResolvedImage::Keep));
    }

    #[tokio::test]
    async fn test_local_image_is_inlined() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/photo.png"), PNG_BYTES).unwrap();

        match resolver(dir.path()).resolve("img/photo.png?v=2").await {
            ResolvedImage::Inline(uri) => assert!(uri.starts_with("data:image/png;base64,")),
            other => panic!("expected inline image, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_and_invalid_images_are_hidden() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("text.jpg"), b"hello").unwrap();
        let resolver = resolver(dir.path());

        for (src, kind) in [
            ("missing.jpg", ImageIssueKind::NotFound),
            ("empty.jpg", ImageIssueKind::Empty),
            ("text.jpg", ImageIssueKind::UnknownFormat),
        ] {
            match resolver.resolve(src).await {
                ResolvedImage::Hide(issue) => assert_eq!(issue.kind, kind, "{}", src),
                other => panic!("expected hidden image for {}, got {:?}", src, other),
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), PNG_BYTES).unwrap();
        let resolver = Arc::new(resolver(dir.path()));

        let results = resolver
            .resolve_all(vec!["a.png".to_string(), "b.png".to_string(), "data:x".to_string()])
            .await;
        let sources: Vec<&str> = results.iter().map(|(src, _)| src.as_str()).collect();
        assert_eq!(sources, vec!["a.png", "b.png", "data:x"]);
        assert!(matches!(results[0].1, ResolvedImage::Inline(_)));
        assert!(matches!(results[1].1, ResolvedImage::Hide(_)));
        assert!(matches!(results[2].1, ResolvedImage::Keep));
    }
}
