// src/sink.rs
//! Persisting exports under their derived file names

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub trait DownloadSink {
    /// Save `content` as `file_name`, returning where it ended up.
    fn save(&self, file_name: &str, content: &[u8]) -> Result<PathBuf>;

    /// Save an already existing document as `file_name`.
    fn save_existing(&self, file_name: &str, source: &Path) -> Result<PathBuf>;
}

/// Writes exports into a directory, creating it on first use.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target(&self, file_name: &str) -> Result<PathBuf> {
        validate_file_name(file_name)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
        Ok(self.dir.join(file_name))
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.target(file_name)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        info!("Saved {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }

    fn save_existing(&self, file_name: &str, source: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            anyhow::bail!("Document not found: {}", source.display());
        }
        let path = self.target(file_name)?;
        fs::copy(source, &path)
            .with_context(|| format!("Failed to copy {} to {}", source.display(), path.display()))?;
        info!("Saved {} from {}", path.display(), source.display());
        Ok(path)
    }
}

/// A plain file name: no directories, no traversal
pub fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\'])
    {
        anyhow::bail!("Invalid file name: {:?}", file_name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(root.path().join("out"));
        let path = sink.save("cv-ana.txt", "CONTACTO\n".as_bytes()).unwrap();
        assert_eq!(path, root.path().join("out/cv-ana.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "CONTACTO\n");
    }

    #[test]
    fn test_save_existing() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("static.pdf");
        fs::write(&source, b"%PDF-1.4").unwrap();

        let sink = DirectorySink::new(root.path().join("out"));
        let path = sink.save_existing("cv-ana.pdf", &source).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"%PDF-1.4");

        assert!(sink
            .save_existing("cv-ana.pdf", &root.path().join("missing.pdf"))
            .is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("cv-ana.pdf").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("../cv.pdf").is_err());
        assert!(validate_file_name("a\\b.txt").is_err());
    }
}
