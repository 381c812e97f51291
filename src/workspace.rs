// src/workspace.rs
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Scratch directory for one print export.
///
/// Removed when dropped, so every exit path of an export cleans up after
/// itself, failed renders included.
pub struct PrintWorkspace {
    dir: PathBuf,
}

impl PrintWorkspace {
    pub fn create(root: &Path) -> Result<Self> {
        let dir = root.join(format!("print-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create print workspace: {}", dir.display()))?;
        debug!("Created print workspace {}", dir.display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn write_page(&self, html: &str) -> Result<PathBuf> {
        let page = self.dir.join("page.html");
        fs::write(&page, html)
            .with_context(|| format!("Failed to write print page: {}", page.display()))?;
        Ok(page)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl Drop for PrintWorkspace {
    fn drop(&mut self) {
        if self.dir.exists() {
            if let Err(e) = fs::remove_dir_all(&self.dir) {
                warn!("Failed to remove print workspace {}: {}", self.dir.display(), e);
            } else {
                debug!("Removed print workspace {}", self.dir.display());
            }
        }
    }
}
