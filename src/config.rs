// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::ats::AtsLabels;
use crate::print::PrintOptions;
use crate::renderer::{CommandRendererConfig, RenderOptions};

pub const CONFIG_ENV_VAR: &str = "CV_EXPORT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cv-export.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub workspace_dir: PathBuf,
    pub renderer: CommandRendererConfig,
    pub render: RenderOptions,
    pub print: PrintOptions,
    pub labels: AtsLabels,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            workspace_dir: PathBuf::from("tmp_workspace"),
            renderer: CommandRendererConfig::default(),
            render: RenderOptions::default(),
            print: PrintOptions::default(),
            labels: AtsLabels::default(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from `explicit`, then `CV_EXPORT_CONFIG`, then
    /// `cv-export.yaml` in the current directory, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);

        let config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load_from_file(&path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    info!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        config.resolved()
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Make directories absolute against the current directory
    pub fn resolved(self) -> Result<Self> {
        Ok(Self {
            output_dir: Self::resolve_path(&self.output_dir)?,
            workspace_dir: Self::resolve_path(&self.workspace_dir)?,
            ..self
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Orientation;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.renderer.program, "wkhtmltopdf");
        assert_eq!(config.print.image_timeout_secs, 5);
        assert_eq!(config.labels.experience, "EXPERIENCIA LABORAL");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ExportConfig::from_yaml(
            r#"
output_dir: /srv/cv
renderer:
  program: /usr/local/bin/wkhtmltopdf
render:
  orientation: landscape
  margins_mm: [10, 10, 10, 10]
print:
  image_timeout_secs: 2
labels:
  contact: CONTACT
  featured_projects: "Featured projects:"
"#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/srv/cv"));
        assert_eq!(config.workspace_dir, PathBuf::from("tmp_workspace"));
        assert_eq!(config.renderer.program, "/usr/local/bin/wkhtmltopdf");
        assert!(config.renderer.extra_args.is_empty());
        assert_eq!(config.render.orientation, Orientation::Landscape);
        assert_eq!(config.render.margins_mm, [10.0; 4]);
        assert_eq!(config.render.image_quality, 0.95);
        assert_eq!(config.print.image_timeout_secs, 2);
        assert!(config.print.compact_styles);
        assert_eq!(config.labels.contact, "CONTACT");
        assert_eq!(config.labels.profile, "PERFIL");
        assert_eq!(config.labels.featured_projects, "Featured projects:");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ExportConfig::from_yaml("  \n").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(ExportConfig::from_yaml("render: [not, a, map]").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ExportConfig::load(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_load_explicit_file_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv-export.yaml");
        std::fs::write(&path, "output_dir: exports\n").unwrap();

        let config = ExportConfig::load(Some(&path)).unwrap();
        assert!(config.output_dir.is_absolute());
        assert!(config.output_dir.ends_with("exports"));
        assert!(config.workspace_dir.is_absolute());
    }
}
