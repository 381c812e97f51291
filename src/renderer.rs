// src/renderer.rs
//! Turning the prepared print page into a paginated document.
//!
//! Layout is not done here: [`CommandRenderer`] hands the page to an external
//! HTML-to-PDF program. Anything implementing [`Renderer`] can stand in for it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::process::Command;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Top, right, bottom, left
    pub margins_mm: [f32; 4],
    /// JPEG quality between 0 and 1
    pub image_quality: f32,
    pub page_format: String,
    pub orientation: Orientation,
    /// Rasterization scale relative to 96 DPI
    pub scale: f32,
    /// Elements that should not be split across pages
    pub avoid_break_selectors: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margins_mm: [5.0, 5.0, 5.0, 5.0],
            image_quality: 0.95,
            page_format: "a4".to_string(),
            orientation: Orientation::Portrait,
            scale: 1.5,
            avoid_break_selectors: [
                ".experience-item",
                ".project-item",
                ".certification-item",
                ".certification-item-compact",
                ".education-item",
                ".skill-category",
                ".skill-category-compact",
                ".contact-item",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl RenderOptions {
    pub fn quality_percent(&self) -> u8 {
        (self.image_quality.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    pub fn dpi(&self) -> u32 {
        (96.0 * self.scale.max(0.1)).round() as u32
    }

    /// `a4` -> `A4`, `letter` -> `Letter`
    pub fn page_size_name(&self) -> String {
        let mut chars = self.page_format.trim().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "A4".to_string(),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Renderer {
    /// Render the HTML page at `page` into `output`.
    async fn render(&self, page: &Path, options: &RenderOptions, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandRendererConfig {
    pub program: String,
    /// Passed before the generated arguments
    pub extra_args: Vec<String>,
}

impl Default for CommandRendererConfig {
    fn default() -> Self {
        Self {
            program: "wkhtmltopdf".to_string(),
            extra_args: Vec::new(),
        }
    }
}

pub struct CommandRenderer {
    config: CommandRendererConfig,
}

impl CommandRenderer {
    pub fn new(config: CommandRendererConfig) -> Self {
        Self { config }
    }

    pub fn args(&self, page: &Path, options: &RenderOptions, output: &Path) -> Vec<String> {
        let [top, right, bottom, left] = options.margins_mm;
        let orientation = match options.orientation {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        };

        let mut args = self.config.extra_args.clone();
        args.extend(
            [
                "--quiet".to_string(),
                "--enable-local-file-access".to_string(),
                "--page-size".to_string(),
                options.page_size_name(),
                "--orientation".to_string(),
                orientation.to_string(),
                "--margin-top".to_string(),
                format!("{}mm", top),
                "--margin-right".to_string(),
                format!("{}mm", right),
                "--margin-bottom".to_string(),
                format!("{}mm", bottom),
                "--margin-left".to_string(),
                format!("{}mm", left),
                "--image-quality".to_string(),
                options.quality_percent().to_string(),
                "--dpi".to_string(),
                options.dpi().to_string(),
            ],
        );
        args.push(page.display().to_string());
        args.push(output.display().to_string());
        args
    }
}

impl Renderer for CommandRenderer {
    async fn render(&self, page: &Path, options: &RenderOptions, output: &Path) -> Result<()> {
        info!("Rendering {} with {}", page.display(), self.config.program);

        let result = Command::new(&self.config.program)
            .args(self.args(page, options, output))
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", self.config.program))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let stdout = String::from_utf8_lossy(&result.stdout);
            anyhow::bail!(
                "{} failed: stderr={}, stdout={}",
                self.config.program,
                stderr,
                stdout
            );
        }

        if !output.exists() {
            anyhow::bail!("{} did not produce {}", self.config.program, output.display());
        }

        Ok(())
    }
}
