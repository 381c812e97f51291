use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod ats;
pub mod cli;
pub mod config;
pub mod extractor;
pub mod filename;
pub mod images;
pub mod print;
pub mod renderer;
pub mod schema;
pub mod sink;
pub mod tree;
pub mod types;
pub mod utils;
pub mod workspace;

pub use config::ExportConfig;
pub use extractor::{extract_document, extract_resume};
pub use filename::{build_file_name, file_name_for};
pub use renderer::{CommandRenderer, Renderer};
pub use sink::{DirectorySink, DownloadSink};
pub use tree::{ContentNode, HtmlTree};
pub use types::Resume;

/// Read the page source
pub async fn read_page(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read page: {}", path.display()))
}

/// ATS transcript of the page together with its file name
pub fn ats_export(html: &str, config: &ExportConfig) -> (String, String) {
    let tree = HtmlTree::parse(html);
    let root = tree.root();
    (
        file_name_for(&root, "txt"),
        extractor::extract_document_with(&root, &config.labels),
    )
}

/// Runs both exports of a résumé page
pub struct Exporter<R: Renderer, S: DownloadSink> {
    pub config: ExportConfig,
    renderer: R,
    sink: S,
}

impl Exporter<CommandRenderer, DirectorySink> {
    pub fn from_config(config: ExportConfig) -> Self {
        let renderer = CommandRenderer::new(config.renderer.clone());
        let sink = DirectorySink::new(config.output_dir.clone());
        Self::new(config, renderer, sink)
    }
}

impl<R: Renderer, S: DownloadSink> Exporter<R, S> {
    pub fn new(config: ExportConfig, renderer: R, sink: S) -> Self {
        Self {
            config,
            renderer,
            sink,
        }
    }

    /// Write the plain-text transcript of `page`
    pub async fn export_ats(&self, page: &Path) -> Result<PathBuf> {
        let html = read_page(page).await?;
        let (file_name, document) = ats_export(&html, &self.config);

        info!("Generating ATS transcript as {}", file_name);
        self.sink.save(&file_name, document.as_bytes())
    }

    /// Render the print document of `page`
    pub async fn export_pdf(&self, page: &Path) -> Result<PathBuf> {
        let html = read_page(page).await?;
        let file_name = file_name_for(&HtmlTree::parse(&html).root(), "pdf");
        info!("Generating PDF as {}", file_name);

        let base_dir = page_dir(page)?;
        let workspace = workspace::PrintWorkspace::create(&self.config.workspace_dir)?;

        let prepared =
            print::prepare_print_page(&html, &base_dir, &self.config.print, &self.config.render)
                .await?;
        for issue in &prepared.hidden {
            warn!("Image left out of the PDF: {}", issue);
        }

        let print_page = workspace.write_page(&prepared.html)?;
        let rendered = workspace.output_path(&file_name);
        self.renderer
            .render(&print_page, &self.config.render, &rendered)
            .await
            .context("Failed to render the print document")?;

        self.sink.save_existing(&file_name, &rendered)
    }

    /// Save a pre-built document of `page` under the derived name
    pub async fn export_static(&self, page: &Path, document: &Path) -> Result<PathBuf> {
        let html = read_page(page).await?;
        let extension = utils::get_file_extension(&document.to_string_lossy())
            .unwrap_or_else(|| "pdf".to_string());
        let file_name = file_name_for(&HtmlTree::parse(&html).root(), &extension);

        info!("Saving {} as {}", document.display(), file_name);
        self.sink.save_existing(&file_name, document)
    }
}

fn page_dir(page: &Path) -> Result<PathBuf> {
    let absolute = page
        .canonicalize()
        .with_context(|| format!("Failed to resolve page path: {}", page.display()))?;
    Ok(absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderOptions;
    use std::cell::RefCell;
    use std::fs;

    const PAGE: &str = r#"<html><head><title>CV</title></head><body>
        <h1 class="main-name">José Pérez</h1><h2 class="main-title">Ingeniero/a</h2>
        <div class="contact-item-inline">jose@example.com</div>
        <img src="missing.png">
    </body></html>"#;

    /// Writes the page it receives as the "document" and records the call
    struct CopyRenderer {
        pages: RefCell<Vec<String>>,
    }

    impl Renderer for CopyRenderer {
        async fn render(&self, page: &Path, _options: &RenderOptions, output: &Path) -> Result<()> {
            let html = fs::read_to_string(page)?;
            self.pages.borrow_mut().push(html.clone());
            fs::write(output, html)?;
            Ok(())
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        async fn render(&self, _page: &Path, _options: &RenderOptions, _output: &Path) -> Result<()> {
            anyhow::bail!("tainted canvas")
        }
    }

    fn setup() -> (tempfile::TempDir, PathBuf, ExportConfig) {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        fs::write(&page, PAGE).unwrap();
        let config = ExportConfig {
            output_dir: dir.path().join("out"),
            workspace_dir: dir.path().join("ws"),
            ..ExportConfig::default()
        };
        (dir, page, config)
    }

    #[tokio::test]
    async fn test_export_ats() {
        let (_dir, page, config) = setup();
        let exporter = Exporter::from_config(config);

        let path = exporter.export_ats(&page).await.unwrap();
        assert!(path.ends_with("cv-jose-perez-ingeniero-a.txt"));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.starts_with("CONTACTO\njose@example.com\n\nJosé Pérez\nIngeniero/a\n\n"));
    }

    #[tokio::test]
    async fn test_export_pdf_with_injected_renderer() {
        let (dir, page, config) = setup();
        let sink = DirectorySink::new(config.output_dir.clone());
        let renderer = CopyRenderer {
            pages: RefCell::new(Vec::new()),
        };
        let exporter = Exporter::new(config, renderer, sink);

        let path = exporter.export_pdf(&page).await.unwrap();
        assert!(path.ends_with("cv-jose-perez-ingeniero-a.pdf"));

        let rendered = &exporter.renderer.pages.borrow()[0];
        assert!(rendered.contains("id=\"pdf-styles\""));
        assert!(rendered.contains("img[src=\"missing.png\"]"));
        assert_eq!(fs::read_dir(dir.path().join("ws")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_render_cleans_workspace() {
        let (dir, page, config) = setup();
        let sink = DirectorySink::new(config.output_dir.clone());
        let exporter = Exporter::new(config, FailingRenderer, sink);

        let err = exporter.export_pdf(&page).await.unwrap_err();
        assert!(format!("{:#}", err).contains("tainted canvas"));
        assert_eq!(fs::read_dir(dir.path().join("ws")).unwrap().count(), 0);
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_export_static() {
        let (dir, page, config) = setup();
        let document = dir.path().join("prebuilt.pdf");
        fs::write(&document, b"%PDF").unwrap();
        let exporter = Exporter::from_config(config);

        let path = exporter.export_static(&page, &document).await.unwrap();
        assert!(path.ends_with("cv-jose-perez-ingeniero-a.pdf"));
    }

    #[test]
    fn test_ats_export_uses_configured_labels() {
        let mut config = ExportConfig::default();
        config.labels.contact = "CONTACT".to_string();
        let (file_name, document) = ats_export("<p>empty</p>", &config);
        assert_eq!(file_name, "curriculum-vitae.txt");
        assert!(document.starts_with("CONTACT\n"));
    }
}
