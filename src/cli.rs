// src/cli.rs
use crate::{extractor, filename, read_page, ExportConfig, Exporter, HtmlTree};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cv-export")]
#[command(about = "Export a rendered résumé page as a PDF or an ATS transcript")]
pub struct Cli {
    #[command(subcommand)]
    pub command: ExportCommand,

    /// YAML configuration file (defaults to $CV_EXPORT_CONFIG, then ./cv-export.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ExportCommand {
    /// Write the plain-text ATS transcript
    Ats {
        page: PathBuf,
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the transcript instead of saving it
        #[arg(long)]
        stdout: bool,
    },
    /// Render the print document
    Pdf {
        page: PathBuf,
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Save this pre-built document under the derived name instead of rendering
        #[arg(long)]
        static_pdf: Option<PathBuf>,
    },
    /// Print the extracted résumé as JSON
    Extract { page: PathBuf },
    /// Print the file name an export would get
    Filename {
        page: PathBuf,
        #[arg(long, default_value = "pdf")]
        ext: String,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = ExportConfig::load(cli.config.as_deref())?;

    match cli.command {
        ExportCommand::Ats { page, out, stdout } => {
            if stdout {
                let html = read_page(&page).await?;
                let (_, document) = crate::ats_export(&html, &config);
                print!("{}", document);
                return Ok(());
            }

            let exporter = Exporter::from_config(with_out(config, out));
            let path = exporter
                .export_ats(&page)
                .await
                .context("Error al generar el ATS")?;
            info!("ATS transcript written to {}", path.display());
            println!("{}", path.display());
        }

        ExportCommand::Pdf {
            page,
            out,
            static_pdf,
        } => {
            let exporter = Exporter::from_config(with_out(config, out));
            let result = match static_pdf {
                Some(document) => exporter.export_static(&page, &document).await,
                None => exporter.export_pdf(&page).await,
            };
            let path = result.context("Error al generar el PDF")?;
            info!("PDF written to {}", path.display());
            println!("{}", path.display());
        }

        ExportCommand::Extract { page } => {
            let tree = HtmlTree::load(&page).await?;
            let resume = extractor::extract_resume(&tree.root());
            let json = serde_json::to_string_pretty(&resume)
                .context("Failed to serialize extracted résumé")?;
            println!("{}", json);
        }

        ExportCommand::Filename { page, ext } => {
            let tree = HtmlTree::load(&page).await?;
            println!("{}", filename::file_name_for(&tree.root(), &ext));
        }
    }

    Ok(())
}

fn with_out(config: ExportConfig, out: Option<PathBuf>) -> ExportConfig {
    match out {
        Some(dir) => config.with_output_dir(dir),
        None => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pdf_command() {
        let cli = Cli::try_parse_from([
            "cv-export",
            "pdf",
            "index.html",
            "--static-pdf",
            "cv.pdf",
            "--config",
            "custom.yaml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        match cli.command {
            ExportCommand::Pdf {
                page, static_pdf, ..
            } => {
                assert_eq!(page, PathBuf::from("index.html"));
                assert_eq!(static_pdf, Some(PathBuf::from("cv.pdf")));
            }
            _ => panic!("expected pdf command"),
        }
    }

    #[test]
    fn test_filename_default_extension() {
        let cli = Cli::try_parse_from(["cv-export", "filename", "index.html"]).unwrap();
        match cli.command {
            ExportCommand::Filename { ext, .. } => assert_eq!(ext, "pdf"),
            _ => panic!("expected filename command"),
        }
    }
}
