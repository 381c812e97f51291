use anyhow::{Context, Result};
use clap::Parser;
use cv_export::cli::{handle_command, Cli};
use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, Subscriber};

use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Target of the final error record. The terminal already gets that error
/// as plain text, so only the log file keeps it.
const EXIT_TARGET: &str = "cv_export::exit";

fn terminal_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_filter(filter_fn(|meta| meta.target() != EXIT_TARGET))
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(terminal_layer(std::io::stderr))
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cv_export=info")))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_file.as_deref()) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match handle_command(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: EXIT_TARGET, "{:#}", e);
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
