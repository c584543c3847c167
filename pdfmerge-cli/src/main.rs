//! pdfmerge - Merge PDF files through a small web service.
//!
//! Runs the merge server, or submits local files to a running one.

mod cli;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, ServeArgs, SubmitArgs};
use pdfmerge::ServerConfig;
use pdfmerge::client::MergeClient;
use pdfmerge::io::PdfReader;
use pdfmerge::selection::Selection;
use pdfmerge::utils::{collect_paths_for_patterns, format_file_size};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdfmerge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => serve(cli.serve).await,
        Some(Command::Serve(args)) => serve(args).await,
        Some(Command::Submit(args)) => submit(args).await,
    }
}

/// Resolve server options against the environment.
fn server_config(args: ServeArgs) -> ServerConfig {
    let env = ServerConfig::from_env();

    ServerConfig {
        host: args.host.unwrap_or(env.host),
        port: args.port.unwrap_or(env.port),
        root: args.root.unwrap_or(env.root),
        max_files: args.max_files.unwrap_or(env.max_files),
        max_body_size: args.max_body_size.unwrap_or(env.max_body_size),
        compress: env.compress && !args.no_compress,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(args);
    tracing::info!("Starting {} v{}", pdfmerge::NAME, pdfmerge::VERSION);

    pdfmerge::server::serve(config)
        .await
        .context("server stopped with an error")
}

/// Result of a `submit` run, printed with `--json`.
#[derive(Debug, Serialize)]
struct SubmitSummary {
    inputs: Vec<PathBuf>,
    output: PathBuf,
    filename: String,
    bytes: usize,
    pages: Option<usize>,
}

async fn submit(args: SubmitArgs) -> anyhow::Result<()> {
    let inputs = collect_paths_for_patterns(&args.inputs)?;
    let selection = Selection::from_paths(&inputs);

    tracing::debug!("Submitting {:?} to {}", selection.names(), args.server);
    let download = MergeClient::new(&args.server)
        .submit(&selection)
        .await
        .with_context(|| format!("merge request to {} failed", args.server))?;

    let output = download.save_to(&args.output_dir).await?;
    let pages = PdfReader::page_count_of(&download.bytes).ok();

    let summary = SubmitSummary {
        inputs,
        output,
        filename: download.filename.clone(),
        bytes: download.bytes.len(),
        pages,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let pages = summary
            .pages
            .map(|p| format!("{p} pages, "))
            .unwrap_or_default();
        println!(
            "Merged {} file(s) into {} ({}{})",
            summary.inputs.len(),
            summary.output.display(),
            pages,
            format_file_size(summary.bytes as u64)
        );
    }

    Ok(())
}
