//! CLI argument parsing for pdfmerge.
//!
//! This module only depends on `clap` and `std` because the build script
//! includes it to render the man page.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Merge PDF files through a small web service.
///
/// Without a subcommand pdfmerge starts the server, which serves the
/// ordering page at `/` and merges uploads at `POST /merge`.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Merge PDF files through a small web service", long_about = None)]
#[command(author)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// What to run (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the merge server
    Serve(ServeArgs),

    /// Upload files to a running server and save the merged PDF
    Submit(SubmitArgs),
}

/// Server options.
///
/// Every option left out falls back to its environment variable, then to
/// the built-in default.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Interface to bind [env: HOST] [default: 0.0.0.0]
    #[arg(long, value_name = "ADDR")]
    pub host: Option<String>,

    /// Port to listen on [env: PORT] [default: 3000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding uploads/, merged/, public/ and views/
    /// [env: PDFMERGE_ROOT] [default: .]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Maximum number of PDFs per request [env: PDFMERGE_MAX_FILES] [default: 10]
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Maximum request body size in bytes [env: PDFMERGE_MAX_BODY]
    #[arg(long, value_name = "BYTES")]
    pub max_body_size: Option<usize>,

    /// Write merged output without stream compression
    #[arg(long)]
    pub no_compress: bool,
}

/// Client options.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SubmitArgs {
    /// Base URL of the merge server
    #[arg(
        short,
        long,
        value_name = "URL",
        env = "PDFMERGE_SERVER",
        default_value = "http://localhost:3000"
    )]
    pub server: String,

    /// Directory to save the merged PDF in
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,

    /// PDF files to merge, in order
    ///
    /// Glob patterns are expanded; their matches keep alphabetical order.
    ///
    /// Examples:
    ///   pdfmerge submit cover.pdf body.pdf
    ///   pdfmerge submit --server http://host:3000 'chapter*.pdf'
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,
}
