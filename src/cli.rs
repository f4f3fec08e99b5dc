use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quickpdf")]
#[command(about = "Convert images to PDF, merge, extract pages and compress PDFs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Display PDF metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Convert JPG/PNG images into a PDF, one page per image
    #[command(alias = "jpg")]
    Images {
        /// Image files, or directories to collect images from
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file [default: images.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Combine two or more PDFs into one
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output file [default: merged.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract page ranges to a new PDF
    #[command(alias = "split")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page ranges (e.g., "1-3, 5, 8-8") [default: 1-1]
        pages: Option<String>,

        /// Output file [default: extracted.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-save a PDF with compressed streams and unused objects removed
    Compress {
        /// PDF file to compress
        path: PathBuf,

        /// Output file [default: compressed.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which pages a range expression selects
    Ranges {
        /// Page ranges (e.g., "1-3, 5, 8-8")
        pages: String,

        /// Number of pages in the document
        #[arg(short, long)]
        total: u32,
    },
}
