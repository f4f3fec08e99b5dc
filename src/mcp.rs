use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::commands;
use crate::config::{Config, OutputKind};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImagesToPdfRequest {
    #[schemars(description = "JPG/PNG files or directories containing them, in page order")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path (default: images.pdf)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MergeRequest {
    #[schemars(description = "At least two PDF files, in the order they should appear")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path (default: merged.pdf)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExtractRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-3, 5, 8-8'); defaults to the first page")]
    pub pages: Option<String>,
    #[schemars(description = "Output file path (default: extracted.pdf)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompressRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Output file path (default: compressed.pdf)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseRangesRequest {
    #[schemars(description = "Page ranges (e.g., '1-3, 5, 8-8')")]
    pub pages: String,
    #[schemars(description = "Number of pages in the document")]
    pub total_pages: u32,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    config: Config,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }

    fn output(&self, requested: Option<&str>, kind: OutputKind) -> std::path::PathBuf {
        self.config.output_path(requested.map(Path::new), kind)
    }
}

fn to_json<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("Error: {}", e))
        }
        Err(e) => format!("Error: {:#}", e),
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF metadata including title, author, creator, producer, dates, and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        to_json(commands::info::run(&path))
    }

    #[tool(description = "Convert JPG/PNG images into a PDF with one page per image, each page sized to its image")]
    fn pdf_images_to_pdf(&self, Parameters(req): Parameters<ImagesToPdfRequest>) -> String {
        let output = self.output(req.output.as_deref(), OutputKind::Images);
        to_json(commands::images::run(req.inputs.as_slice(), output))
    }

    #[tool(description = "Merge two or more PDFs into one, keeping every page in input order")]
    fn pdf_merge(&self, Parameters(req): Parameters<MergeRequest>) -> String {
        let output = self.output(req.output.as_deref(), OutputKind::Merged);
        to_json(commands::merge::run(req.inputs.as_slice(), output))
    }

    #[tool(description = "Extract pages from a PDF into a new file. Ranges are 1-based and comma separated, like '1-3, 5, 8-8'; reversed ranges are allowed and invalid or out-of-range parts are ignored.")]
    fn pdf_extract(&self, Parameters(req): Parameters<ExtractRequest>) -> String {
        let ranges = self.config.ranges_or_default(req.pages.as_deref());
        let output = self.output(req.output.as_deref(), OutputKind::Extracted);
        to_json(commands::extract::run(&req.path, ranges, output))
    }

    #[tool(description = "Re-save a PDF with compressed streams and unused objects removed")]
    fn pdf_compress(&self, Parameters(req): Parameters<CompressRequest>) -> String {
        let output = self.output(req.output.as_deref(), OutputKind::Compressed);
        to_json(commands::compress::run(&req.path, output))
    }

    #[tool(description = "Show which zero-based page indices a range expression selects, without touching any PDF")]
    fn pdf_parse_ranges(&self, Parameters(req): Parameters<ParseRangesRequest>) -> String {
        to_json(Ok(commands::ranges::run(&req.pages, req.total_pages)))
    }
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF utilities. Use pdf_images_to_pdf to build a PDF from images, pdf_merge to \
                 combine PDFs, pdf_extract to copy page ranges into a new PDF, pdf_compress to \
                 shrink a PDF, pdf_info for metadata and page count, and pdf_parse_ranges to \
                 preview a page range expression."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let server = PdfServer::new(config);
    info!("serving MCP over stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
