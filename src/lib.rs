// src/lib.rs
//! notion2report library: turns a Notion project page and its related tasks
//! and notes into a Markdown report, with an optional PDF.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `Cli`, `ReportSettings`, `ReportConfig`, `ExportConfig`
//! - **Domain model**: `Record`, `Property`, `Block`, `BlockKind`
//! - **API client**: `WorkspaceClient`, `NotionHttpClient`, `fetch_block_tree`
//! - **Formatting**: `render_blocks`, `render_property`, `summarize`
//! - **Reports**: `ReportAssembler`, `Exporter`, `ReportPipeline`
//! - **HTTP**: `server::create_router`

pub mod api;
pub mod config;
pub mod constants;
mod error;
mod error_recovery;
pub mod export;
pub mod formatting;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod server;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionClientError, NotionErrorCode};
pub use crate::error_recovery::RetryPolicy;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Cli, Command, ReportArgs, ReportSettings, StorageKind, StorageSettings};

// --- Domain Model ---
pub use crate::model::{Block, BlockKind, DateValue, FormulaValue, MediaKind, Property, Record};

// --- Domain Types ---
pub use crate::types::{ApiKey, BlockId, NotionId, PageId, PropertyName, RichTextItem};

// --- API Client ---
pub use crate::api::{fetch_block_tree, NotionHttpClient, WorkspaceClient};

// --- Formatting ---
pub use crate::formatting::{
    render_blocks, render_property, summarize, HeadingPolicy, RenderOptions, SummaryFields,
};

// --- Reports ---
pub use crate::export::{
    ExportConfig, ExportOutcome, Exporter, PdfOutcome, PdfRenderer, StorageBackend,
    StoredArtifact,
};
pub use crate::pipeline::{GenerationSummary, ReportPipeline};
pub use crate::report::{Report, ReportAssembler, ReportConfig};
