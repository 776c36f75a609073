// src/config.rs
use crate::api::{NotionHttpClient, WorkspaceClient};
use crate::constants::{
    DEFAULT_FETCH_CONCURRENCY, DEFAULT_GENERATION_TIMEOUT_SECS, OVERVIEW_HEADING_LEVEL,
    RECORD_HEADING_LEVEL,
};
use crate::error::AppError;
use crate::export::{
    CommandPdfRenderer, ExportConfig, Exporter, GcsStorage, LocalStorage, StorageBackend,
    DEFAULT_PDF_COMMAND,
};
use crate::formatting::HeadingPolicy;
use crate::pipeline::ReportPipeline;
use crate::report::ReportConfig;
use crate::types::ApiKey;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Builds Markdown and PDF reports from a Notion project page.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one report and print its URL
    Generate {
        /// Project page URL or ID (e.g., "https://www.notion.so/...")
        page: String,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Serve report generation over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    Local,
    Gcs,
}

/// Flags shared by `generate` and `serve`. Each one overrides its
/// environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Also render and store a PDF
    #[arg(long, default_value_t = false)]
    pub pdf: bool,

    /// Leave the project's URL property untouched
    #[arg(long = "no-url-update", default_value_t = false)]
    pub no_url_update: bool,

    /// Where to store reports (overrides USE_LOCAL_STORAGE)
    #[arg(long, value_enum)]
    pub storage: Option<StorageKind>,

    /// Root directory for local storage (overrides LOCAL_STORAGE_PATH)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Relation from the project to its tasks (overrides NOTION_REL_PROJECT_TO_TASKS)
    #[arg(long)]
    pub tasks_relation: Option<String>,

    /// Relation from the project to its notes (overrides NOTION_REL_PROJECT_TO_NOTES)
    #[arg(long)]
    pub notes_relation: Option<String>,

    /// URL property that receives the report link (overrides NOTION_PROJECT_PDF_URL_PROP)
    #[arg(long)]
    pub url_property: Option<String>,

    /// Heading level (1-6) or 'bold' for headings in the project overview
    #[arg(long)]
    pub overview_headings: Option<HeadingPolicy>,

    /// Heading level (1-6) or 'bold' for headings inside tasks and notes
    #[arg(long)]
    pub record_headings: Option<HeadingPolicy>,

    /// Related records fetched at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Seconds allowed for fetching and assembling one report
    #[arg(long)]
    pub timeout: Option<u64>,

    /// HTML to PDF command reading stdin and writing stdout (overrides PDF_RENDERER_COMMAND)
    #[arg(long)]
    pub pdf_command: Option<String>,
}

/// Where artifacts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSettings {
    Local { root: PathBuf },
    Gcs { bucket: String, access_token: String },
}

/// Resolved configuration, validated and ready to build a [`ReportPipeline`].
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub api_key: ApiKey,
    pub report: ReportConfig,
    pub export: ExportConfig,
    pub storage: StorageSettings,
    pub pdf_command: String,
    /// `None` when the write-back is disabled.
    pub url_property: Option<String>,
    pub timeout: Duration,
}

impl ReportSettings {
    /// Resolves settings from CLI flags and the process environment.
    pub fn resolve(args: &ReportArgs) -> Result<Self, AppError> {
        Self::resolve_with(args, |name| std::env::var(name).ok())
    }

    /// Same as [`ReportSettings::resolve`] with an explicit variable lookup.
    pub fn resolve_with<F>(args: &ReportArgs, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let api_key = var("NOTION_API_KEY")
            .or_else(|| var("NOTION_API_TOKEN"))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "NOTION_API_KEY environment variable not set".to_string(),
                )
            })?;
        let api_key = ApiKey::new(api_key)?;

        let report = ReportConfig {
            tasks_relation: args
                .tasks_relation
                .clone()
                .or_else(|| var("NOTION_REL_PROJECT_TO_TASKS"))
                .unwrap_or_else(|| "Tasks".to_string()),
            notes_relation: args
                .notes_relation
                .clone()
                .or_else(|| var("NOTION_REL_PROJECT_TO_NOTES"))
                .unwrap_or_else(|| "Notes".to_string()),
            overview_headings: args
                .overview_headings
                .unwrap_or(HeadingPolicy::Level(OVERVIEW_HEADING_LEVEL)),
            record_headings: args
                .record_headings
                .unwrap_or(HeadingPolicy::Level(RECORD_HEADING_LEVEL)),
            concurrency: args.concurrency.unwrap_or(DEFAULT_FETCH_CONCURRENCY),
            ..ReportConfig::default()
        };

        let url_property = if args.no_url_update {
            None
        } else {
            Some(
                args.url_property
                    .clone()
                    .or_else(|| var("NOTION_PROJECT_PDF_URL_PROP"))
                    .unwrap_or_else(|| "Latest PDF URL".to_string()),
            )
        };

        let kind = match args.storage {
            Some(kind) => kind,
            None => match var("USE_LOCAL_STORAGE") {
                Some(flag) if !parse_bool(&flag) => StorageKind::Gcs,
                _ => StorageKind::Local,
            },
        };
        let storage = match kind {
            StorageKind::Local => StorageSettings::Local {
                root: args
                    .output_dir
                    .clone()
                    .or_else(|| var("LOCAL_STORAGE_PATH").map(PathBuf::from))
                    .unwrap_or_else(|| PathBuf::from("./local_reports")),
            },
            StorageKind::Gcs => StorageSettings::Gcs {
                bucket: var("GCS_BUCKET").ok_or_else(|| {
                    AppError::MissingConfiguration(
                        "GCS storage selected but GCS_BUCKET is not set".to_string(),
                    )
                })?,
                access_token: var("GCS_ACCESS_TOKEN").ok_or_else(|| {
                    AppError::MissingConfiguration(
                        "GCS storage selected but GCS_ACCESS_TOKEN is not set".to_string(),
                    )
                })?,
            },
        };

        Ok(ReportSettings {
            api_key,
            report,
            export: ExportConfig {
                pdf: args.pdf,
                ..ExportConfig::default()
            },
            storage,
            pdf_command: args
                .pdf_command
                .clone()
                .or_else(|| var("PDF_RENDERER_COMMAND"))
                .unwrap_or_else(|| DEFAULT_PDF_COMMAND.to_string()),
            url_property,
            timeout: Duration::from_secs(
                args.timeout.unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS),
            ),
        })
    }

    pub fn storage_backend(&self) -> Result<Arc<dyn StorageBackend>, AppError> {
        Ok(match &self.storage {
            StorageSettings::Local { root } => Arc::new(LocalStorage::new(root.clone())),
            StorageSettings::Gcs {
                bucket,
                access_token,
            } => Arc::new(GcsStorage::new(bucket.clone(), access_token.clone())?),
        })
    }

    /// Wires the Notion client, storage and renderer into a pipeline.
    pub fn build_pipeline(&self) -> Result<ReportPipeline, AppError> {
        let client: Arc<dyn WorkspaceClient> =
            Arc::new(NotionHttpClient::new(&self.api_key)?);
        self.build_pipeline_with(client)
    }

    /// Same as [`ReportSettings::build_pipeline`] with a caller-supplied client.
    pub fn build_pipeline_with(
        &self,
        client: Arc<dyn WorkspaceClient>,
    ) -> Result<ReportPipeline, AppError> {
        let mut exporter = Exporter::new(self.export.clone(), self.storage_backend()?)?;
        if self.export.pdf {
            let renderer = CommandPdfRenderer::from_command_line(&self.pdf_command)?;
            exporter = exporter.with_pdf_renderer(Arc::new(renderer));
        }

        Ok(ReportPipeline::new(client, self.report.clone(), exporter)
            .with_url_property(self.url_property.clone())
            .with_timeout(self.timeout))
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
