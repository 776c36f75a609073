// src/export/mod.rs
//! Writes a finished report to storage as Markdown and, optionally, PDF.
//!
//! The Markdown is always written first and is the source of truth. PDF
//! rendering tries the styled template, then the simplified one, and a
//! total failure is reported in the outcome rather than as an error.

mod html;
mod pdf;
mod storage;
mod templates;

pub use html::{markdown_to_html, HtmlFlavor};
pub use pdf::{CommandPdfRenderer, PdfRenderer, DEFAULT_PDF_COMMAND};
pub use storage::{
    GcsStorage, LocalStorage, StorageBackend, StoredArtifact, GCS_DEFAULT_ENDPOINT,
};
pub use templates::{PageData, PageTemplate, ReportTemplates};

use crate::error::AppError;
use crate::formatting::slugify;
use crate::report::{Report, GENERATED_FORMAT};
use std::sync::Arc;
use tokio::time::Instant;

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Render and store a PDF next to the Markdown.
    pub pdf: bool,
    /// Leading directory of every artifact path.
    pub prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pdf: false,
            prefix: "reports".to_string(),
        }
    }
}

/// What happened to the PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfOutcome {
    /// No PDF was requested.
    Skipped,
    Rendered {
        artifact: StoredArtifact,
        /// The styled template failed and the simplified one was used.
        used_fallback: bool,
    },
    /// Both templates failed, or the PDF could not be stored.
    Failed { reason: String },
}

impl PdfOutcome {
    pub fn artifact(&self) -> Option<&StoredArtifact> {
        match self {
            PdfOutcome::Rendered { artifact, .. } => Some(artifact),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub markdown: StoredArtifact,
    pub pdf: PdfOutcome,
}

impl ExportOutcome {
    /// The PDF URL when a PDF was stored, otherwise the Markdown URL.
    pub fn primary_url(&self) -> &str {
        self.pdf
            .artifact()
            .map(|a| a.url.as_str())
            .unwrap_or(&self.markdown.url)
    }
}

/// `<prefix>/<first 4 id chars>/project-<slug>-<YYYYMMDD_HHMM>.md`
pub fn report_path(report: &Report, prefix: &str) -> String {
    let id = report.project_id.as_str();
    let shard = id.get(..4).unwrap_or(id);
    let slug = match slugify(&report.title) {
        s if s.is_empty() => "untitled".to_string(),
        s => s,
    };
    format!(
        "{}/{}/project-{}-{}.md",
        prefix.trim_end_matches('/'),
        shard,
        slug,
        report.generated_at.format("%Y%m%d_%H%M")
    )
}

/// Writes reports through a [`StorageBackend`] and an optional [`PdfRenderer`].
pub struct Exporter {
    config: ExportConfig,
    storage: Arc<dyn StorageBackend>,
    renderer: Option<Arc<dyn PdfRenderer>>,
    templates: ReportTemplates,
}

impl Exporter {
    pub fn new(config: ExportConfig, storage: Arc<dyn StorageBackend>) -> Result<Self, AppError> {
        Ok(Self {
            config,
            storage,
            renderer: None,
            templates: ReportTemplates::new()?,
        })
    }

    pub fn with_pdf_renderer(mut self, renderer: Arc<dyn PdfRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Stores the report. Fails only when the Markdown cannot be written.
    pub async fn export(&self, report: &Report) -> Result<ExportOutcome, AppError> {
        self.export_until(report, None).await
    }

    /// Like [`Exporter::export`], but PDF rendering still running at
    /// `deadline` is abandoned and reported as failed. The Markdown write
    /// is never cut short.
    pub async fn export_until(
        &self,
        report: &Report,
        deadline: Option<Instant>,
    ) -> Result<ExportOutcome, AppError> {
        let markdown = report.to_markdown();
        let path = report_path(report, &self.config.prefix);

        log::info!("Storing Markdown report at {} ({})", path, self.storage.name());
        let markdown_artifact = self
            .storage
            .put(&path, markdown.clone().into_bytes(), MARKDOWN_CONTENT_TYPE)
            .await?;

        let pdf = if self.config.pdf {
            self.export_pdf(report, &markdown, &path, deadline).await
        } else {
            PdfOutcome::Skipped
        };

        Ok(ExportOutcome {
            markdown: markdown_artifact,
            pdf,
        })
    }

    async fn export_pdf(
        &self,
        report: &Report,
        markdown: &str,
        markdown_path: &str,
        deadline: Option<Instant>,
    ) -> PdfOutcome {
        let Some(renderer) = &self.renderer else {
            log::warn!("PDF output requested but no renderer is configured");
            return PdfOutcome::Failed {
                reason: "no PDF renderer configured".to_string(),
            };
        };

        let rendering = self.render_pdf(renderer.as_ref(), report, markdown);
        let rendered = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, rendering)
                .await
                .unwrap_or_else(|_| {
                    Err("PDF rendering did not finish within the generation budget".to_string())
                }),
            None => rendering.await,
        };
        let (bytes, used_fallback) = match rendered {
            Ok(rendered) => rendered,
            Err(reason) => {
                log::warn!("PDF not produced: {}", reason);
                return PdfOutcome::Failed { reason };
            }
        };

        let pdf_path = format!("{}.pdf", markdown_path.trim_end_matches(".md"));
        match self.storage.put(&pdf_path, bytes, PDF_CONTENT_TYPE).await {
            Ok(artifact) => PdfOutcome::Rendered {
                artifact,
                used_fallback,
            },
            Err(e) => {
                log::warn!("Could not store PDF at {}: {}", pdf_path, e);
                PdfOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Styled first, then simplified. Returns the bytes and whether the
    /// fallback was needed, or both failure messages.
    async fn render_pdf(
        &self,
        renderer: &dyn PdfRenderer,
        report: &Report,
        markdown: &str,
    ) -> Result<(Vec<u8>, bool), String> {
        let styled_error = match self
            .render_with(renderer, report, markdown, PageTemplate::Styled, HtmlFlavor::Full)
            .await
        {
            Ok(bytes) => return Ok((bytes, false)),
            Err(e) => e,
        };
        log::warn!(
            "Styled PDF rendering failed, retrying with the simplified template: {}",
            styled_error
        );

        self.render_with(
            renderer,
            report,
            markdown,
            PageTemplate::Simplified,
            HtmlFlavor::Simplified,
        )
        .await
        .map(|bytes| (bytes, true))
        .map_err(|e| format!("styled: {}; simplified: {}", styled_error, e))
    }

    async fn render_with(
        &self,
        renderer: &dyn PdfRenderer,
        report: &Report,
        markdown: &str,
        template: PageTemplate,
        flavor: HtmlFlavor,
    ) -> Result<Vec<u8>, AppError> {
        let page = PageData {
            title: &report.title,
            generated: report.generated_at.format(GENERATED_FORMAT).to_string(),
            body: markdown_to_html(markdown, flavor),
        };
        let html = self.templates.render(template, &page)?;
        renderer.render(&html).await
    }
}
