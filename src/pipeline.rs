// src/pipeline.rs
//! End-to-end report generation: assemble, export, then write the link back.

use crate::api::WorkspaceClient;
use crate::constants::DEFAULT_GENERATION_TIMEOUT_SECS;
use crate::error::AppError;
use crate::export::{ExportOutcome, Exporter};
use crate::report::{Report, ReportAssembler, ReportConfig};
use crate::types::PageId;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub project_id: PageId,
    pub project_title: String,
    pub export: ExportOutcome,
    pub tasks_count: usize,
    pub notes_count: usize,
    /// Why the URL write-back failed, if it was attempted and failed.
    pub url_update_error: Option<String>,
}

impl GenerationSummary {
    /// The link handed back to callers: the PDF when one exists.
    pub fn url(&self) -> &str {
        self.export.primary_url()
    }
}

/// Assembles, exports and links back one report per call.
pub struct ReportPipeline {
    client: Arc<dyn WorkspaceClient>,
    assembler: ReportAssembler,
    exporter: Exporter,
    url_property: Option<String>,
    timeout: Duration,
}

impl ReportPipeline {
    pub fn new(client: Arc<dyn WorkspaceClient>, config: ReportConfig, exporter: Exporter) -> Self {
        Self {
            assembler: ReportAssembler::new(config, Arc::clone(&client)),
            client,
            exporter,
            url_property: None,
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }

    /// Property on the project page that receives the report URL. `None`
    /// disables the write-back.
    pub fn with_url_property(mut self, property: Option<String>) -> Self {
        self.url_property = property;
        self
    }

    /// Budget for one run. Nothing is stored when it runs out during
    /// assembly; a PDF still rendering when it runs out is reported as failed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn generate(&self, project_id: &PageId) -> Result<GenerationSummary, AppError> {
        let deadline = Instant::now() + self.timeout;
        let report = self.assemble_within_budget(project_id, deadline).await?;

        log::info!("Exporting report '{}'", report.title);
        let export = self.exporter.export_until(&report, Some(deadline)).await?;

        let url_update_error = self.write_back(&report, &export).await;

        Ok(GenerationSummary {
            project_id: report.project_id.clone(),
            project_title: report.title.clone(),
            export,
            tasks_count: report.task_count,
            notes_count: report.note_count,
            url_update_error,
        })
    }

    async fn assemble_within_budget(
        &self,
        project_id: &PageId,
        deadline: Instant,
    ) -> Result<Report, AppError> {
        match tokio::time::timeout_at(deadline, self.assembler.assemble(project_id)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!(
                    "Report for {} not assembled within {}s; abandoning",
                    project_id,
                    self.timeout.as_secs()
                );
                Err(AppError::Timeout(self.timeout.as_secs()))
            }
        }
    }

    async fn write_back(&self, report: &Report, export: &ExportOutcome) -> Option<String> {
        let property = self.url_property.as_deref()?;
        let url = export.primary_url();

        log::info!("Setting '{}' on {} to {}", property, report.project_id, url);
        match self
            .client
            .update_url_property(&report.project_id, property, url)
            .await
        {
            Ok(()) => None,
            Err(e) => {
                log::warn!(
                    "Report stored but '{}' could not be updated: {}",
                    property,
                    e
                );
                Some(e.to_string())
            }
        }
    }
}
