// src/report/assembler.rs
//! Fetches a project with its related tasks and notes and joins them into
//! one Markdown report.

use super::Report;
use crate::api::{fetch_block_tree, WorkspaceClient};
use crate::constants::{
    BLOCK_MAX_RENDER_DEPTH, DEFAULT_FETCH_CONCURRENCY, NOTION_MAX_FETCH_DEPTH,
    OVERVIEW_HEADING_LEVEL, RECORD_HEADING_LEVEL,
};
use crate::error::AppError;
use crate::formatting::{
    heading_texts, render_blocks, summarize, AnchorAllocator, HeadingPolicy, RenderOptions,
    SummaryFields,
};
use crate::model::{Block, Record};
use crate::types::{NotionId, PageId};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

pub const REPORT_FOOTER: &str = "*Report generated by notion2report*";

/// Everything the assembler needs to know about the workspace layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Relation on the project page that lists its tasks.
    pub tasks_relation: String,
    /// Relation on the project page that lists its notes.
    pub notes_relation: String,
    pub summary_fields: SummaryFields,
    pub overview_headings: HeadingPolicy,
    pub record_headings: HeadingPolicy,
    /// Related records fetched at once. Zero is treated as one.
    pub concurrency: usize,
    pub fetch_depth: u8,
    pub render_depth: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tasks_relation: "Tasks".to_string(),
            notes_relation: "Notes".to_string(),
            summary_fields: SummaryFields::default(),
            overview_headings: HeadingPolicy::Level(OVERVIEW_HEADING_LEVEL),
            record_headings: HeadingPolicy::Level(RECORD_HEADING_LEVEL),
            concurrency: DEFAULT_FETCH_CONCURRENCY,
            fetch_depth: NOTION_MAX_FETCH_DEPTH,
            render_depth: BLOCK_MAX_RENDER_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Tasks,
    Notes,
}

impl Section {
    fn title(self) -> &'static str {
        match self {
            Section::Tasks => "Tasks",
            Section::Notes => "Notes",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Section::Tasks => "task",
            Section::Notes => "note",
        }
    }
}

/// A related record as fetched, failures included.
enum RelatedEntry {
    Loaded {
        record: Record,
        body: Result<Vec<Block>, AppError>,
    },
    Unavailable {
        id: PageId,
    },
}

/// Builds [`Report`]s from a workspace.
pub struct ReportAssembler {
    config: ReportConfig,
    client: Arc<dyn WorkspaceClient>,
}

impl ReportAssembler {
    pub fn new(config: ReportConfig, client: Arc<dyn WorkspaceClient>) -> Self {
        Self { config, client }
    }

    /// Fetches and assembles the report for one project.
    ///
    /// Only a failure to fetch the project page itself is an error. Related
    /// records that cannot be read are replaced by placeholders.
    pub async fn assemble(&self, project_id: &PageId) -> Result<Report, AppError> {
        log::info!("Fetching project page {}", project_id);
        let project = self.client.get_record(project_id).await?;

        let overview = self.fetch_body(&project.id).await;
        if let Err(e) = &overview {
            log::warn!("Could not fetch content of project {}: {}", project.id, e);
        }

        let task_ids = self.related_ids(&project, Section::Tasks).await;
        let note_ids = self.related_ids(&project, Section::Notes).await;
        log::info!(
            "Project '{}' links {} task(s) and {} note(s)",
            project.title,
            task_ids.len(),
            note_ids.len()
        );

        let task_count = task_ids.len();
        let note_count = note_ids.len();
        let tasks = self.fetch_related(task_ids, Section::Tasks).await;
        let notes = self.fetch_related(note_ids, Section::Notes).await;

        log::info!("Rendering report for '{}'", project.title);
        let body = self.compose(&project, &overview, &tasks, &notes);

        Ok(Report {
            project_id: project.id.clone(),
            title: project.title.clone(),
            generated_at: Utc::now(),
            body,
            task_count,
            note_count,
        })
    }

    async fn related_ids(&self, project: &Record, section: Section) -> Vec<PageId> {
        let relation = match section {
            Section::Tasks => &self.config.tasks_relation,
            Section::Notes => &self.config.notes_relation,
        };
        match self.client.query_relation(project, relation).await {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!(
                    "Could not resolve relation '{}' on {}: {}",
                    relation,
                    project.id,
                    e
                );
                Vec::new()
            }
        }
    }

    async fn fetch_body(&self, id: &PageId) -> Result<Vec<Block>, AppError> {
        fetch_block_tree(
            self.client.as_ref(),
            &NotionId::from(id),
            self.config.fetch_depth,
        )
        .await
    }

    /// Fetches records concurrently. Results keep the order of `ids`.
    async fn fetch_related(&self, ids: Vec<PageId>, section: Section) -> Vec<RelatedEntry> {
        stream::iter(ids)
            .map(|id| self.fetch_entry(id, section))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await
    }

    async fn fetch_entry(&self, id: PageId, section: Section) -> RelatedEntry {
        let record = match self.client.get_record(&id).await {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping {} {}: {}", section.noun(), id, e);
                return RelatedEntry::Unavailable { id };
            }
        };
        let body = self.fetch_body(&record.id).await;
        if let Err(e) = &body {
            log::warn!(
                "Content of {} '{}' unavailable: {}",
                section.noun(),
                record.title,
                e
            );
        }
        RelatedEntry::Loaded { record, body }
    }

    fn compose(
        &self,
        project: &Record,
        overview: &Result<Vec<Block>, AppError>,
        tasks: &[RelatedEntry],
        notes: &[RelatedEntry],
    ) -> String {
        let overview_options = RenderOptions::new(self.config.overview_headings)
            .with_max_depth(self.config.render_depth);

        let mut doc = DocumentBuilder::new(&project.title);

        doc.push("---");
        doc.push("## Project Overview");
        doc.push(body_markdown(overview, &overview_options));

        for (section, entries) in [(Section::Tasks, tasks), (Section::Notes, notes)] {
            doc.push("---");
            doc.push(format!("## {}", section.title()));
            self.compose_section(&mut doc, section, entries);
        }

        doc.push("---");
        doc.push(REPORT_FOOTER);
        doc.finish()
    }

    fn compose_section(
        &self,
        doc: &mut DocumentBuilder,
        section: Section,
        entries: &[RelatedEntry],
    ) {
        if entries.is_empty() {
            doc.push(format!("*No {}s found.*", section.noun()));
            return;
        }

        let record_options = RenderOptions::new(self.config.record_headings)
            .with_max_depth(self.config.render_depth);

        for entry in entries {
            match entry {
                RelatedEntry::Loaded { record, body } => {
                    doc.push_entry(&summarize(record, &self.config.summary_fields));
                    doc.push(body_markdown(body, &record_options));
                }
                RelatedEntry::Unavailable { id } => {
                    doc.push_entry(&format!("[Unavailable {} {}]", section.noun(), id));
                }
            }
        }
    }
}

fn body_markdown(body: &Result<Vec<Block>, AppError>, options: &RenderOptions) -> String {
    match body {
        Ok(blocks) => render_blocks(blocks, options),
        Err(e) => format!("> Content unavailable: {}", e),
    }
}

/// Collects report chunks and the table of contents.
///
/// Anchors are allocated over every heading in document order, the same
/// walk the HTML export performs, so TOC links match heading ids.
struct DocumentBuilder {
    chunks: Vec<String>,
    anchors: AnchorAllocator,
    toc: Vec<String>,
}

impl DocumentBuilder {
    fn new(title: &str) -> Self {
        let mut anchors = AnchorAllocator::new();
        for heading in heading_texts(&format!("# {}", title)) {
            anchors.allocate(&heading);
        }
        Self {
            chunks: Vec::new(),
            anchors,
            toc: Vec::new(),
        }
    }

    fn push(&mut self, chunk: impl Into<String>) {
        let chunk = chunk.into();
        let chunk = chunk.trim_end();
        if chunk.is_empty() {
            return;
        }
        for heading in heading_texts(chunk) {
            self.anchors.allocate(&heading);
        }
        self.chunks.push(chunk.to_string());
    }

    /// Adds a `###` record heading and its table of contents entry.
    fn push_entry(&mut self, heading: &str) {
        let chunk = format!("### {}", heading);
        let text = heading_texts(&chunk)
            .into_iter()
            .next()
            .unwrap_or_else(|| heading.to_string());
        let anchor = self.anchors.allocate(&text);
        self.toc.push(format!("- [{}](#{})", text, anchor));
        self.chunks.push(chunk);
    }

    fn finish(self) -> String {
        let mut parts = Vec::with_capacity(self.chunks.len() + 1);
        if !self.toc.is_empty() {
            parts.push(format!("**Table of Contents**\n\n{}", self.toc.join("\n")));
        }
        parts.extend(self.chunks);
        let mut out = parts.join("\n\n");
        out.push('\n');
        out
    }
}
