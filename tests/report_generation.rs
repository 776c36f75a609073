// tests/report_generation.rs
//! Drives the full pipeline against in-memory collaborators.

mod common;

use common::*;
use notion2report::{
    AppError, ExportConfig, Exporter, PdfOutcome, PdfRenderer, Property, Record, ReportAssembler,
    ReportConfig, ReportPipeline, WorkspaceClient,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const URL_PROPERTY: &str = "Latest PDF URL";

fn pipeline(
    workspace: Arc<FakeWorkspace>,
    storage: Arc<RecordingStorage>,
    renderer: Option<Arc<dyn PdfRenderer>>,
) -> ReportPipeline {
    let export = ExportConfig {
        pdf: renderer.is_some(),
        ..ExportConfig::default()
    };
    let mut exporter = Exporter::new(export, storage).unwrap();
    if let Some(renderer) = renderer {
        exporter = exporter.with_pdf_renderer(renderer);
    }
    let client: Arc<dyn WorkspaceClient> = workspace;
    ReportPipeline::new(client, ReportConfig::default(), exporter)
        .with_url_property(Some(URL_PROPERTY.to_string()))
}

fn lines_with_prefix<'a>(markdown: &'a str, prefix: &str) -> Vec<&'a str> {
    markdown.lines().filter(|l| l.starts_with(prefix)).collect()
}

/// Lines between `## <name>` and the next `---` separator.
fn section<'a>(markdown: &'a str, name: &str) -> Vec<&'a str> {
    let header = format!("## {}", name);
    markdown
        .lines()
        .skip_while(|l| *l != header)
        .skip(1)
        .take_while(|l| *l != "---")
        .filter(|l| !l.is_empty())
        .collect()
}

fn stored_markdown(storage: &RecordingStorage) -> String {
    let path = storage
        .paths()
        .into_iter()
        .find(|p| p.ends_with(".md"))
        .expect("a markdown artifact");
    storage.text(&path).unwrap()
}

#[tokio::test]
async fn test_project_with_two_tasks_and_one_note() {
    let workspace = Arc::new(apollo_workspace());
    let storage = Arc::new(RecordingStorage::default());
    let summary = pipeline(workspace.clone(), storage.clone(), None)
        .generate(&page_id(1))
        .await
        .unwrap();

    assert_eq!(summary.project_title, "Apollo");
    assert_eq!(summary.tasks_count, 2);
    assert_eq!(summary.notes_count, 1);
    assert_eq!(summary.export.pdf, PdfOutcome::Skipped);

    let markdown = stored_markdown(&storage);
    assert!(markdown.starts_with("# Apollo\n\n**Generated:** "));
    assert_eq!(
        lines_with_prefix(&markdown, "## "),
        vec!["## Project Overview", "## Tasks", "## Notes"]
    );

    let task_headings: Vec<&str> = section(&markdown, "Tasks")
        .into_iter()
        .filter(|l| l.starts_with("### "))
        .collect();
    assert_eq!(
        task_headings,
        vec![
            "### Design review - **Status: Done**, Due: 2025-09-11, Done: 2025-09-10",
            "### Launch - **Status: Next action**, Due: 2025-09-20",
        ]
    );
    assert_eq!(
        section(&markdown, "Notes"),
        vec!["### Kickoff notes", "Everyone attended."]
    );

    let toc_line = markdown.find("**Table of Contents**").unwrap();
    let overview_line = markdown.find("## Project Overview").unwrap();
    assert!(toc_line < overview_line);
    let toc: Vec<&str> = markdown[toc_line..overview_line]
        .lines()
        .filter(|l| l.starts_with("- ["))
        .collect();
    assert_eq!(toc.len(), 3);
    assert_eq!(toc[2], "- [Kickoff notes](#kickoff-notes)");

    // Content headings are flattened below the section headings.
    assert!(section(&markdown, "Project Overview").contains(&"### Goals"));
    assert!(section(&markdown, "Tasks").contains(&"#### Agenda"));
}

#[tokio::test]
async fn test_url_written_back_to_project() {
    let workspace = Arc::new(apollo_workspace());
    let storage = Arc::new(RecordingStorage::default());
    let summary = pipeline(workspace.clone(), storage, None)
        .generate(&page_id(1))
        .await
        .unwrap();

    assert!(summary.url().starts_with("mem://reports/0000/project-apollo-"));
    assert!(summary.url().ends_with(".md"));
    assert_eq!(summary.url_update_error, None);
    assert_eq!(
        workspace.url_updates(),
        vec![(page_id(1), URL_PROPERTY.to_string(), summary.url().to_string())]
    );
}

#[tokio::test]
async fn test_write_back_disabled() {
    let workspace = Arc::new(apollo_workspace());
    let storage = Arc::new(RecordingStorage::default());
    pipeline(workspace.clone(), storage, None)
        .with_url_property(None)
        .generate(&page_id(1))
        .await
        .unwrap();

    assert!(workspace.url_updates().is_empty());
}

#[tokio::test]
async fn test_failed_write_back_keeps_artifacts() {
    let workspace = Arc::new(apollo_workspace().rejecting_url_updates());
    let storage = Arc::new(RecordingStorage::default());
    let summary = pipeline(workspace, storage.clone(), None)
        .generate(&page_id(1))
        .await
        .unwrap();

    let error = summary.url_update_error.expect("write-back error reported");
    assert!(error.contains("not a url"));
    assert_eq!(storage.paths().len(), 1);
}

#[tokio::test]
async fn test_empty_notes_relation_still_has_section() {
    let project = Record::new(page_id(1), "Solo")
        .with_property("Tasks", Property::Relation(vec![page_id(11)]))
        .with_property("Notes", Property::Relation(vec![]));
    let task = Record::new(page_id(11), "Only task");
    let workspace = Arc::new(
        FakeWorkspace::new()
            .with_page(project, vec![])
            .with_page(task, vec![]),
    );
    let storage = Arc::new(RecordingStorage::default());

    let summary = pipeline(workspace, storage.clone(), None)
        .generate(&page_id(1))
        .await
        .unwrap();

    assert_eq!(summary.notes_count, 0);
    let markdown = stored_markdown(&storage);
    assert_eq!(section(&markdown, "Notes"), vec!["*No notes found.*"]);
    assert_eq!(section(&markdown, "Tasks"), vec!["### Only task"]);
}

#[tokio::test]
async fn test_pdf_falls_back_to_simplified_template() {
    let workspace = Arc::new(apollo_workspace());
    let storage = Arc::new(RecordingStorage::default());
    let renderer = Arc::new(ScriptedPdfRenderer::default());

    let dyn_renderer: Arc<dyn PdfRenderer> = renderer.clone();
    let summary = pipeline(workspace.clone(), storage.clone(), Some(dyn_renderer))
        .generate(&page_id(1))
        .await
        .unwrap();

    let inputs = renderer.inputs();
    assert_eq!(inputs.len(), 2);
    assert!(inputs[0].contains("<details"));
    assert!(!inputs[1].contains("<details"));

    let PdfOutcome::Rendered {
        artifact,
        used_fallback,
    } = &summary.export.pdf
    else {
        panic!("expected a rendered PDF, got {:?}", summary.export.pdf);
    };
    assert!(*used_fallback);
    assert!(artifact.path.ends_with(".pdf"));
    assert_eq!(
        artifact.path.trim_end_matches(".pdf"),
        summary.export.markdown.path.trim_end_matches(".md")
    );
    assert_eq!(
        storage.content_type(&artifact.path).as_deref(),
        Some("application/pdf")
    );

    // The PDF becomes the primary link.
    assert_eq!(summary.url(), artifact.url);
    assert_eq!(workspace.url_updates()[0].2, artifact.url);
}

struct BrokenRenderer;

#[async_trait::async_trait]
impl PdfRenderer for BrokenRenderer {
    async fn render(&self, _html: &str) -> Result<Vec<u8>, AppError> {
        Err(AppError::PdfRender("converter crashed".into()))
    }
}

#[tokio::test]
async fn test_total_pdf_failure_keeps_markdown() {
    let workspace = Arc::new(apollo_workspace());
    let storage = Arc::new(RecordingStorage::default());

    let renderer: Arc<dyn PdfRenderer> = Arc::new(BrokenRenderer);
    let summary = pipeline(workspace, storage.clone(), Some(renderer))
        .generate(&page_id(1))
        .await
        .unwrap();

    match &summary.export.pdf {
        PdfOutcome::Failed { reason } => assert!(reason.contains("converter crashed")),
        other => panic!("expected a failed PDF, got {:?}", other),
    }
    assert_eq!(summary.url(), summary.export.markdown.url);
    assert_eq!(storage.paths().len(), 1);
}

struct StalledRenderer;

#[async_trait::async_trait]
impl PdfRenderer for StalledRenderer {
    async fn render(&self, _html: &str) -> Result<Vec<u8>, AppError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(b"%PDF-1.7 late".to_vec())
    }
}

#[tokio::test]
async fn test_stalled_pdf_renderer_is_cut_off_by_budget() {
    let workspace = Arc::new(apollo_workspace());
    let storage = Arc::new(RecordingStorage::default());

    let renderer: Arc<dyn PdfRenderer> = Arc::new(StalledRenderer);
    let started = std::time::Instant::now();
    let summary = pipeline(workspace.clone(), storage.clone(), Some(renderer))
        .with_timeout(Duration::from_millis(300))
        .generate(&page_id(1))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    match &summary.export.pdf {
        PdfOutcome::Failed { reason } => assert!(reason.contains("generation budget")),
        other => panic!("expected a failed PDF, got {:?}", other),
    }
    assert_eq!(storage.paths().len(), 1);
    assert_eq!(summary.url(), summary.export.markdown.url);
    assert_eq!(workspace.url_updates()[0].2, summary.export.markdown.url);
}

#[tokio::test]
async fn test_unreadable_records_become_placeholders() {
    let project = Record::new(page_id(1), "Patchy").with_property(
        "Tasks",
        Property::Relation(vec![page_id(11), page_id(13)]),
    );
    let task = Record::new(page_id(11), "Readable title");
    let workspace = Arc::new(
        FakeWorkspace::new()
            .with_page(project, vec![])
            .with_page(task, vec![paragraph("never seen")])
            .with_broken_body(&page_id(11)),
    );
    let storage = Arc::new(RecordingStorage::default());

    let summary = pipeline(workspace, storage.clone(), None)
        .generate(&page_id(1))
        .await
        .unwrap();

    assert_eq!(summary.tasks_count, 2);
    let markdown = stored_markdown(&storage);
    assert_eq!(
        section(&markdown, "Tasks"),
        vec![
            "### Readable title",
            "> Content unavailable: Malformed response: unexpected end of body",
            "### [Unavailable task 0000000000000000000000000000000d]",
        ]
    );
}

#[tokio::test]
async fn test_missing_project_is_fatal_and_stores_nothing() {
    let workspace = Arc::new(apollo_workspace());
    let storage = Arc::new(RecordingStorage::default());

    let result = pipeline(workspace.clone(), storage.clone(), None)
        .generate(&page_id(99))
        .await;

    assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    assert!(storage.paths().is_empty());
    assert!(workspace.url_updates().is_empty());
}

#[tokio::test]
async fn test_timeout_abandons_before_storing() {
    let workspace = Arc::new(apollo_workspace().with_latency(Duration::from_secs(5)));
    let storage = Arc::new(RecordingStorage::default());

    let result = pipeline(workspace, storage.clone(), None)
        .with_timeout(Duration::from_millis(50))
        .generate(&page_id(1))
        .await;

    assert!(matches!(result, Err(AppError::Timeout(_))));
    assert!(storage.paths().is_empty());
}

#[tokio::test]
async fn test_assembly_is_idempotent() {
    let client: Arc<dyn WorkspaceClient> = Arc::new(apollo_workspace());
    let assembler = ReportAssembler::new(ReportConfig::default(), client);

    let first = assembler.assemble(&page_id(1)).await.unwrap();
    let second = assembler.assemble(&page_id(1)).await.unwrap();

    assert_eq!(first.body, second.body);
    assert_eq!(first, second);
}
