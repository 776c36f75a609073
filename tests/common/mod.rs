// tests/common/mod.rs
//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use notion2report::{
    AppError, Block, BlockKind, DateValue, NotionId, PageId, PdfRenderer, Property, Record,
    RichTextItem, StorageBackend, StoredArtifact, WorkspaceClient,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

pub fn page_id(n: u32) -> PageId {
    PageId::parse(&format!("{:0>32x}", n)).unwrap()
}

pub fn text(s: &str) -> Vec<RichTextItem> {
    vec![RichTextItem::plain_text(s)]
}

pub fn paragraph(s: &str) -> Block {
    Block::new(BlockKind::Paragraph { text: text(s) })
}

pub fn heading(level: u8, s: &str) -> Block {
    Block::new(BlockKind::Heading {
        level,
        text: text(s),
    })
}

pub fn toggle(summary: &str, children: Vec<Block>) -> Block {
    Block::new(BlockKind::Toggle {
        text: text(summary),
    })
    .with_children(children)
}

pub fn date(y: i32, m: u32, d: u32) -> Property {
    Property::Date(Some(DateValue::on(
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
    )))
}

// --- Workspace ---

/// Serves pages and block children from memory, the way the Notion API
/// would: children are listed per parent id, not embedded.
#[derive(Default)]
pub struct FakeWorkspace {
    records: HashMap<String, Record>,
    children: HashMap<String, Vec<Block>>,
    broken_bodies: Vec<String>,
    latency: Option<Duration>,
    reject_url_updates: bool,
    url_updates: Mutex<Vec<(PageId, String, String)>>,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, record: Record, blocks: Vec<Block>) -> Self {
        let id = record.id.as_str().to_string();
        self.register_children(&id, blocks);
        self.records.insert(id, record);
        self
    }

    /// Listing the blocks of this page fails.
    pub fn with_broken_body(mut self, id: &PageId) -> Self {
        self.broken_bodies.push(id.as_str().to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn rejecting_url_updates(mut self) -> Self {
        self.reject_url_updates = true;
        self
    }

    pub fn url_updates(&self) -> Vec<(PageId, String, String)> {
        self.url_updates.lock().unwrap().clone()
    }

    fn register_children(&mut self, parent: &str, blocks: Vec<Block>) {
        let mut level = Vec::with_capacity(blocks.len());
        for mut block in blocks {
            let nested = std::mem::take(&mut block.common.children);
            if !nested.is_empty() {
                let id = block.common.id.as_str().to_string();
                self.register_children(&id, nested);
            }
            level.push(block);
        }
        self.children.insert(parent.to_string(), level);
    }
}

#[async_trait::async_trait]
impl WorkspaceClient for FakeWorkspace {
    async fn get_record(&self, id: &PageId) -> Result<Record, AppError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.records
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| AppError::MalformedResponse(format!("object {} not found", id)))
    }

    async fn get_block_children(&self, id: &NotionId) -> Result<Vec<Block>, AppError> {
        if self.broken_bodies.iter().any(|b| b == id.as_str()) {
            return Err(AppError::MalformedResponse("unexpected end of body".into()));
        }
        Ok(self.children.get(id.as_str()).cloned().unwrap_or_default())
    }

    async fn update_url_property(
        &self,
        id: &PageId,
        property: &str,
        url: &str,
    ) -> Result<(), AppError> {
        if self.reject_url_updates {
            return Err(AppError::MalformedResponse(format!(
                "property '{}' is not a url",
                property
            )));
        }
        self.url_updates
            .lock()
            .unwrap()
            .push((id.clone(), property.to_string(), url.to_string()));
        Ok(())
    }
}

// --- Storage ---

/// Keeps every artifact in memory under `mem://` URLs.
#[derive(Default)]
pub struct RecordingStorage {
    objects: Mutex<BTreeMap<String, (Vec<u8>, String)>>,
}

impl RecordingStorage {
    pub fn paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn text(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(bytes, _)| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, content_type)| content_type.clone())
    }
}

#[async_trait::async_trait]
impl StorageBackend for RecordingStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredArtifact, AppError> {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(StoredArtifact {
            path: path.to_string(),
            url: format!("mem://{}", path),
        })
    }

    async fn exists(&self, path: &str) -> Result<bool, AppError> {
        Ok(self.objects.lock().unwrap().contains_key(path))
    }
}

// --- PDF ---

/// Behaves like a converter that chokes on raw `<details>` markup.
#[derive(Default)]
pub struct ScriptedPdfRenderer {
    inputs: Mutex<Vec<String>>,
}

impl ScriptedPdfRenderer {
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PdfRenderer for ScriptedPdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, AppError> {
        self.inputs.lock().unwrap().push(html.to_string());
        if html.contains("<details") {
            return Err(AppError::PdfRender("unsupported element <details>".into()));
        }
        Ok(b"%PDF-1.7 fake".to_vec())
    }
}

// --- Fixtures ---

/// A project with a finished task, an open task and one note.
pub fn apollo_workspace() -> FakeWorkspace {
    let project = Record::new(page_id(1), "Apollo")
        .with_property(
            "Tasks",
            Property::Relation(vec![page_id(11), page_id(12)]),
        )
        .with_property("Notes", Property::Relation(vec![page_id(21)]))
        .with_property("Latest PDF URL", Property::Url(None));

    let design = Record::new(page_id(11), "Design review")
        .with_property("Status", Property::Status(Some("Done".into())))
        .with_property("Do date", date(2025, 9, 11))
        .with_property("Date done", date(2025, 9, 10));

    let launch = Record::new(page_id(12), "Launch")
        .with_property("Status", Property::Status(Some("Next action".into())))
        .with_property("Do date", date(2025, 9, 20));

    let kickoff = Record::new(page_id(21), "Kickoff notes");

    FakeWorkspace::new()
        .with_page(
            project,
            vec![heading(1, "Goals"), paragraph("Reach orbit by June.")],
        )
        .with_page(
            design,
            vec![
                heading(2, "Agenda"),
                toggle("Open points", vec![paragraph("Heat shield")]),
            ],
        )
        .with_page(launch, vec![paragraph("Countdown checklist signed.")])
        .with_page(kickoff, vec![paragraph("Everyone attended.")])
}
