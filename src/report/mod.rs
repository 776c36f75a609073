// src/report/mod.rs
//! Project reports: the assembled document and the assembler that builds it.

mod assembler;

pub use assembler::{ReportAssembler, ReportConfig};

use crate::types::PageId;
use chrono::{DateTime, Utc};

/// Timestamp format of the `**Generated:**` line.
pub const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A finished report.
///
/// `body` holds everything below the generated line: table of contents,
/// overview, tasks, notes and footer. Equality ignores `generated_at`.
#[derive(Debug, Clone)]
pub struct Report {
    pub project_id: PageId,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub body: String,
    pub task_count: usize,
    pub note_count: usize,
}

impl Report {
    /// The complete Markdown document.
    pub fn to_markdown(&self) -> String {
        format!(
            "# {}\n\n**Generated:** {}\n\n{}",
            self.title,
            self.generated_at.format(GENERATED_FORMAT),
            self.body
        )
    }
}

impl PartialEq for Report {
    fn eq(&self, other: &Self) -> bool {
        self.project_id == other.project_id
            && self.title == other.title
            && self.body == other.body
            && self.task_count == other.task_count
            && self.note_count == other.note_count
    }
}

impl Eq for Report {}
