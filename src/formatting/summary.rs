// src/formatting/summary.rs
//! One-line heading summaries for task and note records.

use super::properties::render_property;
use crate::model::Record;

/// Property names surfaced in a record's summary heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFields {
    /// Candidates for the status label; the first non-empty one wins.
    pub status: Vec<String>,
    pub priority: String,
    pub due: String,
    pub done: String,
    pub assignee: String,
    pub tags: String,
    pub info: String,
}

impl Default for SummaryFields {
    fn default() -> Self {
        Self {
            status: vec!["Status".to_string(), "Kanban".to_string()],
            priority: "Priority".to_string(),
            due: "Do date".to_string(),
            done: "Date done".to_string(),
            assignee: "Assignee".to_string(),
            tags: "Tags".to_string(),
            info: "Info".to_string(),
        }
    }
}

/// Builds `Title - **Status: X**, Priority: P, ...` for a record.
///
/// Fields with no value are left out; with none at all the result is the
/// bare title.
pub fn summarize(record: &Record, fields: &SummaryFields) -> String {
    let title = record.title.trim();
    let value = |name: &str| render_property(record.property(name));

    let mut parts = Vec::new();

    if let Some(status) = fields
        .status
        .iter()
        .map(|name| value(name.as_str()))
        .find(|s| !s.is_empty())
    {
        parts.push(format!("**Status: {}**", status));
    }

    let labelled = [
        ("Priority", &fields.priority),
        ("Due", &fields.due),
        ("Done", &fields.done),
        ("Assignee", &fields.assignee),
        ("Tags", &fields.tags),
        ("Info", &fields.info),
    ];
    for (label, name) in labelled {
        let text = value(name.as_str());
        if !text.is_empty() {
            parts.push(format!("{}: {}", label, text));
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        format!("{} - {}", title, parts.join(", "))
    }
}
