use crate::types::{PageId, RichTextItem};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A date or date range, truncated to calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateValue {
    pub fn on(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// The computed value of a formula property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormulaValue {
    String(Option<String>),
    Number(Option<f64>),
    Boolean(bool),
    Date(Option<DateValue>),
}

/// A typed page property value.
///
/// Property types that reports never surface collapse into `Unsupported`,
/// which keeps the Notion type name for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Property {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
    Select(Option<String>),
    Status(Option<String>),
    MultiSelect(Vec<String>),
    Date(Option<DateValue>),
    Checkbox(bool),
    Number(Option<f64>),
    Formula(Option<FormulaValue>),
    Url(Option<String>),
    Email(Option<String>),
    PhoneNumber(Option<String>),
    People(Vec<String>),
    Relation(Vec<PageId>),
    CreatedTime(DateTime<Utc>),
    LastEditedTime(Option<DateTime<Utc>>),
    Unsupported { type_name: String },
}

impl Property {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        match self {
            Property::Title(_) => "title",
            Property::RichText(_) => "rich_text",
            Property::Select(_) => "select",
            Property::Status(_) => "status",
            Property::MultiSelect(_) => "multi_select",
            Property::Date(_) => "date",
            Property::Checkbox(_) => "checkbox",
            Property::Number(_) => "number",
            Property::Formula(_) => "formula",
            Property::Url(_) => "url",
            Property::Email(_) => "email",
            Property::PhoneNumber(_) => "phone_number",
            Property::People(_) => "people",
            Property::Relation(_) => "relation",
            Property::CreatedTime(_) => "created_time",
            Property::LastEditedTime(_) => "last_edited_time",
            Property::Unsupported { type_name } => type_name,
        }
    }
}
