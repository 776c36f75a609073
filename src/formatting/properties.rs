// src/formatting/properties.rs
//! Property values to display text.
//!
//! Rendering is total: a missing property, a null value or a type this crate
//! does not model all render as the empty string.

use crate::model::{DateValue, FormulaValue, Property};
use crate::types::plain_text_of;

/// Renders a property value to its display string.
pub fn render_property(value: Option<&Property>) -> String {
    let Some(property) = value else {
        return String::new();
    };

    let rendered = match property {
        Property::Title(items) | Property::RichText(items) => plain_text_of(items),
        Property::Select(name) | Property::Status(name) => name.clone().unwrap_or_default(),
        Property::MultiSelect(names) | Property::People(names) => join_non_empty(names),
        Property::Date(date) => date.as_ref().map(format_date).unwrap_or_default(),
        Property::Checkbox(checked) => yes_no(*checked),
        Property::Number(number) => number.map(format_number).unwrap_or_default(),
        Property::Formula(formula) => formula.as_ref().map(format_formula).unwrap_or_default(),
        Property::Url(text) | Property::Email(text) | Property::PhoneNumber(text) => {
            text.clone().unwrap_or_default()
        }
        Property::Relation(ids) => ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        Property::CreatedTime(at) => at.format("%Y-%m-%d").to_string(),
        Property::LastEditedTime(at) => at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Property::Unsupported { type_name } => {
            log::debug!("Not rendering unsupported '{}' property", type_name);
            String::new()
        }
    };

    rendered.trim().to_string()
}

/// `YYYY-MM-DD`, or `start → end` for a range.
pub fn format_date(date: &DateValue) -> String {
    let start = date.start.format("%Y-%m-%d");
    match date.end {
        Some(end) if end != date.start => format!("{} → {}", start, end.format("%Y-%m-%d")),
        _ => start.to_string(),
    }
}

/// Integers print without a fractional part.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

fn format_formula(formula: &FormulaValue) -> String {
    match formula {
        FormulaValue::String(s) => s.clone().unwrap_or_default(),
        FormulaValue::Number(n) => n.map(format_number).unwrap_or_default(),
        FormulaValue::Boolean(b) => yes_no(*b),
        FormulaValue::Date(d) => d.as_ref().map(format_date).unwrap_or_default(),
    }
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

fn join_non_empty(values: &[String]) -> String {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escapes text for use in a Markdown table cell.
pub fn escape_for_table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}
