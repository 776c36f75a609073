// src/export/templates.rs
//! Handlebars page templates that wrap report HTML for the PDF renderer.

use crate::error::AppError;
use handlebars::Handlebars;
use serde::Serialize;

const STYLED_SOURCE: &str = include_str!("../../templates/report_styled.hbs");
const SIMPLIFIED_SOURCE: &str = include_str!("../../templates/report_simplified.hbs");

/// The two page layouts, tried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTemplate {
    /// Running header and footer, page numbers and page breaks before sections.
    Styled,
    /// Plain layout with basic CSS only.
    Simplified,
}

impl PageTemplate {
    pub fn name(self) -> &'static str {
        match self {
            PageTemplate::Styled => "report_styled",
            PageTemplate::Simplified => "report_simplified",
        }
    }
}

/// Values available to page templates. `body` is inserted unescaped.
#[derive(Debug, Serialize)]
pub struct PageData<'a> {
    pub title: &'a str,
    pub generated: String,
    pub body: String,
}

/// Registered page templates.
pub struct ReportTemplates {
    handlebars: Handlebars<'static>,
}

impl ReportTemplates {
    pub fn new() -> Result<Self, AppError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        for (template, source) in [
            (PageTemplate::Styled, STYLED_SOURCE),
            (PageTemplate::Simplified, SIMPLIFIED_SOURCE),
        ] {
            handlebars
                .register_template_string(template.name(), source)
                .map_err(|e| AppError::Template {
                    name: template.name().to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(Self { handlebars })
    }

    pub fn render(&self, template: PageTemplate, data: &PageData<'_>) -> Result<String, AppError> {
        self.handlebars
            .render(template.name(), data)
            .map_err(|e| AppError::Template {
                name: template.name().to_string(),
                message: e.to_string(),
            })
    }
}
