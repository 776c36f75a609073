// src/formatting/rich_text.rs
//! Rich text runs to inline Markdown.

use crate::types::{Annotations, RichTextItem, RichTextKind};

/// Renders a sequence of runs as one line of inline Markdown.
pub fn rich_text_to_markdown(items: &[RichTextItem]) -> String {
    items.iter().map(render_run).collect()
}

fn render_run(item: &RichTextItem) -> String {
    match &item.kind {
        RichTextKind::Equation { expression } => format!("${}$", expression),
        RichTextKind::Text { content, link } => {
            let link = link.as_deref().or(item.href.as_deref());
            apply_styles(content, &item.annotations, link)
        }
        RichTextKind::Mention { .. } => {
            apply_styles(&item.plain_text, &item.annotations, item.href.as_deref())
        }
    }
}

/// Applies annotations innermost-first: code, strike, bold, italic, underline,
/// then the link around everything.
fn apply_styles(content: &str, annotations: &Annotations, link: Option<&str>) -> String {
    if content.is_empty() {
        return String::new();
    }

    // Markers must hug the text, so surrounding whitespace stays outside.
    let trimmed = content.trim();
    if trimmed.is_empty() || (annotations.is_plain() && link.is_none()) {
        return content.to_string();
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];

    let mut result = trimmed.to_string();

    if annotations.code {
        result = inline_code(&result);
    }
    if annotations.strikethrough {
        result = format!("~~{}~~", result);
    }
    if annotations.bold {
        result = format!("**{}**", result);
    }
    if annotations.italic {
        result = format!("*{}*", result);
    }
    // Underline requires HTML
    if annotations.underline {
        result = format!("<u>{}</u>", result);
    }
    if let Some(url) = link {
        result = format!("[{}]({})", result, url);
    }

    format!("{}{}{}", leading, result, trailing)
}

/// Length of the longest run of `ch` in `text`.
pub(crate) fn longest_run(text: &str, ch: char) -> usize {
    text.split(|c| c != ch)
        .map(|run| run.chars().count())
        .max()
        .unwrap_or(0)
}

/// A code span whose delimiter is longer than any backtick run inside it.
fn inline_code(content: &str) -> String {
    match longest_run(content, '`') {
        0 => format!("`{}`", content),
        n => {
            let fence = "`".repeat(n + 1);
            format!("{} {} {}", fence, content, fence)
        }
    }
}
