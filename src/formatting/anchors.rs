// src/formatting/anchors.rs
//! Heading anchors shared by the Markdown table of contents and the HTML export.

use lazy_static::lazy_static;
use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^\w\s-]").expect("Invalid regex pattern");
    static ref SEPARATOR_RUNS: Regex = Regex::new(r"[-\s]+").expect("Invalid regex pattern");
}

/// Lowercases, strips punctuation and joins words with `-`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept = NON_SLUG_CHARS.replace_all(&lowered, "");
    let joined = SEPARATOR_RUNS.replace_all(kept.trim(), "-");
    joined.trim_matches('-').to_string()
}

/// Markdown extensions enabled wherever reports are parsed.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Visible text of every heading in `markdown`, in document order.
pub fn heading_texts(markdown: &str) -> Vec<String> {
    let mut texts = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::Heading(..)) => current = Some(String::new()),
            Event::End(Tag::Heading(..)) => {
                if let Some(text) = current.take() {
                    texts.push(text.trim().to_string());
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&text);
                }
            }
            _ => {}
        }
    }

    texts
}

/// Hands out document-unique anchors.
///
/// A repeated slug gets `-1`, `-2`, ... appended, skipping any suffixed form
/// that is already taken, so every call returns a distinct anchor.
#[derive(Debug, Default, Clone)]
pub struct AnchorAllocator {
    used: HashSet<String>,
}

impl AnchorAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, heading: &str) -> String {
        let base = match slugify(heading) {
            slug if slug.is_empty() => "section".to_string(),
            slug => slug,
        };

        if self.used.insert(base.clone()) {
            return base;
        }

        let mut suffix = 1usize;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}
