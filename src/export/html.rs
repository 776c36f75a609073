// src/export/html.rs
//! Markdown to HTML conversion for PDF output.

use crate::formatting::{heading_texts, markdown_options, AnchorAllocator};
use pulldown_cmark::{html, Event, Parser, Tag};

/// Which HTML the converter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlFlavor {
    /// Everything, raw HTML blocks such as `<details>` included.
    Full,
    /// Raw HTML is dropped; only Markdown-generated elements remain.
    Simplified,
}

/// Converts Markdown to an HTML fragment.
///
/// Every heading gets an `id` from the same anchor allocation that builds
/// the report's table of contents, so in-document links resolve.
pub fn markdown_to_html(markdown: &str, flavor: HtmlFlavor) -> String {
    let mut allocator = AnchorAllocator::new();
    let anchors: Vec<String> = heading_texts(markdown)
        .iter()
        .map(|text| allocator.allocate(text))
        .collect();

    let mut heading_index = 0;
    let events = Parser::new_ext(markdown, markdown_options()).filter_map(|event| match event {
        Event::Start(Tag::Heading(level, _, classes)) => {
            let id = anchors.get(heading_index).map(String::as_str);
            heading_index += 1;
            Some(Event::Start(Tag::Heading(level, id, classes)))
        }
        Event::Html(_) if flavor == HtmlFlavor::Simplified => None,
        other => Some(other),
    });

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, events);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_carry_anchor_ids() {
        let html = markdown_to_html("# Plan\n\n## Tasks\n\n### Tasks\n", HtmlFlavor::Full);
        assert!(html.contains(r#"<h1 id="plan">Plan</h1>"#));
        assert!(html.contains(r#"<h2 id="tasks">Tasks</h2>"#));
        assert!(html.contains(r#"<h3 id="tasks-1">Tasks</h3>"#));
    }

    #[test]
    fn test_toc_links_match_heading_ids() {
        let md = concat!(
            "# Apollo\n\n",
            "- [Launch - Status: Done](#launch-status-done)\n\n",
            "### Launch - **Status: Done**\n",
        );
        let html = markdown_to_html(md, HtmlFlavor::Full);
        assert!(html.contains(r##"href="#launch-status-done""##));
        assert!(html.contains(r#"<h3 id="launch-status-done">"#));
    }

    #[test]
    fn test_extensions_enabled() {
        let md = "| A | B |\n| --- | --- |\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n";
        let html = markdown_to_html(md, HtmlFlavor::Full);
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_simplified_drops_raw_html() {
        let md = "<details>\n<summary>More</summary>\n\nhidden text\n\n</details>\n";
        let full = markdown_to_html(md, HtmlFlavor::Full);
        let simplified = markdown_to_html(md, HtmlFlavor::Simplified);

        assert!(full.contains("<details>"));
        assert!(!simplified.contains("<details>"));
        assert!(!simplified.contains("<summary>"));
        assert!(simplified.contains("<p>hidden text</p>"));
    }

    #[test]
    fn test_simplified_drops_inline_html_too() {
        let md = "Kickoff <u>moved</u> to Monday <img src=\"x.png\">\n";
        let full = markdown_to_html(md, HtmlFlavor::Full);
        let simplified = markdown_to_html(md, HtmlFlavor::Simplified);

        assert!(full.contains("<u>moved</u>"));
        assert!(simplified.contains("Kickoff moved to Monday"));
        assert!(!simplified.contains("<u>"));
        assert!(!simplified.contains("<img"));
    }
}
