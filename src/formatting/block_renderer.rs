// src/formatting/block_renderer.rs
//! Block rendering engine: converts block trees to Markdown lines.
//!
//! The walk is an iterator driven by an explicit stack of sibling cursors,
//! so arbitrarily deep input never grows the call stack. Content headings
//! are flattened to a single configured level.

use super::properties::escape_for_table_cell;
use super::rich_text::{longest_run, rich_text_to_markdown};
use crate::constants::{BLOCK_MAX_RENDER_DEPTH, LIST_CHILD_INDENT};
use crate::model::{Block, BlockKind};
use crate::types::{plain_text_of, RichTextItem, ValidationError};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Emitted once in place of children that sit below the depth ceiling.
pub const TRUNCATED_MARKER: &str = "*[nested content truncated]*";

// --- Options ---

/// How content headings are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingPolicy {
    /// Every heading renders at exactly this level, whatever its native level.
    Level(u8),
    /// Headings render as bold text with no heading markup.
    Bold,
}

impl FromStr for HeadingPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("bold") {
            return Ok(HeadingPolicy::Bold);
        }
        match value.parse::<u8>() {
            Ok(level @ 1..=6) => Ok(HeadingPolicy::Level(level)),
            _ => Err(ValidationError::InvalidHeadingPolicy {
                value: value.to_string(),
                reason: "expected 'bold' or a heading level from 1 to 6".to_string(),
            }),
        }
    }
}

impl fmt::Display for HeadingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingPolicy::Level(level) => write!(f, "{}", level),
            HeadingPolicy::Bold => f.write_str("bold"),
        }
    }
}

/// Settings for one rendering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub heading_policy: HeadingPolicy,
    /// Deepest nesting level whose blocks are still rendered. Roots are depth 0.
    pub max_depth: usize,
}

impl RenderOptions {
    pub fn new(heading_policy: HeadingPolicy) -> Self {
        Self {
            heading_policy,
            max_depth: BLOCK_MAX_RENDER_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(HeadingPolicy::Level(crate::constants::RECORD_HEADING_LEVEL))
    }
}

// --- Public API ---

/// Renders a block forest to a Markdown string ending in a newline.
///
/// Returns an empty string when nothing renders.
pub fn render_blocks(blocks: &[Block], options: &RenderOptions) -> String {
    let lines: Vec<String> = MarkdownLines::new(blocks, *options).collect();
    if lines.is_empty() {
        return String::new();
    }
    log::debug!("Rendered {} blocks into {} lines", blocks.len(), lines.len());
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// --- Walk ---

/// Lazy iterator over the Markdown lines of a block forest.
pub struct MarkdownLines<'a> {
    options: RenderOptions,
    stack: Vec<Frame<'a>>,
    pending: VecDeque<String>,
    last: LastEmitted,
}

enum Frame<'a> {
    Siblings(SiblingCursor<'a>),
    /// Closing text of a container, emitted after its children.
    Close { prefix: String, lines: Vec<String> },
}

struct SiblingCursor<'a> {
    blocks: &'a [Block],
    index: usize,
    depth: usize,
    prefix: String,
    list_number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastEmitted {
    Nothing,
    ListItem,
    Other,
}

/// Where a block's children go relative to the block itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildLayout {
    /// Same indentation as the parent.
    Flat,
    /// Indented under a list item.
    Indented,
    /// Inside the parent's blockquote.
    Quoted,
    /// Already rendered by the parent.
    Consumed,
}

struct RenderedBlock {
    lines: Vec<String>,
    closer: Vec<String>,
    is_list_item: bool,
    children: ChildLayout,
}

impl RenderedBlock {
    fn leaf(lines: Vec<String>) -> Self {
        Self {
            lines,
            closer: Vec::new(),
            is_list_item: false,
            children: ChildLayout::Flat,
        }
    }

    fn line(line: String) -> Self {
        Self::leaf(vec![line])
    }

    fn list_item(line: String) -> Self {
        Self {
            lines: vec![line],
            closer: Vec::new(),
            is_list_item: true,
            children: ChildLayout::Indented,
        }
    }

    fn quoted(line: String) -> Self {
        Self {
            children: ChildLayout::Quoted,
            ..Self::line(line)
        }
    }
}

impl<'a> MarkdownLines<'a> {
    pub fn new(blocks: &'a [Block], options: RenderOptions) -> Self {
        Self {
            options,
            stack: vec![Frame::Siblings(SiblingCursor {
                blocks,
                index: 0,
                depth: 0,
                prefix: String::new(),
                list_number: 0,
            })],
            pending: VecDeque::new(),
            last: LastEmitted::Nothing,
        }
    }

    /// Advances the walk by one block or one closer.
    fn step(&mut self) -> bool {
        let next = match self.stack.last_mut() {
            None => return false,
            Some(Frame::Close { prefix, lines }) => {
                let prefix = std::mem::take(prefix);
                let lines = std::mem::take(lines);
                self.stack.pop();
                self.emit(&prefix, lines, false);
                return true;
            }
            Some(Frame::Siblings(cursor)) => {
                let blocks: &'a [Block] = cursor.blocks;
                match blocks.get(cursor.index) {
                    None => {
                        self.stack.pop();
                        return true;
                    }
                    Some(block) => {
                        cursor.index += 1;
                        if matches!(block.kind, BlockKind::NumberedListItem { .. }) {
                            cursor.list_number += 1;
                        } else {
                            cursor.list_number = 0;
                        }
                        (block, cursor.depth, cursor.prefix.clone(), cursor.list_number)
                    }
                }
            }
        };

        let (block, depth, prefix, number) = next;
        self.visit(block, depth, prefix, number);
        true
    }

    fn visit(&mut self, block: &'a Block, depth: usize, prefix: String, number: usize) {
        let rendered = render_block(block, &self.options, number);
        self.emit(&prefix, rendered.lines, rendered.is_list_item);

        let children = block.children();
        if children.is_empty() || rendered.children == ChildLayout::Consumed {
            self.emit(&prefix, rendered.closer, false);
            return;
        }

        let child_prefix = match rendered.children {
            ChildLayout::Indented => format!("{}{}", prefix, LIST_CHILD_INDENT),
            ChildLayout::Quoted => format!("{}> ", prefix),
            _ => prefix.clone(),
        };

        if depth >= self.options.max_depth {
            log::warn!(
                "Block {} nests deeper than {} levels; truncating {} children",
                block.common.id,
                self.options.max_depth,
                children.len()
            );
            self.emit(&child_prefix, vec![TRUNCATED_MARKER.to_string()], false);
            self.emit(&prefix, rendered.closer, false);
            return;
        }

        if !rendered.closer.is_empty() {
            self.stack.push(Frame::Close {
                prefix,
                lines: rendered.closer,
            });
        }
        self.stack.push(Frame::Siblings(SiblingCursor {
            blocks: children,
            index: 0,
            depth: depth + 1,
            prefix: child_prefix,
            list_number: 0,
        }));
    }

    /// Queues a block's lines, separated from earlier output by a blank line
    /// except between list items.
    fn emit(&mut self, prefix: &str, lines: Vec<String>, is_list_item: bool) {
        if lines.is_empty() {
            return;
        }
        let tight = self.last == LastEmitted::Nothing
            || (self.last == LastEmitted::ListItem && is_list_item);
        if !tight {
            self.pending.push_back(prefix.trim_end().to_string());
        }
        for line in &lines {
            for part in line.split('\n') {
                if part.is_empty() {
                    self.pending.push_back(prefix.trim_end().to_string());
                } else {
                    self.pending.push_back(format!("{}{}", prefix, part));
                }
            }
        }
        self.last = if is_list_item {
            LastEmitted::ListItem
        } else {
            LastEmitted::Other
        };
    }
}

impl Iterator for MarkdownLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(line);
            }
            if !self.step() {
                return None;
            }
        }
    }
}

// --- Per-block rendering ---

fn render_block(block: &Block, options: &RenderOptions, number: usize) -> RenderedBlock {
    match &block.kind {
        BlockKind::Paragraph { text } => text_lines(text),
        BlockKind::Heading { text, .. } => {
            let content = rich_text_to_markdown(text).replace('\n', " ");
            if content.trim().is_empty() {
                return RenderedBlock::leaf(Vec::new());
            }
            RenderedBlock::line(heading_line(options.heading_policy, content.trim()))
        }
        BlockKind::BulletedListItem { text } => {
            RenderedBlock::list_item(format!("- {}", escaped_text(text)))
        }
        BlockKind::NumberedListItem { text } => {
            RenderedBlock::list_item(format!("{}. {}", number, escaped_text(text)))
        }
        BlockKind::ToDo { text, checked } => {
            let mark = if *checked { "x" } else { " " };
            RenderedBlock::list_item(format!("- [{}] {}", mark, escaped_text(text)))
        }
        BlockKind::Toggle { text } => RenderedBlock {
            lines: vec![
                "<details>".to_string(),
                format!("<summary>{}</summary>", rich_text_to_markdown(text)),
            ],
            closer: vec!["</details>".to_string()],
            is_list_item: false,
            children: ChildLayout::Flat,
        },
        BlockKind::Quote { text } => RenderedBlock::quoted(quote_lines(&escaped_text(text))),
        BlockKind::Callout { text, icon } => {
            let content = escaped_text(text);
            let content = match icon {
                Some(icon) if !icon.is_empty() => format!("{} {}", icon, content),
                _ => content,
            };
            RenderedBlock::quoted(quote_lines(&content))
        }
        BlockKind::Code {
            text,
            language,
            caption,
        } => {
            let language = if language == "plain text" {
                ""
            } else {
                language.as_str()
            };
            let body = plain_text_of(text);
            let fence = "`".repeat(longest_run(&body, '`').max(2) + 1);
            let mut lines = vec![format!("{}{}", fence, language), body, fence];
            let caption = rich_text_to_markdown(caption);
            if !caption.trim().is_empty() {
                lines.push(format!("*{}*", caption.trim()));
            }
            RenderedBlock::leaf(lines)
        }
        BlockKind::Equation { expression } => {
            RenderedBlock::line(format!("$$ {} $$", expression.trim()))
        }
        BlockKind::Divider => RenderedBlock::line("---".to_string()),
        BlockKind::Media {
            media,
            url,
            caption,
        } => {
            let caption = rich_text_to_markdown(caption);
            let label = if caption.trim().is_empty() {
                media.label().to_string()
            } else {
                format!("{}: {}", media.label(), caption.trim())
            };
            RenderedBlock::line(labelled_link(&label, url.as_deref()))
        }
        BlockKind::Bookmark { url, caption } => {
            let caption = rich_text_to_markdown(caption);
            let label = if caption.trim().is_empty() {
                format!("Bookmark: {}", url)
            } else {
                format!("Bookmark: {}", caption.trim())
            };
            RenderedBlock::line(labelled_link(&label, Some(url)))
        }
        BlockKind::Embed { url } => RenderedBlock::line(labelled_link("Embed", Some(url))),
        BlockKind::LinkPreview { url } => RenderedBlock::line(labelled_link("Link", Some(url))),
        BlockKind::ChildPage { title } => RenderedBlock::line(format!("[Child Page: {}]", title)),
        BlockKind::ChildDatabase { title } => {
            RenderedBlock::line(format!("[Child Database: {}]", title))
        }
        BlockKind::LinkToPage { target_id } => RenderedBlock::line(match target_id {
            Some(id) => format!("[Link to Page: {}]", id),
            None => "[Link to Page]".to_string(),
        }),
        BlockKind::Table {
            width,
            has_column_header,
        } => {
            if !has_column_header {
                log::debug!("Table {} has no header row; using its first row", block.common.id);
            }
            RenderedBlock {
                children: ChildLayout::Consumed,
                ..RenderedBlock::leaf(table_lines(block.children(), *width))
            }
        }
        BlockKind::TableRow { cells } => {
            RenderedBlock::line(table_row(&render_cells(cells), cells.len()))
        }
        BlockKind::ColumnList | BlockKind::Column | BlockKind::Synced => {
            RenderedBlock::leaf(Vec::new())
        }
        BlockKind::Template { text } => {
            RenderedBlock::line(format!("[Template: {}]", rich_text_to_markdown(text)))
        }
        BlockKind::TableOfContents => RenderedBlock::line("[Table of Contents]".to_string()),
        BlockKind::Breadcrumb => RenderedBlock::line("[Breadcrumb]".to_string()),
        BlockKind::Unsupported { block_type, text } => {
            let visible = plain_text_of(text);
            if visible.trim().is_empty() {
                RenderedBlock::line(format!("[Unsupported block: {}]", block_type))
            } else {
                RenderedBlock::line(escape_block_syntax(&visible))
            }
        }
    }
}

fn text_lines(text: &[RichTextItem]) -> RenderedBlock {
    let content = rich_text_to_markdown(text);
    if content.trim().is_empty() {
        RenderedBlock::leaf(Vec::new())
    } else {
        RenderedBlock::line(escape_block_syntax(&content))
    }
}

fn escaped_text(text: &[RichTextItem]) -> String {
    escape_block_syntax(&rich_text_to_markdown(text))
}

/// Keeps user text from opening a block construct of its own: ATX and
/// setext headings, quotes, list markers, thematic breaks and fences are
/// backslash-escaped at the start of every line. Leading indentation is
/// dropped so no line becomes an indented code block.
fn escape_block_syntax(text: &str) -> String {
    text.split('\n')
        .map(escape_line_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line_start(line: &str) -> String {
    let body = line.trim_start();
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    let only = |marker: char| body.chars().all(|c| c == marker || c == ' ' || c == '\t');
    let marker_then_space = rest.is_empty() || rest.starts_with([' ', '\t']);

    let escape = match first {
        '#' | '>' | '=' => true,
        '-' | '+' | '*' => marker_then_space || only(first),
        '_' => only('_'),
        '`' => body.starts_with("```"),
        '~' => body.starts_with("~~~"),
        '0'..='9' => return escape_ordered_marker(body),
        _ => false,
    };
    if escape {
        format!("\\{}", body)
    } else {
        body.to_string()
    }
}

/// `12. text` or `3) text` becomes `12\. text`.
fn escape_ordered_marker(body: &str) -> String {
    let digits = body.chars().take_while(char::is_ascii_digit).count();
    let rest = &body[digits..];
    let after = rest.get(1..).unwrap_or("");
    let is_marker = digits <= 9
        && rest.starts_with(['.', ')'])
        && (after.is_empty() || after.starts_with([' ', '\t']));
    if is_marker {
        format!("{}\\{}", &body[..digits], rest)
    } else {
        body.to_string()
    }
}

fn heading_line(policy: HeadingPolicy, text: &str) -> String {
    match policy {
        HeadingPolicy::Level(level) => format!("{} {}", "#".repeat(level as usize), text),
        HeadingPolicy::Bold => format!("**{}**", text),
    }
}

fn quote_lines(content: &str) -> String {
    content
        .split('\n')
        .map(|line| format!("> {}", line).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn labelled_link(label: &str, url: Option<&str>) -> String {
    match url {
        Some(url) if !url.is_empty() => format!("[{}]({})", label, url),
        _ => format!("[{}]", label),
    }
}

fn render_cells(cells: &[Vec<RichTextItem>]) -> Vec<String> {
    cells
        .iter()
        .map(|cell| escape_for_table_cell(rich_text_to_markdown(cell).trim()))
        .collect()
}

fn table_row(cells: &[String], width: usize) -> String {
    let mut row = String::from("|");
    for i in 0..width {
        row.push(' ');
        row.push_str(cells.get(i).map(String::as_str).unwrap_or(""));
        row.push_str(" |");
    }
    row
}

/// The first row is always the header.
fn table_lines(rows: &[Block], declared_width: usize) -> Vec<String> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .filter_map(|row| match &row.kind {
            BlockKind::TableRow { cells } => Some(render_cells(cells)),
            other => {
                log::debug!("Skipping non-row child in table: {:?}", other);
                None
            }
        })
        .collect();

    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };

    let width = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(declared_width)
        .max(1);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(table_row(header, width));
    lines.push(format!("|{}", " --- |".repeat(width)));
    lines.extend(body.iter().map(|row| table_row(row, width)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaKind;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Vec<RichTextItem> {
        vec![RichTextItem::plain_text(s)]
    }

    fn paragraph(s: &str) -> Block {
        Block::new(BlockKind::Paragraph { text: text(s) })
    }

    fn heading(level: u8, s: &str) -> Block {
        Block::new(BlockKind::Heading {
            level,
            text: text(s),
        })
    }

    fn bullet(s: &str) -> Block {
        Block::new(BlockKind::BulletedListItem { text: text(s) })
    }

    fn numbered(s: &str) -> Block {
        Block::new(BlockKind::NumberedListItem { text: text(s) })
    }

    fn render(blocks: &[Block]) -> String {
        render_blocks(blocks, &RenderOptions::new(HeadingPolicy::Level(4)))
    }

    #[test]
    fn test_headings_flatten_to_configured_level() {
        let blocks = vec![heading(1, "Goals"), heading(2, "Scope"), heading(3, "Risks")];
        assert_eq!(render(&blocks), "#### Goals\n\n#### Scope\n\n#### Risks\n");
    }

    #[test]
    fn test_bold_policy_drops_heading_markup() {
        let blocks = vec![heading(1, "Goals"), paragraph("Ship it")];
        let out = render_blocks(&blocks, &RenderOptions::new(HeadingPolicy::Bold));
        assert_eq!(out, "**Goals**\n\nShip it\n");
    }

    #[test]
    fn test_no_heading_deeper_than_ceiling_at_any_depth() {
        let mut nested = heading(3, "deepest");
        for level in 0..40u8 {
            let kind = if level % 2 == 0 {
                BlockKind::Toggle { text: text("t") }
            } else {
                BlockKind::Heading {
                    level: 1 + level % 3,
                    text: text("h"),
                }
            };
            nested = Block::new(kind).with_children(vec![nested]);
        }
        let out = render_blocks(&[nested], &RenderOptions::new(HeadingPolicy::Level(3)));
        for line in out.lines() {
            let hashes = line.trim_start().chars().take_while(|c| *c == '#').count();
            assert!(hashes <= 3, "heading too deep: {line}");
        }
    }

    #[test]
    fn test_numbered_items_count_and_restart() {
        let blocks = vec![
            numbered("one"),
            numbered("two"),
            paragraph("break"),
            numbered("again"),
        ];
        assert_eq!(render(&blocks), "1. one\n2. two\n\nbreak\n\n1. again\n");
    }

    #[test]
    fn test_nested_list_children_are_indented() {
        let blocks = vec![
            bullet("parent")
                .with_children(vec![bullet("child").with_children(vec![bullet("leaf")])]),
            bullet("sibling"),
        ];
        assert_eq!(
            render(&blocks),
            "- parent\n   - child\n      - leaf\n- sibling\n"
        );
    }

    #[test]
    fn test_todo_items() {
        let blocks = vec![
            Block::new(BlockKind::ToDo {
                text: text("done"),
                checked: true,
            }),
            Block::new(BlockKind::ToDo {
                text: text("open"),
                checked: false,
            }),
        ];
        assert_eq!(render(&blocks), "- [x] done\n- [ ] open\n");
    }

    #[test]
    fn test_toggle_wraps_children() {
        let blocks = vec![Block::new(BlockKind::Toggle {
            text: text("Details"),
        })
        .with_children(vec![paragraph("hidden")])];
        assert_eq!(
            render(&blocks),
            "<details>\n<summary>Details</summary>\n\nhidden\n\n</details>\n"
        );
    }

    #[test]
    fn test_quote_children_stay_quoted() {
        let blocks = vec![Block::new(BlockKind::Callout {
            text: text("Heads up"),
            icon: Some("💡".to_string()),
        })
        .with_children(vec![paragraph("more")])];
        assert_eq!(render(&blocks), "> 💡 Heads up\n>\n> more\n");
    }

    #[test]
    fn test_table_uses_first_row_as_header() {
        let row = |cells: &[&str]| {
            Block::new(BlockKind::TableRow {
                cells: cells.iter().map(|c| text(c)).collect(),
            })
        };
        let table = Block::new(BlockKind::Table {
            width: 2,
            has_column_header: false,
        })
        .with_children(vec![row(&["Name", "Owner"]), row(&["API", "a|b"])]);

        assert_eq!(
            render(&[table]),
            "| Name | Owner |\n| --- | --- |\n| API | a\\|b |\n"
        );
    }

    #[test]
    fn test_code_equation_and_divider() {
        let blocks = vec![
            Block::new(BlockKind::Code {
                text: text("fn main() {}"),
                language: "rust".to_string(),
                caption: vec![],
            }),
            Block::new(BlockKind::Equation {
                expression: "a^2 + b^2".to_string(),
            }),
            Block::new(BlockKind::Divider),
        ];
        assert_eq!(
            render(&blocks),
            "```rust\nfn main() {}\n```\n\n$$ a^2 + b^2 $$\n\n---\n"
        );
    }

    #[test]
    fn test_code_fence_outgrows_backticks_in_body() {
        let snippet = Block::new(BlockKind::Code {
            text: text("Install:\n```bash\nls\n```"),
            language: "markdown".to_string(),
            caption: vec![],
        });
        let blocks = vec![heading(3, "Task A"), snippet, heading(3, "Task B")];

        let out = render(&blocks);
        assert!(out.contains("````markdown\nInstall:\n```bash\nls\n```\n````\n"));
        assert_eq!(
            crate::formatting::heading_texts(&out),
            vec!["Task A", "Task B"]
        );
    }

    #[test]
    fn test_block_syntax_in_text_is_escaped() {
        let blocks = vec![
            paragraph("###### Deep note"),
            paragraph("## Tasks"),
            paragraph("Title\n==="),
            paragraph("- not a list\n2. not numbered either\n***"),
            bullet("# inside a list"),
            Block::new(BlockKind::Quote {
                text: text("> nested\n#### quoted"),
            }),
            paragraph("*emphasis* and 3.5 stays"),
        ];

        assert_eq!(
            render(&blocks),
            "\\###### Deep note\n\n\
             \\## Tasks\n\n\
             Title\n\\===\n\n\
             \\- not a list\n2\\. not numbered either\n\\***\n\n\
             - \\# inside a list\n\n\
             > \\> nested\n> \\#### quoted\n\n\
             *emphasis* and 3.5 stays\n"
        );
    }

    #[test]
    fn test_media_and_links() {
        let blocks = vec![
            Block::new(BlockKind::Media {
                media: MediaKind::Image,
                url: Some("https://img.example/a.png".to_string()),
                caption: text("Diagram"),
            }),
            Block::new(BlockKind::Embed {
                url: "https://embed.example".to_string(),
            }),
        ];
        assert_eq!(
            render(&blocks),
            "[Image: Diagram](https://img.example/a.png)\n\n[Embed](https://embed.example)\n"
        );
    }

    #[test]
    fn test_unknown_blocks_degrade() {
        let blocks = vec![
            Block::new(BlockKind::Unsupported {
                block_type: "ai_block".to_string(),
                text: vec![],
            }),
            Block::new(BlockKind::Unsupported {
                block_type: "meeting_notes".to_string(),
                text: text("Standup"),
            }),
        ];
        assert_eq!(
            render(&blocks),
            "[Unsupported block: ai_block]\n\nStandup\n"
        );
    }

    #[test]
    fn test_depth_ceiling_emits_single_marker() {
        let deep = bullet("a").with_children(vec![
            bullet("b").with_children(vec![bullet("c"), bullet("d")]),
        ]);
        let options = RenderOptions::new(HeadingPolicy::Level(4)).with_max_depth(1);
        let out = render_blocks(&[deep], &options);
        assert_eq!(out, "- a\n   - b\n\n      *[nested content truncated]*\n");
        assert_eq!(out.matches(TRUNCATED_MARKER).count(), 1);
    }

    #[test]
    fn test_columns_are_transparent() {
        let columns = Block::new(BlockKind::ColumnList).with_children(vec![
            Block::new(BlockKind::Column).with_children(vec![paragraph("left")]),
            Block::new(BlockKind::Column).with_children(vec![paragraph("right")]),
        ]);
        assert_eq!(render(&[columns]), "left\n\nright\n");
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(render(&[]), "");
        assert_eq!(render(&[paragraph("")]), "");
    }

    #[test]
    fn test_heading_policy_parsing() {
        assert_eq!("3".parse::<HeadingPolicy>().unwrap(), HeadingPolicy::Level(3));
        assert_eq!("Bold".parse::<HeadingPolicy>().unwrap(), HeadingPolicy::Bold);
        assert!("7".parse::<HeadingPolicy>().is_err());
        assert!("h2".parse::<HeadingPolicy>().is_err());
    }
}
