use super::common::BlockCommon;
use crate::types::{plain_text_of, RichTextItem};
use serde::{Deserialize, Serialize};

/// A content block and its already-fetched children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub common: BlockCommon,
    pub kind: BlockKind,
}

/// Which kind of media an embedded file block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    File,
    Pdf,
}

impl MediaKind {
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
            MediaKind::File => "File",
            MediaKind::Pdf => "PDF",
        }
    }
}

/// Type-specific block payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph {
        text: Vec<RichTextItem>,
    },
    /// Native level is kept only for diagnostics; rendering flattens it.
    Heading {
        level: u8,
        text: Vec<RichTextItem>,
    },
    BulletedListItem {
        text: Vec<RichTextItem>,
    },
    NumberedListItem {
        text: Vec<RichTextItem>,
    },
    ToDo {
        text: Vec<RichTextItem>,
        checked: bool,
    },
    Toggle {
        text: Vec<RichTextItem>,
    },
    Quote {
        text: Vec<RichTextItem>,
    },
    Callout {
        text: Vec<RichTextItem>,
        icon: Option<String>,
    },
    Code {
        text: Vec<RichTextItem>,
        language: String,
        caption: Vec<RichTextItem>,
    },
    Equation {
        expression: String,
    },
    Divider,
    Media {
        media: MediaKind,
        url: Option<String>,
        caption: Vec<RichTextItem>,
    },
    Bookmark {
        url: String,
        caption: Vec<RichTextItem>,
    },
    Embed {
        url: String,
    },
    LinkPreview {
        url: String,
    },
    ChildPage {
        title: String,
    },
    ChildDatabase {
        title: String,
    },
    LinkToPage {
        target_id: Option<String>,
    },
    Table {
        width: usize,
        has_column_header: bool,
    },
    TableRow {
        cells: Vec<Vec<RichTextItem>>,
    },
    ColumnList,
    Column,
    Synced,
    Template {
        text: Vec<RichTextItem>,
    },
    TableOfContents,
    Breadcrumb,
    /// A block type this crate does not model. Any visible text is kept.
    Unsupported {
        block_type: String,
        text: Vec<RichTextItem>,
    },
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            common: BlockCommon::default(),
            kind,
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.common = self.common.with_children(children);
        self
    }

    pub fn children(&self) -> &[Block] {
        &self.common.children
    }

    pub fn has_children(&self) -> bool {
        self.common.has_children
    }

    /// Whether the fetcher should descend into this block's children.
    ///
    /// Child pages and databases are separate documents, not nested content.
    pub fn should_fetch_children(&self) -> bool {
        self.common.has_children
            && !matches!(
                self.kind,
                BlockKind::ChildPage { .. } | BlockKind::ChildDatabase { .. }
            )
    }

    /// Primary inline text of the block, if it has any.
    pub fn rich_text(&self) -> Option<&[RichTextItem]> {
        match &self.kind {
            BlockKind::Paragraph { text }
            | BlockKind::Heading { text, .. }
            | BlockKind::BulletedListItem { text }
            | BlockKind::NumberedListItem { text }
            | BlockKind::ToDo { text, .. }
            | BlockKind::Toggle { text }
            | BlockKind::Quote { text }
            | BlockKind::Callout { text, .. }
            | BlockKind::Code { text, .. }
            | BlockKind::Template { text }
            | BlockKind::Unsupported { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn plain_text(&self) -> String {
        self.rich_text().map(plain_text_of).unwrap_or_default()
    }

    /// Notion API type name of this block.
    pub fn block_type(&self) -> &str {
        match &self.kind {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading { level: 1, .. } => "heading_1",
            BlockKind::Heading { level: 2, .. } => "heading_2",
            BlockKind::Heading { .. } => "heading_3",
            BlockKind::BulletedListItem { .. } => "bulleted_list_item",
            BlockKind::NumberedListItem { .. } => "numbered_list_item",
            BlockKind::ToDo { .. } => "to_do",
            BlockKind::Toggle { .. } => "toggle",
            BlockKind::Quote { .. } => "quote",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Code { .. } => "code",
            BlockKind::Equation { .. } => "equation",
            BlockKind::Divider => "divider",
            BlockKind::Media { media, .. } => match media {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
                MediaKind::Audio => "audio",
                MediaKind::File => "file",
                MediaKind::Pdf => "pdf",
            },
            BlockKind::Bookmark { .. } => "bookmark",
            BlockKind::Embed { .. } => "embed",
            BlockKind::LinkPreview { .. } => "link_preview",
            BlockKind::ChildPage { .. } => "child_page",
            BlockKind::ChildDatabase { .. } => "child_database",
            BlockKind::LinkToPage { .. } => "link_to_page",
            BlockKind::Table { .. } => "table",
            BlockKind::TableRow { .. } => "table_row",
            BlockKind::ColumnList => "column_list",
            BlockKind::Column => "column",
            BlockKind::Synced => "synced_block",
            BlockKind::Template { .. } => "template",
            BlockKind::TableOfContents => "table_of_contents",
            BlockKind::Breadcrumb => "breadcrumb",
            BlockKind::Unsupported { block_type, .. } => block_type,
        }
    }
}
