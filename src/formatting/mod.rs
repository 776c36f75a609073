// src/formatting/mod.rs
//! Renders records and block trees into Markdown.

pub mod anchors;
pub mod block_renderer;
pub mod properties;
pub mod rich_text;
pub mod summary;

pub use anchors::{heading_texts, markdown_options, slugify, AnchorAllocator};
pub use block_renderer::{render_blocks, HeadingPolicy, MarkdownLines, RenderOptions};
pub use properties::render_property;
pub use rich_text::rich_text_to_markdown;
pub use summary::{summarize, SummaryFields};
