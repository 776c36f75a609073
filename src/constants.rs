// src/constants.rs
//! Domain constants that define the operational boundaries of the system.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Upper bound on result pages followed for a single listing.
pub const NOTION_MAX_RESULT_PAGES: usize = 1000;

/// Maximum nesting depth when fetching block children from the Notion API.
pub const NOTION_MAX_FETCH_DEPTH: u8 = 50;

/// Notion API version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Attempts per request, including the first one.
pub const RETRY_MAX_ATTEMPTS: u32 = 4;

pub const RETRY_INITIAL_DELAY_MS: u64 = 500;

pub const RETRY_MAX_DELAY_MS: u64 = 8_000;

// ---------------------------------------------------------------------------
// Formatting boundaries
// ---------------------------------------------------------------------------

/// Maximum nesting depth when rendering blocks to markdown.
///
/// Deeper content is replaced by a single truncation marker.
pub const BLOCK_MAX_RENDER_DEPTH: usize = 32;

/// Indent applied to nested list children.
pub const LIST_CHILD_INDENT: &str = "   ";

/// Heading level for content headings in the project overview.
pub const OVERVIEW_HEADING_LEVEL: u8 = 3;

/// Heading level for content headings inside task and note bodies.
pub const RECORD_HEADING_LEVEL: u8 = 4;

// ---------------------------------------------------------------------------
// Report generation
// ---------------------------------------------------------------------------

/// Related records fetched at the same time.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// Wall-clock budget for one report. Covers fetching, assembly and PDF
/// rendering; the Markdown write itself is not cut short.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
