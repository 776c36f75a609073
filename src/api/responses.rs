// src/api/responses.rs
//! Wire shapes of the Notion API responses this crate reads.

use serde::{Deserialize, Serialize};

pub use notion_client::objects::{error::Error as NotionError, page::Page as NotionPage};

/// Generic paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Block children are kept as raw JSON until converted one by one.
pub type RetrieveBlockChildrenResponse = PaginatedResponse<serde_json::Value>;

/// Every item gathered across all pages of a listing.
#[derive(Debug)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: usize,
}
