// src/api/mod.rs
//! Notion API interaction: reading project, task and note pages and their
//! block trees, and writing a report link back.
//!
//! Business logic depends on [`WorkspaceClient`], never on HTTP details.

mod block_tree;
pub mod client;
pub mod notion_client_adapter;
mod pagination;
pub mod parser;
mod responses;

use crate::error::AppError;
use crate::model::{Block, Record};
use crate::types::{NotionId, PageId};

/// The ability to read and annotate pages in a Notion workspace.
#[async_trait::async_trait]
pub trait WorkspaceClient: Send + Sync {
    /// Retrieves one page with its properties.
    async fn get_record(&self, id: &PageId) -> Result<Record, AppError>;

    /// Lists the direct children of a page or block, following every cursor.
    async fn get_block_children(&self, id: &NotionId) -> Result<Vec<Block>, AppError>;

    /// Ids linked from `record` through the relation `property`, in upstream order.
    ///
    /// Only the ids present on the page object are returned.
    async fn query_relation(
        &self,
        record: &Record,
        property: &str,
    ) -> Result<Vec<PageId>, AppError> {
        Ok(record.relation_ids(property))
    }

    /// Sets a URL property on a page.
    async fn update_url_property(
        &self,
        id: &PageId,
        property: &str,
        url: &str,
    ) -> Result<(), AppError>;
}

pub use block_tree::fetch_block_tree;
pub use client::NotionHttpClient;
pub use responses::{PaginatedResponse, PaginationResult};
