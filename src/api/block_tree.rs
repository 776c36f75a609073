// src/api/block_tree.rs
//! Depth-limited fetch of a page's block tree.

use super::WorkspaceClient;
use crate::error::AppError;
use crate::model::Block;
use crate::types::NotionId;
use futures::future::BoxFuture;
use futures::FutureExt;

/// Fetches the blocks under `id` and, recursively, the children of every
/// block that reports `has_children`.
///
/// Archived blocks are dropped. Child pages and child databases are not entered. Below `max_depth`
/// levels children are left empty and a warning is logged.
pub async fn fetch_block_tree(
    client: &dyn WorkspaceClient,
    id: &NotionId,
    max_depth: u8,
) -> Result<Vec<Block>, AppError> {
    fetch_level(client, id.clone(), max_depth).await
}

fn fetch_level<'a>(
    client: &'a dyn WorkspaceClient,
    id: NotionId,
    remaining_depth: u8,
) -> BoxFuture<'a, Result<Vec<Block>, AppError>> {
    async move {
        let mut blocks = client.get_block_children(&id).await?;
        blocks.retain(|block| !block.common.archived);

        for block in blocks.iter_mut() {
            if !block.should_fetch_children() {
                continue;
            }
            if remaining_depth == 0 {
                log::warn!(
                    "Not fetching children of {} block {}: depth limit reached",
                    block.block_type(),
                    block.common.id
                );
                continue;
            }
            let child_id = NotionId::from(&block.common.id);
            block.common.children = fetch_level(client, child_id, remaining_depth - 1).await?;
        }

        Ok(blocks)
    }
    .boxed()
}
