use super::Block;
use crate::types::BlockId;
use serde::{Deserialize, Serialize};

/// Identity and tree position of a block, independent of its kind.
///
/// `has_children` mirrors what the API reported; `children` is only filled
/// once the tree has been fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCommon {
    pub id: BlockId,
    #[serde(default)]
    pub children: Vec<Block>,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub archived: bool,
}

impl BlockCommon {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            children: vec![],
            has_children: false,
            archived: false,
        }
    }

    /// Attaches fetched children; an empty list clears `has_children`.
    pub fn with_children(self, children: Vec<Block>) -> Self {
        Self {
            has_children: !children.is_empty(),
            children,
            ..self
        }
    }
}

impl Default for BlockCommon {
    /// A locally built block with a fresh random id.
    fn default() -> Self {
        Self::new(BlockId::new_v4())
    }
}
