mod block;
pub mod common;
mod property;
mod record;

pub use block::{Block, BlockKind, MediaKind};
pub use common::BlockCommon;
pub use property::{DateValue, FormulaValue, Property};
pub use record::{Record, UNTITLED};
