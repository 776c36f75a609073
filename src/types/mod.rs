use thiserror::Error;

mod domain_types;
mod ids;
mod rich_text;

pub use domain_types::*;
pub use ids::*;
pub use rich_text::*;

/// Input rejected before any request is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid page id: {0}")]
    InvalidId(String),

    #[error("Unusable Notion token: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid heading policy '{value}': {reason}")]
    InvalidHeadingPolicy { value: String, reason: String },

    #[error("Missing required value: {0}")]
    EmptyField(&'static str),
}
