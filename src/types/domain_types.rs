// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integration token sent as the bearer credential on every Notion request.
///
/// Tokens are trimmed on construction and never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

const TOKEN_PREFIXES: [&str; 2] = ["secret_", "ntn_"];
const MIN_TOKEN_LEN: usize = 20;

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into().trim().to_string();
        let reason = if key.is_empty() {
            Some("no integration token configured (set NOTION_API_KEY)".to_string())
        } else if !TOKEN_PREFIXES.iter().any(|p| key.starts_with(p)) {
            Some(format!("token must start with one of {:?}", TOKEN_PREFIXES))
        } else if key.len() < MIN_TOKEN_LEN {
            Some(format!("token is shorter than {} characters", MIN_TOKEN_LEN))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ValidationError::InvalidApiKey { reason }),
            None => Ok(Self(key)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bearer header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible = self.0.find('_').map_or(0, |i| i + 4);
        write!(f, "{}***", &self.0[..visible])
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

/// The name of a property on a Notion page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyName(String);

impl PropertyName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for PropertyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for PropertyName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PropertyName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
