use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A Notion id tagged with the kind of object it names.
///
/// Stored in the compact 32-hex lowercase form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockMarker;

/// A project, task or note page.
pub type PageId = Id<PageMarker>;
pub type BlockId = Id<BlockMarker>;

impl<T> Id<T> {
    /// See [`NotionId::parse`] for the accepted forms.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let id = NotionId::parse(input)?;
        Ok(Self::from_normalized(id.0))
    }

    pub(crate) fn from_normalized(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// A random id for blocks built locally rather than fetched.
    pub fn new_v4() -> Self {
        Self::from_normalized(Uuid::new_v4().as_simple().to_string())
    }

    /// The canonical non-hyphenated form.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn to_dashed(&self) -> String {
        hyphenate(&self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

fn hyphenate(value: &str) -> String {
    if value.len() == 32 && value.is_ascii() {
        format!(
            "{}-{}-{}-{}-{}",
            &value[0..8],
            &value[8..12],
            &value[12..16],
            &value[16..20],
            &value[20..32]
        )
    } else {
        value.to_string()
    }
}

/// An untyped object id, used where pages and blocks are interchangeable
/// such as when listing children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotionId(String);

lazy_static::lazy_static! {
    static ref URL_ID: Regex = Regex::new(
        r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
    ).expect("Notion URL id pattern is valid");
}

fn is_compact_hex(value: &str) -> bool {
    value.len() == 32 && value.chars().all(|c| c.is_ascii_hexdigit())
}

impl NotionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dashed UUID form the REST API expects in paths.
    pub fn to_hyphenated(&self) -> String {
        hyphenate(&self.0)
    }

    /// Accepts a dashed UUID, 32 hex characters, or a notion.so / notion.site
    /// URL whose last path segment ends in the id.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');
        if cleaned.is_empty() {
            return Err(ValidationError::EmptyField("notion id"));
        }

        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(NotionId(uuid.as_simple().to_string()));
        }
        if is_compact_hex(cleaned) {
            return Ok(NotionId(cleaned.to_ascii_lowercase()));
        }

        let from_url = cleaned
            .contains("notion")
            .then(|| URL_ID.captures(cleaned))
            .flatten()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().replace('-', ""))
            .filter(|hex| is_compact_hex(hex));

        match from_url {
            Some(hex) => Ok(NotionId(hex.to_ascii_lowercase())),
            None => Err(ValidationError::InvalidId(format!(
                "'{}' is not a Notion page URL or id",
                input
            ))),
        }
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> From<&Id<T>> for NotionId {
    fn from(id: &Id<T>) -> Self {
        NotionId(id.as_str().to_string())
    }
}

impl<T> From<Id<T>> for NotionId {
    fn from(id: Id<T>) -> Self {
        NotionId(id.value)
    }
}
