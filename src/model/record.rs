use super::Property;
use crate::types::{PageId, PropertyName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fallback display title for pages without a usable title property.
pub const UNTITLED: &str = "Untitled";

/// A project, task or note page with its typed properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: PageId,
    pub title: String,
    pub url: String,
    pub properties: BTreeMap<PropertyName, Property>,
}

impl Record {
    pub fn new(id: PageId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: String::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_property(mut self, name: impl Into<PropertyName>, value: Property) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Outgoing ids of a relation property, in upstream order.
    ///
    /// A missing property, or one of another type, yields no ids.
    pub fn relation_ids(&self, name: &str) -> Vec<PageId> {
        match self.property(name) {
            Some(Property::Relation(ids)) => ids.clone(),
            Some(other) => {
                log::warn!(
                    "Property '{}' on {} is {}, not a relation",
                    name,
                    self.id,
                    other.type_name()
                );
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}
