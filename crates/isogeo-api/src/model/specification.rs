use serde::{Deserialize, Serialize};

use super::{Dict, Entity, Field, FieldKind as K, field};
use crate::error::Error;

/// A specification (standard, data model) a dataset can conform to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    #[serde(rename = "_abilities")]
    pub abilities: Option<Vec<String>>,
    #[serde(rename = "_id")]
    pub(crate) id: Option<String>,
    #[serde(rename = "_tag")]
    pub tag: Option<String>,
    pub count: Option<i64>,
    pub is_locked: Option<bool>,
    pub link: Option<String>,
    pub name: Option<String>,
    pub owner: Option<Dict>,
    /// Publication date, as sent by the API.
    pub published: Option<String>,
}

impl Entity for Specification {
    const KIND: &'static str = "Specification";

    const FIELDS: &'static [Field] = &[
        field("_abilities", K::List),
        field("_id", K::String),
        field("_tag", K::String),
        field("count", K::Integer),
        field("isLocked", K::Boolean),
        field("link", K::String),
        field("name", K::String),
        field("owner", K::Mapping),
        field("published", K::String),
    ];

    const CREATION: &'static [&'static str] = &["link", "name", "published"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn validate_creation(&self) -> Result<(), Error> {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(Error::validation("Specification requires a name")),
        }
    }
}
