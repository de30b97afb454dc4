use serde::{Deserialize, Serialize};

use super::{Dict, Entity, Field, FieldKind as K, field};
use crate::error::Error;

/// A license that conditions of use can point to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "_abilities")]
    pub abilities: Option<Vec<String>>,
    #[serde(rename = "_id")]
    pub(crate) id: Option<String>,
    #[serde(rename = "_tag")]
    pub tag: Option<String>,
    pub count: Option<i64>,
    pub content: Option<String>,
    pub link: Option<String>,
    pub name: Option<String>,
    pub owner: Option<Dict>,
}

impl Entity for License {
    const KIND: &'static str = "License";

    const FIELDS: &'static [Field] = &[
        field("_abilities", K::List),
        field("_id", K::String),
        field("_tag", K::String),
        field("count", K::Integer),
        field("content", K::String),
        field("link", K::String),
        field("name", K::String),
        field("owner", K::Mapping),
    ];

    const CREATION: &'static [&'static str] = &["content", "link", "name"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn validate_creation(&self) -> Result<(), Error> {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(Error::validation("License requires a name")),
        }
    }
}
