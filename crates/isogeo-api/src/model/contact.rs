use serde::{Deserialize, Serialize};

use super::{Dict, Entity, Field, FieldKind as K, field};
use crate::error::Error;

/// A contact of a workgroup's address book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_abilities")]
    pub abilities: Option<Vec<String>>,
    #[serde(rename = "_id")]
    pub(crate) id: Option<String>,
    #[serde(rename = "_tag")]
    pub tag: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub available: Option<bool>,
    pub city: Option<String>,
    pub count: Option<i64>,
    pub country_code: Option<String>,
    pub email: Option<String>,
    pub fax: Option<String>,
    pub hash: Option<String>,
    pub name: Option<String>,
    pub organization: Option<String>,
    pub owner: Option<Dict>,
    pub phone: Option<String>,
    /// `custom`, `group` or `user`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub zip_code: Option<String>,
}

impl Entity for Contact {
    const KIND: &'static str = "Contact";

    const FIELDS: &'static [Field] = &[
        field("_abilities", K::List),
        field("_id", K::String),
        field("_tag", K::String),
        field("addressLine1", K::String),
        field("addressLine2", K::String),
        field("addressLine3", K::String),
        field("available", K::Boolean),
        field("city", K::String),
        field("count", K::Integer),
        field("countryCode", K::String),
        field("email", K::String),
        field("fax", K::String),
        field("hash", K::String),
        field("name", K::String),
        field("organization", K::String),
        field("owner", K::Mapping),
        field("phone", K::String),
        field("type", K::String),
        field("zipCode", K::String),
    ];

    const CREATION: &'static [&'static str] = &[
        "addressLine1",
        "addressLine2",
        "addressLine3",
        "city",
        "countryCode",
        "email",
        "fax",
        "name",
        "organization",
        "phone",
        "zipCode",
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn validate_creation(&self) -> Result<(), Error> {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(Error::validation("Contact requires a name")),
        }
    }
}
