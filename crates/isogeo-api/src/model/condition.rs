use serde::{Deserialize, Serialize};

use super::{Entity, Field, FieldKind as K, License, field};
use crate::checker;
use crate::error::Error;

/// A condition of use attached to a metadata sheet.
///
/// `parent_resource` is not sent by the API; routes fill it with the id of
/// the metadata the condition was read from or created under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "_id")]
    pub(crate) id: Option<String>,
    pub description: Option<String>,
    pub license: Option<License>,
    pub parent_resource: Option<String>,
}

impl Entity for Condition {
    const KIND: &'static str = "Condition";

    const FIELDS: &'static [Field] = &[
        field("_id", K::String),
        field("description", K::String),
        field("license", K::Entity),
        field("parent_resource", K::String),
    ];

    const CREATION: &'static [&'static str] = &["description", "license"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate_creation(&self) -> Result<(), Error> {
        let license_id = self
            .license
            .as_ref()
            .and_then(License::id)
            .ok_or_else(|| Error::validation("Condition requires a license with an id"))?;
        checker::ensure_uuid(license_id, "License")
    }
}
