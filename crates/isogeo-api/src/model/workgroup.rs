use serde::{Deserialize, Serialize};

use super::{Contact, Entity, Field, FieldKind as K, field};
use crate::enums::KeywordsCasing;
use crate::error::Error;

/// A workgroup: the owner of metadata, contacts, licenses and specifications.
///
/// A workgroup's display name is the name of its contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workgroup {
    #[serde(rename = "_id")]
    pub(crate) id: Option<String>,
    pub are_keywords_restricted: Option<bool>,
    pub can_create_legacy_service_links: Option<bool>,
    pub can_create_metadata: Option<bool>,
    pub contact: Option<Contact>,
    pub has_csw_client: Option<bool>,
    pub metadata_language: Option<String>,
    pub keywords_casing: Option<KeywordsCasing>,
    pub theme_color: Option<String>,
}

impl Entity for Workgroup {
    const KIND: &'static str = "Workgroup";

    const FIELDS: &'static [Field] = &[
        field("_id", K::String),
        field("areKeywordsRestricted", K::Boolean),
        field("canCreateLegacyServiceLinks", K::Boolean),
        field("canCreateMetadata", K::Boolean),
        field("contact", K::Entity),
        field("hasCswClient", K::Boolean),
        field("metadataLanguage", K::String),
        field("keywordsCasing", K::String),
        field("themeColor", K::String),
    ];

    const CREATION: &'static [&'static str] = &[
        "areKeywordsRestricted",
        "canCreateLegacyServiceLinks",
        "canCreateMetadata",
        "contact",
        "hasCswClient",
        "metadataLanguage",
        "keywordsCasing",
        "themeColor",
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> Option<&str> {
        self.contact.as_ref()?.name.as_deref()
    }

    fn validate_creation(&self) -> Result<(), Error> {
        match self.display_name() {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(Error::validation(
                "Workgroup requires a contact with a name",
            )),
        }
    }
}
