use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Entity, Field, FieldKind as K, Workgroup, field};
use crate::enums::ShareType;
use crate::error::Error;

/// A share: a set of catalogs exposed to applications or other workgroups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    #[serde(rename = "_created")]
    pub created: Option<String>,
    #[serde(rename = "_creator")]
    pub creator: Option<Workgroup>,
    #[serde(rename = "_id")]
    pub(crate) id: Option<String>,
    #[serde(rename = "_modified")]
    pub modified: Option<String>,
    pub applications: Option<Vec<Value>>,
    pub catalogs: Option<Vec<Value>>,
    pub groups: Option<Vec<Workgroup>>,
    pub name: Option<String>,
    pub rights: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<ShareType>,
    pub url_token: Option<String>,
}

impl Entity for Share {
    const KIND: &'static str = "Share";

    const FIELDS: &'static [Field] = &[
        field("_created", K::String),
        field("_creator", K::Entity),
        field("_id", K::String),
        field("_modified", K::String),
        field("applications", K::List),
        field("catalogs", K::List),
        field("groups", K::List),
        field("name", K::String),
        field("rights", K::List),
        field("type", K::String),
        field("urlToken", K::String),
    ];

    const CREATION: &'static [&'static str] = &["name", "rights", "type"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn validate_creation(&self) -> Result<(), Error> {
        if self.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(Error::validation("Share requires a name"));
        }
        if self.kind.is_none() {
            return Err(Error::validation("Share requires a type"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::to_dict_creation;

    #[test]
    fn creator_is_a_typed_workgroup() {
        let share: Share = serde_json::from_value(json!({
            "_id": "2c6d4d1e3e0a4a3a8b1c9f7e6d5c4b3a",
            "_creator": {
                "_id": "32f7e95ec4e94ca3bc1afda960003882",
                "contact": { "name": "Isogeo Test" }
            },
            "groups": [{ "_id": "6c7d8e9fa0b1c2d3e4f5a6b7c8d9e0f1" }],
            "name": "Open portal",
            "type": "group",
            "urlToken": "t0k3n"
        }))
        .unwrap();

        let creator = share.creator.as_ref().unwrap();
        assert_eq!(creator.display_name(), Some("Isogeo Test"));
        assert_eq!(share.groups.as_ref().unwrap().len(), 1);
        assert_eq!(share.kind, Some(ShareType::Group));
    }

    #[test]
    fn creation_form() {
        let share = Share {
            name: Some("Open portal".into()),
            rights: Some(vec!["view".into()]),
            kind: Some(ShareType::Application),
            url_token: Some("ignored".into()),
            ..Share::default()
        };
        share.validate_creation().unwrap();

        let crea = to_dict_creation(&share).unwrap();
        assert_eq!(
            serde_json::Value::Object(crea),
            json!({ "name": "Open portal", "rights": ["view"], "type": "application" })
        );
    }

    #[test]
    fn creation_needs_type() {
        let share = Share {
            name: Some("Open portal".into()),
            ..Share::default()
        };
        assert!(share.validate_creation().unwrap_err().is_validation());
    }
}
