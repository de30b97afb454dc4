use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Condition, Contact, Dict, Entity, Field, FieldKind as K, Workgroup, field};
use crate::enums::{ContactRole, EditionTab, MetadataType};
use crate::error::Error;

/// A metadata sheet ("resource") describing a dataset, service or document.
///
/// `coordinate_system` and `feature_attributes` are read as
/// `coordinateSystem` / `featureAttributes` but written as
/// `coordinate-system` / `feature-attributes`; both spellings deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(rename = "_abilities")]
    pub abilities: Option<Vec<String>>,
    #[serde(rename = "_created")]
    pub created_at: Option<String>,
    #[serde(rename = "_creator")]
    pub creator: Option<Workgroup>,
    #[serde(rename = "_id")]
    pub(crate) id: Option<String>,
    #[serde(rename = "_modified")]
    pub modified_at: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_: Option<String>,
    pub collection_context: Option<String>,
    pub collection_method: Option<String>,
    pub conditions: Option<Vec<Condition>>,
    pub contacts: Option<Vec<Value>>,
    #[serde(alias = "coordinate-system")]
    pub coordinate_system: Option<Dict>,
    /// Creation date of the data (not of the sheet).
    pub created: Option<String>,
    pub distance: Option<f64>,
    pub edition_profile: Option<String>,
    pub encoding: Option<String>,
    pub envelope: Option<Dict>,
    pub events: Option<Vec<Value>>,
    #[serde(alias = "feature-attributes")]
    pub feature_attributes: Option<Vec<Value>>,
    pub features: Option<i64>,
    pub format: Option<String>,
    pub format_version: Option<String>,
    pub geometry: Option<String>,
    pub keywords: Option<Vec<Value>>,
    pub language: Option<String>,
    pub layers: Option<Vec<Value>>,
    pub limitations: Option<Vec<Value>>,
    pub links: Option<Vec<Value>>,
    /// Last modification date of the data.
    pub modified: Option<String>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub precision: Option<String>,
    pub published: Option<String>,
    pub scale: Option<i64>,
    pub series: Option<bool>,
    pub service_layers: Option<Vec<Value>>,
    pub specifications: Option<Vec<Value>>,
    pub tags: Option<Dict>,
    pub title: Option<String>,
    pub topological_consistency: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<MetadataType>,
    pub update_frequency: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub validity_comment: Option<String>,
}

impl Metadata {
    /// Id of the workgroup that owns the sheet.
    pub fn workgroup_id(&self) -> Option<&str> {
        self.creator.as_ref()?.id()
    }

    /// Contacts attached to the sheet under `role`.
    ///
    /// Entries are `{"role": .., "contact": {..}}`; entries whose contact
    /// does not decode are skipped.
    pub fn contacts_with_role(&self, role: ContactRole) -> Vec<Contact> {
        self.contacts
            .iter()
            .flatten()
            .filter(|entry| entry.get("role").and_then(Value::as_str) == Some(role.as_ref()))
            .filter_map(|entry| entry.get("contact").cloned())
            .filter_map(|contact| serde_json::from_value(contact).ok())
            .collect()
    }

    /// Editor tabs available for this sheet's kind.
    pub fn edition_tabs(&self) -> Vec<EditionTab> {
        use strum::IntoEnumIterator;

        match &self.kind {
            Some(kind) => EditionTab::iter().filter(|t| t.applies_to(kind)).collect(),
            None => vec![EditionTab::Identification],
        }
    }
}

impl Entity for Metadata {
    const KIND: &'static str = "Metadata";

    const FIELDS: &'static [Field] = &[
        field("_abilities", K::List),
        field("_created", K::String),
        field("_creator", K::Entity),
        field("_id", K::String),
        field("_modified", K::String),
        field("abstract", K::String),
        field("collectionContext", K::String),
        field("collectionMethod", K::String),
        field("conditions", K::List),
        field("contacts", K::List),
        field("coordinateSystem", K::Mapping),
        field("created", K::String),
        field("distance", K::Float),
        field("editionProfile", K::String),
        field("encoding", K::String),
        field("envelope", K::Mapping),
        field("events", K::List),
        field("featureAttributes", K::List),
        field("features", K::Integer),
        field("format", K::String),
        field("formatVersion", K::String),
        field("geometry", K::String),
        field("keywords", K::List),
        field("language", K::String),
        field("layers", K::List),
        field("limitations", K::List),
        field("links", K::List),
        field("modified", K::String),
        field("name", K::String),
        field("path", K::String),
        field("precision", K::String),
        field("published", K::String),
        field("scale", K::Integer),
        field("series", K::Boolean),
        field("serviceLayers", K::List),
        field("specifications", K::List),
        field("tags", K::Mapping),
        field("title", K::String),
        field("topologicalConsistency", K::String),
        field("type", K::String),
        field("updateFrequency", K::String),
        field("validFrom", K::String),
        field("validTo", K::String),
        field("validityComment", K::String),
    ];

    const CREATION: &'static [&'static str] = &[
        "abstract",
        "collectionContext",
        "collectionMethod",
        "coordinateSystem",
        "encoding",
        "featureAttributes",
        "format",
        "formatVersion",
        "language",
        "layers",
        "name",
        "path",
        "precision",
        "scale",
        "series",
        "serviceLayers",
        "title",
        "topologicalConsistency",
        "type",
        "updateFrequency",
    ];

    const WRITE_NAMES: &'static [(&'static str, &'static str)] = &[
        ("coordinateSystem", "coordinate-system"),
        ("featureAttributes", "feature-attributes"),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate_creation(&self) -> Result<(), Error> {
        if self.kind.is_none() {
            return Err(Error::validation("Metadata requires a type"));
        }
        if self.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(Error::validation("Metadata requires a title"));
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
    use crate::model::{License, to_dict, to_dict_creation};

    #[test]
    fn schema_sizes() {
        assert_eq!(Metadata::FIELDS.len(), 44);
        assert_eq!(Metadata::CREATION.len(), 20);
    }

    #[test]
    fn accepts_both_spellings_of_renamed_fields() {
        let read: Metadata = serde_json::from_value(json!({
            "coordinateSystem": { "code": 4326 },
            "featureAttributes": [{ "name": "gid" }]
        }))
        .unwrap();
        let written: Metadata = serde_json::from_value(json!({
            "coordinate-system": { "code": 4326 },
            "feature-attributes": [{ "name": "gid" }]
        }))
        .unwrap();
        assert_eq!(read, written);

        let dict = to_dict(&read).unwrap();
        assert_eq!(dict["coordinateSystem"]["code"], json!(4326));
        assert!(!dict.contains_key("coordinate-system"));
    }

    #[test]
    fn creation_body_reads_back_as_same_sheet() {
        let md = Metadata {
            title: Some("Cadastre".into()),
            kind: Some(MetadataType::VectorDataset),
            scale: Some(2000),
            series: Some(false),
            ..Metadata::default()
        };
        md.validate_creation().unwrap();

        let crea = to_dict_creation(&md).unwrap();
        let back: Metadata = serde_json::from_value(Value::Object(crea)).unwrap();
        assert_eq!(back, md);
    }

    #[test]
    fn conditions_are_typed() {
        let md: Metadata = serde_json::from_value(json!({
            "_id": "9f6b2c1a0e8d4b7c9a6f5e4d3c2b1a00",
            "_creator": { "_id": "32f7e95ec4e94ca3bc1afda960003882" },
            "conditions": [{
                "_id": "5e3c8f6a0b1d4c2e9a7f6b5d4c3b2a19",
                "license": { "_id": "f6e0c665905a4feab1e9c1d6359a225f" }
            }],
            "type": "rasterDataset"
        }))
        .unwrap();

        let conditions = md.conditions.as_ref().unwrap();
        assert_eq!(
            conditions[0].license.as_ref().and_then(License::id),
            Some("f6e0c665905a4feab1e9c1d6359a225f")
        );
        assert_eq!(md.workgroup_id(), Some("32f7e95ec4e94ca3bc1afda960003882"));
        assert!(!md.edition_tabs().contains(&EditionTab::Attributes));
        assert!(md.edition_tabs().contains(&EditionTab::Geography));
    }

    #[test]
    fn contacts_filtered_by_role() {
        let md: Metadata = serde_json::from_value(json!({
            "contacts": [
                { "role": "pointOfContact", "contact": { "_id": "1d4c2e9a7f6b5d4c3b2a195e3c8f6a0b", "name": "SIG Lyon" } },
                { "role": "author", "contact": { "_id": "2e9a7f6b5d4c3b2a195e3c8f6a0b1d4c", "name": "IGN" } },
                { "role": "pointOfContact" }
            ]
        }))
        .unwrap();

        let points = md.contacts_with_role(ContactRole::PointOfContact);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name.as_deref(), Some("SIG Lyon"));
        assert!(md.contacts_with_role(ContactRole::Publisher).is_empty());
    }

    #[test]
    fn unlisted_kind_survives_creation_body() {
        let md: Metadata = serde_json::from_value(json!({
            "title": "Traffic feed",
            "type": "dataStream"
        }))
        .unwrap();
        assert_eq!(md.kind, Some(MetadataType::Other("dataStream".into())));
        assert_eq!(md.edition_tabs().len(), 7);

        let crea = to_dict_creation(&md).unwrap();
        assert_eq!(crea["type"], json!("dataStream"));
    }
}
