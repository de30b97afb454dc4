// ── Vocabularies of the Isogeo API ──
//
// Wire strings are camelCase (or lowercase where the API says so).
// `strum` gives parsing, display and iteration; `serde` the JSON form.
// Vocabularies read back from the API keep unlisted values in `Other`.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

/// Role of a contact attached to a metadata sheet.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ContactRole {
    Author,
    PointOfContact,
    Custodian,
    Distributor,
    Originator,
    Owner,
    PrincipalInvestigator,
    Processor,
    Publisher,
    ResourceProvider,
    User,
}

/// How a workgroup normalizes keyword spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KeywordsCasing {
    Capitalized,
    Lowercase,
    Mixedcase,
    Uppercase,
    /// Casing outside this list, kept verbatim.
    #[serde(untagged)]
    #[strum(default)]
    Other(String),
}

impl KeywordsCasing {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Capitalized => "capitalized",
            Self::Lowercase => "lowercase",
            Self::Mixedcase => "mixedcase",
            Self::Uppercase => "uppercase",
            Self::Other(raw) => raw,
        }
    }
}

/// Recipient kind of a share.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShareType {
    Application,
    Group,
    #[serde(untagged)]
    #[strum(default)]
    Other(String),
}

impl ShareType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Application => "application",
            Self::Group => "group",
            Self::Other(raw) => raw,
        }
    }
}

/// Kind of resource a metadata sheet describes.
///
/// Kinds the API adds later land in `Other` with their wire name, so a
/// page mixing known and new kinds still decodes and writes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MetadataType {
    VectorDataset,
    RasterDataset,
    NoGeoDataset,
    Service,
    Resource,
    #[serde(untagged)]
    #[strum(default)]
    Other(String),
}

impl MetadataType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::VectorDataset => "vectorDataset",
            Self::RasterDataset => "rasterDataset",
            Self::NoGeoDataset => "noGeoDataset",
            Self::Service => "service",
            Self::Resource => "resource",
            Self::Other(raw) => raw,
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

display_as_str!(KeywordsCasing, ShareType, MetadataType);

/// Tab of the metadata editor in the Isogeo web application.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum EditionTab {
    #[default]
    Identification,
    History,
    Geography,
    Quality,
    Attributes,
    Constraints,
    Resources,
    Contacts,
    Advanced,
    Metadata,
}

impl EditionTab {
    /// Whether the editor shows this tab for the given kind of resource.
    pub fn applies_to(self, kind: &MetadataType) -> bool {
        match self {
            Self::Attributes => *kind == MetadataType::VectorDataset,
            Self::Geography | Self::Quality => matches!(
                kind,
                MetadataType::VectorDataset | MetadataType::RasterDataset | MetadataType::Service
            ),
            Self::History => *kind != MetadataType::NoGeoDataset,
            Self::Identification
            | Self::Constraints
            | Self::Resources
            | Self::Contacts
            | Self::Advanced
            | Self::Metadata => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::{EnumCount, IntoEnumIterator};

    use super::*;

    #[test]
    fn contact_roles() {
        assert_eq!(ContactRole::COUNT, 11);
        assert!(ContactRole::from_str("author").is_ok());
        assert!(ContactRole::from_str("Author").is_err());
        assert_eq!(ContactRole::PointOfContact.to_string(), "pointOfContact");
        for role in ContactRole::iter() {
            let wire = serde_json::to_value(role).unwrap();
            let name: &str = role.as_ref();
            assert_eq!(wire.as_str(), Some(name));
        }
    }

    #[test]
    fn keywords_casing_roundtrips_through_json() {
        let casing: KeywordsCasing = serde_json::from_str("\"mixedcase\"").unwrap();
        assert_eq!(casing, KeywordsCasing::Mixedcase);
        assert_eq!(casing.to_string(), "mixedcase");
    }

    #[test]
    fn unlisted_values_are_kept_verbatim() {
        let casing: KeywordsCasing = serde_json::from_str("\"mixedCase\"").unwrap();
        assert_eq!(casing, KeywordsCasing::Other("mixedCase".into()));

        let kind: MetadataType = serde_json::from_str("\"dataStream\"").unwrap();
        assert_eq!(kind, MetadataType::Other("dataStream".into()));
        assert_eq!(serde_json::to_value(&kind).unwrap(), "dataStream");
        assert_eq!(kind.to_string(), "dataStream");

        assert_eq!(
            ShareType::from_str("partner").unwrap(),
            ShareType::Other("partner".into())
        );
    }

    #[test]
    fn metadata_type_wire_names() {
        assert_eq!(MetadataType::NoGeoDataset.as_str(), "noGeoDataset");
        assert_eq!(
            serde_json::to_value(MetadataType::RasterDataset).unwrap(),
            "rasterDataset"
        );
        assert_eq!(
            MetadataType::from_str("vectorDataset").unwrap(),
            MetadataType::VectorDataset
        );
    }

    #[test]
    fn edition_tabs_per_kind() {
        assert!(EditionTab::Attributes.applies_to(&MetadataType::VectorDataset));
        assert!(!EditionTab::Attributes.applies_to(&MetadataType::Service));
        assert!(!EditionTab::Geography.applies_to(&MetadataType::Resource));
        assert!(EditionTab::Quality.applies_to(&MetadataType::Service));
        assert!(!EditionTab::History.applies_to(&MetadataType::NoGeoDataset));
        assert!(!EditionTab::Geography.applies_to(&MetadataType::Other("dataStream".into())));
        assert_eq!(EditionTab::default().to_string(), "identification");
    }
}
