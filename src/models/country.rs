//! Country records and the per-country subdivision trees.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::subdivision::{empty_as_none, CodeIndexNode, NameIndexNode};

/// A single ISO 3166-1 entry as it arrives from the source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub alpha_2: String,

    pub alpha_3: String,

    pub name: String,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub official_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub common_name: Option<String>,

    /// ISO 3166-1 numeric code, zero padded ("004")
    #[serde(default)]
    pub numeric: String,
}

impl CountryRecord {
    /// Names a caller may use to refer to this country, display name first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.official_name.as_deref())
            .chain(self.common_name.as_deref())
    }
}

/// A country with both subdivision trees attached.
///
/// Both maps are always present; a country without subdivisions has empty maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(flatten)]
    pub record: CountryRecord,

    /// Local code -> subdivision names
    #[serde(default)]
    pub subdivisions_by_code: BTreeMap<String, NameIndexNode>,

    /// Uppercased name -> subdivision code
    #[serde(default)]
    pub subdivisions_by_name: BTreeMap<String, CodeIndexNode>,
}

impl Country {
    pub fn new(record: CountryRecord) -> Self {
        Self {
            record,
            subdivisions_by_code: BTreeMap::new(),
            subdivisions_by_name: BTreeMap::new(),
        }
    }

    /// Number of subdivisions at every level
    pub fn subdivision_count(&self) -> usize {
        self.subdivisions_by_code
            .values()
            .map(|node| 1 + node.children.len())
            .sum()
    }
}
