//! The assembled dataset: countries keyed by alpha-2 plus shortcut tables.
//!
//! A `Dataset` is built once (see [`crate::hierarchy::build_dataset`]),
//! written to disk, and loaded read-only by consumers.

mod lookup;
mod persist;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Country;

pub use persist::{digest, load_dataset, to_json_bytes, write_dataset};

/// All countries with their subdivision trees.
///
/// Every map is ordered, so serializing the same dataset always yields the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Alpha-2 -> country
    pub countries: BTreeMap<String, Country>,

    /// Exact country name -> alpha-2
    pub name_to_alpha2: BTreeMap<String, String>,

    /// Exact country name -> alpha-3
    pub name_to_alpha3: BTreeMap<String, String>,

    /// Alpha-3 -> alpha-2
    #[serde(default)]
    pub alpha3_to_alpha2: BTreeMap<String, String>,
}

impl Dataset {
    /// Country by alpha-2, case-insensitive
    pub fn country(&self, alpha2: &str) -> Option<&Country> {
        self.countries.get(alpha2.to_uppercase().as_str())
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Subdivisions at every level across all countries
    pub fn subdivision_count(&self) -> usize {
        self.countries.values().map(Country::subdivision_count).sum()
    }
}
