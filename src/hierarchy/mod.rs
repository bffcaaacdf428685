//! Hierarchy builder.
//!
//! Turns flat country and subdivision records into the per-country
//! code-keyed and name-keyed subdivision trees, in three stages:
//! parent grouping, tree assembly and per-country assembly.

mod assembly;
mod builder;
mod grouping;
mod records;

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub use assembly::{assemble_trees, SubdivisionTrees, MAX_SUBDIVISION_DEPTH};
pub use builder::{build_country, build_dataset, build_dataset_with, group_by_country};
pub use grouping::{group_by_parent, ParentGroups};
pub use records::RecordIndex;

/// What to do with subdivisions that cannot be attached to the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Abort the build
    #[default]
    Fail,
    /// Log a warning and leave the subdivision out
    Drop,
}

impl FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(OrphanPolicy::Fail),
            "drop" => Ok(OrphanPolicy::Drop),
            other => Err(format!("unknown orphan policy: {other} (expected fail or drop)")),
        }
    }
}

impl fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrphanPolicy::Fail => f.write_str("fail"),
            OrphanPolicy::Drop => f.write_str("drop"),
        }
    }
}

/// Options for a dataset build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BuildOptions {
    #[serde(default)]
    pub orphans: OrphanPolicy,
}
