//! Parent-grouping stage: flat parent pointers to an adjacency map.

use hashbrown::HashMap;
use tracing::warn;

use super::records::RecordIndex;
use super::OrphanPolicy;
use crate::error::{BuildError, BuildResult};

/// Children of each subdivision, grouped by the parent's local code.
#[derive(Debug, Default)]
pub struct ParentGroups {
    /// Top-level subdivisions (empty parent), in source order
    roots: Vec<String>,
    /// Parent local code -> child local codes, in source order
    children: HashMap<String, Vec<String>>,
}

impl ParentGroups {
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Child local codes of `code`; empty for leaves and unknown codes.
    pub fn children_of(&self, code: &str) -> &[String] {
        self.children.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `code` was seeded as a key, either as a root or as a parent.
    pub fn contains(&self, code: &str) -> bool {
        self.children.contains_key(code)
    }

    /// Number of parent keys
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Group the records of one country by resolved parent code.
///
/// A record with an empty parent seeds its own code as a key and is recorded
/// as a root. Any other record is appended to its parent's child list.
pub fn group_by_parent(index: &RecordIndex<'_>, policy: OrphanPolicy) -> BuildResult<ParentGroups> {
    let country = index.country();
    let mut groups = ParentGroups::default();

    for record in index.records() {
        let (_, local) = record.split_code()?;

        let Some(parent) = record.parent_ref() else {
            groups.children.entry(local.to_string()).or_default();
            groups.roots.push(local.to_string());
            continue;
        };

        if let Some(parent_country) = parent.country {
            if parent_country != country {
                return Err(BuildError::ForeignParent {
                    code: record.code.clone(),
                    parent: record.parent.clone().unwrap_or_default(),
                });
            }
        }

        if !index.contains(parent.local) {
            match policy {
                OrphanPolicy::Fail => {
                    return Err(BuildError::UnresolvedParent {
                        country: country.to_string(),
                        code: local.to_string(),
                        parent: parent.local.to_string(),
                    });
                }
                OrphanPolicy::Drop => {
                    warn!(
                        "Dropping {}: parent {} does not exist",
                        record.code, parent.local
                    );
                    continue;
                }
            }
        }

        groups
            .children
            .entry(parent.local.to_string())
            .or_default()
            .push(local.to_string());
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubdivisionRecord;

    fn record(code: &str, parent: &str) -> SubdivisionRecord {
        SubdivisionRecord {
            code: code.to_string(),
            name: code.to_string(),
            local_name: None,
            language_code: None,
            parent: Some(parent.to_string()).filter(|p| !p.is_empty()),
            kind: "Region".to_string(),
        }
    }

    fn group(country: &str, records: &[SubdivisionRecord], policy: OrphanPolicy) -> BuildResult<ParentGroups> {
        let index = RecordIndex::new(country, records.iter().collect())?;
        group_by_parent(&index, policy)
    }

    #[test]
    fn test_top_level_seeds_empty_group() {
        let records = vec![record("US-CA", ""), record("US-NY", "")];
        let groups = group("US", &records, OrphanPolicy::Fail).unwrap();

        assert_eq!(groups.roots(), ["CA", "NY"]);
        assert!(groups.children_of("CA").is_empty());
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_children_keep_source_order() {
        let records = vec![
            record("GB-LND", "ENG"),
            record("GB-ENG", ""),
            record("GB-KEN", "GB-ENG"),
            record("GB-BIR", "ENG"),
        ];
        let groups = group("GB", &records, OrphanPolicy::Fail).unwrap();

        assert_eq!(groups.roots(), ["ENG"]);
        assert_eq!(groups.children_of("ENG"), ["LND", "KEN", "BIR"]);
    }

    #[test]
    fn test_unresolved_parent_fails() {
        let records = vec![record("GB-ENG", ""), record("GB-LND", "XXX")];
        let err = group("GB", &records, OrphanPolicy::Fail).unwrap_err();

        assert_eq!(
            err,
            BuildError::UnresolvedParent {
                country: "GB".to_string(),
                code: "LND".to_string(),
                parent: "XXX".to_string(),
            }
        );
    }

    #[test]
    fn test_unresolved_parent_dropped() {
        let records = vec![record("GB-ENG", ""), record("GB-LND", "XXX")];
        let groups = group("GB", &records, OrphanPolicy::Drop).unwrap();

        assert!(!groups.contains("XXX"));
        assert_eq!(groups.roots(), ["ENG"]);
    }

    #[test]
    fn test_foreign_parent_rejected() {
        let records = vec![record("GB-ENG", ""), record("GB-LND", "FR-ENG")];
        let err = group("GB", &records, OrphanPolicy::Drop).unwrap_err();

        assert!(matches!(err, BuildError::ForeignParent { .. }));
    }
}
