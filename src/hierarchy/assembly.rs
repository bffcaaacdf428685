//! Tree-assembly stage: adjacency map to the mirrored code/name trees.

use hashbrown::HashSet;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::grouping::ParentGroups;
use super::records::RecordIndex;
use super::OrphanPolicy;
use crate::error::{BuildError, BuildResult};
use crate::models::{name_key, CodeIndexNode, NameIndexNode};

/// Subdivision levels below a country (country -> subdivision -> sub-subdivision).
pub const MAX_SUBDIVISION_DEPTH: usize = 2;

/// Both index trees of one country.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubdivisionTrees {
    pub by_code: BTreeMap<String, NameIndexNode>,
    pub by_name: BTreeMap<String, CodeIndexNode>,
}

/// Build both trees from the roots of `groups`.
///
/// Every record reachable from a root is placed exactly once in the code
/// tree. When siblings share an uppercased name, the name tree keeps the
/// first of them in source order. Records that
/// are not reachable are an error under [`OrphanPolicy::Fail`] and are
/// skipped with a warning under [`OrphanPolicy::Drop`].
pub fn assemble_trees(
    index: &RecordIndex<'_>,
    groups: &ParentGroups,
    policy: OrphanPolicy,
) -> BuildResult<SubdivisionTrees> {
    let mut placed = HashSet::with_capacity(index.len());
    let trees = build_level(index, groups, None, groups.roots(), 1, &mut placed)?;

    for record in index.records() {
        let (_, local) = record.split_code()?;
        if placed.contains(local) {
            continue;
        }
        match policy {
            OrphanPolicy::Fail => {
                return Err(BuildError::Detached {
                    country: index.country().to_string(),
                    code: local.to_string(),
                });
            }
            OrphanPolicy::Drop => {
                warn!("Dropping {}: not reachable from a top-level subdivision", record.code);
            }
        }
    }

    debug!(
        "{}: {} top-level subdivisions, {} placed",
        index.country(),
        trees.by_code.len(),
        placed.len()
    );

    Ok(trees)
}

fn build_level(
    index: &RecordIndex<'_>,
    groups: &ParentGroups,
    parent: Option<&str>,
    codes: &[String],
    depth: usize,
    placed: &mut HashSet<String>,
) -> BuildResult<SubdivisionTrees> {
    let mut level = SubdivisionTrees::default();

    for code in codes {
        let record = index.get(code)?;
        let child_codes = groups.children_of(code);

        let children = if child_codes.is_empty() {
            SubdivisionTrees::default()
        } else if depth >= MAX_SUBDIVISION_DEPTH {
            return Err(BuildError::DepthExceeded {
                country: index.country().to_string(),
                code: child_codes[0].clone(),
                max_depth: MAX_SUBDIVISION_DEPTH,
            });
        } else {
            build_level(index, groups, Some(code), child_codes, depth + 1, placed)?
        };

        let mut name_node = NameIndexNode::from_record(record);
        name_node.children = children.by_code;
        level.by_code.insert(code.clone(), name_node);

        // Siblings may share a name (a city and its surrounding region);
        // the first in source order keeps the name entry.
        match level.by_name.entry(name_key(&record.name)) {
            Entry::Occupied(kept) => {
                warn!(
                    "{}: {} and {} are both named {:?} under {}; name lookups resolve to {}",
                    index.country(),
                    kept.get().code,
                    code,
                    record.name,
                    parent.unwrap_or("top level"),
                    kept.get().code
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(CodeIndexNode {
                    code: code.clone(),
                    children: children.by_name,
                });
            }
        }

        placed.insert(code.clone());
    }

    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::grouping::group_by_parent;
    use crate::models::SubdivisionRecord;

    fn record(code: &str, name: &str, parent: &str) -> SubdivisionRecord {
        SubdivisionRecord {
            code: code.to_string(),
            name: name.to_string(),
            local_name: None,
            language_code: None,
            parent: Some(parent.to_string()).filter(|p| !p.is_empty()),
            kind: "Region".to_string(),
        }
    }

    fn assemble(country: &str, records: &[SubdivisionRecord], policy: OrphanPolicy) -> BuildResult<SubdivisionTrees> {
        let index = RecordIndex::new(country, records.iter().collect())?;
        let groups = group_by_parent(&index, policy)?;
        assemble_trees(&index, &groups, policy)
    }

    #[test]
    fn test_single_top_level() {
        let records = vec![record("US-CA", "California", "")];
        let trees = assemble("US", &records, OrphanPolicy::Fail).unwrap();

        assert_eq!(trees.by_code["CA"].name, "California");
        assert_eq!(trees.by_name["CALIFORNIA"].code, "CA");
        assert!(trees.by_code["CA"].children.is_empty());
    }

    #[test]
    fn test_child_nested_under_parent() {
        let records = vec![
            record("GB-ENG", "England", ""),
            record("GB-LND", "London", "ENG"),
        ];
        let trees = assemble("GB", &records, OrphanPolicy::Fail).unwrap();

        assert_eq!(trees.by_code.len(), 1);
        assert_eq!(trees.by_code["ENG"].children["LND"].name, "London");
        assert_eq!(trees.by_name["ENGLAND"].children["LONDON"].code, "LND");
        assert!(!trees.by_code.contains_key("LND"));
    }

    #[test]
    fn test_mirrored_children_cardinality() {
        let records = vec![
            record("FR-ARA", "Auvergne-Rhône-Alpes", ""),
            record("FR-01", "Ain", "ARA"),
            record("FR-03", "Allier", "FR-ARA"),
            record("FR-BRE", "Bretagne", ""),
        ];
        let trees = assemble("FR", &records, OrphanPolicy::Fail).unwrap();

        for (code, node) in &trees.by_code {
            let mirrored = &trees.by_name[&name_key(&node.name)];
            assert_eq!(&mirrored.code, code);
            assert_eq!(mirrored.children.len(), node.children.len());
        }
        assert_eq!(trees.by_code["ARA"].children.len(), 2);
    }

    #[test]
    fn test_fourth_level_rejected() {
        let records = vec![
            record("XX-A", "A", ""),
            record("XX-B", "B", "A"),
            record("XX-C", "C", "B"),
        ];
        let err = assemble("XX", &records, OrphanPolicy::Fail).unwrap_err();

        assert_eq!(
            err,
            BuildError::DepthExceeded {
                country: "XX".to_string(),
                code: "C".to_string(),
                max_depth: MAX_SUBDIVISION_DEPTH,
            }
        );
    }

    #[test]
    fn test_parent_cycle_detected() {
        let records = vec![
            record("XX-A", "A", ""),
            record("XX-B", "B", "C"),
            record("XX-C", "C", "B"),
        ];
        let err = assemble("XX", &records, OrphanPolicy::Fail).unwrap_err();

        assert!(matches!(err, BuildError::Detached { .. }));
    }

    #[test]
    fn test_dropped_orphan_takes_descendants() {
        let records = vec![
            record("XX-A", "A", ""),
            record("XX-B", "B", "MISSING"),
            record("XX-C", "C", "B"),
        ];
        let trees = assemble("XX", &records, OrphanPolicy::Drop).unwrap();

        assert_eq!(trees.by_code.keys().collect::<Vec<_>>(), ["A"]);
    }

    #[test]
    fn test_sibling_name_collision_keeps_first() {
        let records = vec![
            record("UZ-TK", "Toshkent", ""),
            record("UZ-TO", "TOSHKENT", ""),
            record("UZ-AN", "Andijon", ""),
        ];
        let trees = assemble("UZ", &records, OrphanPolicy::Fail).unwrap();

        assert_eq!(trees.by_code.keys().collect::<Vec<_>>(), ["AN", "TK", "TO"]);
        assert_eq!(trees.by_code["TO"].name, "TOSHKENT");
        assert_eq!(trees.by_name.len(), 2);
        assert_eq!(trees.by_name["TOSHKENT"].code, "TK");
    }

    #[test]
    fn test_nested_name_collision_keeps_first() {
        let records = vec![
            record("AZ-X", "Region", ""),
            record("AZ-YE", "Yevlax", "X"),
            record("AZ-YEV", "Yevlax", "X"),
        ];
        let trees = assemble("AZ", &records, OrphanPolicy::Drop).unwrap();

        assert_eq!(trees.by_code["X"].children.len(), 2);
        assert_eq!(trees.by_name["REGION"].children["YEVLAX"].code, "YE");
    }
}
