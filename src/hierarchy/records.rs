//! Random access to one country's subdivision records by local code.

use hashbrown::HashMap;

use crate::error::{BuildError, BuildResult};
use crate::models::SubdivisionRecord;

/// Subdivision records of a single country, indexed by local code.
pub struct RecordIndex<'a> {
    country: &'a str,
    records: Vec<&'a SubdivisionRecord>,
    by_local: HashMap<&'a str, &'a SubdivisionRecord>,
}

impl<'a> RecordIndex<'a> {
    /// Index `records`, which must all carry the `country` prefix.
    pub fn new(country: &'a str, records: Vec<&'a SubdivisionRecord>) -> BuildResult<Self> {
        let mut by_local = HashMap::with_capacity(records.len());

        for &record in &records {
            let (_, local) = record.split_code()?;
            if by_local.insert(local, record).is_some() {
                return Err(BuildError::DuplicateCode {
                    country: country.to_string(),
                    code: local.to_string(),
                });
            }
        }

        Ok(Self {
            country,
            records,
            by_local,
        })
    }

    pub fn country(&self) -> &'a str {
        self.country
    }

    /// Look up a record by local code.
    ///
    /// A miss means the grouping refers to a subdivision the source never had.
    pub fn get(&self, local: &str) -> BuildResult<&'a SubdivisionRecord> {
        self.by_local
            .get(local)
            .copied()
            .ok_or_else(|| BuildError::MissingRecord {
                country: self.country.to_string(),
                code: format!("{}-{}", self.country, local),
            })
    }

    pub fn contains(&self, local: &str) -> bool {
        self.by_local.contains_key(local)
    }

    /// Records in source order
    pub fn records(&self) -> &[&'a SubdivisionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
