//! Per-country assembly: attaches the subdivision trees to each country.

use hashbrown::{HashMap, HashSet};
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::assembly::assemble_trees;
use super::grouping::group_by_parent;
use super::records::RecordIndex;
use super::BuildOptions;
use crate::dataset::Dataset;
use crate::error::{BuildError, BuildResult};
use crate::models::{Country, CountryRecord, SubdivisionRecord};

/// Partition subdivision records by the country prefix of their code, keeping source order.
pub fn group_by_country(
    subdivisions: &[SubdivisionRecord],
) -> BuildResult<HashMap<&str, Vec<&SubdivisionRecord>>> {
    let mut by_country: HashMap<&str, Vec<&SubdivisionRecord>> = HashMap::new();
    for record in subdivisions {
        let (country, _) = record.split_code()?;
        by_country.entry(country).or_default().push(record);
    }
    Ok(by_country)
}

/// Build one country with both subdivision trees attached.
pub fn build_country(
    record: &CountryRecord,
    subdivisions: Vec<&SubdivisionRecord>,
    options: &BuildOptions,
) -> BuildResult<Country> {
    let index = RecordIndex::new(&record.alpha_2, subdivisions)?;
    let groups = group_by_parent(&index, options.orphans)?;
    let trees = assemble_trees(&index, &groups, options.orphans)?;

    Ok(Country {
        record: record.clone(),
        subdivisions_by_code: trees.by_code,
        subdivisions_by_name: trees.by_name,
    })
}

/// Build the full dataset.
pub fn build_dataset(
    countries: &[CountryRecord],
    subdivisions: &[SubdivisionRecord],
    options: &BuildOptions,
) -> BuildResult<Dataset> {
    build_dataset_with(countries, subdivisions, options, |_| {})
}

/// Build the full dataset, calling `on_country` after each country is assembled.
pub fn build_dataset_with<F>(
    countries: &[CountryRecord],
    subdivisions: &[SubdivisionRecord],
    options: &BuildOptions,
    mut on_country: F,
) -> BuildResult<Dataset>
where
    F: FnMut(&Country),
{
    check_unique_codes(countries)?;

    let mut by_country = group_by_country(subdivisions)?;
    let mut dataset = Dataset::default();

    for record in countries {
        let records = by_country.remove(record.alpha_2.as_str()).unwrap_or_default();
        let country = build_country(record, records, options)?;
        on_country(&country);

        dataset
            .name_to_alpha2
            .insert(record.name.clone(), record.alpha_2.clone());
        dataset
            .name_to_alpha3
            .insert(record.name.clone(), record.alpha_3.clone());
        dataset
            .alpha3_to_alpha2
            .insert(record.alpha_3.clone(), record.alpha_2.clone());
        dataset.countries.insert(record.alpha_2.clone(), country);
    }

    if !by_country.is_empty() {
        let skipped: usize = by_country.values().map(Vec::len).sum();
        let mut prefixes: Vec<&str> = by_country.keys().copied().collect();
        prefixes.sort_unstable();
        warn!(
            "Skipped {} subdivisions with unknown country prefix: {}",
            skipped,
            prefixes.join(", ")
        );
    }

    info!(
        "Built {} countries with {} subdivisions",
        dataset.countries.len(),
        dataset.subdivision_count()
    );

    Ok(dataset)
}

fn check_unique_codes(countries: &[CountryRecord]) -> BuildResult<()> {
    let mut seen = HashSet::with_capacity(countries.len() * 2);
    for record in countries {
        // Alpha-2 and alpha-3 codes differ in length, so one set covers both
        for code in [&record.alpha_2, &record.alpha_3] {
            if !seen.insert(code.as_str()) {
                return Err(BuildError::DuplicateCountry(code.clone()));
            }
        }
    }
    Ok(())
}
