//! Loaders for the ISO 3166-1 country list and the ISO 3166-2 subdivision list.
//!
//! Both lists may be JSON (`{"3166-1": [...]}` / `{"3166-2": [...]}` or a bare
//! array) or CSV with a header row. A trailing `.gz` is decompressed.

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

use crate::models::{CountryRecord, SubdivisionRecord};

/// On-disk encoding of a source list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// Detect the format from the file extension, looking past a `.gz` suffix.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let name = name.strip_suffix(".gz").unwrap_or(&name);

        if name.ends_with(".json") {
            Ok(SourceFormat::Json)
        } else if name.ends_with(".csv") {
            Ok(SourceFormat::Csv)
        } else {
            bail!("Unsupported source format: {}", path.display())
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountryFile {
    Wrapped {
        #[serde(rename = "3166-1")]
        countries: Vec<CountryRecord>,
    },
    Bare(Vec<CountryRecord>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubdivisionFile {
    Wrapped {
        #[serde(rename = "3166-2")]
        subdivisions: Vec<SubdivisionRecord>,
    },
    Bare(Vec<SubdivisionRecord>),
}

/// Load the country list from `path`.
pub fn load_countries(path: &Path) -> Result<Vec<CountryRecord>> {
    info!("Loading countries from {}", path.display());
    let format = SourceFormat::from_path(path)?;
    let countries = read_countries(open_source(path)?, format)
        .with_context(|| format!("Failed to parse country file: {}", path.display()))?;
    info!("Loaded {} countries", countries.len());
    Ok(countries)
}

/// Load the subdivision list from `path`.
pub fn load_subdivisions(path: &Path) -> Result<Vec<SubdivisionRecord>> {
    info!("Loading subdivisions from {}", path.display());
    let format = SourceFormat::from_path(path)?;
    let subdivisions = read_subdivisions(open_source(path)?, format)
        .with_context(|| format!("Failed to parse subdivision file: {}", path.display()))?;
    info!("Loaded {} subdivisions", subdivisions.len());
    Ok(subdivisions)
}

pub fn read_countries<R: Read>(reader: R, format: SourceFormat) -> Result<Vec<CountryRecord>> {
    match format {
        SourceFormat::Json => match serde_json::from_reader::<_, CountryFile>(reader)? {
            CountryFile::Wrapped { countries } | CountryFile::Bare(countries) => Ok(countries),
        },
        SourceFormat::Csv => read_csv(reader),
    }
}

pub fn read_subdivisions<R: Read>(
    reader: R,
    format: SourceFormat,
) -> Result<Vec<SubdivisionRecord>> {
    match format {
        SourceFormat::Json => match serde_json::from_reader::<_, SubdivisionFile>(reader)? {
            SubdivisionFile::Wrapped { subdivisions } | SubdivisionFile::Bare(subdivisions) => {
                Ok(subdivisions)
            }
        },
        SourceFormat::Csv => read_csv(reader),
    }
}

fn open_source(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open source file: {}", path.display()))?;
    let gzipped = path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("gz"));
    let reader: Box<dyn Read> = if gzipped {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

/// Columns are matched by header name, so their order does not matter.
fn read_csv<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, result) in csv_reader.deserialize().enumerate() {
        // +2: one for the header row, one for 1-based line numbers
        let row = result.with_context(|| format!("Invalid CSV row at line {}", line + 2))?;
        rows.push(row);
    }
    Ok(rows)
}
