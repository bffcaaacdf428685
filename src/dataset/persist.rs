//! Reading and writing the dataset file.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;
use xxhash_rust::xxh64::xxh64;

use super::Dataset;

/// Pretty-printed JSON with a trailing newline.
///
/// Identical datasets always serialize to identical bytes.
pub fn to_json_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut bytes =
        serde_json::to_vec_pretty(dataset).context("Failed to serialize dataset")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// xxh64 digest of `bytes`, hex encoded
pub fn digest(bytes: &[u8]) -> String {
    format!("{:016x}", xxh64(bytes, 0))
}

/// Write the dataset to `path`, replacing any existing file atomically.
///
/// Returns the digest of the written bytes.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<String> {
    let bytes = to_json_bytes(dataset)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir).context("Failed to create temporary file")?;
    tmp.write_all(&bytes)
        .context("Failed to write dataset")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move dataset into place: {}", path.display()))?;

    let digest = digest(&bytes);
    info!(
        "Wrote {} ({} bytes, xxh64 {})",
        path.display(),
        bytes.len(),
        digest
    );
    Ok(digest)
}

/// Load a dataset previously written by [`write_dataset`].
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;
    let dataset: Dataset = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse dataset file: {}", path.display()))?;

    info!(
        "Loaded {} countries, {} subdivisions from {}",
        dataset.len(),
        dataset.subdivision_count(),
        path.display()
    );
    Ok(dataset)
}
