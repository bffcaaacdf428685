use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use country_states::BuildOptions;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub build: BuildOptions,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    pub countries: PathBuf,
    pub subdivisions: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            countries: PathBuf::from("data/iso3166-1.json"),
            subdivisions: PathBuf::from("data/iso3166-2.csv"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dataset: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/country-states.json"),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
