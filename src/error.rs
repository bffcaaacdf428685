//! Error types for dataset builds and lookups.

use thiserror::Error;

/// Structural defects found while building the dataset.
///
/// Every variant is fatal: a build that hits one produces no output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A subdivision referenced during assembly has no source record
    #[error("subdivision record not found: country {country}, code {code}")]
    MissingRecord { country: String, code: String },

    /// Subdivision code is not of the form `<alpha2>-<local>`
    #[error("malformed subdivision code: {0:?}")]
    MalformedCode(String),

    /// Alpha-2 or alpha-3 code used by more than one country
    #[error("duplicate country code: {0}")]
    DuplicateCountry(String),

    /// Local code used by more than one subdivision of a country
    #[error("duplicate subdivision code in {country}: {code}")]
    DuplicateCode { country: String, code: String },

    /// Composite parent reference points into another country
    #[error("subdivision {code} has parent {parent} in another country")]
    ForeignParent { code: String, parent: String },

    /// Parent reference names no subdivision of the country
    #[error("subdivision {country}-{code} references unknown parent {parent}")]
    UnresolvedParent {
        country: String,
        code: String,
        parent: String,
    },

    /// Subdivision nested below the supported depth
    #[error("subdivision {country}-{code} is nested deeper than {max_depth} subdivision levels")]
    DepthExceeded {
        country: String,
        code: String,
        max_depth: usize,
    },

    /// Subdivision not reachable from any top-level subdivision (parent cycle)
    #[error("subdivision {country}-{code} is not reachable from a top-level subdivision")]
    Detached { country: String, code: String },
}

/// Query-time lookup failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    #[error("invalid country name")]
    InvalidCountryName,

    #[error("invalid country alpha2")]
    InvalidCountryAlpha2,

    #[error("invalid state name")]
    InvalidSubdivisionName,

    #[error("invalid state code")]
    InvalidSubdivisionCode,
}

/// Result type for dataset builds
pub type BuildResult<T> = Result<T, BuildError>;

/// Result type for lookups
pub type LookupResult<T> = Result<T, LookupError>;
