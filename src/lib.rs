//! Country States - ISO 3166 countries and their subdivision hierarchy
//!
//! This library provides the dataset builder shared by the ingest binary and
//! the lookup queries served by the query binary.

pub mod dataset;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod source;

pub use dataset::Dataset;
pub use error::{BuildError, LookupError};
pub use hierarchy::{build_dataset, BuildOptions, OrphanPolicy};
pub use models::{CodeIndexNode, Country, CountryRecord, NameIndexNode, SubdivisionRecord};
