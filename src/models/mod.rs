//! Core data models for the country/subdivision dataset.

pub mod country;
pub mod subdivision;

pub use country::{Country, CountryRecord};
pub use subdivision::{name_key, CodeIndexNode, NameIndexNode, ParentRef, SubdivisionRecord};
