//! Country and subdivision lookups over an assembled dataset.
//!
//! Lookups never log and never panic; misses come back as [`LookupError`].

use super::Dataset;
use crate::error::{LookupError, LookupResult};
use crate::models::{name_key, Country, NameIndexNode};

impl Dataset {
    /// Alpha-2 code for a country name.
    ///
    /// Tries the exact-name table first, then a case-insensitive match on the
    /// display, official and common names of every country.
    pub fn country_name_to_alpha2(&self, name: &str) -> LookupResult<&str> {
        self.find_country_by_name(name)
            .map(|c| c.record.alpha_2.as_str())
            .ok_or(LookupError::InvalidCountryName)
    }

    /// Alpha-3 code for a country name, resolved like [`Self::country_name_to_alpha2`].
    pub fn country_name_to_alpha3(&self, name: &str) -> LookupResult<&str> {
        if let Some(alpha3) = self.name_to_alpha3.get(name) {
            return Ok(alpha3.as_str());
        }
        self.find_country_by_name(name)
            .map(|c| c.record.alpha_3.as_str())
            .ok_or(LookupError::InvalidCountryName)
    }

    pub fn valid_country_name(&self, name: &str) -> bool {
        self.find_country_by_name(name).is_some()
    }

    pub fn country_alpha2_to_name(&self, alpha2: &str) -> LookupResult<&str> {
        self.country(alpha2)
            .map(|c| c.record.name.as_str())
            .ok_or(LookupError::InvalidCountryAlpha2)
    }

    pub fn country_alpha2_to_official_name(&self, alpha2: &str) -> LookupResult<Option<&str>> {
        self.country(alpha2)
            .map(|c| c.record.official_name.as_deref())
            .ok_or(LookupError::InvalidCountryAlpha2)
    }

    pub fn country_alpha2_to_common_name(&self, alpha2: &str) -> LookupResult<Option<&str>> {
        self.country(alpha2)
            .map(|c| c.record.common_name.as_deref())
            .ok_or(LookupError::InvalidCountryAlpha2)
    }

    pub fn valid_country_alpha2(&self, alpha2: &str) -> bool {
        self.country(alpha2).is_some()
    }

    /// Alpha-2 code for an alpha-3 code, case-insensitive
    pub fn country_alpha3_to_alpha2(&self, alpha3: &str) -> Option<&str> {
        self.alpha3_to_alpha2
            .get(alpha3.to_uppercase().as_str())
            .map(String::as_str)
    }

    /// Country given either an alpha-2 code or a name.
    pub fn resolve_country(&self, country: &str) -> LookupResult<&Country> {
        if let Some(found) = self.country(country) {
            return Ok(found);
        }
        self.find_country_by_name(country)
            .ok_or(LookupError::InvalidCountryName)
    }

    /// Local subdivision code for a subdivision name, case-insensitive.
    ///
    /// Searches the name tree at the top level, then one level down, then
    /// falls back to the display and local names stored in the code tree.
    pub fn subdivision_name_to_code(&self, country: &str, name: &str) -> LookupResult<&str> {
        let country = self.resolve_country(country)?;
        let key = name_key(name);
        let by_name = &country.subdivisions_by_name;

        if let Some(node) = by_name.get(&key) {
            return Ok(node.code.as_str());
        }
        if let Some(node) = by_name.values().find_map(|n| n.children.get(&key)) {
            return Ok(node.code.as_str());
        }

        let by_code = &country.subdivisions_by_code;
        by_code
            .iter()
            .find(|(_, node)| node.matches_name(&key))
            .or_else(|| {
                by_code
                    .values()
                    .flat_map(|node| node.children.iter())
                    .find(|(_, child)| child.matches_name(&key))
            })
            .map(|(code, _)| code.as_str())
            .ok_or(LookupError::InvalidSubdivisionName)
    }

    /// Display name for a local subdivision code.
    pub fn subdivision_code_to_name(&self, country: &str, code: &str) -> LookupResult<&str> {
        self.subdivision(country, code).map(|node| node.name.as_str())
    }

    /// Subdivision node for a local code, searched at the top level then one level down.
    ///
    /// A composite code with the country's own prefix (`US-CA`) is accepted too.
    pub fn subdivision(&self, country: &str, code: &str) -> LookupResult<&NameIndexNode> {
        let country = self.resolve_country(country)?;
        find_subdivision(country, code).ok_or(LookupError::InvalidSubdivisionCode)
    }

    pub fn valid_subdivision_code(&self, country: &str, code: &str) -> bool {
        self.resolve_country(country)
            .map(|c| find_subdivision(c, code).is_some())
            .unwrap_or(false)
    }

    fn find_country_by_name(&self, name: &str) -> Option<&Country> {
        if let Some(country) = self
            .name_to_alpha2
            .get(name)
            .and_then(|alpha2| self.countries.get(alpha2))
        {
            return Some(country);
        }

        let key = name_key(name);
        self.countries
            .values()
            .find(|c| c.record.names().any(|n| name_key(n) == key))
    }
}

fn find_subdivision<'a>(country: &'a Country, code: &str) -> Option<&'a NameIndexNode> {
    let code = code
        .strip_prefix(country.record.alpha_2.as_str())
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or(code);

    let by_code = &country.subdivisions_by_code;
    by_code
        .get(code)
        .or_else(|| by_code.values().find_map(|node| node.children.get(code)))
}
