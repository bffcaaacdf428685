//! Subdivision source records and the mirrored index nodes built from them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{BuildError, BuildResult};

/// Separator between the country prefix and the local code (`US-CA`).
pub const CODE_SEPARATOR: char = '-';

/// A single ISO 3166-2 row as it arrives from the source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdivisionRecord {
    /// Composite code, `<alpha2>-<local>`
    pub code: String,

    pub name: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub local_name: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub language_code: Option<String>,

    /// Bare local code or composite code of the parent subdivision
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent: Option<String>,

    /// Subdivision category, e.g. "State", "Province", "Region"
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Parent reference split into its optional country prefix and local code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef<'a> {
    pub country: Option<&'a str>,
    pub local: &'a str,
}

impl SubdivisionRecord {
    /// Split the composite code into `(alpha2, local)`.
    pub fn split_code(&self) -> BuildResult<(&str, &str)> {
        match self.code.split_once(CODE_SEPARATOR) {
            Some((country, local)) if !country.is_empty() && !local.is_empty() => {
                Ok((country, local))
            }
            _ => Err(BuildError::MalformedCode(self.code.clone())),
        }
    }

    /// Parent reference, if any. Both `ENG` and `GB-ENG` resolve to local code `ENG`.
    pub fn parent_ref(&self) -> Option<ParentRef<'_>> {
        let parent = self.parent.as_deref()?.trim();
        if parent.is_empty() {
            return None;
        }
        Some(match parent.split_once(CODE_SEPARATOR) {
            Some((country, local)) => ParentRef {
                country: Some(country),
                local,
            },
            None => ParentRef {
                country: None,
                local: parent,
            },
        })
    }
}

/// Key used for the name-indexed tree.
///
/// `str::to_uppercase` follows the Unicode default case mapping and ignores
/// the process locale, so repeated builds produce the same keys.
pub fn name_key(name: &str) -> String {
    name.to_uppercase()
}

/// Code-keyed node: holds the names of a subdivision and its children by local code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameIndexNode {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,

    #[serde(rename = "type")]
    pub kind: String,

    /// Child local code -> child node (empty for leaves)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, NameIndexNode>,
}

impl NameIndexNode {
    /// Leaf node carrying the display fields of `record`.
    pub fn from_record(record: &SubdivisionRecord) -> Self {
        Self {
            name: record.name.clone(),
            local_name: record.local_name.clone(),
            language_code: record.language_code.clone(),
            kind: record.kind.clone(),
            children: BTreeMap::new(),
        }
    }

    /// Case-insensitive match against the display or local name.
    pub fn matches_name(&self, key: &str) -> bool {
        name_key(&self.name) == key
            || self
                .local_name
                .as_deref()
                .map(|local| name_key(local) == key)
                .unwrap_or(false)
    }
}

/// Name-keyed node: holds the bare local code and children by uppercased name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeIndexNode {
    pub code: String,

    /// Child uppercased name -> child node (empty for leaves)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, CodeIndexNode>,
}

/// Reads empty or whitespace-only fields as absent.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, parent: Option<&str>) -> SubdivisionRecord {
        SubdivisionRecord {
            code: code.to_string(),
            name: "Name".to_string(),
            local_name: None,
            language_code: None,
            parent: parent.map(String::from),
            kind: "Region".to_string(),
        }
    }

    #[test]
    fn test_split_code() {
        let r = record("GB-LND", None);
        assert_eq!(r.split_code().unwrap(), ("GB", "LND"));
    }

    #[test]
    fn test_split_code_malformed() {
        assert_eq!(
            record("GBLND", None).split_code(),
            Err(BuildError::MalformedCode("GBLND".to_string()))
        );
        assert!(record("GB-", None).split_code().is_err());
    }

    #[test]
    fn test_parent_forms_resolve_to_same_local() {
        let bare = record("GB-LND", Some("ENG"));
        let composite = record("GB-LND", Some("GB-ENG"));

        assert_eq!(bare.parent_ref().unwrap().local, "ENG");
        assert_eq!(composite.parent_ref().unwrap().local, "ENG");
        assert_eq!(composite.parent_ref().unwrap().country, Some("GB"));
        assert_eq!(bare.parent_ref().unwrap().country, None);
    }

    #[test]
    fn test_blank_parent_is_top_level() {
        assert!(record("US-CA", None).parent_ref().is_none());
        assert!(record("US-CA", Some("  ")).parent_ref().is_none());
    }

    #[test]
    fn test_empty_strings_deserialize_as_none() {
        let json = r#"{"code":"US-CA","name":"California","local_name":"","language_code":"","parent":"","type":"State"}"#;
        let r: SubdivisionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.local_name, None);
        assert_eq!(r.parent, None);
        assert_eq!(r.kind, "State");
    }

    #[test]
    fn test_name_key_is_unicode_uppercase() {
        assert_eq!(name_key("Île-de-France"), "ÎLE-DE-FRANCE");
        assert_eq!(name_key("Baden-Württemberg"), "BADEN-WÜRTTEMBERG");
    }

    #[test]
    fn test_matches_local_name() {
        let mut node = NameIndexNode::from_record(&record("JP-13", None));
        node.name = "Tokyo".to_string();
        node.local_name = Some("Tôkyô".to_string());

        assert!(node.matches_name("TOKYO"));
        assert!(node.matches_name("TÔKYÔ"));
        assert!(!node.matches_name("OSAKA"));
    }
}
