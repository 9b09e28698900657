//! Recipe records and property canonicalization
//!
//! A recipe carries two alternate property encodings: plain-string
//! entries (`"name:literal-string"`) and JSON entries
//! (`"name:json-value"`). Readers always see a single name to value
//! mapping, and after any merge the record is converged to the JSON
//! encoding alone, sorted by name, with `null` values dropped. The
//! converged form is independent of how many layers contributed
//! properties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Parameterized description of the build steps a builder runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    /// Recipe name within its bundle.
    pub name: Option<String>,
    /// CIPD package the recipe bundle is fetched from.
    pub cipd_package: Option<String>,
    /// CIPD version of the recipe bundle.
    pub cipd_version: Option<String>,
    /// Plain-string properties, `"name:value"` with the value taken
    /// verbatim. Every merge clears this list in favor of
    /// `properties_j`.
    pub properties: Vec<String>,
    /// JSON properties, `"name:json-value"`. The canonical encoding.
    pub properties_j: Vec<String>,
}

impl Recipe {
    /// Build one property mapping from both encodings.
    ///
    /// Plain-string entries are read first, then JSON entries. Later
    /// entries overwrite earlier ones on the same name, including
    /// within a single list.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidProperty` for an entry without a `:`
    /// separator or a JSON body that fails to decode.
    pub fn read_properties(&self) -> Result<BTreeMap<String, JsonValue>> {
        let mut properties = BTreeMap::new();
        for entry in &self.properties {
            let (name, value) = split_property(entry)?;
            properties.insert(name.to_string(), JsonValue::String(value.to_string()));
        }
        for entry in &self.properties_j {
            let (name, raw) = split_property(entry)?;
            let value: JsonValue =
                serde_json::from_str(raw).map_err(|err| Error::InvalidProperty {
                    entry: entry.to_string(),
                    message: format!("invalid JSON value: {}", err),
                })?;
            properties.insert(name.to_string(), value);
        }
        Ok(properties)
    }
}

/// Split a property entry into its name and value halves.
fn split_property(entry: &str) -> Result<(&str, &str)> {
    entry.split_once(':').ok_or_else(|| Error::InvalidProperty {
        entry: entry.to_string(),
        message: "expected 'name:value'".to_string(),
    })
}

/// Merge `incoming` into `base` and re-canonicalize the properties.
///
/// The property mappings of both sides are overlaid with `incoming`
/// winning on name collisions, and the other recipe fields are
/// overwritten when set on `incoming`. Afterwards `base` carries zero
/// plain-string entries and one JSON entry per surviving name, sorted
/// by name, with `null` values dropped entirely.
///
/// # Errors
///
/// Propagates `Error::InvalidProperty` from reading either side and
/// `Error::Serialization` from re-encoding.
pub fn merge_recipe(base: &mut Recipe, incoming: &Recipe) -> Result<()> {
    let mut properties = base.read_properties()?;
    for (name, value) in incoming.read_properties()? {
        properties.insert(name, value);
    }

    if incoming.name.is_some() {
        base.name = incoming.name.clone();
    }
    if incoming.cipd_package.is_some() {
        base.cipd_package = incoming.cipd_package.clone();
    }
    if incoming.cipd_version.is_some() {
        base.cipd_version = incoming.cipd_version.clone();
    }

    base.properties.clear();
    base.properties_j = encode_properties(&properties)?;
    Ok(())
}

/// Encode a property mapping as `"name:json-value"` entries, sorted by
/// name, skipping `null` values.
fn encode_properties(properties: &BTreeMap<String, JsonValue>) -> Result<Vec<String>> {
    let mut encoded = Vec::with_capacity(properties.len());
    for (name, value) in properties {
        if value.is_null() {
            continue;
        }
        let body = serde_json::to_string(value).map_err(|err| Error::Serialization {
            message: format!("failed to encode property '{}': {}", name, err),
        })?;
        encoded.push(format!("{}:{}", name, body));
    }
    Ok(encoded)
}
