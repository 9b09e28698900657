//! Dimension requirement codec
//!
//! A builder describes the execution agents it needs as a list of
//! dimension entries. Each entry is either `"key:value"` or
//! `"expiration:key:value"`, where the expiration is a number of seconds
//! after which the requirement lapses (0 means no expiration).
//!
//! This module parses entry lists into a [`DimensionMap`] keyed by
//! dimension name and formats such maps back into the encoded shape.
//! Formatted output is sorted, so resolved builders serialize
//! deterministically.
//!
//! A first segment made entirely of ASCII digits is always read as an
//! expiration prefix. Keys made entirely of digits are rejected: they
//! cannot be told apart from a prefix.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The value and expiration attached to one dimension key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Required value for the dimension key.
    pub value: String,
    /// Seconds until the requirement lapses; 0 means no expiration.
    #[serde(default)]
    pub expiration_secs: u32,
}

/// Resolved dimensions, keyed by dimension name
pub type DimensionMap = BTreeMap<String, Dimension>;

/// Parse a list of encoded dimension entries into a map.
///
/// Later entries win on repeated keys. The collapse is logged, since a
/// repeated key within one list usually means two layers of a template
/// were pasted together by hand.
///
/// # Errors
///
/// Returns `Error::InvalidDimension` for an entry that parses as
/// neither `key:value` nor `expiration:key:value`.
pub fn parse_dimensions(entries: &[String]) -> Result<DimensionMap> {
    let mut dimensions = DimensionMap::new();
    for entry in entries {
        let (key, dimension) = parse_entry(entry)?;
        if let Some(previous) = dimensions.insert(key.clone(), dimension) {
            warn!(
                "Duplicate dimension key '{}': dropping earlier value '{}'",
                key, previous.value
            );
        }
    }
    Ok(dimensions)
}

/// Parse one encoded dimension entry into its key and dimension.
fn parse_entry(entry: &str) -> Result<(String, Dimension)> {
    let (first, rest) = entry
        .split_once(':')
        .ok_or_else(|| invalid(entry, "expected 'key:value' or 'expiration:key:value'"))?;

    if is_all_digits(first) {
        let expiration_secs: u32 = first
            .parse()
            .map_err(|_| invalid(entry, &format!("expiration '{}' is out of range", first)))?;
        let (key, value) = rest
            .split_once(':')
            .ok_or_else(|| invalid(entry, "expiration prefix must be followed by 'key:value'"))?;
        if key.is_empty() {
            return Err(invalid(entry, "dimension key is empty"));
        }
        if is_all_digits(key) {
            return Err(invalid(
                entry,
                &format!("key '{}' is all digits, indistinguishable from an expiration", key),
            ));
        }
        Ok((
            key.to_string(),
            Dimension {
                value: value.to_string(),
                expiration_secs,
            },
        ))
    } else {
        if first.is_empty() {
            return Err(invalid(entry, "dimension key is empty"));
        }
        Ok((
            first.to_string(),
            Dimension {
                value: rest.to_string(),
                expiration_secs: 0,
            },
        ))
    }
}

/// Format a dimension map back into encoded entries.
///
/// Entries with a non-zero expiration use the `"expiration:key:value"`
/// shape. The result is sorted lexicographically by the formatted
/// string, not by key.
pub fn format_dimensions(dimensions: &DimensionMap) -> Vec<String> {
    let mut formatted: Vec<String> = dimensions
        .iter()
        .map(|(key, dimension)| {
            if dimension.expiration_secs != 0 {
                format!("{}:{}:{}", dimension.expiration_secs, key, dimension.value)
            } else {
                format!("{}:{}", key, dimension.value)
            }
        })
        .collect();
    formatted.sort();
    formatted
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn invalid(entry: &str, message: &str) -> Error {
    Error::InvalidDimension {
        entry: entry.to_string(),
        message: message.to_string(),
    }
}
