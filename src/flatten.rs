//! Flattening orchestrator
//!
//! Resolves a builder to its final self-contained form. The global
//! defaults record is merged in first, then every referenced mixin in
//! listed order, and finally the builder's own original values, which
//! therefore win over everything the templates set.
//!
//! Templates are flattened as copies: the records in the [`MixinSet`]
//! and the defaults record are never mutated, so any number of builders
//! can be flattened against the same tables.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::builder::{merge_builder, Builder};
use crate::error::{Error, Result};
use crate::suggestions::mixin_not_found;

/// Name-keyed table of mixin templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MixinSet {
    mixins: BTreeMap<String, Builder>,
}

impl MixinSet {
    /// Create an empty mixin table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mixin template under `name`, replacing any previous
    /// definition.
    pub fn insert(&mut self, name: impl Into<String>, mixin: Builder) {
        self.mixins.insert(name.into(), mixin);
    }

    /// Look up a mixin template by name.
    pub fn get(&self, name: &str) -> Option<&Builder> {
        self.mixins.get(name)
    }

    /// Defined mixin names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mixins.keys().map(String::as_str)
    }

    /// Number of defined mixins.
    pub fn len(&self) -> usize {
        self.mixins.len()
    }

    /// Whether the table holds no mixins.
    pub fn is_empty(&self) -> bool {
        self.mixins.is_empty()
    }
}

impl FromIterator<(String, Builder)> for MixinSet {
    fn from_iter<I: IntoIterator<Item = (String, Builder)>>(iter: I) -> Self {
        Self {
            mixins: iter.into_iter().collect(),
        }
    }
}

/// Flatten `builder` against `defaults` and the mixin table.
///
/// `builder` is mutated in place into its self-contained form: the
/// defaults record is applied beneath every mixin, later-listed mixins
/// win over earlier ones, and the builder's own explicit values win
/// over all templates. Afterwards `builder.mixins` is empty and the
/// set-like fields are canonical.
///
/// A builder with no mixin references and no `defaults` is returned
/// unchanged. With `defaults` present the call is not idempotent:
/// fields merged by concatenation (`experiments`) are appended again on
/// every call, while the set-like fields are protected by their
/// canonicalization.
///
/// # Errors
///
/// Returns `Error::MixinNotFound` for an unknown mixin name and
/// `Error::MixinCycle` for a chain of mixin references that re-enters
/// itself; codec errors from the lower layers propagate unchanged.
pub fn flatten(builder: &mut Builder, defaults: Option<&Builder>, mixins: &MixinSet) -> Result<()> {
    let mut stack = Vec::new();
    flatten_inner(builder, defaults, mixins, &mut stack)
}

/// Flatten every builder in `builders` against one shared defaults
/// record and mixin table, stopping at the first failure.
pub fn flatten_all(
    builders: &mut [Builder],
    defaults: Option<&Builder>,
    mixins: &MixinSet,
) -> Result<()> {
    for builder in builders.iter_mut() {
        flatten(builder, defaults, mixins)?;
    }
    Ok(())
}

fn flatten_inner(
    builder: &mut Builder,
    defaults: Option<&Builder>,
    mixins: &MixinSet,
    stack: &mut Vec<String>,
) -> Result<()> {
    if defaults.is_none() && builder.mixins.is_empty() {
        return Ok(());
    }

    let referenced = std::mem::take(&mut builder.mixins);
    let original = builder.clone();
    debug!(
        "Flattening builder '{}': defaults {}, {} mixin(s)",
        original.display_name(),
        if defaults.is_some() { "present" } else { "absent" },
        referenced.len()
    );

    if let Some(defaults) = defaults {
        let mut defaults = defaults.clone();
        flatten_inner(&mut defaults, None, mixins, stack)?;
        merge_builder(builder, &defaults)?;
    }

    for name in &referenced {
        if stack.iter().any(|seen| seen == name) {
            let mut chain = stack.clone();
            chain.push(name.clone());
            return Err(Error::MixinCycle {
                cycle: chain.join(" -> "),
            });
        }
        let mut mixin = match mixins.get(name) {
            Some(mixin) => mixin.clone(),
            None => return Err(mixin_not_found(name, mixins.names())),
        };
        stack.push(name.clone());
        flatten_inner(&mut mixin, None, mixins, stack)?;
        stack.pop();
        merge_builder(builder, &mixin)?;
    }

    merge_builder(builder, &original)
}
