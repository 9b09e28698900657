//! Builder records and the field-by-field merge
//!
//! A [`Builder`] describes one kind of build or test job. Mixins and the
//! global defaults record are builder-shaped partial templates, so this
//! one type covers all three roles.
//!
//! [`merge_builder`] composes an incoming record into a base record.
//! Instead of a reflective structural merge, every field has an explicit
//! policy: singular fields are overwritten when set on the incoming
//! side, `experiments` is concatenated, and dimensions, tags, caches,
//! and the recipe each have custom canonicalizing handling. The staging
//! matters: dimensions and the recipe are composed before the plain
//! field overlay and re-applied after it, so the composed values are
//! what survives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dimension::{format_dimensions, parse_dimensions};
use crate::error::{Error, Result};
use crate::recipe::{merge_recipe, Recipe};

/// A named cache mounted on the execution agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cache name, unique within one builder after flattening.
    pub name: String,
    /// Mount path relative to the task root.
    #[serde(default)]
    pub path: String,
    /// Seconds a scheduled task may wait for an agent with a warm cache.
    #[serde(default)]
    pub wait_for_warm_cache_secs: u32,
}

/// One kind of build or test job, possibly still referencing mixins
///
/// All fields are optional so the same type serves as a partial
/// template. After flattening, the set-like fields are canonical:
/// dimension keys are unique, `swarming_tags` is deduplicated and
/// sorted, `caches` is unique by name and sorted by name, and `mixins`
/// is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Builder {
    /// Builder name. Mixins and defaults normally leave this unset.
    pub name: Option<String>,
    /// Display category for console grouping.
    pub category: Option<String>,
    /// Hostname of the swarming instance the builder runs on.
    pub swarming_host: Option<String>,
    /// Service account the task runs as.
    pub service_account: Option<String>,
    /// Task scheduling priority; lower runs sooner.
    pub priority: Option<u32>,
    /// Seconds the task may execute before it is killed.
    pub execution_timeout_secs: Option<u32>,
    /// Seconds a scheduled task may sit unassigned before it expires.
    pub expiration_secs: Option<u32>,
    /// Whether consecutive builds get monotonic build numbers.
    pub build_numbers: Option<bool>,
    /// Whether the builder is experimental.
    pub experimental: Option<bool>,
    /// Encoded dimension entries, keys unique after flattening.
    pub dimensions: Vec<String>,
    /// Swarming task tags, deduplicated and sorted after flattening.
    pub swarming_tags: Vec<String>,
    /// Named caches, unique by name and sorted by name after
    /// flattening.
    pub caches: Vec<CacheEntry>,
    /// Enabled experiment names. Concatenated on merge, never
    /// deduplicated; consumers treat this as a bag.
    pub experiments: Vec<String>,
    /// Recipe the builder runs.
    pub recipe: Option<Recipe>,
    /// Ordered mixin references. Empty once the builder is flattened.
    pub mixins: Vec<String>,
}

impl Builder {
    /// The builder's name, or a placeholder for unnamed templates.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Merge `incoming` into `base` field by field.
///
/// `base` becomes the merged record; `incoming` is left unchanged.
/// Singular fields are overwritten when set on `incoming`,
/// `experiments` is concatenated, and the set-like fields are
/// re-canonicalized: dimension keys stay unique with `incoming` winning
/// on collisions, `swarming_tags` ends deduplicated and sorted, and
/// `caches` ends unique by name (last writer wins) and sorted by name.
/// A recipe on either side is composed through [`merge_recipe`], so
/// `incoming`'s properties overlay `base`'s rather than replacing the
/// record wholesale.
///
/// Both sides must already be free of mixin references.
///
/// # Errors
///
/// Returns `Error::UnresolvedMixins` if either side still references
/// mixins, and propagates codec errors from the dimension and recipe
/// layers.
pub fn merge_builder(base: &mut Builder, incoming: &Builder) -> Result<()> {
    ensure_resolved(base)?;
    ensure_resolved(incoming)?;

    // Composed before the plain overlay, re-applied after it.
    let mut dimensions = parse_dimensions(&base.dimensions)?;
    for (key, dimension) in parse_dimensions(&incoming.dimensions)? {
        dimensions.insert(key, dimension);
    }

    let recipe = if base.recipe.is_some() || incoming.recipe.is_some() {
        let mut recipe = base.recipe.clone().unwrap_or_default();
        let incoming_recipe = incoming.recipe.clone().unwrap_or_default();
        merge_recipe(&mut recipe, &incoming_recipe)?;
        Some(recipe)
    } else {
        None
    };

    overwrite_if_set(&mut base.name, &incoming.name);
    overwrite_if_set(&mut base.category, &incoming.category);
    overwrite_if_set(&mut base.swarming_host, &incoming.swarming_host);
    overwrite_if_set(&mut base.service_account, &incoming.service_account);
    overwrite_if_set(&mut base.priority, &incoming.priority);
    overwrite_if_set(&mut base.execution_timeout_secs, &incoming.execution_timeout_secs);
    overwrite_if_set(&mut base.expiration_secs, &incoming.expiration_secs);
    overwrite_if_set(&mut base.build_numbers, &incoming.build_numbers);
    overwrite_if_set(&mut base.experimental, &incoming.experimental);
    base.experiments.extend(incoming.experiments.iter().cloned());
    base.swarming_tags.extend(incoming.swarming_tags.iter().cloned());
    base.caches.extend(incoming.caches.iter().cloned());

    base.dimensions = format_dimensions(&dimensions);
    base.swarming_tags.sort();
    base.swarming_tags.dedup();
    base.caches = dedup_caches(std::mem::take(&mut base.caches));
    if recipe.is_some() {
        base.recipe = recipe;
    }
    Ok(())
}

fn overwrite_if_set<T: Clone>(base: &mut Option<T>, incoming: &Option<T>) {
    if incoming.is_some() {
        *base = incoming.clone();
    }
}

/// Keep one cache per name, last writer wins, sorted by name.
fn dedup_caches(caches: Vec<CacheEntry>) -> Vec<CacheEntry> {
    let mut by_name: BTreeMap<String, CacheEntry> = BTreeMap::new();
    for cache in caches {
        by_name.insert(cache.name.clone(), cache);
    }
    by_name.into_values().collect()
}

fn ensure_resolved(builder: &Builder) -> Result<()> {
    if builder.mixins.is_empty() {
        return Ok(());
    }
    Err(Error::UnresolvedMixins {
        builder: builder.display_name().to_string(),
        mixins: builder.mixins.join(", "),
    })
}
