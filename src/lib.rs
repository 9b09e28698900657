//! # Mixdown
//!
//! This library flattens CI builder definitions. A builder names the
//! reusable mixin templates it composes with; `mixdown` resolves the
//! builder against those mixins and one global defaults record,
//! producing a single self-contained record with no further references.
//!
//! ## Quick Example
//!
//! ```
//! use mixdown::builder::Builder;
//! use mixdown::flatten::{flatten, MixinSet};
//!
//! let mut mixins = MixinSet::new();
//! mixins.insert(
//!     "linux",
//!     Builder {
//!         dimensions: vec!["os:Linux".to_string()],
//!         ..Default::default()
//!     },
//! );
//!
//! let mut builder = Builder {
//!     name: Some("linux-rel".to_string()),
//!     mixins: vec!["linux".to_string()],
//!     dimensions: vec!["cpu:x86-64".to_string()],
//!     ..Default::default()
//! };
//!
//! flatten(&mut builder, None, &mixins).unwrap();
//! assert!(builder.mixins.is_empty());
//! assert_eq!(builder.dimensions, vec!["cpu:x86-64", "os:Linux"]);
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Builder (`builder`)**: a named record describing one kind of
//!   build or test job, with dimensions, tags, caches, and a recipe.
//! - **Mixin**: a reusable partial builder template, referenced by name
//!   through a `flatten::MixinSet`. Mixins may reference further
//!   mixins.
//! - **Defaults**: the single global builder template applied beneath
//!   every mixin for every builder.
//! - **Dimension Codec (`dimension`)**: parses and formats the
//!   `"key:value"` / `"expiration:key:value"` requirement strings.
//! - **Recipe (`recipe`)**: property normalization and merging for the
//!   build-step description.
//!
//! ## Merge Precedence
//!
//! The orchestrator (`flatten`) merges the defaults record first, then
//! every referenced mixin in listed order, and finally re-asserts the
//! builder's own values. A field set directly on the builder always
//! beats the templates; a field set by two mixins resolves to the
//! later-listed one. Set-like fields come out deduplicated and sorted,
//! and recipe properties come out in the JSON encoding alone, sorted by
//! name, regardless of how many layers contributed them.
//!
//! Decoding configuration files into these records and consuming the
//! flattened result belong to the caller. This library performs exactly
//! the in-memory transformation, synchronously and without I/O.

pub mod builder;
pub mod dimension;
pub mod error;
pub mod flatten;
pub mod recipe;
pub mod suggestions;

#[cfg(test)]
mod dimension_proptest;
