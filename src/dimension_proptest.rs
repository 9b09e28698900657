//! Property-based tests for the dimension codec.
//!
//! These tests use proptest to generate random dimension maps and entry
//! lists and verify that codec invariants hold for all inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::dimension::{format_dimensions, parse_dimensions, Dimension, DimensionMap};
    use proptest::prelude::*;

    /// Dimension maps with keys that can never read as an expiration
    /// prefix (they start with a letter) and values that may contain
    /// the separator.
    fn dimension_map() -> impl Strategy<Value = DimensionMap> {
        proptest::collection::btree_map(
            "[a-z][a-z0-9_-]{0,11}",
            ("[A-Za-z0-9._:-]{0,16}", 0u32..1_000_000u32),
            0..8,
        )
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(key, (value, expiration_secs))| {
                    (
                        key,
                        Dimension {
                            value,
                            expiration_secs,
                        },
                    )
                })
                .collect()
        })
    }

    proptest! {
        /// Property: formatting a map and parsing the result reproduces
        /// the map, values and expirations included.
        #[test]
        fn format_then_parse_round_trips(map in dimension_map()) {
            let formatted = format_dimensions(&map);
            let reparsed = parse_dimensions(&formatted).unwrap();
            prop_assert_eq!(reparsed, map);
        }

        /// Property: formatted output is sorted lexicographically.
        #[test]
        fn format_output_is_sorted(map in dimension_map()) {
            let formatted = format_dimensions(&map);
            let mut sorted = formatted.clone();
            sorted.sort();
            prop_assert_eq!(formatted, sorted);
        }

        /// Property: one formatted entry per key.
        #[test]
        fn format_emits_one_entry_per_key(map in dimension_map()) {
            prop_assert_eq!(format_dimensions(&map).len(), map.len());
        }

        /// Property: parsing is deterministic (same input, same output).
        #[test]
        fn parse_is_deterministic(map in dimension_map()) {
            let formatted = format_dimensions(&map);
            prop_assert_eq!(
                parse_dimensions(&formatted).unwrap(),
                parse_dimensions(&formatted).unwrap()
            );
        }

        /// Property: the last occurrence of a repeated key wins.
        #[test]
        fn parse_last_occurrence_wins(
            key in "[a-z]{1,8}",
            first in "[a-z]{0,8}",
            second in "[a-z]{0,8}",
        ) {
            let entries = vec![
                format!("{}:{}", key, first),
                format!("{}:{}", key, second),
            ];
            let parsed = parse_dimensions(&entries).unwrap();
            prop_assert_eq!(parsed[key.as_str()].value.clone(), second);
        }
    }
}
