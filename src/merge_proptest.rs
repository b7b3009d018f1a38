//! Property-based tests for the property merge resolver.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::merge_properties;
    use crate::template::{PropertyMap, PropertyValue};
    use proptest::prelude::*;

    /// Strategy producing small property maps with scalar and explicit-null
    /// values under short lowercase keys, so key collisions between the two
    /// sides actually happen.
    fn property_map() -> impl Strategy<Value = PropertyMap> {
        prop::collection::vec(("[a-d]{1,2}", prop::option::of("[a-z0-9]{1,4}")), 0..6).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.map(PropertyValue::scalar)))
                    .collect()
            },
        )
    }

    // ============================================================================
    // merge_properties property tests
    // ============================================================================

    proptest! {
        /// Property: the merge is total - every key from either side appears
        /// in the result
        #[test]
        fn merge_is_total(source in property_map(), target in property_map()) {
            let result = merge_properties(&source, target.clone(), true);
            let merged = result.properties.unwrap_or_default();

            for key in source.keys() {
                prop_assert!(merged.contains_key(key), "Source key '{}' missing from result", key);
            }
            for key in target.keys() {
                prop_assert!(merged.contains_key(key), "Target key '{}' missing from result", key);
            }
            prop_assert!(merged.len() <= source.len() + target.len());
        }

        /// Property: without override_null, every target entry survives
        /// unchanged
        #[test]
        fn target_precedence_without_override(source in property_map(), target in property_map()) {
            let result = merge_properties(&source, target.clone(), false);
            let merged = result.properties.unwrap_or_default();

            for (key, value) in &target {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }

        /// Property: with override_null, non-null target entries survive
        /// unchanged
        #[test]
        fn non_null_target_entries_always_survive(source in property_map(), target in property_map()) {
            let result = merge_properties(&source, target.clone(), true);
            let merged = result.properties.unwrap_or_default();

            for (key, value) in &target {
                if value.is_some() {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
        }

        /// Property: keys only the source has are copied over verbatim
        #[test]
        fn source_fills_gaps(source in property_map(), target in property_map()) {
            let result = merge_properties(&source, target.clone(), true);
            let merged = result.properties.unwrap_or_default();

            for (key, value) in &source {
                if !target.contains_key(key) {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
        }

        /// Property: shadowed keys come from the source, with non-null
        /// source values, and kept their target value
        #[test]
        fn shadowed_keys_are_non_null_source_keys(source in property_map(), target in property_map()) {
            let result = merge_properties(&source, target.clone(), true);
            let merged = result.properties.unwrap_or_default();

            for key in &result.shadowed {
                prop_assert!(source.contains_key(key));
                prop_assert!(source[key].is_some(), "Null source value shadowed at '{}'", key);
                prop_assert_eq!(merged.get(key), target.get(key));
            }
        }

        /// Property: merging is deterministic
        #[test]
        fn merge_is_deterministic(source in property_map(), target in property_map()) {
            let first = merge_properties(&source, target.clone(), true);
            let second = merge_properties(&source, target, true);

            prop_assert_eq!(first, second);
        }

        /// Property: the result is None exactly when both inputs are empty
        #[test]
        fn empty_result_only_from_empty_inputs(source in property_map(), target in property_map()) {
            let both_empty = source.is_empty() && target.is_empty();
            let result = merge_properties(&source, target, true);

            prop_assert_eq!(result.properties.is_none(), both_empty);
        }

        /// Property: merging a map into itself leaves the mapping unchanged,
        /// and every non-null entry collides with itself
        #[test]
        fn self_merge_keeps_mapping_unchanged(map in property_map()) {
            let result = merge_properties(&map, map.clone(), true);

            prop_assert_eq!(result.properties.unwrap_or_default(), map.clone());
            let expected: std::collections::BTreeSet<String> = map
                .iter()
                .filter(|(_, v)| v.is_some())
                .map(|(k, _)| k.clone())
                .collect();
            prop_assert_eq!(result.shadowed, expected);
        }
    }
}
