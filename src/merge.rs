//! # Property Merge Resolver
//!
//! Merges two independently authored property sets: the properties the
//! topology author put on the matched template (the *source*) and the
//! properties the candidate template carries (the *target*).
//!
//! ## Semantics
//!
//! - Target wins: a key set on both sides keeps the target value; the
//!   source key is recorded as shadowed when its value was non-null.
//! - Source fills gaps: keys the target lacks are copied over, explicit
//!   nulls included.
//! - With `override_null`, an explicitly null target value counts as a gap
//!   and is overwritten by the source entry.
//! - The merge is total: every key from either side appears in the result.
//!
//! The resolver is schema-agnostic. Structured values (lists, nested
//! mappings, function references) are copied or shadowed as opaque wholes,
//! never merged element by element against their entry schema; the
//! candidate's type is resolved before merging only to validate that it
//! exists.

use std::collections::BTreeSet;

use log::debug;

use crate::template::{PropertyMap, PropertyValue};

/// Result of merging two property maps
#[derive(Debug, Clone, PartialEq)]
pub struct MergedProperties {
    /// The merged mapping, or `None` when it came out empty
    pub properties: Option<PropertyMap>,
    /// Source keys whose values were kept out by target precedence
    pub shadowed: BTreeSet<String>,
}

/// Merge source properties into a target map, target wins.
///
/// Target entries keep their map positions; source entries that fill gaps
/// are appended in source order.
///
/// # Arguments
///
/// * `source` - Properties from the displaced topology template
/// * `target` - Properties of the replacement, consumed and returned merged
/// * `override_null` - Whether an explicitly null target value counts as a
///   gap for the source to fill
///
/// # Returns
///
/// The merged mapping (`None` when empty) and the set of shadowed source
/// keys.
pub fn merge_properties(
    source: &PropertyMap,
    target: PropertyMap,
    override_null: bool,
) -> MergedProperties {
    let mut merged = target;
    let mut shadowed = BTreeSet::new();

    for (key, value) in source {
        let target_is_null = matches!(merged.get(key), Some(None));
        if !merged.contains_key(key) || (override_null && target_is_null) {
            merged.insert(key.clone(), value.clone());
        } else if value.is_some() {
            debug!(
                "Keeping target value for '{}': {} shadowed by {}",
                key,
                value_kind_name(value.as_ref()),
                value_kind_name(merged.get(key).and_then(|v| v.as_ref()))
            );
            shadowed.insert(key.clone());
        }
    }

    let properties = if merged.is_empty() { None } else { Some(merged) };
    MergedProperties {
        properties,
        shadowed,
    }
}

/// Get a human-readable kind name for a property value
///
/// Used for logging and error messages to describe the shape of a value.
pub fn value_kind_name(value: Option<&PropertyValue>) -> &'static str {
    match value {
        None => "Null",
        Some(PropertyValue::Scalar(_)) => "Scalar",
        Some(PropertyValue::List(_)) => "List",
        Some(PropertyValue::Reference(_)) => "Reference",
        Some(PropertyValue::Complex(_)) => "Complex",
    }
}
