//! # Topology Data Model
//!
//! This module defines the data structures that represent a deployment
//! topology: a graph of named resource templates, each carrying a type
//! reference, display name, properties, capabilities, and ordered metadata
//! tags.
//!
//! ## Key Components
//!
//! - **`Topology`**: An insertion-ordered map of node id to `Template`.
//!   Substitution rewrites it in place through `replace_existing`, which
//!   swaps the value at an existing key while keeping the key's position
//!   and never inserts at a missing key.
//!
//! - **`Template`**: A single node of the topology. Value-like: every
//!   template handed out for substitution is an independent copy, so
//!   mutating one never aliases another.
//!
//! - **`PropertyValue`** and **`PropertyMap`**: Property values are a tagged
//!   union of scalar, list, complex (nested mapping), and function-reference
//!   shapes. The map keeps `Option<PropertyValue>` values so an explicitly
//!   null property (key present, value absent) stays distinguishable from a
//!   missing key; both states matter to the merge resolver.
//!
//! ## Serialization
//!
//! All types derive `Serialize`/`Deserialize` so topologies can be loaded
//! from YAML documents and snapshotted back out. `PropertyValue` is
//! untagged: scalars, sequences, and mappings deserialize to the matching
//! variant, and a mapping with a `function` field deserializes as a
//! `Reference`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single metadata tag on a template.
///
/// Tags are kept as an ordered list, not a map: the original order is
/// significant and duplicate keys are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (e.g., "substitution.service-id")
    pub key: String,
    /// Tag payload
    pub value: String,
}

impl Tag {
    /// Create a tag from anything string-like.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An opaque pointer to a value resolved later in the pipeline
/// (e.g. `get_input` or `get_attribute`).
///
/// References pass through the merge untouched; nothing in this crate
/// evaluates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRef {
    /// Function name (e.g., "get_input")
    pub function: String,
    /// Positional arguments to the function
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// A property value attached to a template or capability.
///
/// Untagged on the wire: variant order matters because serde tries them
/// top to bottom. `Reference` sits before `Complex` so a mapping carrying
/// a `function` field is read as a reference rather than a nested value
/// mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A plain scalar, always carried as text
    Scalar(String),
    /// An ordered list of nested values
    List(Vec<PropertyValue>),
    /// A function reference, passed through unevaluated
    Reference(FunctionRef),
    /// A nested mapping of named values
    Complex(IndexMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Convenience constructor for the common scalar case.
    pub fn scalar(value: impl Into<String>) -> Self {
        PropertyValue::Scalar(value.into())
    }
}

/// Property mapping with explicit-null support.
///
/// `Some(value)` is a set property, `None` a property whose key exists but
/// whose value was left null. A missing key is a third, distinct state.
pub type PropertyMap = IndexMap<String, Option<PropertyValue>>;

/// A named capability exposed by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Name of the capability type in the catalog
    #[serde(rename = "type")]
    pub type_name: String,
    /// Capability properties
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Capability {
    /// Create a capability of the given type with no properties.
    pub fn new(type_name: impl Into<String>) -> Self {
        Capability {
            type_name: type_name.into(),
            properties: PropertyMap::new(),
        }
    }
}

/// A single node of the topology.
///
/// The node id is the topology key and is not stored here; a template moved
/// between topologies keeps no memory of its old id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Name of the resource type this template instantiates, resolved
    /// against the type catalog.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Display label, preserved across substitution.
    pub name: String,
    /// Template properties.
    #[serde(default)]
    pub properties: PropertyMap,
    /// Capabilities by capability name.
    #[serde(default)]
    pub capabilities: IndexMap<String, Capability>,
    /// Ordered metadata tags, preserved across substitution.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Template {
    /// Create an empty template of the given type.
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Template {
            type_name: type_name.into(),
            name: name.into(),
            properties: PropertyMap::new(),
            capabilities: IndexMap::new(),
            tags: Vec::new(),
        }
    }

    /// Look up the value of the first tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }
}

/// A deployment topology: node id to template, insertion ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topology {
    nodes: IndexMap<String, Template>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Topology::default()
    }

    /// Add a node, replacing and returning any previous template at the id.
    pub fn insert(&mut self, id: impl Into<String>, template: Template) -> Option<Template> {
        self.nodes.insert(id.into(), template)
    }

    /// Borrow the template at a node id.
    pub fn node(&self, id: &str) -> Option<&Template> {
        self.nodes.get(id)
    }

    /// Swap the template at an existing node id, returning the displaced
    /// template.
    ///
    /// The node keeps its position in the map. Returns `None` without
    /// touching the topology when the id is unknown; this method never
    /// inserts.
    pub fn replace_existing(&mut self, id: &str, template: Template) -> Option<Template> {
        match self.nodes.get_mut(id) {
            Some(slot) => Some(std::mem::replace(slot, template)),
            None => None,
        }
    }

    /// Whether a node id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the topology has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Template)> {
        self.nodes.iter()
    }

    /// Node ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }
}
