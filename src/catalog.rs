//! # Type Catalog
//!
//! Read-only catalog of resource type definitions, resolved on demand with
//! inherited properties flattened across the supertype chain.
//!
//! ## Key Components
//!
//! - **`TypeCatalog`**: The collaborator trait the substitution driver
//!   resolves candidate types against. Hosting systems back it with their
//!   own catalog; `InMemoryTypeCatalog` is the reference implementation.
//!
//! - **`TypeDefinition`**: A catalog entry: property schema plus the name of
//!   the immediate supertype (`derived_from`).
//!
//! - **`TypeKind`**: Namespace discriminator. Node and data types live in
//!   separate namespaces, so the same name can exist in both without
//!   colliding.
//!
//! ## Resolution
//!
//! `resolve` walks the `derived_from` chain from the requested type up to
//! the root, collecting property definitions. The subtype wins on name
//! collisions. Unknown type names anywhere in the chain and inheritance
//! cycles both fail with `Error::TypeResolution`.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Catalog namespace a type name is resolved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Deployable node types (compute, network, storage, ...)
    Node,
    /// Data types referenced from property schemas
    Data,
}

/// Shape of a single property as declared by its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Scalar,
    List,
    Map,
}

/// Schema of one declared property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Value shape
    pub kind: PropertyKind,
    /// Element schema for `List`/`Map` properties
    #[serde(default)]
    pub entry_schema: Option<Box<PropertyDefinition>>,
}

impl PropertyDefinition {
    /// A scalar property with no element schema.
    pub fn scalar() -> Self {
        PropertyDefinition {
            kind: PropertyKind::Scalar,
            entry_schema: None,
        }
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Fully qualified type name (e.g., "my.nodes.Compute")
    pub name: String,
    /// Immediate supertype, if any
    #[serde(default)]
    pub derived_from: Option<String>,
    /// Properties declared directly on this type
    #[serde(default)]
    pub properties: IndexMap<String, PropertyDefinition>,
}

impl TypeDefinition {
    /// Create a root type with no declared properties.
    pub fn new(name: impl Into<String>) -> Self {
        TypeDefinition {
            name: name.into(),
            derived_from: None,
            properties: IndexMap::new(),
        }
    }
}

/// Catalog lookup contract.
///
/// `resolve` returns the effective definition of a type: its own entry with
/// `properties` flattened across the whole `derived_from` chain.
pub trait TypeCatalog: Send + Sync {
    fn resolve(&self, kind: TypeKind, type_name: &str) -> Result<TypeDefinition>;
}

/// Catalog key combining namespace and type name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TypeKey {
    kind: TypeKind,
    name: String,
}

impl TypeKey {
    fn new(kind: TypeKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

/// In-memory reference implementation of `TypeCatalog`
#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeCatalog {
    types: HashMap<TypeKey, TypeDefinition>,
}

impl InMemoryTypeCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type definition under a namespace, replacing any previous
    /// entry with the same name.
    pub fn register(&mut self, kind: TypeKind, definition: TypeDefinition) {
        self.types
            .insert(TypeKey::new(kind, &definition.name), definition);
    }

    /// Number of registered definitions across all namespaces.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeCatalog for InMemoryTypeCatalog {
    fn resolve(&self, kind: TypeKind, type_name: &str) -> Result<TypeDefinition> {
        let mut flattened: IndexMap<String, PropertyDefinition> = IndexMap::new();
        let mut chain: Vec<String> = Vec::new();
        let mut derived_from = None;
        let mut current = Some(type_name.to_string());

        while let Some(name) = current {
            if chain.contains(&name) {
                chain.push(name);
                return Err(Error::TypeResolution {
                    type_name: type_name.to_string(),
                    message: format!("inheritance cycle: {}", chain.join(" -> ")),
                });
            }

            let definition =
                self.types
                    .get(&TypeKey::new(kind, &name))
                    .ok_or_else(|| Error::TypeResolution {
                        type_name: name.clone(),
                        message: "type is not registered in the catalog".to_string(),
                    })?;

            // Walk order is subtype first, so the first writer wins
            for (prop_name, prop_def) in &definition.properties {
                flattened
                    .entry(prop_name.clone())
                    .or_insert_with(|| prop_def.clone());
            }
            if chain.is_empty() {
                derived_from = definition.derived_from.clone();
            }
            chain.push(name);
            current = definition.derived_from.clone();
        }

        Ok(TypeDefinition {
            name: type_name.to_string(),
            derived_from,
            properties: flattened,
        })
    }
}
