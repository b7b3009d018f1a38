//! # Candidate Resource Store
//!
//! Collaborator contract for the store that holds substitution candidates:
//! the concrete resource templates (and externally managed services) that
//! matched templates are replaced with.
//!
//! ## Key Components
//!
//! - **`CandidateResource`**: One store entry. Carries the discriminator
//!   the driver branches on (`is_service`), the list of abstract types it
//!   can substitute for, and the template payload that gets copied into
//!   topologies.
//!
//! - **`ResourceStore`**: The lookup trait. `fresh_template` must hand back
//!   an independently owned template per call; substitution mutates the
//!   copy, so a store that returned shared state would leak edits between
//!   runs. The in-memory implementation clones on every fetch and the
//!   contract is pinned by a test.
//!
//! - **`InMemoryResourceStore`**: Reference implementation with a
//!   type-scoped listing that matching stages use to build candidate sets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::template::Template;

fn default_enabled() -> bool {
    true
}

/// One entry of the candidate store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResource {
    /// Stable candidate id, referenced by matching configurations
    pub id: String,
    /// Location this resource belongs to, when scoped to one
    #[serde(default)]
    pub location_id: Option<String>,
    /// Disabled resources are kept in the store but excluded from
    /// type-scoped listings
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Externally managed service rather than a location-specific template
    #[serde(default)]
    pub is_service: bool,
    /// Abstract type names this resource can substitute for
    #[serde(default)]
    pub supported_types: Vec<String>,
    /// The concrete template copied into topologies
    pub template: Template,
}

impl CandidateResource {
    /// Create an enabled, non-service candidate with no supported types.
    pub fn new(id: impl Into<String>, template: Template) -> Self {
        CandidateResource {
            id: id.into(),
            location_id: None,
            enabled: true,
            is_service: false,
            supported_types: Vec::new(),
            template,
        }
    }

    /// Whether this resource can substitute for the given abstract type.
    pub fn supports(&self, type_name: &str) -> bool {
        self.supported_types.iter().any(|t| t == type_name)
    }
}

/// Candidate lookup contract.
pub trait ResourceStore: Send + Sync {
    /// Look up a candidate record by id, as an owned copy.
    fn candidate(&self, id: &str) -> Result<CandidateResource>;

    /// Produce a fresh, independently owned copy of a candidate's template.
    ///
    /// Every call must return a new instance; callers mutate the result.
    fn fresh_template(&self, candidate_id: &str) -> Result<Template> {
        Ok(self.candidate(candidate_id)?.template)
    }
}

/// In-memory reference implementation of `ResourceStore`
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceStore {
    candidates: IndexMap<String, CandidateResource>,
}

impl InMemoryResourceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate, replacing any previous entry with the same id.
    pub fn register(&mut self, candidate: CandidateResource) {
        self.candidates.insert(candidate.id.clone(), candidate);
    }

    /// Enabled candidates that can substitute for a type, in registration
    /// order.
    pub fn candidates_of_type(&self, type_name: &str) -> Vec<&CandidateResource> {
        self.candidates
            .values()
            .filter(|c| c.enabled && c.supports(type_name))
            .collect()
    }

    /// Number of registered candidates, disabled ones included.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the store has no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl ResourceStore for InMemoryResourceStore {
    fn candidate(&self, id: &str) -> Result<CandidateResource> {
        self.candidates
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ResourceFetch {
                candidate_id: id.to_string(),
                message: "no such candidate in the store".to_string(),
            })
    }
}
