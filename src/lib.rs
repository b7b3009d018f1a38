//! # Topology Substitution Engine
//!
//! This library implements the substitution stage of a deployment pipeline:
//! it takes a deployment topology whose nodes reference abstract resource
//! templates, plus the user-confirmed matches between those nodes and the
//! concrete resources a location offers, and rewrites the topology in place
//! so every matched node carries its concrete replacement. It is designed to
//! be embedded in a larger deployment engine but is usable on its own.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use indexmap::IndexMap;
//! use toposub::catalog::{InMemoryTypeCatalog, TypeDefinition, TypeKind};
//! use toposub::context::ExecutionContext;
//! use toposub::matching::MatchingConfiguration;
//! use toposub::resources::{CandidateResource, InMemoryResourceStore};
//! use toposub::substitution::{ComputeNodes, SubstitutionDriver};
//! use toposub::template::{PropertyValue, Template, Topology};
//!
//! // A topology with one abstract compute node
//! let mut topology = Topology::new();
//! let mut web = Template::new("my.nodes.Compute", "frontend");
//! web.properties
//!     .insert("mem_size".to_string(), Some(PropertyValue::scalar("4 GB")));
//! topology.insert("web", web);
//!
//! // A concrete candidate offered by the target location
//! let mut offered = Template::new("my.nodes.AwsCompute", "aws-small");
//! offered.properties.insert("mem_size".to_string(), None);
//! let candidate = CandidateResource::new("aws-small", offered);
//!
//! let mut store = InMemoryResourceStore::new();
//! store.register(candidate.clone());
//! let mut catalog = InMemoryTypeCatalog::new();
//! catalog.register(TypeKind::Node, TypeDefinition::new("my.nodes.AwsCompute"));
//!
//! // The match the user confirmed, plus the candidate map an earlier
//! // stage left in the execution cache
//! let mut configuration = MatchingConfiguration::new();
//! configuration.confirm("web", "aws-small");
//! let mut context = ExecutionContext::new();
//! context.save_configuration("ComputeNodes", configuration);
//! let mut candidates = IndexMap::new();
//! candidates.insert("aws-small".to_string(), candidate);
//! context.cache_mut().put("ComputeNodes.candidates", candidates);
//!
//! // Run the substitution stage
//! let mut driver = SubstitutionDriver::new(Arc::new(store), Arc::new(catalog));
//! driver.register(Box::new(ComputeNodes));
//! let reports = driver.apply(&mut topology, &mut context).unwrap();
//!
//! assert!(reports[0].is_applied());
//! let web = topology.node("web").unwrap();
//! assert_eq!(web.type_name, "my.nodes.AwsCompute");
//! assert_eq!(web.name, "frontend");
//! assert_eq!(web.properties["mem_size"], Some(PropertyValue::scalar("4 GB")));
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Data Model (`template`)**: The topology graph, its node templates,
//!   and the insertion-ordered property maps they carry.
//! - **Matching (`matching`)**: The immutable per-run record of which
//!   candidate the user confirmed for each matched node.
//! - **Substitution (`substitution`)**: The driver and the per-node-kind
//!   strategies that rewrite matched nodes, either by linking a running
//!   service or by copying in a location-specific template.
//! - **Property Merge (`merge`)**: The target-wins resolver that combines
//!   topology and candidate properties and reports the shadowed keys.
//! - **Collaborators (`catalog`, `resources`)**: Trait contracts for the
//!   type catalog and the candidate store, with in-memory implementations.
//! - **Run State (`context`)**: The execution context each run owns: typed
//!   configurations, the execution cache, and the diagnostic task sink.
//!
//! ## Execution Flow
//!
//! The `substitution::SubstitutionDriver` runs each registered strategy
//! through the following high-level steps:
//!
//! 1.  **Configuration Lookup**: Find the strategy's matching configuration
//!     in the execution context; skip the strategy (with a diagnostic) when
//!     it is absent.
//! 2.  **Candidate Resolution**: Resolve every confirmed candidate id
//!     against the candidate map in the execution cache.
//! 3.  **Pre-Snapshot**: Capture each matched node before replacement.
//! 4.  **Replacement**: Dispatch to the service path or the specific path;
//!     the specific path merges properties and preserves node identity.
//! 5.  **Post-Snapshot**: Capture each node after replacement.
//! 6.  **Publication**: Publish both snapshot maps into the execution cache
//!     under the strategy's stage-specific keys.
//!
//! Later pipeline stages consume the published snapshots for rendering,
//! diffing, and rollback; the `pipeline` module defines the stage contract
//! they all share.

pub mod catalog;
pub mod context;
pub mod error;
pub mod matching;
pub mod merge;
pub mod pipeline;
pub mod resources;
pub mod substitution;
pub mod suggestions;
pub mod template;

#[cfg(test)]
mod merge_proptest;
