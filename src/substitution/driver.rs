//! Driver for the substitution stage.
//!
//! This module coordinates the registered node-kind strategies over one
//! topology: configuration lookup, candidate resolution, dispatch to the
//! service or specific replacement path, and publication of the
//! before/after snapshot maps into the execution cache.

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{info, warn};

use super::strategy::SubstitutionStrategy;
use super::{StageOutcome, StageReport};
use crate::catalog::TypeCatalog;
use crate::context::{ExecutionContext, Task, TaskCode};
use crate::error::{Error, Result};
use crate::matching::MatchingConfiguration;
use crate::merge::merge_properties;
use crate::resources::{CandidateResource, ResourceStore};
use crate::suggestions;
use crate::template::{Template, Topology};

/// Kind-agnostic driver of the substitution stage.
///
/// Holds one strategy per node kind plus shared handles to the candidate
/// store and the type catalog. Strategies run in registration order; each
/// one reads its own configuration and publishes its own cache entries, so
/// their effects never overlap.
pub struct SubstitutionDriver {
    strategies: Vec<Box<dyn SubstitutionStrategy>>,
    store: Arc<dyn ResourceStore>,
    catalog: Arc<dyn TypeCatalog>,
}

impl SubstitutionDriver {
    /// Create a driver with no strategies.
    pub fn new(store: Arc<dyn ResourceStore>, catalog: Arc<dyn TypeCatalog>) -> Self {
        Self {
            strategies: Vec::new(),
            store,
            catalog,
        }
    }

    /// Register a strategy. Strategies run in registration order.
    pub fn register(&mut self, strategy: Box<dyn SubstitutionStrategy>) {
        self.strategies.push(strategy);
    }

    /// Run every registered strategy against the topology.
    ///
    /// # Arguments
    ///
    /// * `topology` - The topology to rewrite in place
    /// * `context` - The run's shared context: configurations, candidate
    ///   maps, cache, diagnostic sink
    ///
    /// # Returns
    ///
    /// One `StageReport` per registered strategy, in registration order.
    ///
    /// # Errors
    ///
    /// Fails on the first unresolvable candidate id, missing topology node,
    /// failed template fetch, or failed type resolution. Substitutions
    /// applied before the failure stay applied; no snapshots are published
    /// for the failing strategy.
    pub fn apply(
        &self,
        topology: &mut Topology,
        context: &mut ExecutionContext,
    ) -> Result<Vec<StageReport>> {
        let mut reports = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let outcome = self.apply_strategy(strategy.as_ref(), topology, context)?;
            reports.push(StageReport {
                stage: strategy.stage_key().to_string(),
                outcome,
            });
        }
        Ok(reports)
    }

    /// Run a single strategy: resolve its configuration, process every
    /// confirmed substitution, publish the snapshot maps.
    fn apply_strategy(
        &self,
        strategy: &dyn SubstitutionStrategy,
        topology: &mut Topology,
        context: &mut ExecutionContext,
    ) -> Result<StageOutcome> {
        let stage = strategy.stage_key();

        // A missing configuration is a pipeline-ordering defect or a
        // deployment without a location policy, not a hard error: report
        // and leave the topology alone.
        let matched = match context.configuration::<MatchingConfiguration>(stage) {
            Some(configuration) => configuration.matched.clone(),
            None => {
                warn!("{}: no matching configuration, skipping substitution", stage);
                context.report_task(Task::new(
                    TaskCode::LocationPolicy,
                    stage,
                    "no matching configuration for this stage",
                ));
                return Ok(StageOutcome::Skipped {
                    reason: "missing matching configuration".to_string(),
                });
            }
        };

        let candidates: IndexMap<String, CandidateResource> = context
            .cache()
            .get::<IndexMap<String, CandidateResource>>(&strategy.candidates_cache_key())
            .cloned()
            .unwrap_or_default();

        let mut original_templates: IndexMap<String, Template> = IndexMap::new();
        let mut replaced_templates: IndexMap<String, Template> = IndexMap::new();

        for (template_id, candidate_id) in &matched {
            let candidate = candidates.get(candidate_id).ok_or_else(|| {
                let known: Vec<&str> = candidates.keys().map(String::as_str).collect();
                Error::CandidateNotFound {
                    candidate_id: candidate_id.clone(),
                    stage: stage.to_string(),
                    suggestion: suggestions::find_similar(candidate_id, &known)
                        .map(str::to_string),
                }
            })?;

            let original =
                topology
                    .node(template_id)
                    .cloned()
                    .ok_or_else(|| Error::TemplateNotFound {
                        template_id: template_id.clone(),
                        stage: stage.to_string(),
                    })?;
            original_templates.insert(template_id.clone(), original.clone());

            if candidate.is_service {
                strategy.replace_service(
                    topology,
                    template_id,
                    candidate_id,
                    self.store.as_ref(),
                )?;
            } else {
                let shadowed =
                    self.replace_specific(strategy, topology, template_id, &original, candidate)?;
                if !shadowed.is_empty() {
                    let keys = shadowed.iter().cloned().collect::<Vec<_>>().join(", ");
                    warn!(
                        "{}: '{}' kept candidate values over topology properties: {}",
                        stage, template_id, keys
                    );
                    context.report_task(Task::new(
                        TaskCode::ShadowedProperties,
                        stage,
                        format!("'{}' kept candidate values for: {}", template_id, keys),
                    ));
                }
            }

            let replaced =
                topology
                    .node(template_id)
                    .cloned()
                    .ok_or_else(|| Error::TemplateNotFound {
                        template_id: template_id.clone(),
                        stage: stage.to_string(),
                    })?;
            replaced_templates.insert(template_id.clone(), replaced);
        }

        let substituted = replaced_templates.len();
        context
            .cache_mut()
            .put(strategy.original_cache_key(), original_templates);
        context
            .cache_mut()
            .put(strategy.replaced_cache_key(), replaced_templates);
        info!("{}: substituted {} node(s)", stage, substituted);

        Ok(StageOutcome::Applied { substituted })
    }

    /// Replace a node with a location-specific resource template.
    ///
    /// Builds the finished replacement off to the side, then swaps it in
    /// with a single map operation, so a failure part-way leaves the node
    /// untouched. Returns the keys the property merge shadowed.
    fn replace_specific(
        &self,
        strategy: &dyn SubstitutionStrategy,
        topology: &mut Topology,
        node_id: &str,
        displaced: &Template,
        candidate: &CandidateResource,
    ) -> Result<BTreeSet<String>> {
        let mut replacement = self.store.fresh_template(&candidate.id)?;

        // Validates that the candidate's effective type exists; the merge
        // itself stays schema-agnostic.
        self.catalog
            .resolve(strategy.type_kind(), &replacement.type_name)?;

        replacement.name = displaced.name.clone();

        let target = std::mem::take(&mut replacement.properties);
        let merged = merge_properties(&displaced.properties, target, true);
        replacement.properties = merged.properties.unwrap_or_default();
        let mut shadowed = merged.shadowed;

        replacement.tags = displaced.tags.clone();

        strategy.finish_specific(&mut replacement, displaced, &mut shadowed);

        topology
            .replace_existing(node_id, replacement)
            .ok_or_else(|| Error::TemplateNotFound {
                template_id: node_id.to_string(),
                stage: strategy.stage_key().to_string(),
            })?;

        Ok(shadowed)
    }
}
