//! # Execution Context
//!
//! Per-run shared state for one pipeline invocation. Every stage receives
//! the same `ExecutionContext`; nothing here is ambient or global, so
//! concurrent runs in a hosting system never observe each other.
//!
//! ## Key Components
//!
//! - **`ExecutionContext`**: Bundles the typed per-stage configuration
//!   store, the execution cache, and the diagnostic task sink.
//!
//! - **`ExecutionCache`**: String-keyed store shared across stages. Values
//!   are heterogeneous (each stage decides what it publishes), so entries
//!   are type-erased `Box<dyn Any + Send + Sync>` and retrieval is typed:
//!   `get::<T>` downcasts and returns `None` on a type mismatch exactly as
//!   on a missing key.
//!
//! - **`Task`**: Structured, non-throwing diagnostics. Stages report
//!   conditions a user must act on (a missing matching configuration,
//!   properties kept out of a merge) without aborting the run; the hosting
//!   system renders accumulated tasks after the pipeline finishes.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Category of a diagnostic task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCode {
    /// A stage ran without its matching configuration; the deployment is
    /// missing a location policy or the pipeline ran out of order
    LocationPolicy,
    /// Topology-defined properties were shadowed by candidate values and
    /// kept out of the merge result
    ShadowedProperties,
}

/// One structured diagnostic reported during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// What kind of condition this is
    pub code: TaskCode,
    /// Stage that reported it
    pub stage: String,
    /// Human-readable detail
    pub message: String,
}

impl Task {
    /// Create a task.
    pub fn new(code: TaskCode, stage: impl Into<String>, message: impl Into<String>) -> Self {
        Task {
            code,
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// String-keyed, type-erased store shared by the stages of one run
#[derive(Default)]
pub struct ExecutionCache {
    entries: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ExecutionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous entry at the key.
    pub fn put<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Retrieve a value by key and type.
    ///
    /// Returns `None` when the key is absent or holds a value of a
    /// different type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Whether a key exists, regardless of its value type.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Configuration key combining configuration type and stage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ConfigKey {
    type_id: TypeId,
    stage: String,
}

impl ConfigKey {
    fn new(type_id: TypeId, stage: &str) -> Self {
        Self {
            type_id,
            stage: stage.to_string(),
        }
    }
}

/// Shared state of one pipeline run
#[derive(Default)]
pub struct ExecutionContext {
    configurations: HashMap<ConfigKey, Box<dyn Any + Send + Sync>>,
    cache: ExecutionCache,
    tasks: Vec<Task>,
}

impl ExecutionContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a stage's configuration, keyed by configuration type and stage
    /// key. Replaces any previous configuration under the same pair.
    pub fn save_configuration<C: Any + Send + Sync>(&mut self, stage_key: &str, configuration: C) {
        self.configurations.insert(
            ConfigKey::new(TypeId::of::<C>(), stage_key),
            Box::new(configuration),
        );
    }

    /// Look up a stage's configuration by type and stage key.
    pub fn configuration<C: Any + Send + Sync>(&self, stage_key: &str) -> Option<&C> {
        self.configurations
            .get(&ConfigKey::new(TypeId::of::<C>(), stage_key))
            .and_then(|c| c.downcast_ref::<C>())
    }

    /// Borrow the execution cache.
    pub fn cache(&self) -> &ExecutionCache {
        &self.cache
    }

    /// Mutably borrow the execution cache.
    pub fn cache_mut(&mut self) -> &mut ExecutionCache {
        &mut self.cache
    }

    /// Append a diagnostic task.
    pub fn report_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Tasks reported so far, in report order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatchingConfiguration;

    #[test]
    fn test_cache_put_and_typed_get() {
        let mut cache = ExecutionCache::new();
        cache.put("count", 7usize);
        cache.put("label", "db".to_string());

        assert_eq!(cache.get::<usize>("count"), Some(&7));
        assert_eq!(cache.get::<String>("label").map(String::as_str), Some("db"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_get_with_wrong_type_is_none() {
        let mut cache = ExecutionCache::new();
        cache.put("count", 7usize);

        assert!(cache.get::<String>("count").is_none());
        assert!(cache.contains("count"));
    }

    #[test]
    fn test_cache_put_replaces_previous_value() {
        let mut cache = ExecutionCache::new();
        cache.put("slot", 1usize);
        cache.put("slot", "two".to_string());

        assert!(cache.get::<usize>("slot").is_none());
        assert_eq!(cache.get::<String>("slot").map(String::as_str), Some("two"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_configuration_is_keyed_by_type_and_stage() {
        let mut context = ExecutionContext::new();
        let mut for_nodes = MatchingConfiguration::new();
        for_nodes.confirm("db", "cand1");
        let mut for_networks = MatchingConfiguration::new();
        for_networks.confirm("net", "pub1");

        context.save_configuration("nodes", for_nodes);
        context.save_configuration("networks", for_networks);
        context.save_configuration("nodes", 42usize);

        let nodes = context
            .configuration::<MatchingConfiguration>("nodes")
            .unwrap();
        assert_eq!(nodes.matched["db"], "cand1");
        let networks = context
            .configuration::<MatchingConfiguration>("networks")
            .unwrap();
        assert_eq!(networks.matched["net"], "pub1");
        // Same stage key, different type: a separate slot
        assert_eq!(context.configuration::<usize>("nodes"), Some(&42));
    }

    #[test]
    fn test_configuration_missing_stage_is_none() {
        let context = ExecutionContext::new();
        assert!(context
            .configuration::<MatchingConfiguration>("nodes")
            .is_none());
    }

    #[test]
    fn test_tasks_accumulate_in_report_order() {
        let mut context = ExecutionContext::new();
        context.report_task(Task::new(TaskCode::LocationPolicy, "nodes", "no configuration"));
        context.report_task(Task::new(
            TaskCode::ShadowedProperties,
            "nodes",
            "db: size",
        ));

        let codes: Vec<TaskCode> = context.tasks().iter().map(|t| t.code).collect();
        assert_eq!(codes, [TaskCode::LocationPolicy, TaskCode::ShadowedProperties]);
    }
}
