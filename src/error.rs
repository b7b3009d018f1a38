//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `toposub` library. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur during a substitution run. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library to simplify function signatures.
//!
//! ## Failure classification
//!
//! Only one condition is handled locally by the substitution driver: a
//! missing matching configuration, which produces a diagnostic task and a
//! skipped stage rather than an error (see `substitution::StageOutcome`).
//! Every variant below is fatal for the substitution run that raises it and
//! is surfaced to the pipeline driver, which decides whether to fail the
//! whole deployment-preparation flow:
//!
//! - A confirmed candidate id that does not resolve in the candidate map.
//! - A substituted template id that does not exist in the topology.
//! - A resource store that cannot produce a fresh template copy.
//! - A type catalog that cannot resolve a template's effective type.
//! - Configuration documents that fail to parse.

use thiserror::Error;

/// Main error type for topology substitution operations
#[derive(Error, Debug)]
pub enum Error {
    /// A confirmed substitution references a candidate id that is not
    /// present in the candidate map supplied by the matching stage.
    ///
    /// Includes the stage that was processing the substitution and, when a
    /// close match exists among the known candidate ids, a "did you mean"
    /// suggestion.
    #[error("Candidate '{candidate_id}' not found for stage '{stage}'{}", suggestion.as_ref().map(|s| format!("\n  hint: Did you mean '{}'?", s)).unwrap_or_default())]
    CandidateNotFound {
        candidate_id: String,
        stage: String,
        /// Closest known candidate id, if one is within edit distance
        suggestion: Option<String>,
    },

    /// A confirmed substitution references a template id that is not a node
    /// of the topology being processed.
    ///
    /// The matching stage only confirms substitutions for existing nodes, so
    /// this signals that the topology was edited between matching and
    /// substitution.
    #[error("Template '{template_id}' not found in topology for stage '{stage}'")]
    TemplateNotFound { template_id: String, stage: String },

    /// The resource store failed to produce a fresh template copy for a
    /// candidate.
    #[error("Resource fetch failed for candidate '{candidate_id}': {message}")]
    ResourceFetch {
        candidate_id: String,
        message: String,
    },

    /// The type catalog could not resolve a type name to a definition.
    ///
    /// Raised for unknown types and for cycles in the supertype chain.
    #[error("Type resolution failed for '{type_name}': {message}")]
    TypeResolution { type_name: String, message: String },

    /// An error occurred while parsing a matching configuration document.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
