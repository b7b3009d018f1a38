//! # Matching Configuration
//!
//! The immutable per-run record handed over by the matching stage: which
//! candidate the user confirmed for each matched template. The substitution
//! driver only reads it; producing and persisting it belongs to the matching
//! stage of the hosting system.
//!
//! ## Parsing
//!
//! Hosting systems persist matching decisions as YAML documents. `parse`
//! accepts two layouts:
//!
//! 1. **Record format**: a `matched:` mapping of template ids to candidate
//!    ids. This is the format `serde` writes back out.
//!
//! 2. **Bare format**: the id mapping directly at the document root, with
//!    no `matched:` wrapper. Supported so documents written by hand stay
//!    valid.
//!
//! The record format is tried first; on failure the parser falls back to
//! the bare format before giving up with a hinted `ConfigParse` error.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// User-confirmed substitutions for one stage, template id to candidate id,
/// in confirmation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfiguration {
    /// Template id -> confirmed candidate id
    #[serde(default)]
    pub matched: IndexMap<String, String>,
}

impl MatchingConfiguration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a confirmed substitution, replacing any previous confirmation
    /// for the template.
    pub fn confirm(&mut self, template_id: impl Into<String>, candidate_id: impl Into<String>) {
        self.matched.insert(template_id.into(), candidate_id.into());
    }

    /// Number of confirmed substitutions.
    pub fn len(&self) -> usize {
        self.matched.len()
    }

    /// Whether no substitutions were confirmed.
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

/// Parse a YAML string into a `MatchingConfiguration`
pub fn parse(yaml_content: &str) -> Result<MatchingConfiguration> {
    // First try the record format
    match serde_yaml::from_str::<MatchingConfiguration>(yaml_content) {
        Ok(config) => Ok(config),
        Err(_) => {
            // If that fails, try the bare id mapping format
            parse_bare_format(yaml_content)
        }
    }
}

/// Parse a YAML string holding the id mapping at the document root
fn parse_bare_format(yaml_content: &str) -> Result<MatchingConfiguration> {
    let matched: IndexMap<String, String> =
        serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
            message: format!("not a matching document: {}", e),
            hint: Some(
                "Expected a 'matched:' mapping of template ids to candidate ids".to_string(),
            ),
        })?;
    Ok(MatchingConfiguration { matched })
}

/// Load and parse a matching configuration from a file
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<MatchingConfiguration> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
