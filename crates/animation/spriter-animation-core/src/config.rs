//! Core configuration for spriter-animation-core.

use serde::{Deserialize, Serialize};

/// Configuration for evaluation limits and frame sizing.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum depth of nested sub-entity evaluation. Source data is expected to be
    /// acyclic, so hitting this limit is reported as a data-integrity error.
    pub max_nesting_depth: usize,

    /// Initial capacity hints for freshly allocated frames.
    pub sprite_capacity: usize,
    pub point_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_nesting_depth: 32,
            sprite_capacity: 64,
            point_capacity: 8,
        }
    }
}
