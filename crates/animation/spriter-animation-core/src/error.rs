//! Error types for frame evaluation.
//!
//! Every variant except `UnknownAnimation` describes malformed source data. Such
//! errors abort the current evaluation; no partial frame is returned.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EvalError {
    #[error("animation '{animation}' has no mainline keys")]
    EmptyMainline { animation: String },

    #[error("animation '{animation}' references missing timeline {timeline}")]
    MissingTimeline { animation: String, timeline: usize },

    #[error("timeline {timeline} of animation '{animation}' has no key {key}")]
    MissingTimelineKey {
        animation: String,
        timeline: usize,
        key: usize,
    },

    #[error("parent index {parent} out of range for {count} resolved bones in animation '{animation}'")]
    ParentOutOfRange {
        animation: String,
        parent: usize,
        count: usize,
    },

    #[error("entity {entity} not found")]
    MissingEntity { entity: usize },

    #[error("animation {animation} not found in entity {entity}")]
    MissingAnimation { entity: usize, animation: usize },

    #[error("entity object on timeline {timeline} of animation '{animation}' names no entity/animation")]
    MissingEntityReference { animation: String, timeline: usize },

    #[error("variable {variable} not declared on entity {entity}")]
    MissingVariable { entity: usize, variable: usize },

    #[error("timeline {timeline} of animation '{animation}' carries {found} keys where {expected} keys are required")]
    PayloadMismatch {
        animation: String,
        timeline: usize,
        expected: String,
        found: String,
    },

    #[error("sub-entity nesting exceeded {limit} levels (cyclic entity references?)")]
    NestingTooDeep { limit: usize },

    #[error("invalid document: {reason}")]
    InvalidDocument { reason: String },

    #[error("entity {entity} has no animation named '{name}'")]
    UnknownAnimation { entity: usize, name: String },
}
