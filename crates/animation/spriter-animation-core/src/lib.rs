//! Spriter Animation Core (renderer-agnostic)
//!
//! Evaluates keyframed Spriter animation data at arbitrary times: mainline and
//! timeline bracketing with looping wraparound, speed curves, spin-aware angle
//! interpolation, bone hierarchy composition, nested sub-entity animations,
//! animation variables, and blending between two animations for transitions.
//!
//! The data model is supplied already populated by a parser outside this crate;
//! evaluation only reads it and writes fresh [`Frame`]s.

pub mod animator;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluator;
pub mod frame;
pub mod interp;
pub mod sampling;
pub mod transform;
pub mod value;

// Re-exports for consumers (renderers, game code)
pub use animator::{Animator, AnimatorCommand, AnimatorEvent};
pub use config::Config;
pub use data::{
    Animation, Document, Entity, KeyPayload, MainlineKey, Object, ObjectType, Ref, Spatial,
    Timeline, TimelineKey, VariableDef, Varline, VarlineKey,
};
pub use error::EvalError;
pub use evaluator::{normalize_time, Evaluator};
pub use frame::Frame;
pub use interp::{Curve, CurveType};
pub use transform::apply_parent_transform;
pub use value::{VarType, VarValue};
