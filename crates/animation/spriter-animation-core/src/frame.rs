//! Output contract of the evaluator.
//!
//! A Frame carries resolved objects partitioned by role plus resolved animation
//! variables. Renderers consume sprites in order; points and boxes are exposed for
//! gameplay queries. Frames can be cleared and refilled to reuse their buffers.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::Object;
use crate::value::VarValue;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Renderable objects in draw order; nested entities append their sprites in place.
    #[serde(default)]
    pub sprites: Vec<Object>,
    #[serde(default)]
    pub points: Vec<Object>,
    /// Collision boxes keyed by object id.
    #[serde(default)]
    pub boxes: HashMap<usize, Object>,
    /// Animation variables keyed by name.
    #[serde(default)]
    pub variables: HashMap<String, VarValue>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cfg: &Config) -> Self {
        Self {
            sprites: Vec::with_capacity(cfg.sprite_capacity),
            points: Vec::with_capacity(cfg.point_capacity),
            boxes: HashMap::new(),
            variables: HashMap::new(),
        }
    }

    /// Drop all contents, keeping allocations.
    #[inline]
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.points.clear();
        self.boxes.clear();
        self.variables.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
            && self.points.is_empty()
            && self.boxes.is_empty()
            && self.variables.is_empty()
    }

    /// Variable value by name.
    pub fn variable(&self, name: &str) -> Option<&VarValue> {
        self.variables.get(name)
    }

    /// Box by object id.
    pub fn box_for(&self, object_id: usize) -> Option<&Object> {
        self.boxes.get(&object_id)
    }
}
