//! Read-only animation data model (Document → Entity → Animation → timelines).
//!
//! The parser that populates these structs lives outside this crate; the core only
//! reads them. Ids are dense indices: `entities[i].id == i`, `animations[i].id == i`,
//! mainline and timeline keys are indexed contiguously from 0 in ascending time.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::interp::Curve;
use crate::value::VarValue;

/// Root of a parsed document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub entities: Vec<Entity>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub id: usize,
    pub name: String,
    /// Declared animation variables; varlines refer to these by index.
    #[serde(default)]
    pub variables: Vec<VariableDef>,
    pub animations: Vec<Animation>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VariableDef {
    pub id: usize,
    pub name: String,
    /// Value used while no varline key has been reached yet.
    pub default: VarValue,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Animation {
    pub id: usize,
    pub name: String,
    /// Id of the owning entity.
    pub entity: usize,
    /// Loop duration, in the document's time unit (milliseconds for Spriter files).
    pub length: f32,
    #[serde(default = "default_looping")]
    pub looping: bool,
    pub mainline: Vec<MainlineKey>,
    #[serde(default)]
    pub timelines: Vec<Timeline>,
    #[serde(default)]
    pub varlines: Vec<Varline>,
}

fn default_looping() -> bool {
    true
}

/// Keyframe of the top-level timeline: which bones/objects are active and how they nest.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MainlineKey {
    pub id: usize,
    #[serde(default)]
    pub time: f32,
    #[serde(default)]
    pub bone_refs: Vec<Ref>,
    #[serde(default)]
    pub object_refs: Vec<Ref>,
}

/// Reference from a mainline key into a timeline key.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ref {
    pub id: usize,
    /// Index into the same mainline key's `bone_refs`.
    #[serde(default)]
    pub parent: Option<usize>,
    pub timeline: usize,
    pub key: usize,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    #[default]
    Sprite,
    Bone,
    Box,
    Point,
    Sound,
    Entity,
    Variable,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Timeline {
    pub id: usize,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub object_type: ObjectType,
    /// Object info index; key of the frame's box map.
    #[serde(default)]
    pub object_id: usize,
    pub keys: Vec<TimelineKey>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimelineKey {
    pub id: usize,
    #[serde(default)]
    pub time: f32,
    #[serde(default = "default_spin")]
    pub spin: i32,
    #[serde(default)]
    pub curve: Curve,
    pub payload: KeyPayload,
}

fn default_spin() -> i32 {
    1
}

/// What a timeline key animates.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum KeyPayload {
    Bone(Spatial),
    Object(Object),
}

impl KeyPayload {
    pub fn spatial(&self) -> &Spatial {
        match self {
            KeyPayload::Bone(s) => s,
            KeyPayload::Object(o) => &o.spatial,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            KeyPayload::Bone(_) => "bone",
            KeyPayload::Object(_) => "object",
        }
    }
}

/// Position, rotation (degrees) and scale of a bone or object.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Spatial {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Spatial {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Object state: spatial base plus the fields only sprites, points, boxes and
/// nested entities carry. Used both as key payload and as resolved frame output.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Object {
    pub spatial: Spatial,
    pub alpha: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
    pub folder: Option<usize>,
    pub file: Option<usize>,
    pub entity: Option<usize>,
    pub animation: Option<usize>,
    /// Progress (0..1) into the nested entity's animation.
    pub t: f32,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            spatial: Spatial::default(),
            alpha: 1.0,
            pivot_x: 0.0,
            pivot_y: 1.0,
            folder: None,
            file: None,
            entity: None,
            animation: None,
            t: 0.0,
        }
    }
}

/// Track for one entity variable.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Varline {
    pub id: usize,
    /// Index into the owning entity's `variables`.
    pub def: usize,
    pub keys: Vec<VarlineKey>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VarlineKey {
    pub id: usize,
    #[serde(default)]
    pub time: f32,
    #[serde(default)]
    pub curve: Curve,
    pub value: VarValue,
}

/// Shared view over mainline, timeline and varline keys for bracketing.
pub trait Key {
    fn index(&self) -> usize;
    fn time(&self) -> f32;
    fn curve(&self) -> Curve {
        Curve::LINEAR
    }
}

impl Key for MainlineKey {
    fn index(&self) -> usize {
        self.id
    }
    fn time(&self) -> f32 {
        self.time
    }
}

impl Key for TimelineKey {
    fn index(&self) -> usize {
        self.id
    }
    fn time(&self) -> f32 {
        self.time
    }
    fn curve(&self) -> Curve {
        self.curve
    }
}

impl Key for VarlineKey {
    fn index(&self) -> usize {
        self.id
    }
    fn time(&self) -> f32 {
        self.time
    }
    fn curve(&self) -> Curve {
        self.curve
    }
}

impl Document {
    pub fn entity(&self, id: usize) -> Result<&Entity, EvalError> {
        self.entities
            .get(id)
            .ok_or(EvalError::MissingEntity { entity: id })
    }

    /// Look up `entities[entity].animations[animation]`.
    pub fn animation(&self, entity: usize, animation: usize) -> Result<&Animation, EvalError> {
        self.entity(entity)?
            .animations
            .get(animation)
            .ok_or(EvalError::MissingAnimation { entity, animation })
    }

    /// Validate the structural invariants evaluation relies on.
    pub fn validate_basic(&self) -> Result<(), EvalError> {
        for (ei, entity) in self.entities.iter().enumerate() {
            if entity.id != ei {
                return Err(invalid(format!(
                    "entity '{}' has id {} at index {ei}",
                    entity.name, entity.id
                )));
            }
            for (ai, anim) in entity.animations.iter().enumerate() {
                if anim.id != ai || anim.entity != ei {
                    return Err(invalid(format!(
                        "animation '{}' is misplaced (id {}, entity {}) at {ei}/{ai}",
                        anim.name, anim.id, anim.entity
                    )));
                }
                anim.validate_basic(entity)?;
            }
        }
        Ok(())
    }
}

impl Entity {
    pub fn animation_by_name(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }
}

fn invalid(reason: String) -> EvalError {
    EvalError::InvalidDocument { reason }
}

fn check_keys<K: Key>(keys: &[K], what: &str) -> Result<(), String> {
    let mut last = -f32::INFINITY;
    for (i, k) in keys.iter().enumerate() {
        if k.index() != i {
            return Err(format!("{what} key at index {i} has id {}", k.index()));
        }
        if !k.time().is_finite() || k.time() < last {
            return Err(format!("{what} key {i} time must be finite and non-decreasing"));
        }
        last = k.time();
    }
    Ok(())
}

impl Animation {
    /// Validate one animation against its owning entity.
    pub fn validate_basic(&self, entity: &Entity) -> Result<(), EvalError> {
        let ctx = |msg: String| invalid(format!("animation '{}': {msg}", self.name));

        if self.length.is_nan() || self.length <= 0.0 {
            return Err(ctx("length must be > 0".into()));
        }
        if self.mainline.is_empty() {
            return Err(EvalError::EmptyMainline {
                animation: self.name.clone(),
            });
        }
        check_keys(&self.mainline, "mainline").map_err(ctx)?;

        for timeline in &self.timelines {
            if timeline.keys.is_empty() {
                return Err(ctx(format!("timeline {} has no keys", timeline.id)));
            }
            check_keys(&timeline.keys, &format!("timeline {}", timeline.id)).map_err(ctx)?;
        }

        for mk in &self.mainline {
            for (i, r) in mk.bone_refs.iter().enumerate() {
                self.check_ref(r)?;
                if let Some(p) = r.parent {
                    if p >= i {
                        return Err(ctx(format!(
                            "mainline key {} bone ref {i} has parent {p} that is not an earlier bone",
                            mk.id
                        )));
                    }
                }
            }
            for (i, r) in mk.object_refs.iter().enumerate() {
                self.check_ref(r)?;
                if let Some(p) = r.parent {
                    if p >= mk.bone_refs.len() {
                        return Err(ctx(format!(
                            "mainline key {} object ref {i} has parent {p} outside {} bones",
                            mk.id,
                            mk.bone_refs.len()
                        )));
                    }
                }
            }
        }

        for varline in &self.varlines {
            if varline.def >= entity.variables.len() {
                return Err(EvalError::MissingVariable {
                    entity: entity.id,
                    variable: varline.def,
                });
            }
            check_keys(&varline.keys, &format!("varline {}", varline.id)).map_err(ctx)?;
        }
        Ok(())
    }

    fn check_ref(&self, r: &Ref) -> Result<(), EvalError> {
        let timeline = self
            .timelines
            .get(r.timeline)
            .ok_or_else(|| EvalError::MissingTimeline {
                animation: self.name.clone(),
                timeline: r.timeline,
            })?;
        if r.key >= timeline.keys.len() {
            return Err(EvalError::MissingTimelineKey {
                animation: self.name.clone(),
                timeline: r.timeline,
                key: r.key,
            });
        }
        Ok(())
    }
}
