//! Frame evaluator: single-animation evaluation and cross-animation blending.
//!
//! Evaluation is a pure function of (document, animation, time[, second animation,
//! factor]). Output is accumulated into a caller-owned [`Frame`]; nested sub-entity
//! animations recurse into the same frame, appending their sprites in place.

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::data::{Animation, Document, MainlineKey, Object, ObjectType, Spatial, Timeline};
use crate::error::EvalError;
use crate::frame::Frame;
use crate::sampling::{
    adjusted_time, mainline_keys, sample_bone, sample_object, sample_varline, MainlineBracket,
};
use crate::transform::{apply_parent_transform, blend_object, blend_spatial};

/// Which parts of a frame an evaluation level writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Scope {
    /// Entry level: sprites, points, boxes and variables.
    Top,
    /// Nested entities and blended objects: sprites only.
    SpritesOnly,
}

/// Stateless evaluator over a borrowed, read-only document.
#[derive(Clone, Debug)]
pub struct Evaluator<'d> {
    document: &'d Document,
    config: Config,
}

/// Map `time` into the animation's domain: wrap when looping, clamp otherwise.
pub fn normalize_time(anim: &Animation, time: f32) -> f32 {
    if anim.length.is_nan() || anim.length <= 0.0 || !time.is_finite() {
        return 0.0;
    }
    if anim.looping {
        let t = time.rem_euclid(anim.length);
        // rounding can land exactly on the length for tiny negative inputs
        if t >= anim.length {
            0.0
        } else {
            t
        }
    } else {
        time.clamp(0.0, anim.length)
    }
}

impl<'d> Evaluator<'d> {
    pub fn new(document: &'d Document, config: Config) -> Self {
        Self { document, config }
    }

    pub fn document(&self) -> &'d Document {
        self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate one animation at `time` into a fresh frame.
    pub fn evaluate_single(&self, anim: &Animation, time: f32) -> Result<Frame, EvalError> {
        let mut frame = Frame::with_capacity(&self.config);
        self.evaluate_single_into(anim, time, &mut frame)?;
        Ok(frame)
    }

    /// Evaluate one animation at `time`, replacing the contents of `frame`.
    /// On error the frame is left empty.
    pub fn evaluate_single_into(
        &self,
        anim: &Animation,
        time: f32,
        frame: &mut Frame,
    ) -> Result<(), EvalError> {
        frame.clear();
        let res = self.single(anim, time, None, 0, Scope::Top, frame);
        if res.is_err() {
            frame.clear();
        }
        res
    }

    /// Blend `first` at `time` with `second` at the proportional time, by `factor`.
    /// A blended frame carries sprites only; the fallback to `first` alone is a full frame.
    pub fn evaluate_blend(
        &self,
        first: &Animation,
        second: &Animation,
        time: f32,
        factor: f32,
    ) -> Result<Frame, EvalError> {
        let mut frame = Frame::with_capacity(&self.config);
        self.evaluate_blend_into(first, second, time, factor, &mut frame)?;
        Ok(frame)
    }

    /// Blend into `frame`, replacing its contents. On error the frame is left empty.
    pub fn evaluate_blend_into(
        &self,
        first: &Animation,
        second: &Animation,
        time: f32,
        factor: f32,
        frame: &mut Frame,
    ) -> Result<(), EvalError> {
        frame.clear();
        let res = self.blend(first, second, time, factor, frame);
        if res.is_err() {
            frame.clear();
        }
        res
    }

    fn single(
        &self,
        anim: &Animation,
        time: f32,
        parent: Option<&Spatial>,
        depth: usize,
        scope: Scope,
        frame: &mut Frame,
    ) -> Result<(), EvalError> {
        let time = normalize_time(anim, time);
        trace!(animation = %anim.name, time, depth, "evaluate single");

        let bracket = mainline_keys(anim, time)?;
        let adjusted = adjusted_time(bracket.a, bracket.b, anim.length, time);

        let bones = resolve_bones(anim, bracket.a, time, parent)?;

        for r in &bracket.a.object_refs {
            let (mut obj, tl) = sample_object(anim, r, adjusted)?;
            if let Some(p) = r.parent {
                let bone = parent_bone(anim, &bones, p)?;
                apply_parent_transform(&mut obj.spatial, &bone);
            }
            self.dispatch(anim, tl, obj, depth, scope, frame)?;
        }

        if scope == Scope::Top {
            self.resolve_variables(anim, time, frame)?;
        }
        Ok(())
    }

    fn blend(
        &self,
        first: &Animation,
        second: &Animation,
        time: f32,
        factor: f32,
        frame: &mut Frame,
    ) -> Result<(), EvalError> {
        let time = normalize_time(first, time);
        let time_second = if first.length > 0.0 {
            normalize_time(second, time / first.length * second.length)
        } else {
            0.0
        };
        trace!(first = %first.name, second = %second.name, time, time_second, factor, "evaluate blend");

        let first_keys = mainline_keys(first, time)?;
        let second_keys = mainline_keys(second, time_second)?;
        let base = if factor < 0.5 {
            first_keys.a
        } else {
            first_keys.b_or_a()
        };

        if !compatible(&first_keys, &second_keys) || !pairable(base, first_keys.a, second_keys.a) {
            debug!(
                first = %first.name,
                second = %second.name,
                "mainline keys not structurally compatible; evaluating first animation alone"
            );
            return self.single(first, time, None, 0, Scope::Top, frame);
        }

        let adjusted_first = adjusted_time(first_keys.a, first_keys.b, first.length, time);
        let adjusted_second =
            adjusted_time(second_keys.a, second_keys.b, second.length, time_second);

        let bones_first = resolve_bones(first, first_keys.a, adjusted_first, None)?;
        let bones_second = resolve_bones(second, second_keys.a, adjusted_second, None)?;
        let bones: Vec<Spatial> = bones_first
            .iter()
            .zip(bones_second.iter())
            .map(|(a, b)| blend_spatial(a, b, factor))
            .collect();

        for (r_first, r_second) in base.object_refs.iter().zip(&second_keys.a.object_refs) {
            let (obj_first, tl) = sample_object(first, r_first, adjusted_first)?;
            let (obj_second, _) = sample_object(second, r_second, adjusted_second)?;

            let mut obj = blend_object(&obj_first, &obj_second, factor);
            if let Some(p) = r_first.parent {
                let bone = parent_bone(first, &bones, p)?;
                apply_parent_transform(&mut obj.spatial, &bone);
            }
            self.dispatch(first, tl, obj, 0, Scope::SpritesOnly, frame)?;
        }
        Ok(())
    }

    /// Route a resolved object into the frame by its timeline's object type.
    fn dispatch(
        &self,
        anim: &Animation,
        tl: &Timeline,
        obj: Object,
        depth: usize,
        scope: Scope,
        frame: &mut Frame,
    ) -> Result<(), EvalError> {
        match tl.object_type {
            ObjectType::Sprite => frame.sprites.push(obj),
            ObjectType::Point => {
                if scope == Scope::Top {
                    frame.points.push(obj);
                }
            }
            ObjectType::Box => {
                if scope == Scope::Top {
                    frame.boxes.insert(tl.object_id, obj);
                }
            }
            ObjectType::Entity => {
                let (Some(entity), Some(animation)) = (obj.entity, obj.animation) else {
                    return Err(EvalError::MissingEntityReference {
                        animation: anim.name.clone(),
                        timeline: tl.id,
                    });
                };
                if depth + 1 > self.config.max_nesting_depth {
                    warn!(
                        animation = %anim.name,
                        entity,
                        limit = self.config.max_nesting_depth,
                        "sub-entity nesting limit reached"
                    );
                    return Err(EvalError::NestingTooDeep {
                        limit: self.config.max_nesting_depth,
                    });
                }
                let sub = self.document.animation(entity, animation)?;
                let local_time = obj.t * sub.length;
                self.single(
                    sub,
                    local_time,
                    Some(&obj.spatial),
                    depth + 1,
                    Scope::SpritesOnly,
                    frame,
                )?;
            }
            ObjectType::Bone | ObjectType::Sound | ObjectType::Variable => {}
        }
        Ok(())
    }

    fn resolve_variables(
        &self,
        anim: &Animation,
        time: f32,
        frame: &mut Frame,
    ) -> Result<(), EvalError> {
        if anim.varlines.is_empty() {
            return Ok(());
        }
        let entity = self.document.entity(anim.entity)?;
        for varline in &anim.varlines {
            let (name, value) = sample_varline(anim, entity, varline, time)?;
            frame.variables.insert(name.to_owned(), value);
        }
        Ok(())
    }
}

/// Resolve a mainline key's bones in list order, composing each with its parent.
/// Root bones take the external parent context, if any.
fn resolve_bones(
    anim: &Animation,
    key: &MainlineKey,
    time: f32,
    parent: Option<&Spatial>,
) -> Result<Vec<Spatial>, EvalError> {
    let mut bones: Vec<Spatial> = Vec::with_capacity(key.bone_refs.len());
    for r in &key.bone_refs {
        let mut bone = sample_bone(anim, r, time)?;
        match r.parent {
            Some(p) => {
                let up = parent_bone(anim, &bones, p)?;
                apply_parent_transform(&mut bone, &up);
            }
            None => {
                if let Some(ctx) = parent {
                    apply_parent_transform(&mut bone, ctx);
                }
            }
        }
        bones.push(bone);
    }
    Ok(bones)
}

#[inline]
fn parent_bone(anim: &Animation, bones: &[Spatial], p: usize) -> Result<Spatial, EvalError> {
    bones
        .get(p)
        .copied()
        .ok_or_else(|| EvalError::ParentOutOfRange {
            animation: anim.name.clone(),
            parent: p,
            count: bones.len(),
        })
}

/// Reference-count heuristic: both A brackets and both B brackets must agree.
fn compatible(first: &MainlineBracket<'_>, second: &MainlineBracket<'_>) -> bool {
    let (fa, fb) = (first.a, first.b_or_a());
    let (sa, sb) = (second.a, second.b_or_a());
    fa.bone_refs.len() == sa.bone_refs.len()
        && fb.bone_refs.len() == sb.bone_refs.len()
        && fa.object_refs.len() == sa.object_refs.len()
        && fb.object_refs.len() == sb.object_refs.len()
}

/// The base key's objects must each have a partner in the second animation's key A
/// and a parent inside the blended bone list.
fn pairable(base: &MainlineKey, first_a: &MainlineKey, second_a: &MainlineKey) -> bool {
    base.object_refs.len() <= second_a.object_refs.len()
        && base
            .object_refs
            .iter()
            .all(|r| r.parent.map_or(true, |p| p < first_a.bone_refs.len()))
}
