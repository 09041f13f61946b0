//! Keyframe bracketing and per-timeline sampling.
//!
//! Model:
//! - Mainline: key A is the last key at or before the query time, key B the next one,
//!   wrapping to key 0 after the last key. A single-key mainline has no key B.
//! - Timelines: key A comes straight from the mainline reference; key B is the next
//!   index, wrapping only for looping animations. No key B means "hold key A".
//! - When B precedes A in time (wraparound), B and possibly the query time are shifted
//!   by one animation length before the linear factor is taken.
//! - The left key's curve remaps the factor before values are blended.

use crate::data::{
    Animation, Entity, Key, KeyPayload, MainlineKey, Object, Ref, Spatial, Timeline, TimelineKey,
    Varline,
};
use crate::error::EvalError;
use crate::interp::functions::{lerp_f32, reverse_lerp};
use crate::transform::{interpolate_object, interpolate_spatial};
use crate::value::VarValue;

/// Mainline keys surrounding a query time.
#[derive(Copy, Clone, Debug)]
pub struct MainlineBracket<'a> {
    pub a: &'a MainlineKey,
    pub b: Option<&'a MainlineKey>,
}

impl<'a> MainlineBracket<'a> {
    /// Key B, or key A when the mainline has a single key.
    #[inline]
    pub fn b_or_a(&self) -> &'a MainlineKey {
        self.b.unwrap_or(self.a)
    }
}

/// Index of the last key whose time is <= `time`.
fn last_at_or_before<K: Key>(keys: &[K], time: f32) -> Option<usize> {
    // keys are time-ascending: partition_point gives the first key past `time`
    let idx = keys.partition_point(|k| k.time() <= time);
    idx.checked_sub(1)
}

/// Bracket the mainline at `time`.
pub fn mainline_keys(anim: &Animation, time: f32) -> Result<MainlineBracket<'_>, EvalError> {
    let keys = &anim.mainline;
    let last = keys.len().checked_sub(1).ok_or_else(|| EvalError::EmptyMainline {
        animation: anim.name.clone(),
    })?;

    let a_idx = match last_at_or_before(keys, time) {
        Some(i) => i,
        // before the first key: still inside the previous cycle when looping
        None if anim.looping => last,
        None => 0,
    };
    let b = if keys.len() == 1 {
        None
    } else {
        Some(&keys[if a_idx == last { 0 } else { a_idx + 1 }])
    };
    Ok(MainlineBracket { a: &keys[a_idx], b })
}

/// Key following `a_idx`, wrapping for looping animations. `None` means hold key A.
pub fn next_key<K>(keys: &[K], a_idx: usize, looping: bool) -> Option<&K> {
    if keys.len() <= 1 {
        return None;
    }
    let next = a_idx + 1;
    if next >= keys.len() {
        if !looping {
            return None;
        }
        return keys.first();
    }
    keys.get(next)
}

/// Linear position of `time` between two key times, unwrapping a looped-back B.
pub fn raw_factor(time_a: f32, time_b: f32, length: f32, time: f32) -> f32 {
    let mut time_b = time_b;
    let mut time = time;
    if time_a > time_b {
        time_b += length;
        if time < time_a {
            time += length;
        }
    }
    reverse_lerp(time_a, time_b, time)
}

/// Factor between keys A and B at `time`, remapped by A's curve.
pub fn factor<K: Key>(a: &K, b: &K, length: f32, time: f32) -> f32 {
    a.curve().apply(raw_factor(a.time(), b.time(), length, time))
}

/// Absolute time between A and B (or the animation end when B wrapped) at the
/// unadjusted raw factor. Without a key B the query time is returned unchanged.
pub fn adjusted_time<K: Key>(a: &K, b: Option<&K>, length: f32, time: f32) -> f32 {
    let Some(b) = b else {
        return time;
    };
    let next_time = if b.time() > a.time() { b.time() } else { length };
    let f = raw_factor(a.time(), b.time(), length, time);
    lerp_f32(a.time(), next_time, f)
}

fn timeline<'a>(anim: &'a Animation, r: &Ref) -> Result<&'a Timeline, EvalError> {
    anim.timelines
        .get(r.timeline)
        .ok_or_else(|| EvalError::MissingTimeline {
            animation: anim.name.clone(),
            timeline: r.timeline,
        })
}

/// Timeline key A for a reference, plus its bracket partner.
fn timeline_bracket<'a>(
    anim: &'a Animation,
    r: &Ref,
) -> Result<(&'a Timeline, &'a TimelineKey, Option<&'a TimelineKey>), EvalError> {
    let tl = timeline(anim, r)?;
    let key_a = tl.keys.get(r.key).ok_or_else(|| EvalError::MissingTimelineKey {
        animation: anim.name.clone(),
        timeline: r.timeline,
        key: r.key,
    })?;
    Ok((tl, key_a, next_key(&tl.keys, r.key, anim.looping)))
}

/// Local bone state for a bone reference at `time`.
pub fn sample_bone(anim: &Animation, r: &Ref, time: f32) -> Result<Spatial, EvalError> {
    let (_, key_a, key_b) = timeline_bracket(anim, r)?;
    let Some(key_b) = key_b else {
        return Ok(*key_a.payload.spatial());
    };
    let f = factor(key_a, key_b, anim.length, time);
    Ok(interpolate_spatial(
        key_a.payload.spatial(),
        key_b.payload.spatial(),
        f,
        key_a.spin,
    ))
}

fn object_payload<'a>(
    anim: &Animation,
    tl: &Timeline,
    payload: &'a KeyPayload,
) -> Result<&'a Object, EvalError> {
    match payload {
        KeyPayload::Object(o) => Ok(o),
        other => Err(EvalError::PayloadMismatch {
            animation: anim.name.clone(),
            timeline: tl.id,
            expected: "object".into(),
            found: other.kind_name().into(),
        }),
    }
}

/// Local object state for an object reference at `time`, with the timeline it came from.
pub fn sample_object<'a>(
    anim: &'a Animation,
    r: &Ref,
    time: f32,
) -> Result<(Object, &'a Timeline), EvalError> {
    let (tl, key_a, key_b) = timeline_bracket(anim, r)?;
    let obj_a = object_payload(anim, tl, &key_a.payload)?;
    let Some(key_b) = key_b else {
        return Ok((obj_a.clone(), tl));
    };
    let obj_b = object_payload(anim, tl, &key_b.payload)?;
    let f = factor(key_a, key_b, anim.length, time);
    Ok((interpolate_object(obj_a, obj_b, f, key_a.spin), tl))
}

/// Resolve one varline at `time`: (variable name, value).
pub fn sample_varline<'e>(
    anim: &Animation,
    entity: &'e Entity,
    varline: &Varline,
    time: f32,
) -> Result<(&'e str, VarValue), EvalError> {
    let def = entity
        .variables
        .get(varline.def)
        .ok_or(EvalError::MissingVariable {
            entity: entity.id,
            variable: varline.def,
        })?;

    let Some(a_idx) = last_at_or_before(&varline.keys, time) else {
        return Ok((def.name.as_str(), def.default.clone()));
    };
    let key_a = &varline.keys[a_idx];
    let value = match next_key(&varline.keys, a_idx, anim.looping) {
        Some(key_b) => {
            let f = factor(key_a, key_b, anim.length, time);
            key_a.value.interpolate(&key_b.value, f)
        }
        None => key_a.value.clone(),
    };
    Ok((def.name.as_str(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk(id: usize, time: f32) -> MainlineKey {
        MainlineKey {
            id,
            time,
            bone_refs: vec![],
            object_refs: vec![],
        }
    }

    fn anim(keys: Vec<MainlineKey>, looping: bool) -> Animation {
        Animation {
            id: 0,
            name: "a".into(),
            entity: 0,
            length: 1000.0,
            looping,
            mainline: keys,
            timelines: vec![],
            varlines: vec![],
        }
    }

    #[test]
    fn mainline_bracket_wraps_after_last_key() {
        let a = anim(vec![mk(0, 0.0), mk(1, 400.0), mk(2, 800.0)], false);
        let br = mainline_keys(&a, 900.0).unwrap();
        assert_eq!(br.a.id, 2);
        assert_eq!(br.b.map(|k| k.id), Some(0));

        let br = mainline_keys(&a, 400.0).unwrap();
        assert_eq!(br.a.id, 1);
        assert_eq!(br.b.map(|k| k.id), Some(2));
    }

    #[test]
    fn single_mainline_key_has_no_partner() {
        let a = anim(vec![mk(0, 0.0)], true);
        let br = mainline_keys(&a, 500.0).unwrap();
        assert_eq!(br.a.id, 0);
        assert!(br.b.is_none());
        assert_eq!(adjusted_time(br.a, br.b, a.length, 500.0), 500.0);
    }

    #[test]
    fn empty_mainline_is_an_error() {
        let a = anim(vec![], true);
        assert!(matches!(
            mainline_keys(&a, 0.0),
            Err(EvalError::EmptyMainline { .. })
        ));
    }

    #[test]
    fn query_before_first_key_uses_previous_cycle_when_looping() {
        let a = anim(vec![mk(0, 100.0), mk(1, 600.0)], true);
        let br = mainline_keys(&a, 50.0).unwrap();
        assert_eq!(br.a.id, 1);
        assert_eq!(br.b.map(|k| k.id), Some(0));
        // 600 -> 1100 (wrapped 100): 50 + 1000 sits at 0.9
        assert!((raw_factor(600.0, 100.0, 1000.0, 50.0) - 0.9).abs() < 1e-6);

        let once = anim(vec![mk(0, 100.0), mk(1, 600.0)], false);
        assert_eq!(mainline_keys(&once, 50.0).unwrap().a.id, 0);
    }

    #[test]
    fn next_key_respects_looping() {
        let keys = [mk(0, 0.0), mk(1, 500.0)];
        assert_eq!(next_key(&keys, 0, false).map(|k| k.id), Some(1));
        assert!(next_key(&keys, 1, false).is_none());
        assert_eq!(next_key(&keys, 1, true).map(|k| k.id), Some(0));
        assert!(next_key(&keys[..1], 0, true).is_none());
    }

    #[test]
    fn adjusted_time_runs_to_animation_end_when_wrapped() {
        let a = mk(1, 600.0);
        let b = mk(0, 100.0);
        // raw factor 0.4 over [600, 1100], mapped onto [600, 1000]
        let t = adjusted_time(&a, Some(&b), 1000.0, 800.0);
        assert!((t - 760.0).abs() < 1e-3, "{t}");
    }
}
