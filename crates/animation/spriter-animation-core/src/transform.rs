//! Spatial/object interpolation and parent-to-child transform composition.

use crate::data::{Object, Spatial};
use crate::interp::functions::{angle_linear, closer_angle_linear, lerp_f32};

/// Interpolate two bone keys; the angle follows the left key's spin.
pub fn interpolate_spatial(a: &Spatial, b: &Spatial, f: f32, spin: i32) -> Spatial {
    Spatial {
        x: lerp_f32(a.x, b.x, f),
        y: lerp_f32(a.y, b.y, f),
        angle: angle_linear(a.angle, b.angle, spin, f),
        scale_x: lerp_f32(a.scale_x, b.scale_x, f),
        scale_y: lerp_f32(a.scale_y, b.scale_y, f),
    }
}

/// Interpolate two object keys. Pivot and resource/entity ids come from `a`.
pub fn interpolate_object(a: &Object, b: &Object, f: f32, spin: i32) -> Object {
    Object {
        spatial: interpolate_spatial(&a.spatial, &b.spatial, f, spin),
        alpha: lerp_f32(a.alpha, b.alpha, f),
        t: lerp_f32(a.t, b.t, f),
        ..a.clone()
    }
}

/// Blend two resolved bones from different animations along the shorter arc.
pub fn blend_spatial(a: &Spatial, b: &Spatial, f: f32) -> Spatial {
    Spatial {
        angle: closer_angle_linear(a.angle, b.angle, f),
        ..interpolate_spatial(a, b, f, 1)
    }
}

/// Blend two resolved objects from different animations along the shorter arc.
pub fn blend_object(a: &Object, b: &Object, f: f32) -> Object {
    Object {
        spatial: blend_spatial(&a.spatial, &b.spatial, f),
        ..interpolate_object(a, b, f, 1)
    }
}

/// `Math.Sign`-style sign: zero maps to zero.
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Move `child` from its parent's local space into the parent's space.
/// A mirrored parent (negative scale product) flips the child's rotation sense.
pub fn apply_parent_transform(child: &mut Spatial, parent: &Spatial) {
    let px = parent.scale_x * child.x;
    let py = parent.scale_y * child.y;
    let rad = parent.angle.to_radians();
    let (s, c) = rad.sin_cos();

    child.x = px * c - py * s + parent.x;
    child.y = px * s + py * c + parent.y;
    child.scale_x *= parent.scale_x;
    child.scale_y *= parent.scale_y;
    child.angle = (parent.angle + sign(parent.scale_x * parent.scale_y) * child.angle) % 360.0;
}
