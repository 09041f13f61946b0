//! Interpolation helpers:
//! - lerp_f32 / reverse_lerp (scalar blend and its inverse)
//! - angle_linear (spin-aware angle blend used by timelines)
//! - closer_angle_linear (shortest-arc angle blend used by cross-animation blends)
//! - polynomial_curve (de Casteljau over 0, c1.., 1)
//! - bezier_ease (cubic-bezier timing, solve x -> y)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `v` within `[a, b]` as a fraction. A zero-length span yields 0.
#[inline]
pub fn reverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    let span = b - a;
    if span == 0.0 {
        return 0.0;
    }
    (v - a) / span
}

/// Angle interpolation in degrees honouring the key's spin direction.
/// `spin == 0` holds `a`; positive spin only ever increases the angle, negative only decreases.
/// Only the sign of `spin` is used; larger magnitudes add no extra turns.
#[inline]
pub fn angle_linear(a: f32, mut b: f32, spin: i32, t: f32) -> f32 {
    if spin == 0 {
        return a;
    }
    if spin > 0 && b - a < 0.0 {
        b += 360.0;
    } else if spin < 0 && b - a > 0.0 {
        b -= 360.0;
    }
    lerp_f32(a, b, t)
}

/// Angle interpolation in degrees along the shorter arc, ignoring spin.
#[inline]
pub fn closer_angle_linear(mut a: f32, mut b: f32, t: f32) -> f32 {
    if (b - a).abs() < 180.0 {
        return lerp_f32(a, b, t);
    }
    if a < b {
        a += 360.0;
    } else {
        b += 360.0;
    }
    lerp_f32(a, b, t)
}

/// Evaluate the Bezier polynomial with the given control values at `t` (de Casteljau).
/// Supports up to six control values, which covers the quintic curve.
pub fn polynomial_curve(points: &[f32], t: f32) -> f32 {
    let n = points.len().min(6);
    if n == 0 {
        return 0.0;
    }
    let mut buf = [0.0f32; 6];
    buf[..n].copy_from_slice(&points[..n]);
    for level in (1..n).rev() {
        for i in 0..level {
            buf[i] = lerp_f32(buf[i], buf[i + 1], t);
        }
    }
    buf[0]
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
pub fn bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 in [0,1]
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}
