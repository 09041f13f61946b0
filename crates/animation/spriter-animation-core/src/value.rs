//! Typed animation-variable values.

use serde::{Deserialize, Serialize};

use crate::interp::functions::lerp_f32;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VarType {
    Float,
    Int,
    String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum VarValue {
    Float(f32),
    Int(i32),
    /// Step-only value (never blended)
    String(String),
}

impl VarValue {
    #[inline]
    pub fn kind(&self) -> VarType {
        match self {
            VarValue::Float(_) => VarType::Float,
            VarValue::Int(_) => VarType::Int,
            VarValue::String(_) => VarType::String,
        }
    }

    /// Blend towards `other` by `t`. The result always has this value's type: ints are
    /// blended then truncated, strings hold, and a type mismatch holds this value.
    pub fn interpolate(&self, other: &VarValue, t: f32) -> VarValue {
        match (self, other) {
            (VarValue::Float(a), VarValue::Float(b)) => VarValue::Float(lerp_f32(*a, *b, t)),
            (VarValue::Int(a), VarValue::Int(b)) => {
                VarValue::Int(lerp_f32(*a as f32, *b as f32, t) as i32)
            }
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_values_truncate_toward_zero() {
        let a = VarValue::Int(0);
        let b = VarValue::Int(3);
        assert_eq!(a.interpolate(&b, 0.5), VarValue::Int(1));
        assert_eq!(VarValue::Int(0).interpolate(&VarValue::Int(-3), 0.5), VarValue::Int(-1));
    }

    #[test]
    fn strings_and_mismatches_hold_left() {
        let a = VarValue::String("idle".into());
        let b = VarValue::String("run".into());
        assert_eq!(a.interpolate(&b, 0.9), a);

        let f = VarValue::Float(2.0);
        assert_eq!(f.interpolate(&VarValue::Int(10), 0.5), f);
        assert_eq!(f.interpolate(&VarValue::Int(10), 0.5).kind(), VarType::Float);
    }
}
