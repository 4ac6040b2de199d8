//! Affine 4x4 helpers used by the skinning math.
//!
//! Every function returns a new matrix, none of them alias their inputs.

use glam::{DMat4, DVec4};

#[inline]
pub fn compose(a: &DMat4, b: &DMat4) -> DMat4 {
    *a * *b
}

#[inline]
pub fn invert(m: &DMat4) -> DMat4 {
    m.inverse()
}

/// Multiplies all 16 entries by `s`.
#[inline]
pub fn scale(m: &DMat4, s: f64) -> DMat4 {
    *m * s
}

/// Adds `v` to the four diagonal entries only.
pub fn add_to_diagonal(m: &DMat4, v: f64) -> DMat4 {
    let mut result = *m;
    result.x_axis.x += v;
    result.y_axis.y += v;
    result.z_axis.z += v;
    result.w_axis.w += v;
    result
}

#[inline]
pub fn add(a: &DMat4, b: &DMat4) -> DMat4 {
    *a + *b
}

/// Full homogeneous product, `w` is not renormalized.
#[inline]
pub fn transform_point(m: &DMat4, p: DVec4) -> DVec4 {
    *m * p
}
