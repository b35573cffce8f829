//! Quaternion kinematics.
//!
//! An orientation quaternion `q` rotating with the body rate `ω` evolves as
//! `dq/dt = ½ · q ⊗ [0, ω]`. Since the product is linear in `ω`, it can be
//! written as `½ · M(q) · ω` with the 4×3 operator `M(q)` built here.

use crate::quaternion::Quaternion;
use core::ops::Neg;
use nalgebra::{SMatrix, Scalar};

/// The number of rows of the rate operator, i.e. the quaternion components.
pub const OPERATOR_ROWS: usize = 4;

/// The number of columns of the rate operator, i.e. the rate vector components.
pub const OPERATOR_COLS: usize = 3;

/// Builds the 4×3 operator `M(q)` such that `M(q) · ω = q ⊗ [0, ω]`.
///
/// This is the quaternion right-multiplication matrix of `q` with its first
/// column dropped, as the operand has no scalar part:
///
/// ```text
/// ⎡ -b  -c  -d ⎤
/// ⎢  a  -d   c ⎥
/// ⎢  d   a  -b ⎥
/// ⎣ -c   b   a ⎦
/// ```
pub fn rate_operator<T>(q: &Quaternion<T>) -> SMatrix<T, OPERATOR_ROWS, OPERATOR_COLS>
where
    T: Scalar + Neg<Output = T>,
{
    let Quaternion { a, b, c, d } = q.clone();
    SMatrix::from_row_slice(&[
        -b.clone(),
        -c.clone(),
        -d.clone(),
        a.clone(),
        -d.clone(),
        c.clone(),
        d,
        a.clone(),
        -b.clone(),
        -c,
        b,
        a,
    ])
}
