use crate::angular_rate::AngularRate;
use crate::impl_standard_traits;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, Mul, Sub};
use num_traits::Zero;
use uniform_array_derive::UniformArray;

/// A quaternion `a + b·i + c·j + d·k` over an arbitrary element type.
///
/// Orientation quaternions are unit quaternions; nothing here enforces the
/// norm since the components are usually symbolic.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Quaternion<T> {
    /// The scalar part.
    pub a: T,
    /// The `i` (x) component of the vector part.
    pub b: T,
    /// The `j` (y) component of the vector part.
    pub c: T,
    /// The `k` (z) component of the vector part.
    pub d: T,
}

impl<T> Quaternion<T> {
    /// Initializes a new [`Quaternion`] instance.
    #[inline(always)]
    pub const fn new(a: T, b: T, c: T, d: T) -> Self {
        Self { a, b, c, d }
    }

    /// Builds the pure quaternion `[0, ω]` from a rate vector.
    pub fn pure(vector: AngularRate<T>) -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), vector.omega_x, vector.omega_y, vector.omega_z)
    }
}

impl<T> Quaternion<T>
where
    T: Zero + num_traits::One,
{
    /// The identity rotation.
    pub fn identity() -> Self {
        Self::new(T::one(), T::zero(), T::zero(), T::zero())
    }
}

impl<T> Default for Quaternion<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
        )
    }
}

impl<T> Clone for Quaternion<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            a: self.a.clone(),
            b: self.b.clone(),
            c: self.c.clone(),
            d: self.d.clone(),
        }
    }
}

impl<T> Debug for Quaternion<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Quaternion")
            .field(&self.a)
            .field(&self.b)
            .field(&self.c)
            .field(&self.d)
            .finish()
    }
}

impl<T> PartialEq for Quaternion<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.b == other.b && self.c == other.c && self.d == other.d
    }
}

/// The Hamilton product.
impl<T> Mul<Quaternion<T>> for Quaternion<T>
where
    T: Clone + Add<T, Output = T> + Sub<T, Output = T> + Mul<T, Output = T>,
{
    type Output = Quaternion<T>;

    fn mul(self, rhs: Quaternion<T>) -> Self::Output {
        let (a1, b1, c1, d1) = (self.a, self.b, self.c, self.d);
        let (a2, b2, c2, d2) = (rhs.a, rhs.b, rhs.c, rhs.d);

        let a = a1.clone() * a2.clone()
            - b1.clone() * b2.clone()
            - c1.clone() * c2.clone()
            - d1.clone() * d2.clone();
        let b = a1.clone() * b2.clone() + b1.clone() * a2.clone() + c1.clone() * d2.clone()
            - d1.clone() * c2.clone();
        let c = a1.clone() * c2.clone() - b1.clone() * d2.clone()
            + c1.clone() * a2.clone()
            + d1.clone() * b2.clone();
        let d = a1 * d2 + b1 * c2 - c1 * b2 + d1 * a2;

        Quaternion::new(a, b, c, d)
    }
}

impl_standard_traits!(Quaternion, T, 4, [a, b, c, d]);
