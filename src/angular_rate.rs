use crate::gyroscope_bias::GyroscopeBias;
use crate::impl_standard_traits;
use core::fmt::{Debug, Formatter};
use core::ops::Sub;
use nalgebra::{Scalar, Vector3};
use uniform_array_derive::UniformArray;

/// An angular rate vector, such as a raw gyroscope sample.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct AngularRate<T> {
    /// The angular rate around the x-axis, in radians per second.
    pub omega_x: T,
    /// The angular rate around the y-axis, in radians per second.
    pub omega_y: T,
    /// The angular rate around the z-axis, in radians per second.
    pub omega_z: T,
}

impl<T> AngularRate<T> {
    /// Initializes a new [`AngularRate`] instance.
    #[inline(always)]
    pub const fn new(omega_x: T, omega_y: T, omega_z: T) -> Self {
        Self {
            omega_x,
            omega_y,
            omega_z,
        }
    }

    /// Returns the rate as a column vector.
    pub fn to_vector(&self) -> Vector3<T>
    where
        T: Scalar,
    {
        Vector3::new(
            self.omega_x.clone(),
            self.omega_y.clone(),
            self.omega_z.clone(),
        )
    }
}

impl<T> Default for AngularRate<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Clone for AngularRate<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            omega_x: self.omega_x.clone(),
            omega_y: self.omega_y.clone(),
            omega_z: self.omega_z.clone(),
        }
    }
}

impl<T> Debug for AngularRate<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("AngularRate")
            .field(&self.omega_x)
            .field(&self.omega_y)
            .field(&self.omega_z)
            .finish()
    }
}

/// Removes a bias estimate from a raw reading, yielding the true rate.
impl<T> Sub<GyroscopeBias<T>> for AngularRate<T>
where
    T: Sub<T, Output = T>,
{
    type Output = AngularRate<T>;

    fn sub(self, rhs: GyroscopeBias<T>) -> Self::Output {
        Self {
            omega_x: self.omega_x - rhs.omega_x,
            omega_y: self.omega_y - rhs.omega_y,
            omega_z: self.omega_z - rhs.omega_z,
        }
    }
}

impl_standard_traits!(AngularRate, T, 3, [omega_x, omega_y, omega_z]);
