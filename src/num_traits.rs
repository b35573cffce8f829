/// Conversion of an expression coefficient into the numeric type an
/// expression is evaluated in.
pub trait FromCoefficient {
    /// Converts the coefficient, rounding if the target type is narrower.
    fn from_coefficient(value: f64) -> Self;
}

impl FromCoefficient for f32 {
    #[inline(always)]
    fn from_coefficient(value: f64) -> Self {
        value as f32
    }
}

impl FromCoefficient for f64 {
    #[inline(always)]
    fn from_coefficient(value: f64) -> Self {
        value
    }
}

/// The set of operations needed to numerically evaluate an expression.
pub trait Evaluable:
    Copy
    + FromCoefficient
    + num_traits::Zero
    + num_traits::One
    + core::ops::Add<Self, Output = Self>
    + core::ops::Mul<Self, Output = Self>
{
}

impl<T> Evaluable for T where
    T: Copy
        + FromCoefficient
        + num_traits::Zero
        + num_traits::One
        + core::ops::Add<T, Output = T>
        + core::ops::Mul<T, Output = T>
{
}
