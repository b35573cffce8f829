use crate::registry::STATES;
use core::fmt::{Display, Formatter};

/// A named scalar placeholder referenced by the generated equations.
///
/// The variant order defines the canonical factor order of expanded polynomials:
/// the time step sorts first, followed by the state, the rates and the matrix inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// The time step `dT` between two filter updates.
    TimeStep,
    /// An element of the state vector `x`.
    State(usize),
    /// An element of the angular rate (gyroscope) input `w`.
    Rate(usize),
    /// An element of the prior estimate covariance matrix `P`.
    Covariance(usize, usize),
    /// An element of the process noise covariance matrix `Q`.
    ProcessNoise(usize, usize),
}

impl Symbol {
    /// The name of the array or scalar this symbol lives in.
    pub const fn base_name(&self) -> &'static str {
        match self {
            Symbol::State(_) => "x",
            Symbol::Rate(_) => "w",
            Symbol::TimeStep => "dT",
            Symbol::Covariance(_, _) => "P",
            Symbol::ProcessNoise(_, _) => "Q",
        }
    }
}

/// Renders the symbol with flat (row-major) indexing, e.g. `P[8]` for `P(1, 1)`.
impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Symbol::State(i) | Symbol::Rate(i) => write!(f, "{}[{}]", self.base_name(), i),
            Symbol::TimeStep => f.write_str(self.base_name()),
            Symbol::Covariance(r, c) | Symbol::ProcessNoise(r, c) => {
                write!(f, "{}[{}]", self.base_name(), r * STATES + c)
            }
        }
    }
}
