use crate::angular_rate::AngularRate;
use crate::expr::Expr;
use crate::gyroscope_bias::GyroscopeBias;
use crate::quaternion::Quaternion;
use crate::symbol::Symbol;
use crate::symbolic::symbolic_matrix;
use nalgebra::{SMatrix, SVector};

/// The number of states: quaternion (4), gyroscope bias (3).
pub const STATES: usize = 7;

/// The number of quaternion states, stored first in the state vector.
pub const QUATERNION_STATES: usize = 4;

/// The number of gyroscope bias states, stored after the quaternion.
pub const BIAS_STATES: usize = 3;

/// The number of control inputs: angular rates around x, y and z.
pub const CONTROLS: usize = 3;

/// The symbolic inputs of the prediction step.
///
/// Every placeholder the generated equations may reference is declared here,
/// with the fixed shapes the consuming program must supply.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    state: SVector<Expr, STATES>,
    rate: AngularRate<Expr>,
    time_step: Expr,
    covariance: SMatrix<Expr, STATES, STATES>,
    process_noise: SMatrix<Expr, STATES, STATES>,
}

impl SymbolRegistry {
    /// Declares all symbols.
    pub fn new() -> Self {
        Self {
            state: SVector::from(Self::state_symbols().map(Expr::symbol)),
            rate: AngularRate::from([0, 1, 2].map(|i| Expr::symbol(Symbol::Rate(i)))),
            time_step: Expr::symbol(Symbol::TimeStep),
            covariance: symbolic_matrix(Symbol::Covariance),
            process_noise: symbolic_matrix(Symbol::ProcessNoise),
        }
    }

    /// The 7×1 state vector `x`.
    pub fn state(&self) -> &SVector<Expr, STATES> {
        &self.state
    }

    /// The 3×1 angular rate input `w`.
    pub fn rate(&self) -> SVector<Expr, CONTROLS> {
        self.rate.to_vector()
    }

    /// The angular rate input `w` as a rate vector.
    pub fn angular_rate(&self) -> AngularRate<Expr> {
        self.rate.clone()
    }

    /// The time step `dT`.
    pub fn time_step(&self) -> &Expr {
        &self.time_step
    }

    /// The 7×7 prior estimate covariance `P`.
    pub fn covariance(&self) -> &SMatrix<Expr, STATES, STATES> {
        &self.covariance
    }

    /// The 7×7 process noise covariance `Q`.
    pub fn process_noise(&self) -> &SMatrix<Expr, STATES, STATES> {
        &self.process_noise
    }

    /// The orientation estimate, `x[0..4]`.
    pub fn quaternion(&self) -> Quaternion<Expr> {
        Quaternion::new(
            self.state[0].clone(),
            self.state[1].clone(),
            self.state[2].clone(),
            self.state[3].clone(),
        )
    }

    /// The gyroscope bias estimate, `x[4..7]`.
    pub fn bias(&self) -> GyroscopeBias<Expr> {
        GyroscopeBias::new(
            self.state[QUATERNION_STATES].clone(),
            self.state[QUATERNION_STATES + 1].clone(),
            self.state[QUATERNION_STATES + 2].clone(),
        )
    }

    /// The quaternion component symbols, scalar part first.
    pub fn quaternion_symbols() -> [Symbol; QUATERNION_STATES] {
        [
            Symbol::State(0),
            Symbol::State(1),
            Symbol::State(2),
            Symbol::State(3),
        ]
    }

    /// All state symbols in state vector order.
    pub fn state_symbols() -> [Symbol; STATES] {
        core::array::from_fn(Symbol::State)
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let registry = SymbolRegistry::new();
        assert_eq!(QUATERNION_STATES + BIAS_STATES, STATES);
        assert_eq!(registry.state()[6], Expr::symbol(Symbol::State(6)));
        assert_eq!(registry.rate()[2], Expr::symbol(Symbol::Rate(2)));
        assert_eq!(registry.angular_rate().omega_y, Expr::symbol(Symbol::Rate(1)));
    }

    #[test]
    fn test_state_order() {
        let registry = SymbolRegistry::new();
        let q = registry.quaternion();
        assert_eq!(q.a, Expr::symbol(Symbol::State(0)));
        assert_eq!(q.d, Expr::symbol(Symbol::State(3)));

        let b = registry.bias();
        assert_eq!(b.omega_x, Expr::symbol(Symbol::State(4)));
        assert_eq!(b.omega_z, Expr::symbol(Symbol::State(6)));
    }

    #[test]
    fn test_matrix_symbols() {
        let registry = SymbolRegistry::new();
        assert_eq!(
            registry.covariance()[(2, 5)],
            Expr::symbol(Symbol::Covariance(2, 5))
        );
        assert_eq!(
            registry.process_noise()[(6, 0)],
            Expr::symbol(Symbol::ProcessNoise(6, 0))
        );
        assert_eq!(registry.time_step(), &Expr::symbol(Symbol::TimeStep));
    }

    #[test]
    fn test_symbol_lists() {
        assert_eq!(SymbolRegistry::state_symbols()[6], Symbol::State(6));
        assert_eq!(
            SymbolRegistry::quaternion_symbols(),
            SymbolRegistry::state_symbols()[..QUATERNION_STATES]
        );
    }
}
