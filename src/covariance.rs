use crate::expr::Expr;
use crate::registry::{SymbolRegistry, STATES};
use crate::transition::TransitionModel;
use log::debug;
use nalgebra::SMatrix;

/// Propagates the estimate covariance through the linearized process model:
/// `Px = A·P·Aᵀ + Q`.
///
/// `P` and `Q` are taken as opaque matrices; symmetry is not exploited, so the
/// consumer must supply symmetric values to obtain a symmetric result.
pub fn propagate_covariance<const N: usize>(
    state_transition: &SMatrix<Expr, N, N>,
    covariance: &SMatrix<Expr, N, N>,
    process_noise: &SMatrix<Expr, N, N>,
) -> SMatrix<Expr, N, N> {
    let propagated =
        state_transition * covariance * state_transition.transpose() + process_noise;
    debug!("Propagated {N}×{N} covariance");
    propagated
}

/// Propagates the registry's `P` and `Q` through the model's `A`.
pub fn propagate_registry_covariance(
    registry: &SymbolRegistry,
    model: &TransitionModel,
) -> SMatrix<Expr, STATES, STATES> {
    propagate_covariance(
        &model.state_transition,
        registry.covariance(),
        registry.process_noise(),
    )
}
