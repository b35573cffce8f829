use crate::expr::Expr;
use crate::kinematics::rate_operator;
use crate::registry::{SymbolRegistry, BIAS_STATES, CONTROLS, QUATERNION_STATES, STATES};
use log::debug;
use nalgebra::{SMatrix, SVector};

/// The linearized process model of the orientation/bias filter.
///
/// The true body rate is the measured rate minus the gyroscope bias, so with
/// `dq/dt = ½ · M(q) · (w - b)` a first-order step of length `dT` becomes
///
/// ```text
/// q' = q + dT/2 · M(q) · w - dT/2 · M(q) · b
/// b' = b
/// ```
///
/// The bias term is folded into the state transition matrix `A` (hence the
/// negative sign on its coupling block), the measured rate enters through the
/// control matrix `B`.
#[derive(Debug, Clone)]
pub struct TransitionModel {
    /// The 7×7 state transition matrix `A`.
    pub state_transition: SMatrix<Expr, STATES, STATES>,
    /// The 7×3 control matrix `B`.
    pub control: SMatrix<Expr, STATES, CONTROLS>,
    /// The 7×1 predicted state `nx = A·x + dT/2 · B·w`.
    pub next_state: SVector<Expr, STATES>,
}

impl TransitionModel {
    /// Assembles `A`, `B` and the next state expression from the registry's symbols.
    pub fn assemble(registry: &SymbolRegistry) -> Self {
        let half_dt = Expr::constant(0.5) * registry.time_step().clone();
        let operator = rate_operator(&registry.quaternion());

        let state_transition = Self::build_state_transition(&operator, &half_dt);
        let control = Self::build_control(&operator);

        let free = &state_transition * registry.state();
        let forced = &control * registry.rate() * half_dt;
        let next_state = free + forced;

        debug!(
            "Assembled transition model: A {:?}, B {:?}, nx {:?}",
            state_transition.shape(),
            control.shape(),
            next_state.shape()
        );

        Self {
            state_transition,
            control,
            next_state,
        }
    }

    /// `A = [[I₄, -dT/2 · M(q)], [0₃ₓ₄, I₃]]`
    fn build_state_transition(
        operator: &SMatrix<Expr, QUATERNION_STATES, CONTROLS>,
        half_dt: &Expr,
    ) -> SMatrix<Expr, STATES, STATES> {
        let mut a = SMatrix::<Expr, STATES, STATES>::zeros();
        a.fixed_view_mut::<QUATERNION_STATES, QUATERNION_STATES>(0, 0)
            .copy_from(&SMatrix::<Expr, QUATERNION_STATES, QUATERNION_STATES>::identity());
        a.fixed_view_mut::<QUATERNION_STATES, BIAS_STATES>(0, QUATERNION_STATES)
            .copy_from(&(operator * -half_dt.clone()));
        a.fixed_view_mut::<BIAS_STATES, BIAS_STATES>(QUATERNION_STATES, QUATERNION_STATES)
            .copy_from(&SMatrix::<Expr, BIAS_STATES, BIAS_STATES>::identity());
        a
    }

    /// `B = [[M(q)], [0₃ₓ₃]]`
    fn build_control(
        operator: &SMatrix<Expr, QUATERNION_STATES, CONTROLS>,
    ) -> SMatrix<Expr, STATES, CONTROLS> {
        let mut b = SMatrix::<Expr, STATES, CONTROLS>::zeros();
        b.fixed_view_mut::<QUATERNION_STATES, CONTROLS>(0, 0)
            .copy_from(operator);
        b
    }

    /// The quaternion block `A[0..4, 0..4]`.
    pub fn quaternion_block(&self) -> SMatrix<Expr, QUATERNION_STATES, QUATERNION_STATES> {
        self.state_transition
            .fixed_view::<QUATERNION_STATES, QUATERNION_STATES>(0, 0)
            .into_owned()
    }

    /// The bias-to-quaternion coupling block `A[0..4, 4..7]`.
    pub fn bias_coupling_block(&self) -> SMatrix<Expr, QUATERNION_STATES, BIAS_STATES> {
        self.state_transition
            .fixed_view::<QUATERNION_STATES, BIAS_STATES>(0, QUATERNION_STATES)
            .into_owned()
    }

    /// The quaternion-to-bias block `A[4..7, 0..4]`.
    pub fn orientation_to_bias_block(&self) -> SMatrix<Expr, BIAS_STATES, QUATERNION_STATES> {
        self.state_transition
            .fixed_view::<BIAS_STATES, QUATERNION_STATES>(QUATERNION_STATES, 0)
            .into_owned()
    }

    /// The bias block `A[4..7, 4..7]`.
    pub fn bias_block(&self) -> SMatrix<Expr, BIAS_STATES, BIAS_STATES> {
        self.state_transition
            .fixed_view::<BIAS_STATES, BIAS_STATES>(QUATERNION_STATES, QUATERNION_STATES)
            .into_owned()
    }

    /// The rate-to-quaternion block `B[0..4, 0..3]`.
    pub fn control_quaternion_block(&self) -> SMatrix<Expr, QUATERNION_STATES, CONTROLS> {
        self.control
            .fixed_view::<QUATERNION_STATES, CONTROLS>(0, 0)
            .into_owned()
    }
}
