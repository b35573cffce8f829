//! A numeric Kalman filter prediction step, used to cross-check the
//! generated equations.

use crate::registry::{CONTROLS, STATES};
use minikalman::buffers::types::*;
use minikalman::matrix::Matrix as _;
use minikalman::matrix::MatrixDataType;
use minikalman::prelude::*;
use minikalman::regular::{Control, ControlBuilder, RegularKalman, RegularKalmanBuilder};
use nalgebra::SMatrix;

type OwnedKalmanFilter<T> = RegularKalman<
    STATES,
    T,
    StateTransitionMatrixMutBuffer<
        STATES,
        T,
        MatrixDataArray<STATES, STATES, { STATES * STATES }, T>,
    >,
    StateVectorBuffer<STATES, T, MatrixDataArray<STATES, 1, STATES, T>>,
    EstimateCovarianceMatrixBuffer<
        STATES,
        T,
        MatrixDataArray<STATES, STATES, { STATES * STATES }, T>,
    >,
    DirectProcessNoiseCovarianceMatrixMutBuffer<
        STATES,
        T,
        MatrixDataArray<STATES, STATES, { STATES * STATES }, T>,
    >,
    PredictedStateEstimateVectorBuffer<STATES, T, MatrixDataArray<STATES, 1, STATES, T>>,
    TemporaryStateMatrixBuffer<STATES, T, MatrixDataArray<STATES, STATES, { STATES * STATES }, T>>,
>;

type OwnedControlInput<T> = Control<
    STATES,
    CONTROLS,
    T,
    ControlMatrixMutBuffer<
        STATES,
        CONTROLS,
        T,
        MatrixDataArray<STATES, CONTROLS, { STATES * CONTROLS }, T>,
    >,
    ControlVectorBuffer<CONTROLS, T, MatrixDataArray<CONTROLS, 1, CONTROLS, T>>,
    ControlProcessNoiseCovarianceMatrixMutBuffer<
        CONTROLS,
        T,
        MatrixDataArray<CONTROLS, CONTROLS, { CONTROLS * CONTROLS }, T>,
    >,
    TemporaryBQMatrixBuffer<
        STATES,
        CONTROLS,
        T,
        MatrixDataArray<STATES, CONTROLS, { STATES * CONTROLS }, T>,
    >,
>;

/// Runs `x' = A·x + B·u`, `P' = A·P·Aᵀ + Q` on a regular Kalman filter with
/// a noise-free control input.
pub struct ReferencePredictor<T> {
    filter: OwnedKalmanFilter<T>,
    control: OwnedControlInput<T>,
}

impl<T> ReferencePredictor<T> {
    pub fn new() -> Self
    where
        T: MatrixDataType + Default,
    {
        Self {
            filter: Self::build_filter(),
            control: Self::build_control(),
        }
    }

    /// Loads the numeric inputs and performs one prediction step, returning
    /// the predicted state and the row-major predicted covariance.
    pub fn predict(
        &mut self,
        state_transition: &SMatrix<T, STATES, STATES>,
        control_matrix: &SMatrix<T, STATES, CONTROLS>,
        control_vector: &[T; CONTROLS],
        state: &[T; STATES],
        covariance: &SMatrix<T, STATES, STATES>,
        process_noise: &SMatrix<T, STATES, STATES>,
    ) -> ([T; STATES], [T; STATES * STATES])
    where
        T: MatrixDataType,
    {
        self.filter.state_transition_mut().apply(|mat| {
            for r in 0..STATES {
                for c in 0..STATES {
                    mat.set_at(r, c, state_transition[(r, c)]);
                }
            }
        });
        self.filter.state_vector_mut().apply(|vec| {
            for (i, &value) in state.iter().enumerate() {
                vec.set_row(i, value);
            }
        });
        self.filter.estimate_covariance_mut().apply(|mat| {
            for r in 0..STATES {
                for c in 0..STATES {
                    mat.set_at(r, c, covariance[(r, c)]);
                }
            }
        });
        self.filter.direct_process_noise_mut().apply(|mat| {
            for r in 0..STATES {
                for c in 0..STATES {
                    mat.set_at(r, c, process_noise[(r, c)]);
                }
            }
        });

        self.control.control_matrix_mut().apply(|mat| {
            for r in 0..STATES {
                for c in 0..CONTROLS {
                    mat.set_at(r, c, control_matrix[(r, c)]);
                }
            }
        });
        self.control.control_vector_mut().apply(|vec| {
            for (i, &value) in control_vector.iter().enumerate() {
                vec.set_row(i, value);
            }
        });

        self.filter.predict();
        self.filter.control(&mut self.control);

        let next_state = self
            .filter
            .state_vector()
            .inspect(|vec| core::array::from_fn(|i| vec.get_row(i)));
        let next_covariance = self
            .filter
            .estimate_covariance()
            .inspect(|mat| core::array::from_fn(|i| mat.get_at(i / STATES, i % STATES)));
        (next_state, next_covariance)
    }

    fn build_filter() -> OwnedKalmanFilter<T>
    where
        T: MatrixDataType + Default,
    {
        let zero = T::default();

        let state_vec =
            StateVectorBuffer::<STATES, T, _>::new(MatrixData::new_array::<STATES, 1, STATES, T>(
                [zero; STATES],
            ));

        let state_transition =
            StateTransitionMatrixMutBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));

        let estimate_covariance =
            EstimateCovarianceMatrixBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));

        let process_noise = DirectProcessNoiseCovarianceMatrixMutBuffer::<STATES, T, _>::new(
            MatrixData::new_array::<STATES, STATES, { STATES * STATES }, T>(
                [zero; { STATES * STATES }],
            ),
        );

        let predicted_state =
            PredictedStateEstimateVectorBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                1,
                STATES,
                T,
            >([zero; STATES]));

        let temp_state_matrix =
            TemporaryStateMatrixBuffer::<STATES, T, _>::new(MatrixData::new_array::<
                STATES,
                STATES,
                { STATES * STATES },
                T,
            >(
                [zero; { STATES * STATES }]
            ));

        RegularKalmanBuilder::new::<STATES, T>(
            state_transition,
            state_vec,
            estimate_covariance,
            process_noise,
            predicted_state,
            temp_state_matrix,
        )
    }

    fn build_control() -> OwnedControlInput<T>
    where
        T: MatrixDataType + Default,
    {
        let zero = T::default();

        let control_vector = ControlVectorBuffer::<CONTROLS, T, _>::new(MatrixData::new_array::<
            CONTROLS,
            1,
            CONTROLS,
            T,
        >([zero; CONTROLS]));

        let control_matrix =
            ControlMatrixMutBuffer::<STATES, CONTROLS, T, _>::new(MatrixData::new_array::<
                STATES,
                CONTROLS,
                { STATES * CONTROLS },
                T,
            >(
                [zero; STATES * CONTROLS]
            ));

        // The rate is applied exactly; all uncertainty lives in Q.
        let mut process_noise = ControlProcessNoiseCovarianceMatrixMutBuffer::<CONTROLS, T, _>::new(
            MatrixData::new_array::<CONTROLS, CONTROLS, { CONTROLS * CONTROLS }, T>(
                [zero; CONTROLS * CONTROLS],
            ),
        );
        process_noise.make_scalar(zero);

        let temp = TemporaryBQMatrixBuffer::<STATES, CONTROLS, T, _>::new(MatrixData::new_array::<
            STATES,
            CONTROLS,
            { STATES * CONTROLS },
            T,
        >(
            [zero; STATES * CONTROLS],
        ));

        ControlBuilder::new::<STATES, CONTROLS, T>(
            control_matrix,
            control_vector,
            process_noise,
            temp,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::propagate_registry_covariance;
    use crate::registry::SymbolRegistry;
    use crate::symbol::Symbol;
    use crate::transition::TransitionModel;
    use approx::assert_abs_diff_eq;

    struct Scenario {
        time_step: f32,
        state: [f32; STATES],
        rates: [f32; CONTROLS],
        covariance: SMatrix<f32, STATES, STATES>,
        process_noise: SMatrix<f32, STATES, STATES>,
    }

    impl Scenario {
        fn lookup(&self, symbol: Symbol) -> f32 {
            match symbol {
                Symbol::TimeStep => self.time_step,
                Symbol::State(i) => self.state[i],
                Symbol::Rate(i) => self.rates[i],
                Symbol::Covariance(r, c) => self.covariance[(r, c)],
                Symbol::ProcessNoise(r, c) => self.process_noise[(r, c)],
            }
        }
    }

    fn check_against_reference(scenario: &Scenario) {
        let registry = SymbolRegistry::new();
        let model = TransitionModel::assemble(&registry);
        let px = propagate_registry_covariance(&registry, &model);

        let lookup = |s: Symbol| scenario.lookup(s);
        let a = model.state_transition.map(|e| e.evaluate(&lookup));
        let b = model.control.map(|e| e.evaluate(&lookup));
        let u = scenario.rates.map(|w| 0.5 * scenario.time_step * w);

        let mut reference = ReferencePredictor::<f32>::new();
        let (next_state, next_covariance) = reference.predict(
            &a,
            &b,
            &u,
            &scenario.state,
            &scenario.covariance,
            &scenario.process_noise,
        );

        for (e, expected) in model.next_state.iter().zip(next_state) {
            let generated: f32 = e.evaluate(&lookup);
            assert_abs_diff_eq!(generated, expected, epsilon = 1e-5);
        }

        for (i, expected) in next_covariance.into_iter().enumerate() {
            let generated: f32 = px[(i / STATES, i % STATES)].evaluate(&lookup);
            assert_abs_diff_eq!(generated, expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_tilted_orientation_with_bias() {
        check_against_reference(&Scenario {
            time_step: 0.02,
            state: [0.9, 0.1, -0.2, 0.3, 0.01, -0.02, 0.005],
            rates: [0.3, -0.1, 0.6],
            covariance: SMatrix::from_fn(|r, c| {
                if r == c {
                    0.1 + 0.01 * r as f32
                } else {
                    0.001 * (r + c) as f32
                }
            }),
            process_noise: SMatrix::from_fn(|r, c| {
                if r == c {
                    0.001
                } else {
                    0.0
                }
            }),
        });
    }

    #[test]
    fn test_identity_orientation_yaw_rate() {
        check_against_reference(&Scenario {
            time_step: 0.1,
            state: [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            rates: [0.0, 0.0, 1.0],
            covariance: SMatrix::from_diagonal_element(0.1),
            process_noise: SMatrix::from_diagonal_element(0.01),
        });
    }
}
