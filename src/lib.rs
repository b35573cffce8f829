//! Generates the prediction equations of an extended Kalman filter that
//! tracks an orientation quaternion together with a gyroscope bias.
//!
//! The process model is derived symbolically and printed as C-style
//! assignments to the predicted state `nx` and covariance `Px`, ready to be
//! pasted into an embedded filter implementation.

// Ensure allow(unsafe_code) / forbid(unsafe_code) markers.
#![cfg_attr(feature = "unsafe", allow(unsafe_code))]
#![cfg_attr(not(feature = "unsafe"), forbid(unsafe_code))]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod angular_rate;
mod covariance;
mod emit;
mod error;
mod expr;
mod generator;
mod gyroscope_bias;
mod kinematics;
mod macros;
mod num_traits;
mod polynomial;
mod quaternion;
#[cfg(test)]
mod reference_filter;
mod registry;
mod simplify;
mod symbol;
mod symbolic;
mod transition;

pub use crate::angular_rate::AngularRate;
pub use crate::covariance::{propagate_covariance, propagate_registry_covariance};
pub use crate::emit::{CodeEmitter, EmitterConfig, ExpressionWriter, IndexStyle};
pub use crate::error::{GenerateError, SimplifyError};
pub use crate::expr::Expr;
pub use crate::generator::{
    GeneratedEquations, Generator, GeneratorConfig, NEXT_COVARIANCE_NAME, NEXT_STATE_NAME,
};
pub use crate::gyroscope_bias::GyroscopeBias;
pub use crate::kinematics::rate_operator;
pub use crate::polynomial::{Monomial, Polynomial};
pub use crate::quaternion::Quaternion;
pub use crate::registry::{SymbolRegistry, BIAS_STATES, CONTROLS, QUATERNION_STATES, STATES};
pub use crate::simplify::{Simplifier, SimplifierConfig, DEFAULT_MAX_TERMS};
pub use crate::symbol::Symbol;
pub use crate::symbolic::{jacobian, symbolic_matrix, SymbolicMatrix};
pub use crate::transition::TransitionModel;

pub use crate::num_traits::*;
