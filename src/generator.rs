use crate::covariance::propagate_registry_covariance;
use crate::emit::{CodeEmitter, EmitterConfig};
use crate::error::GenerateError;
use crate::expr::Expr;
use crate::registry::{SymbolRegistry, STATES};
use crate::transition::TransitionModel;
use core::fmt::{Display, Formatter};
use log::{debug, info};
use nalgebra::SMatrix;

/// The name of the predicted state array in the generated code.
pub const NEXT_STATE_NAME: &str = "nx";

/// The name of the predicted covariance array in the generated code.
pub const NEXT_COVARIANCE_NAME: &str = "Px";

/// Configuration of the [`Generator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub emitter: EmitterConfig,
}

impl GeneratorConfig {
    pub fn with_emitter(mut self, emitter: EmitterConfig) -> Self {
        self.emitter = emitter;
        self
    }
}

/// Derives the prediction equations and renders them as code.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Assembles the model, propagates the covariance and emits both blocks.
    ///
    /// Either both blocks are produced or an error is returned.
    pub fn generate(&self) -> Result<GeneratedEquations, GenerateError> {
        let registry = SymbolRegistry::new();
        let model = TransitionModel::assemble(&registry);
        let covariance = propagate_registry_covariance(&registry, &model);

        let emitter = CodeEmitter::new(self.config.emitter.clone());
        debug!("Emitting with {:?}", self.config.emitter);

        let state_transition =
            emitter.emit(NEXT_STATE_NAME, "State transition", &model.next_state)?;
        let error_transition =
            emitter.emit(NEXT_COVARIANCE_NAME, "Error transition", &covariance)?;

        info!(
            "Generated {} state and {} covariance assignments",
            model.next_state.len(),
            covariance.len()
        );

        Ok(GeneratedEquations {
            state_transition,
            error_transition,
            model,
            covariance,
        })
    }
}

/// The generated code and the symbolic model it was derived from.
#[derive(Debug, Clone)]
pub struct GeneratedEquations {
    state_transition: String,
    error_transition: String,
    model: TransitionModel,
    covariance: SMatrix<Expr, STATES, STATES>,
}

impl GeneratedEquations {
    /// The `// State transition` block assigning `nx`.
    pub fn state_transition(&self) -> &str {
        &self.state_transition
    }

    /// The `// Error transition` block assigning `Px`.
    pub fn error_transition(&self) -> &str {
        &self.error_transition
    }

    /// The assembled transition model behind the `nx` block.
    pub fn model(&self) -> &TransitionModel {
        &self.model
    }

    /// The symbolic predicted covariance `A·P·Aᵀ + Q`.
    pub fn covariance(&self) -> &SMatrix<Expr, STATES, STATES> {
        &self.covariance
    }
}

impl Display for GeneratedEquations {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.state_transition)?;
        f.write_str(&self.error_transition)
    }
}
