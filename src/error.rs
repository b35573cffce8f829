use core::fmt::{Display, Formatter};

/// An error raised while simplifying an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimplifyError {
    /// The expanded expression has more terms than the configured limit.
    TooManyTerms {
        /// The number of terms after expansion.
        terms: usize,
        /// The configured limit.
        limit: usize,
    },
}

impl Display for SimplifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SimplifyError::TooManyTerms { terms, limit } => write!(
                f,
                "expression expands to {terms} terms, exceeding the limit of {limit}"
            ),
        }
    }
}

impl std::error::Error for SimplifyError {}

/// An error raised while generating the equations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// An entry of an emitted matrix could not be simplified.
    Simplify {
        /// The destination array, e.g. `Px`.
        destination: String,
        /// The row-major index of the failing entry.
        index: usize,
        /// The underlying cause.
        source: SimplifyError,
    },
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            GenerateError::Simplify {
                destination,
                index,
                source,
            } => write!(f, "failed to emit {destination}[{index}]: {source}"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Simplify { source, .. } => Some(source),
        }
    }
}
