use thiserror::Error;

/// Simplified `Result` using [`LinearModelError`](crate::LinearModelError) as error type
pub type Result<T> = std::result::Result<T, LinearModelError>;

/// Error variants from hyperparameter construction, descriptive statistics
/// or model estimation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinearModelError {
    /// Mismatched shapes, empty or non-finite input, unknown column names
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A prediction or a diagnostic was requested before a successful fit
    #[error("the model has not been fitted yet")]
    NotFitted,
    #[error("numerical degeneracy: {0}")]
    NumericalDegeneracy(#[from] Degeneracy),
    #[error("invalid tolerance {0}")]
    InvalidTolerance(f32),
}

/// The numerical conditions under which a quantity has no finite, well
/// defined value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Degeneracy {
    #[error("singular or near-singular matrix")]
    SingularMatrix,
    #[error("{n_samples} samples cannot identify {n_parameters} parameters")]
    Underdetermined {
        n_samples: usize,
        n_parameters: usize,
    },
    #[error("non-positive degrees of freedom ({n_samples} samples, {n_columns} columns)")]
    NonPositiveDegreesOfFreedom { n_samples: usize, n_columns: usize },
    #[error("zero variance")]
    ZeroVariance,
    #[error("constant target, the total sum of squares is zero")]
    ConstantTarget,
    #[error("zero standard error for coefficient {index}")]
    ZeroStandardError { index: usize },
    #[error("empty collection")]
    EmptyCollection,
}

impl LinearModelError {
    pub(crate) fn shape_mismatch(what: &str, expected: usize, found: usize) -> Self {
        LinearModelError::InvalidInput(format!("{}: expected {}, found {}", what, expected, found))
    }
}
