use crate::datasets::{DatasetBase, DesignMatrix, Targets};

/// Turns estimator settings into a fitted model.
///
/// Implemented on [`OlsValidParams`](super::hyperparams::OlsValidParams), and
/// through [`ParamGuard`](super::param_guard::ParamGuard) on the unchecked
/// builder, so `OrdinaryLeastSquares::params().fit(&dataset)` returns a
/// fitted [`OrdinaryLeastSquares`](super::ols::OrdinaryLeastSquares) without
/// touching an existing estimator.
pub trait Fit<DM: DesignMatrix, T: Targets, E: std::error::Error> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<DM, T>) -> Result<Self::Object, E>;
}
