use super::traits::Fit;
use crate::datasets::{DatasetBase, DesignMatrix, Targets};
use std::error::Error;

/// Unchecked estimator settings.
///
/// [`OlsParams`](super::hyperparams::OlsParams) is built freely and only
/// becomes an [`OlsValidParams`](super::hyperparams::OlsValidParams) once its
/// tolerance has been checked. Anything implementing [`Fit`] on the checked
/// settings can be fitted straight from the unchecked ones.
///
/// `check_ref` and `check` apply the same rules.
pub trait ParamGuard {
    /// Settings that passed validation
    type Checked;
    /// Why validation failed
    type Error: Error;

    /// Validates and borrows the checked settings.
    fn check_ref(&self) -> Result<&Self::Checked, Self::Error>;

    /// Validates and consumes the builder.
    fn check(self) -> Result<Self::Checked, Self::Error>;

    /// Panics on invalid settings; meant for tests and literals.
    fn check_unwrap(self) -> Self::Checked
    where
        Self: Sized,
    {
        self.check().unwrap()
    }
}

/// Fitting unchecked settings validates them first; a validation error is
/// converted into the error type of the fit.
impl<DM: DesignMatrix, T: Targets, E, P: ParamGuard> Fit<DM, T, E> for P
where
    P::Checked: Fit<DM, T, E>,
    E: Error + From<P::Error>,
{
    type Object = <<P as ParamGuard>::Checked as Fit<DM, T, E>>::Object;

    fn fit(&self, dataset: &DatasetBase<DM, T>) -> Result<Self::Object, E> {
        self.check_ref()?.fit(dataset)
    }
}
