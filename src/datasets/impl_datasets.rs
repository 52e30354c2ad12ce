use super::{DatasetBase, DesignMatrix, Targets};
use crate::error::{LinearModelError, Result};
use crate::Float;
use ndarray::{ArrayBase, Data, Ix1, Ix2};

/// This implementation block provides a method for the creation of datasets
/// from dense matrices.
impl<F: Float, D: Data<Elem = F>, S: Data<Elem = F>> From<(ArrayBase<D, Ix2>, ArrayBase<S, Ix1>)>
    for DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>
{
    fn from(data: (ArrayBase<D, Ix2>, ArrayBase<S, Ix1>)) -> Self {
        DatasetBase {
            design_matrix: data.0,
            targets: data.1,
        }
    }
}

/// This implementation block provides methods to get record and target objects
/// from the dataset.
impl<DM: DesignMatrix, T: Targets> DatasetBase<DM, T> {
    /// This method instantiates a new dataset from a design matrix and targets.
    pub fn new(design_matrix: DM, targets: T) -> DatasetBase<DM, T> {
        DatasetBase {
            design_matrix,
            targets,
        }
    }

    /// This method is a getter for the targets.
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// This method is a getter for the design matrix.
    pub fn design_matrix(&self) -> &DM {
        &self.design_matrix
    }

    pub fn n_samples(&self) -> usize {
        self.design_matrix.n_samples()
    }

    pub fn n_features(&self) -> usize {
        self.design_matrix.n_features()
    }
}

impl<F: Float, DM: DesignMatrix<Elem = F>, T: Targets<Elem = F>> DatasetBase<DM, T> {
    /// Checks that the dataset can be handed to an estimator: at least one
    /// observation, as many targets as rows, and no missing (non-finite)
    /// value anywhere.
    pub fn validate(&self) -> Result<()> {
        let n_samples = self.design_matrix.n_samples();
        if n_samples == 0 {
            return Err(LinearModelError::InvalidInput(
                "the design matrix has no observation".to_string(),
            ));
        }
        if self.targets.n_samples() != n_samples {
            return Err(LinearModelError::shape_mismatch(
                "number of targets",
                n_samples,
                self.targets.n_samples(),
            ));
        }
        if self.design_matrix.as_design().iter().any(|x| !x.is_finite()) {
            return Err(LinearModelError::InvalidInput(
                "the design matrix contains missing or non-finite values".to_string(),
            ));
        }
        if self.targets.as_targets().iter().any(|y| !y.is_finite()) {
            return Err(LinearModelError::InvalidInput(
                "the targets contain missing or non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}
