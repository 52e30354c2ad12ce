use ndarray::{ArrayBase, ArrayView1, ArrayView2, Ix1, Ix2};

mod impl_datasets;
mod impl_design_matrix;
mod impl_targets;


/// A dataset pairs a design matrix with the targets it must explain, row for
/// row. The estimators only ever borrow it.
pub struct DatasetBase<DM, T>
where
    DM: DesignMatrix,
    T: Targets,
{
    pub design_matrix: DM,
    pub targets: T,
}

/// A dataset with a dense design matrix and a single dense target vector.
pub type DenseDataset<D, T> = DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>;

/// The explanatory variables, one row per observation and one column per
/// feature.
pub trait DesignMatrix: Sized {
    type Elem;

    fn n_samples(&self) -> usize;
    fn n_features(&self) -> usize;

    fn as_design(&self) -> ArrayView2<Self::Elem>;
}

/// The explained variable, one entry per observation.
pub trait Targets: Sized {
    type Elem;

    fn n_samples(&self) -> usize;

    fn as_targets(&self) -> ArrayView1<Self::Elem>;
}
