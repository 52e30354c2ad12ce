#[cfg(test)]
mod tests;

pub mod hyperparams;
pub mod ols;
pub mod param_guard;
pub mod report;
pub mod traits;
