use ndarray::{Array1, ArrayView2};

/// Density model fitted on the samples of a single class.
///
/// This is the contract the per-class classifier depends on. Rows of `x` are
/// samples, columns are features.
pub trait MixtureModel: Send + Sync {
    /// Fit the model on the given samples. Failures (too few samples,
    /// degenerate data) are returned to the caller unchanged.
    fn fit(&mut self, x: ArrayView2<f64>) -> anyhow::Result<()>;

    /// Per-sample log-likelihood. Only defined once `is_fitted` is true.
    fn score_samples(&self, x: ArrayView2<f64>) -> anyhow::Result<Array1<f64>>;

    /// Whether the model has ever been fit successfully.
    fn is_fitted(&self) -> bool;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "mixture"
    }
}
