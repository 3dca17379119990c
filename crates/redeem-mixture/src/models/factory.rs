use std::sync::Arc;

use crate::config::MixtureType;
use crate::models::gaussian::{GaussianMixture, GaussianMixtureParams};
use crate::models::mixture_trait::MixtureModel;

/// Constructs a fresh, unfit mixture from the forwarded parameter bag.
/// Called once per class on every `fit`.
pub type MixtureFactory = Arc<dyn Fn(&MixtureType) -> Box<dyn MixtureModel> + Send + Sync>;

/// Build a boxed mixture model from a `MixtureType`.
pub fn build_mixture(params: &MixtureType) -> Box<dyn MixtureModel> {
    match params {
        MixtureType::Gaussian {
            n_components,
            n_runs,
            max_n_iterations,
            tolerance,
            reg_covariance,
            seed,
        } => Box::new(GaussianMixture::new(GaussianMixtureParams {
            n_components: *n_components,
            n_runs: *n_runs,
            max_n_iterations: *max_n_iterations,
            tolerance: *tolerance,
            reg_covariance: *reg_covariance,
            seed: *seed,
        })),
    }
}

pub fn default_factory() -> MixtureFactory {
    Arc::new(build_mixture)
}
