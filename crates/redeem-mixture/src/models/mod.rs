pub mod factory;
pub mod gaussian;
pub mod mixture_trait;

pub use factory::{build_mixture, default_factory, MixtureFactory};
pub use gaussian::{GaussianMixture, GaussianMixtureParams};
pub use mixture_trait::MixtureModel;
