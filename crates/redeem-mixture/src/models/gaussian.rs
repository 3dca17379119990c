use anyhow::{anyhow, bail, Context};
use linfa::traits::Fit;
use linfa::DatasetBase;
use linfa_clustering::GaussianMixtureModel;
use nalgebra::DVector;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayView3};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use statrs::distribution::{Continuous, MultivariateNormal};

use crate::models::mixture_trait::MixtureModel;
use crate::stats::log_sum_exp;

/// Seed used when none is configured, so repeated fits are reproducible.
const DEFAULT_SEED: u64 = 42;

/// Hyper-parameters of a finite Gaussian mixture.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianMixtureParams {
    pub n_components: usize,
    pub n_runs: u64,
    pub max_n_iterations: u64,
    pub tolerance: f64,
    pub reg_covariance: f64,
    pub seed: Option<u64>,
}

impl Default for GaussianMixtureParams {
    fn default() -> Self {
        Self {
            n_components: 1,
            n_runs: 1,
            max_n_iterations: 100,
            tolerance: 1e-3,
            reg_covariance: 1e-6,
            seed: None,
        }
    }
}

/// Parameters learned by a successful fit, kept in the form scoring needs.
#[derive(Debug, Clone)]
struct FittedComponents {
    log_weights: Array1<f64>,
    means: Array2<f64>,
    components: Vec<MultivariateNormal>,
}

impl FittedComponents {
    /// Build one normal per component. A covariance that is not positive
    /// definite is rejected by `MultivariateNormal::new`.
    fn new(
        weights: ArrayView1<f64>,
        means: ArrayView2<f64>,
        covariances: ArrayView3<f64>,
    ) -> anyhow::Result<Self> {
        let components = means
            .outer_iter()
            .zip(covariances.outer_iter())
            .enumerate()
            .map(|(k, (mean, covariance))| {
                MultivariateNormal::new(mean.to_vec(), covariance.iter().copied().collect())
                    .map_err(|e| anyhow!("Component {} has a degenerate covariance: {:?}", k, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(FittedComponents {
            log_weights: weights.mapv(f64::ln),
            means: means.to_owned(),
            components,
        })
    }

    fn log_likelihood(&self, sample: ArrayView1<f64>, per_component: &mut [f64]) -> f64 {
        let point = DVector::from_iterator(sample.len(), sample.iter().copied());
        for (k, component) in self.components.iter().enumerate() {
            per_component[k] = self.log_weights[k] + component.ln_pdf(&point);
        }
        log_sum_exp(per_component)
    }
}

/// Finite Gaussian mixture with full covariances.
///
/// EM runs in `linfa-clustering`; this type caches the learned parameters and
/// evaluates per-sample log-likelihoods from them.
#[derive(Debug, Clone)]
pub struct GaussianMixture {
    params: GaussianMixtureParams,
    fitted: Option<FittedComponents>,
}

impl GaussianMixture {
    pub fn new(params: GaussianMixtureParams) -> Self {
        GaussianMixture {
            params,
            fitted: None,
        }
    }

    pub fn params(&self) -> &GaussianMixtureParams {
        &self.params
    }

    pub fn n_components(&self) -> usize {
        self.params.n_components
    }

    /// Feature dimension seen during fit.
    pub fn n_features(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.means.ncols())
    }

    pub fn weights(&self) -> Option<Array1<f64>> {
        self.fitted.as_ref().map(|f| f.log_weights.mapv(f64::exp))
    }

    pub fn means(&self) -> Option<&Array2<f64>> {
        self.fitted.as_ref().map(|f| &f.means)
    }
}

impl MixtureModel for GaussianMixture {
    fn fit(&mut self, x: ArrayView2<f64>) -> anyhow::Result<()> {
        self.fitted = None;

        if x.nrows() == 0 {
            bail!("Cannot fit a Gaussian mixture on zero samples");
        }
        if x.nrows() < self.params.n_components {
            bail!(
                "Need at least {} samples to fit {} components, got {}",
                self.params.n_components,
                self.params.n_components,
                x.nrows()
            );
        }

        let rng = Xoshiro256Plus::seed_from_u64(self.params.seed.unwrap_or(DEFAULT_SEED));
        let dataset = DatasetBase::from(x.to_owned());
        let gmm = GaussianMixtureModel::<f64>::params_with_rng(self.params.n_components, rng)
            .n_runs(self.params.n_runs)
            .max_n_iterations(self.params.max_n_iterations)
            .tolerance(self.params.tolerance)
            .reg_covariance(self.params.reg_covariance)
            .fit(&dataset)
            .context("Gaussian mixture EM failed")?;

        let fitted = FittedComponents::new(
            gmm.weights().view(),
            gmm.means().view(),
            gmm.covariances().view(),
        )?;

        log::trace!(
            "Fitted Gaussian mixture: {} components on {} samples x {} features",
            fitted.components.len(),
            x.nrows(),
            x.ncols()
        );

        self.fitted = Some(fitted);
        Ok(())
    }

    fn score_samples(&self, x: ArrayView2<f64>) -> anyhow::Result<Array1<f64>> {
        let fitted = match &self.fitted {
            Some(fitted) => fitted,
            None => bail!("Gaussian mixture has not been fit"),
        };
        if x.ncols() != fitted.means.ncols() {
            bail!(
                "Expected {} features, got {}",
                fitted.means.ncols(),
                x.ncols()
            );
        }

        let mut per_component = vec![0.0f64; fitted.components.len()];
        Ok(x.outer_iter()
            .map(|sample| fitted.log_likelihood(sample, &mut per_component))
            .collect::<Array1<f64>>())
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn name(&self) -> &str {
        "gaussian_mixture"
    }
}
