use std::fmt;

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::config::{ClassifierConfig, FitFailurePolicy};
use crate::data_handling::{class_indices, infer_n_classes};
use crate::error::{ClassifierError, Result};
use crate::models::factory::{default_factory, MixtureFactory};
use crate::models::mixture_trait::MixtureModel;
use crate::stats::{accuracy, argmax_first, floor_scores, log_sum_exp};

type FitOutcome = (Box<dyn MixtureModel>, anyhow::Result<()>);

/// State produced by a successful `fit`. Replaced wholesale on every fit.
struct ClassifierState {
    n_classes: usize,
    n_features: usize,
    /// One mixture per class id; `mixtures.len() == n_classes`.
    mixtures: Vec<Box<dyn MixtureModel>>,
}

/// A classifier where every class is modelled by its own mixture.
///
/// Classes that have no training samples keep an unfit mixture and score
/// `min_log_likelihood` for every sample. Fitted mixtures are floored at the
/// same value, so an outlier never scores below an unseen class.
pub struct PerClassMixtureClassifier {
    config: ClassifierConfig,
    factory: MixtureFactory,
    state: Option<ClassifierState>,
}

impl PerClassMixtureClassifier {
    /// Create a classifier backed by the default Gaussian mixture.
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_factory(config, default_factory())
    }

    /// Create a classifier that builds its per-class mixtures with `factory`.
    pub fn with_factory(config: ClassifierConfig, factory: MixtureFactory) -> Self {
        PerClassMixtureClassifier {
            config,
            factory,
            state: None,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    pub fn n_classes(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.n_classes)
    }

    pub fn n_features(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.n_features)
    }

    /// Per-class mixtures, indexed by class id.
    pub fn mixtures(&self) -> Option<&[Box<dyn MixtureModel>]> {
        self.state.as_ref().map(|s| s.mixtures.as_slice())
    }

    /// Class ids whose mixture was fit.
    pub fn trained_classes(&self) -> Vec<usize> {
        self.mixtures()
            .map(|mixtures| {
                mixtures
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.is_fitted())
                    .map(|(k, _)| k)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fit one mixture per class.
    ///
    /// # Arguments
    ///
    /// * `x` - Samples, one row per sample.
    /// * `y` - Class id of every row. Ids are dense from 0; ids with no rows
    ///   still get a slot, left untrained.
    ///
    /// # Returns
    ///
    /// The classifier itself, for chaining. On failure under
    /// `FitFailurePolicy::Abort` the previous state is kept.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<&mut Self> {
        if y.is_empty() || x.nrows() == 0 {
            return Err(ClassifierError::EmptyTrainingData);
        }
        if x.nrows() != y.len() {
            return Err(ClassifierError::ShapeMismatch {
                what: "training labels",
                expected: x.nrows(),
                found: y.len(),
            });
        }

        let n_classes = match self.config.n_classes {
            Some(n_classes) => n_classes,
            None => infer_n_classes(y).ok_or(ClassifierError::EmptyTrainingData)?,
        };
        let groups = class_indices(y, n_classes)?;

        log::info!(
            "Fitting {} per-class mixtures on {} samples x {} features",
            n_classes,
            x.nrows(),
            x.ncols()
        );

        let factory = &self.factory;
        let mixture_params = &self.config.mixture;
        let fit_class = |(class, rows): (usize, &Vec<usize>)| -> FitOutcome {
            let mut mixture = factory(mixture_params);
            if rows.is_empty() {
                log::debug!("Class {} has no samples; leaving its mixture untrained", class);
                return (mixture, Ok(()));
            }
            log::trace!(
                "Fitting {} on {} samples of class {}",
                mixture.name(),
                rows.len(),
                class
            );
            let subset = x.select(Axis(0), rows);
            let outcome = mixture.fit(subset.view());
            (mixture, outcome)
        };

        let outcomes: Vec<_> = if self.config.parallel {
            groups.par_iter().enumerate().map(&fit_class).collect()
        } else {
            groups.iter().enumerate().map(&fit_class).collect()
        };

        let mut mixtures = Vec::with_capacity(n_classes);
        for (class, (mixture, outcome)) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(()) => mixtures.push(mixture),
                Err(source) => match self.config.fit_failure {
                    FitFailurePolicy::Abort => {
                        log::error!("Mixture for class {} failed to fit: {:#}", class, source);
                        return Err(ClassifierError::MixtureFit { class, source });
                    }
                    FitFailurePolicy::LeaveUntrained => {
                        log::warn!(
                            "Mixture for class {} failed to fit, leaving it untrained: {:#}",
                            class,
                            source
                        );
                        mixtures.push(factory(mixture_params));
                    }
                },
            }
        }

        self.state = Some(ClassifierState {
            n_classes,
            n_features: x.ncols(),
            mixtures,
        });
        log::debug!("Trained classes: {:?}", self.trained_classes());
        Ok(self)
    }

    /// Floored log-likelihood of every row of `x` under one class's mixture.
    fn score_mixture(
        &self,
        class: usize,
        mixture: &dyn MixtureModel,
        x: ArrayView2<f64>,
    ) -> Result<Array1<f64>> {
        let floor = self.config.min_log_likelihood;
        if !mixture.is_fitted() {
            return Ok(Array1::from_elem(x.nrows(), floor));
        }
        let scores = mixture
            .score_samples(x)
            .map_err(|source| ClassifierError::MixtureScore { class, source })?;
        if scores.len() != x.nrows() {
            return Err(ClassifierError::ShapeMismatch {
                what: "mixture scores",
                expected: x.nrows(),
                found: scores.len(),
            });
        }
        Ok(floor_scores(scores, floor))
    }

    fn fitted_state(&self, x: &Array2<f64>) -> Result<&ClassifierState> {
        let state = self
            .state
            .as_ref()
            .ok_or(ClassifierError::UninitializedModel)?;
        if x.ncols() != state.n_features {
            return Err(ClassifierError::ShapeMismatch {
                what: "feature columns",
                expected: state.n_features,
                found: x.ncols(),
            });
        }
        Ok(state)
    }

    /// Per-class log-likelihoods, shape `(n_classes, n_samples)`.
    ///
    /// Row `k` holds the floored scores of class `k`, or the floor itself for
    /// classes that were never trained.
    pub fn loglike_per_class(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let state = self.fitted_state(x)?;
        let mut loglike = Array2::<f64>::zeros((state.n_classes, x.nrows()));
        for (class, mixture) in state.mixtures.iter().enumerate() {
            let scores = self.score_mixture(class, mixture.as_ref(), x.view())?;
            loglike.row_mut(class).assign(&scores);
        }
        Ok(loglike)
    }

    /// Most likely class of every sample. Ties go to the lowest class id.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let loglike = self.loglike_per_class(x)?;
        Ok(loglike
            .axis_iter(Axis(1))
            .map(argmax_first)
            .collect::<Array1<usize>>())
    }

    /// Class posteriors under equal priors, shape `(n_samples, n_classes)`.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let loglike = self.loglike_per_class(x)?;
        let mut proba = loglike.t().to_owned();
        for mut row in proba.axis_iter_mut(Axis(0)) {
            let norm = log_sum_exp(&row.to_vec());
            row.mapv_inplace(|v| (v - norm).exp());
        }
        Ok(proba)
    }

    /// Mean accuracy of `predict(x)` against `y`.
    pub fn score(&self, x: &Array2<f64>, y: &[usize]) -> Result<f64> {
        let predicted = self.predict(x)?;
        if predicted.len() != y.len() {
            return Err(ClassifierError::ShapeMismatch {
                what: "evaluation labels",
                expected: predicted.len(),
                found: y.len(),
            });
        }
        Ok(accuracy(&predicted.to_vec(), y))
    }
}

impl Default for PerClassMixtureClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl fmt::Debug for PerClassMixtureClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerClassMixtureClassifier")
            .field("config", &self.config)
            .field("n_classes", &self.n_classes())
            .field("trained_classes", &self.trained_classes())
            .finish()
    }
}
