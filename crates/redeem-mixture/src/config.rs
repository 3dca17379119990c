use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for the per-class classifier.
///
/// Captured once at construction and never validated there; defaults are
/// resolved lazily in `fit`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Floor applied to every per-sample log-likelihood.
    #[serde(default = "default_min_log_likelihood")]
    pub min_log_likelihood: f64,

    /// Declared number of classes. `None` infers `max(y) + 1` at fit time.
    #[serde(default)]
    pub n_classes: Option<usize>,

    #[serde(default)]
    pub fit_failure: FitFailurePolicy,

    /// Fit the per-class mixtures on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,

    /// Parameters forwarded verbatim to the mixture factory.
    #[serde(flatten)]
    pub mixture: MixtureType,
}

fn default_min_log_likelihood() -> f64 {
    -100.0
}

/// What `fit` does when one class's mixture fails to fit.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitFailurePolicy {
    /// Return the first failure and keep the previous state untouched.
    #[default]
    Abort,
    /// Warn and leave the failing class untrained.
    LeaveUntrained,
}

impl FromStr for FitFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(FitFailurePolicy::Abort),
            "leave_untrained" | "untrained" => Ok(FitFailurePolicy::LeaveUntrained),
            _ => Err(format!(
                "Unknown fit failure policy: {}. Valid options are: abort, leave_untrained",
                s
            )),
        }
    }
}

/// Supported mixture types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum MixtureType {
    Gaussian {
        n_components: usize,
        n_runs: u64,
        max_n_iterations: u64,
        tolerance: f64,
        reg_covariance: f64,
        seed: Option<u64>,
    },
}

impl Default for MixtureType {
    fn default() -> Self {
        MixtureType::Gaussian {
            n_components: 1,
            n_runs: 1,
            max_n_iterations: 100,
            tolerance: 1e-3,
            reg_covariance: 1e-6,
            seed: None,
        }
    }
}

impl FromStr for MixtureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gaussian" | "gmm" => Ok(MixtureType::default()),
            _ => Err(format!("Unknown mixture type: {}. Valid options are: gaussian", s)),
        }
    }
}

impl ClassifierConfig {
    pub fn new(min_log_likelihood: f64, mixture: MixtureType) -> Self {
        Self {
            min_log_likelihood,
            mixture,
            ..Self::default()
        }
    }

    pub fn with_n_classes(mut self, n_classes: usize) -> Self {
        self.n_classes = Some(n_classes);
        self
    }

    pub fn with_fit_failure(mut self, policy: FitFailurePolicy) -> Self {
        self.fit_failure = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_log_likelihood: default_min_log_likelihood(),
            n_classes: None,
            fit_failure: FitFailurePolicy::default(),
            parallel: false,
            mixture: MixtureType::default(),
        }
    }
}
