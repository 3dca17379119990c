use std::error::Error;
use std::fmt;

/// Failures surfaced by [`crate::PerClassMixtureClassifier`].
#[derive(Debug)]
pub enum ClassifierError {
    /// `predict`/`loglike_per_class` called before a successful `fit`.
    UninitializedModel,
    /// `fit` called with zero samples.
    EmptyTrainingData,
    /// Row or column counts disagree.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A label does not fit in the declared number of classes.
    LabelOutOfRange { label: usize, n_classes: usize },
    /// The mixture of `class` failed to fit.
    MixtureFit { class: usize, source: anyhow::Error },
    /// The fitted mixture of `class` failed to score samples.
    MixtureScore { class: usize, source: anyhow::Error },
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::UninitializedModel => {
                write!(f, "Classifier has not been fit yet; call fit() first")
            }
            ClassifierError::EmptyTrainingData => write!(f, "Training data contains no samples"),
            ClassifierError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(f, "Shape mismatch for {}: expected {}, found {}", what, expected, found),
            ClassifierError::LabelOutOfRange { label, n_classes } => write!(
                f,
                "Label {} is out of range for {} declared classes",
                label, n_classes
            ),
            ClassifierError::MixtureFit { class, source } => {
                write!(f, "Failed to fit mixture for class {}: {:#}", class, source)
            }
            ClassifierError::MixtureScore { class, source } => {
                write!(f, "Failed to score mixture for class {}: {:#}", class, source)
            }
        }
    }
}

impl Error for ClassifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClassifierError::MixtureFit { source, .. }
            | ClassifierError::MixtureScore { source, .. } => {
                let inner: &(dyn Error + 'static) = source.as_ref();
                Some(inner)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixture_fit_exposes_source() {
        let err = ClassifierError::MixtureFit {
            class: 2,
            source: anyhow::anyhow!("singular covariance"),
        };
        assert!(err.to_string().contains("class 2"));
        assert_eq!(err.source().unwrap().to_string(), "singular covariance");
        assert!(ClassifierError::UninitializedModel.source().is_none());
    }
}
