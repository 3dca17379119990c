//! Label bookkeeping for per-class training.

use crate::error::{ClassifierError, Result};

/// Number of classes implied by dense integer labels: `max(y) + 1`.
pub fn infer_n_classes(y: &[usize]) -> Option<usize> {
    y.iter().max().map(|&max| max + 1)
}

/// Row indices of every class, indexed by class id.
///
/// Classes with no samples get an empty list. Fails if a label does not fit
/// in `n_classes`.
pub fn class_indices(y: &[usize], n_classes: usize) -> Result<Vec<Vec<usize>>> {
    let mut groups = vec![Vec::new(); n_classes];
    for (row, &label) in y.iter().enumerate() {
        match groups.get_mut(label) {
            Some(group) => group.push(row),
            None => return Err(ClassifierError::LabelOutOfRange { label, n_classes }),
        }
    }
    Ok(groups)
}
