//! Model input window

use serde::{Deserialize, Serialize};

/// The trailing slice of normalized observations fed to a model.
///
/// Values are ordered oldest to newest. The window always represents a
/// single sample with a single feature, so its shape is `(1, len, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    values: Vec<f64>,
}

impl Window {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Normalized values, oldest first
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Tensor shape as `(batch, steps, features)`
    pub fn shape(&self) -> [usize; 3] {
        [1, self.values.len(), 1]
    }

    /// Most recent value in the window
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}
