//! Pipeline step trait for reversible preprocessing

use crate::error::Result;

/// A reversible transformation fitted on the series it will transform.
///
/// Steps are fitted fresh on every prediction call; a fitted state is never
/// carried from one series to the next.
pub trait PipelineStep: Send + Sync {
    /// Fit the step to data (learn parameters)
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Transform data forward
    fn transform(&self, data: &[f64]) -> Result<Vec<f64>>;

    /// Inverse transform (undo the transformation)
    fn inverse_transform(&self, data: &[f64]) -> Result<Vec<f64>>;

    /// Name of this step
    fn name(&self) -> &str;
}
