//! Sequence model traits for one-step inference

use std::error::Error;
use std::sync::Arc;

use crate::model::Window;

/// Result type returned by model engines.
///
/// Engines report failures in their own terms; the pipeline wraps them into
/// [`ForecastError::Inference`](crate::ForecastError::Inference) together with
/// the window shape and series length.
pub type ModelResult<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// A pre-trained model mapping a `(1, W, 1)` window to one normalized value.
///
/// Implementations are immutable after loading and must tolerate concurrent
/// read-only calls.
pub trait SequenceModel: Send + Sync {
    /// Predict the normalized value following the window
    fn predict(&self, window: &Window) -> ModelResult<f64>;

    /// Name of this model
    fn name(&self) -> &str;

    /// Window length the model was trained on, when it declares one
    fn expected_window(&self) -> Option<usize> {
        None
    }
}

/// A loaded model shared between concurrent callers.
pub type SharedModel = Arc<dyn SequenceModel>;

/// A model engine that needs exclusive access while predicting.
///
/// Wrap it in a serializing adapter to use it as a [`SequenceModel`].
pub trait ExclusiveModel: Send {
    /// Predict the normalized value following the window
    fn predict_mut(&mut self, window: &Window) -> ModelResult<f64>;

    /// Name of this model
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(f64);

    impl SequenceModel for FixedModel {
        fn predict(&self, _window: &Window) -> ModelResult<f64> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct RejectingModel;

    impl SequenceModel for RejectingModel {
        fn predict(&self, window: &Window) -> ModelResult<f64> {
            Err(format!("cannot handle {} steps", window.len()).into())
        }

        fn name(&self) -> &str {
            "rejecting"
        }

        fn expected_window(&self) -> Option<usize> {
            Some(12)
        }
    }

    #[test]
    fn test_shared_model_predicts() {
        let model: SharedModel = Arc::new(FixedModel(0.25));
        let window = Window::new(vec![0.0, 0.5, 1.0]);
        assert_eq!(model.predict(&window).unwrap(), 0.25);
        assert_eq!(model.expected_window(), None);
    }

    #[test]
    fn test_model_error_is_reported() {
        let model: SharedModel = Arc::new(RejectingModel);
        let window = Window::new(vec![0.1; 24]);
        let err = model.predict(&window).unwrap_err();
        assert_eq!(err.to_string(), "cannot handle 24 steps");
        assert_eq!(model.expected_window(), Some(12));
    }

    #[test]
    fn test_shared_model_crosses_threads() {
        let model: SharedModel = Arc::new(FixedModel(0.75));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let model = Arc::clone(&model);
                std::thread::spawn(move || model.predict(&Window::new(vec![0.0; 4])).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 0.75);
        }
    }
}
