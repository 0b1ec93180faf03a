//! Model loading and caching
//!
//! A [`ModelStore`] owns the process-wide handle to the forecast model. The
//! model is deserialized at most once, shared read-only by every caller and
//! dropped on [`ModelStore::release`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use forecast_spi::{
    ExclusiveModel, ForecastError, ModelLoader, ModelResult, Result, SequenceModel, SharedModel,
    Window,
};

use crate::lstm::{LstmModel, LstmWeights};

fn unavailable(path: &Path, reason: impl ToString) -> ForecastError {
    ForecastError::ModelUnavailable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Loads [`LstmModel`] weights stored as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelLoader;

impl ModelLoader for JsonModelLoader {
    fn load(&self, path: &Path) -> Result<SharedModel> {
        let text = fs::read_to_string(path).map_err(|e| unavailable(path, e))?;
        let weights: LstmWeights = serde_json::from_str(&text).map_err(|e| unavailable(path, e))?;
        let model = LstmModel::from_weights(weights).map_err(|e| unavailable(path, e))?;

        tracing::info!(
            path = %path.display(),
            layers = model.layer_count(),
            window = ?model.expected_window(),
            "loaded forecast model"
        );
        Ok(Arc::new(model))
    }

    fn format(&self) -> &str {
        "json"
    }
}

/// Explicit cache around a model file.
///
/// Cloning the returned [`SharedModel`] is cheap; every clone points at the
/// same immutable network.
pub struct ModelStore<L: ModelLoader = JsonModelLoader> {
    path: PathBuf,
    loader: L,
    cached: RwLock<Option<SharedModel>>,
}

impl ModelStore<JsonModelLoader> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_loader(path, JsonModelLoader)
    }
}

impl<L: ModelLoader> ModelStore<L> {
    pub fn with_loader(path: impl Into<PathBuf>, loader: L) -> Self {
        Self {
            path: path.into(),
            loader,
            cached: RwLock::new(None),
        }
    }

    /// Create a store and load the model immediately
    pub fn open(path: impl Into<PathBuf>, loader: L) -> Result<Self> {
        let store = Self::with_loader(path, loader);
        store.get()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached model, loading it on first use
    pub fn get(&self) -> Result<SharedModel> {
        if let Some(model) = self.read_cached() {
            return Ok(model);
        }

        let mut slot = self
            .cached
            .write()
            .map_err(|_| unavailable(&self.path, "model cache lock poisoned"))?;
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = self.loader.load(&self.path)?;
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    fn read_cached(&self) -> Option<SharedModel> {
        self.cached
            .read()
            .ok()
            .and_then(|slot| slot.as_ref().map(Arc::clone))
    }

    pub fn is_loaded(&self) -> bool {
        self.read_cached().is_some()
    }

    /// Drop the cached model; the next [`get`](Self::get) reloads it
    pub fn release(&self) {
        if let Ok(mut slot) = self.cached.write() {
            if slot.take().is_some() {
                tracing::info!(path = %self.path.display(), "released forecast model");
            }
        }
    }
}

/// Adapts an engine that needs `&mut self` into a shareable model by
/// serializing calls through a mutex.
pub struct Serialized<M: ExclusiveModel> {
    name: String,
    inner: Mutex<M>,
}

impl<M: ExclusiveModel> Serialized<M> {
    pub fn new(model: M) -> Self {
        Self {
            name: model.name().to_string(),
            inner: Mutex::new(model),
        }
    }
}

impl<M: ExclusiveModel> SequenceModel for Serialized<M> {
    fn predict(&self, window: &Window) -> ModelResult<f64> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| "model lock poisoned".to_string())?;
        guard.predict_mut(window)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WEIGHTS: &str = r#"{
        "name": "co_lstm",
        "window_size": 24,
        "layers": [{
            "units": 2,
            "kernel": [[0, 0, 0, 0, 0, 0, 0, 0]],
            "recurrent_kernel": [[0, 0, 0, 0, 0, 0, 0, 0], [0, 0, 0, 0, 0, 0, 0, 0]],
            "bias": [0, 0, 0, 0, 0, 0, 0, 0]
        }],
        "dense": { "kernel": [[1], [1]], "bias": [0.5] }
    }"#;

    fn weights_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    struct CountingLoader {
        loads: Arc<AtomicUsize>,
    }

    impl ModelLoader for CountingLoader {
        fn load(&self, path: &Path) -> Result<SharedModel> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            JsonModelLoader.load(path)
        }

        fn format(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_json_loader_reads_weights() {
        let file = weights_file(WEIGHTS);
        let model = JsonModelLoader.load(file.path()).unwrap();
        assert_eq!(model.name(), "co_lstm");
        assert_eq!(model.expected_window(), Some(24));
        assert!((model.predict(&Window::new(vec![0.3; 24])).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = JsonModelLoader.load(&path).err().unwrap();
        assert!(matches!(err, ForecastError::ModelUnavailable { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_malformed_file_is_unavailable() {
        let file = weights_file("{ not json");
        let err = JsonModelLoader.load(file.path()).err().unwrap();
        assert!(matches!(err, ForecastError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_bad_shapes_are_unavailable() {
        let file = weights_file(
            r#"{ "layers": [{ "units": 1, "kernel": [[0]], "recurrent_kernel": [[0, 0, 0, 0]],
                 "bias": [0, 0, 0, 0] }], "dense": { "kernel": [[1]], "bias": [0] } }"#,
        );
        let err = JsonModelLoader.load(file.path()).err().unwrap();
        match err {
            ForecastError::ModelUnavailable { reason, .. } => {
                assert!(reason.contains("layers[0].kernel"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_store_loads_once() {
        let file = weights_file(WEIGHTS);
        let loads = Arc::new(AtomicUsize::new(0));
        let store = ModelStore::with_loader(
            file.path(),
            CountingLoader {
                loads: Arc::clone(&loads),
            },
        );
        assert!(!store.is_loaded());

        let a = store.get().unwrap();
        let b = store.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(store.is_loaded());
    }

    #[test]
    fn test_release_forces_reload() {
        let file = weights_file(WEIGHTS);
        let loads = Arc::new(AtomicUsize::new(0));
        let store = ModelStore::open(
            file.path(),
            CountingLoader {
                loads: Arc::clone(&loads),
            },
        )
        .unwrap();
        assert!(store.is_loaded());

        store.release();
        assert!(!store.is_loaded());

        store.get().unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_open_fails_fast_on_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let result = ModelStore::open(dir.path().join("missing.json"), JsonModelLoader);
        assert!(matches!(result, Err(ForecastError::ModelUnavailable { .. })));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.json");
        let store = ModelStore::new(&path);
        assert!(store.get().is_err());

        fs::write(&path, WEIGHTS).unwrap();
        assert!(store.get().is_ok());
        assert_eq!(store.path(), path.as_path());
    }

    struct Counter {
        calls: usize,
    }

    impl ExclusiveModel for Counter {
        fn predict_mut(&mut self, _window: &Window) -> ModelResult<f64> {
            self.calls += 1;
            Ok(self.calls as f64)
        }

        fn name(&self) -> &str {
            "counter"
        }
    }

    #[test]
    fn test_serialized_adapter() {
        let model: SharedModel = Arc::new(Serialized::new(Counter { calls: 0 }));
        let window = Window::new(vec![0.0; 3]);
        assert_eq!(model.predict(&window).unwrap(), 1.0);
        assert_eq!(model.predict(&window).unwrap(), 2.0);
        assert_eq!(model.name(), "counter");
    }
}
