//! Model loader trait

use std::path::Path;

use crate::contract::SharedModel;
use crate::error::Result;

/// Deserializes a pre-trained model from persistent storage.
///
/// Any failure to produce a usable model must be reported as
/// [`ForecastError::ModelUnavailable`](crate::ForecastError::ModelUnavailable).
pub trait ModelLoader: Send + Sync {
    /// Load the model stored at `path`
    fn load(&self, path: &Path) -> Result<SharedModel>;

    /// Short name of the storage format this loader understands
    fn format(&self) -> &str;
}

impl<L: ModelLoader + ?Sized> ModelLoader for Box<L> {
    fn load(&self, path: &Path) -> Result<SharedModel> {
        (**self).load(path)
    }

    fn format(&self) -> &str {
        (**self).format()
    }
}
