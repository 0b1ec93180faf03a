//! Location provider trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Coordinates;

/// Resolves the coordinates a dashboard session refers to.
///
/// Which variant is used is decided when the application is composed.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Provider name.
    fn name(&self) -> &str;

    /// Resolve the current coordinates.
    async fn locate(&self) -> Result<Coordinates>;
}
