//! Series source trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Observation;

/// A provider of hourly observation rows.
///
/// Implementations return rows ordered by timestamp, oldest first.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Source name.
    fn name(&self) -> &str;

    /// Fetch every available observation.
    async fn observations(&self) -> Result<Vec<Observation>>;
}
