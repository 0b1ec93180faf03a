//! Contract module containing trait definitions for forecast operations

mod model_loader;
mod pipeline_step;
mod sequence_model;

pub use model_loader::ModelLoader;
pub use pipeline_step::PipelineStep;
pub use sequence_model::{ExclusiveModel, ModelResult, SequenceModel, SharedModel};
