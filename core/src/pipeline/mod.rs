// core/src/pipeline/mod.rs

//! A small async step engine. Multi-step lifecycle operations (adding to a
//! cart, checking out) are expressed as named steps over a shared context so
//! each stage is traced and can fail the whole operation before anything
//! later runs.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::Pipeline;
pub use step::{Handler, SkipCondition, StepDef};
