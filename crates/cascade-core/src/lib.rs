pub mod pipeline;

pub use pipeline::context::{PipelineContext, StageOutput};
pub use pipeline::error::{PipelineError, TemplateError};
pub use pipeline::events::PipelineEvent;
pub use pipeline::stage::{Persona, Stage, TemplateFn};
pub use pipeline::{Pipeline, PipelineBuilder};
