//! Pipeline model: ordered stages, accumulated context, progress events.

pub mod context;
pub mod error;
pub mod events;
pub mod stage;

use std::collections::HashSet;

pub use context::{PipelineContext, StageOutput};
pub use error::{PipelineError, TemplateError};
pub use events::PipelineEvent;
pub use stage::{Persona, Stage, TemplateFn};

/// A named, ordered list of stages. The list is fixed at build time and
/// stages always execute strictly left to right.
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Builds a [`Pipeline`], rejecting definition mistakes before anything
/// runs: a pipeline must have at least one stage and stage names must be
/// unique so templates can reference them unambiguously.
#[derive(Debug)]
pub struct PipelineBuilder {
    name: String,
    stages: Vec<Stage>,
}

impl PipelineBuilder {
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn build(self) -> Result<Pipeline, PipelineError> {
        if self.stages.is_empty() {
            return Err(PipelineError::EmptyPipeline(self.name));
        }
        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.name()) {
                return Err(PipelineError::DuplicateStage(stage.name().to_string()));
            }
        }
        Ok(Pipeline {
            name: self.name,
            stages: self.stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(name: &str) -> Stage {
        Stage::new(
            name,
            Persona::new("Reviewer", "Review things", "You review things."),
            |context| Ok(context.input().to_string()),
        )
    }

    #[test]
    fn build_keeps_stage_order() {
        let pipeline = Pipeline::builder("code-review")
            .stage(stage("review"))
            .stage(stage("analysis"))
            .stage(stage("fix"))
            .build()
            .unwrap();

        assert_eq!(pipeline.name(), "code-review");
        let names: Vec<&str> = pipeline.stages().iter().map(Stage::name).collect();
        assert_eq!(names, vec!["review", "analysis", "fix"]);
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn build_rejects_empty_pipeline() {
        let result = Pipeline::builder("empty").build();
        assert!(matches!(result, Err(PipelineError::EmptyPipeline(name)) if name == "empty"));
    }

    #[test]
    fn build_rejects_duplicate_stage_names() {
        let result = Pipeline::builder("dup")
            .stage(stage("review"))
            .stage(stage("review"))
            .build();
        assert!(matches!(result, Err(PipelineError::DuplicateStage(name)) if name == "review"));
    }
}
