use thiserror::Error;

/// Errors raised while building a stage prompt from the accumulated context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template referenced a stage whose output has not been recorded.
    #[error("output of stage '{0}' is not available yet")]
    MissingOutput(String),

    #[error("{0}")]
    Custom(String),
}

/// Errors covering pipeline definition and execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("initial input is empty")]
    EmptyInput,

    #[error("pipeline '{0}' has no stages")]
    EmptyPipeline(String),

    #[error("duplicate stage name '{0}'")]
    DuplicateStage(String),

    #[error("prompt template of stage '{stage}' failed: {source}")]
    Template {
        stage: String,
        #[source]
        source: TemplateError,
    },

    #[error("generation failed at stage '{stage}': {cause}")]
    Backend { stage: String, cause: String },
}

impl PipelineError {
    /// Name of the stage the failure is attributable to, if any.
    pub fn stage(&self) -> Option<&str> {
        match self {
            PipelineError::Template { stage, .. } | PipelineError::Backend { stage, .. } => {
                Some(stage)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_error_carries_stage_name() {
        let error = PipelineError::Template {
            stage: "analysis".to_string(),
            source: TemplateError::MissingOutput("review".to_string()),
        };
        assert_eq!(error.stage(), Some("analysis"));
        assert!(error.to_string().contains("analysis"));
        assert!(error.to_string().contains("review"));
    }

    #[test]
    fn backend_error_carries_stage_name() {
        let error = PipelineError::Backend {
            stage: "fix".to_string(),
            cause: "HTTP 500".to_string(),
        };
        assert_eq!(error.stage(), Some("fix"));
    }

    #[test]
    fn definition_errors_have_no_stage() {
        assert_eq!(PipelineError::EmptyInput.stage(), None);
        assert_eq!(
            PipelineError::EmptyPipeline("review".to_string()).stage(),
            None
        );
    }
}
