use serde::{Deserialize, Serialize};

use crate::pipeline::error::TemplateError;

/// Output produced by one completed stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageOutput {
    pub name: String,
    pub output: String,
}

/// Accumulated results of a run, threaded forward from stage to stage.
///
/// Holds the initial free-text input plus one record per completed stage,
/// in completion order. The collection is append-only: records are added as
/// stages finish and are never rewritten afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineContext {
    input: String,
    outputs: Vec<StageOutput>,
}

impl PipelineContext {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            outputs: Vec::new(),
        }
    }

    /// The free-text input the run started from.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Output of a completed stage, by stage name.
    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|record| record.name == name)
            .map(|record| record.output.as_str())
    }

    /// Like [`output`](Self::output), but a missing stage is a template
    /// error. Prompt templates use this to reference earlier stages.
    pub fn require(&self, name: &str) -> Result<&str, TemplateError> {
        self.output(name)
            .ok_or_else(|| TemplateError::MissingOutput(name.to_string()))
    }

    /// Append the output of a just-completed stage.
    pub fn record(&mut self, name: impl Into<String>, output: impl Into<String>) {
        self.outputs.push(StageOutput {
            name: name.into(),
            output: output.into(),
        });
    }

    /// All records so far, in completion order.
    pub fn outputs(&self) -> &[StageOutput] {
        &self.outputs
    }

    /// The most recently recorded output.
    pub fn last(&self) -> Option<&StageOutput> {
        self.outputs.last()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
