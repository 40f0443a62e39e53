//! Stage definitions: persona framing plus a prompt template.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::TemplateError;

/// Descriptive framing sent with every request of a stage.
///
/// The three fields are rendered into the system prompt to bias the tone
/// and focus of the generated text; they carry no behavior of their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Persona {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Persona {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    /// Render the framing as a single system prompt.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\n\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}

/// Prompt template of a stage. Builds the full prompt text from the
/// accumulated context; referencing a stage that has not run yet is an
/// error, so prompts can only look backwards.
pub type TemplateFn = dyn Fn(&PipelineContext) -> Result<String, TemplateError> + Send + Sync;

/// One step of a pipeline: a named persona plus the template that turns
/// the context so far into this step's prompt.
pub struct Stage {
    name: String,
    persona: Persona,
    template: Box<TemplateFn>,
    expected_output: String,
}

impl Stage {
    pub fn new(
        name: impl Into<String>,
        persona: Persona,
        template: impl Fn(&PipelineContext) -> Result<String, TemplateError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            persona,
            template: Box::new(template),
            expected_output: String::new(),
        }
    }

    /// Describe the shape of the answer this stage should produce. The
    /// description is appended to every prompt the stage builds.
    pub fn with_expected_output(mut self, hint: impl Into<String>) -> Self {
        self.expected_output = hint.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    /// Build the complete prompt for this stage from the context so far.
    pub fn build_prompt(&self, context: &PipelineContext) -> Result<String, TemplateError> {
        let mut prompt = (self.template)(context)?;
        if !self.expected_output.is_empty() {
            prompt.push_str("\n\nExpected output: ");
            prompt.push_str(&self.expected_output);
        }
        Ok(prompt)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("persona", &self.persona)
            .field("expected_output", &self.expected_output)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviewer() -> Persona {
        Persona::new(
            "Python Code Reviewer",
            "Detect errors and bad practices in Python code",
            "You are a Python expert capable of spotting problems quickly and effectively.",
        )
    }

    #[test]
    fn system_prompt_mentions_all_three_fields() {
        let prompt = reviewer().system_prompt();
        assert!(prompt.starts_with("You are Python Code Reviewer."));
        assert!(prompt.contains("spotting problems quickly"));
        assert!(prompt.contains("Your personal goal is: Detect errors"));
    }

    #[test]
    fn build_prompt_runs_the_template() {
        let stage = Stage::new("review", reviewer(), |context| {
            Ok(format!("Review this:\n\n{}", context.input()))
        });
        let context = PipelineContext::new("def f(x): return x+1");
        let prompt = stage.build_prompt(&context).unwrap();
        assert!(prompt.contains("def f(x): return x+1"));
    }

    #[test]
    fn expected_output_is_appended_to_the_prompt() {
        let stage = Stage::new("review", reviewer(), |context| {
            Ok(context.input().to_string())
        })
        .with_expected_output("A list of identified errors.");

        let prompt = stage
            .build_prompt(&PipelineContext::new("code"))
            .unwrap();
        assert!(prompt.ends_with("Expected output: A list of identified errors."));
    }

    #[test]
    fn template_errors_pass_through() {
        let stage = Stage::new("analysis", reviewer(), |context| {
            Ok(context.require("review")?.to_string())
        });
        let result = stage.build_prompt(&PipelineContext::new("code"));
        assert_eq!(
            result,
            Err(TemplateError::MissingOutput("review".to_string()))
        );
    }

    #[test]
    fn templates_can_raise_custom_errors() {
        let stage = Stage::new("review", reviewer(), |context| {
            if context.input().len() > 8 {
                return Err(TemplateError::Custom("input too long".to_string()));
            }
            Ok(context.input().to_string())
        });
        let result = stage.build_prompt(&PipelineContext::new("def f(x): return x+1"));
        assert_eq!(
            result,
            Err(TemplateError::Custom("input too long".to_string()))
        );
    }
}
