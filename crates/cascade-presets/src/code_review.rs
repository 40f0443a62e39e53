use cascade_core::{Persona, Pipeline, PipelineError, Stage};

/// Three-stage Python debugging pipeline: review, analysis, fix.
///
/// The reviewer sees the pasted code, the analyst sees the review
/// findings, and the fixer sees the analysis next to the original code.
pub fn code_review() -> Result<Pipeline, PipelineError> {
    Pipeline::builder("code-review")
        .stage(
            Stage::new(
                "review",
                Persona::new(
                    "Python Code Reviewer",
                    "Detect errors and bad practices in Python code",
                    "You are a Python expert capable of spotting problems quickly and effectively.",
                ),
                |context| {
                    Ok(format!(
                        "Step 1: Here is some Python code to review:\n\n{}\n\nPlease identify any bugs or bad practices.",
                        context.input()
                    ))
                },
            )
            .with_expected_output("A list of identified errors or bad practices."),
        )
        .stage(
            Stage::new(
                "analysis",
                Persona::new(
                    "Python Error Analyst",
                    "Explain why the code has issues and how to resolve them",
                    "You are a senior engineer with deep knowledge of debugging and code design.",
                ),
                |context| {
                    Ok(format!(
                        "Step 2: Analyze the following review findings and explain their causes and consequences:\n\n{}",
                        context.require("review")?
                    ))
                },
            )
            .with_expected_output("Detailed reasoning behind the identified issues."),
        )
        .stage(
            Stage::new(
                "fix",
                Persona::new(
                    "Correction Suggester",
                    "Generate a corrected and optimized version of the code",
                    "You focus on refactoring, readability, and Python best practices.",
                ),
                |context| {
                    Ok(format!(
                        "Step 3: Based on the following analysis, provide a corrected and optimized version of the code.\n\nAnalysis:\n{}\n\nOriginal Code:\n{}",
                        context.require("analysis")?,
                        context.input()
                    ))
                },
            )
            .with_expected_output("Corrected Python code with explanations of changes."),
        )
        .build()
}
