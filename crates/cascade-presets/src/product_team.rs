use cascade_core::{Persona, Pipeline, PipelineError, Stage};

/// Product team simulation: UX design, backend architecture, frontend
/// plan, QA strategy.
///
/// Each stage sees the work of the stages before it; the QA stage sees
/// all three plans at once.
pub fn product_team() -> Result<Pipeline, PipelineError> {
    Pipeline::builder("product-team")
        .stage(
            Stage::new(
                "ux",
                Persona::new(
                    "UX Designer",
                    "Design a user-friendly and intuitive interface",
                    "You're an expert in user experience and interface design, focused on accessibility and usability.",
                ),
                |context| {
                    Ok(format!(
                        "Design the user experience and interface for the following product idea:\n\n{}\n\nInclude a flow, wireframe ideas, and UX priorities.",
                        context.input()
                    ))
                },
            )
            .with_expected_output("UX flow, key screens, and design rationale."),
        )
        .stage(
            Stage::new(
                "backend",
                Persona::new(
                    "Backend Developer",
                    "Define a scalable backend architecture for the application",
                    "You're a software engineer specializing in APIs, databases, and secure backend infrastructure.",
                ),
                |context| {
                    Ok(format!(
                        "Based on the following UX design, define the backend architecture:\n\n{}\n\nInclude APIs, database schema, and authentication strategy.",
                        context.require("ux")?
                    ))
                },
            )
            .with_expected_output("Backend architecture description, key endpoints, and data models."),
        )
        .stage(
            Stage::new(
                "frontend",
                Persona::new(
                    "Frontend Developer",
                    "Plan the implementation of the UI components",
                    "You're skilled in modern frontend frameworks and ensure smooth UX implementation.",
                ),
                |context| {
                    Ok(format!(
                        "Based on the UX design and backend architecture below, describe how the frontend will be implemented:\n\nUX Design:\n{}\n\nBackend Architecture:\n{}",
                        context.require("ux")?,
                        context.require("backend")?
                    ))
                },
            )
            .with_expected_output("Component structure, framework choice, integration points."),
        )
        .stage(
            Stage::new(
                "qa",
                Persona::new(
                    "QA Engineer",
                    "Create a test strategy and detect potential points of failure",
                    "You're a quality assurance expert focused on preventing bugs and ensuring feature reliability.",
                ),
                |context| {
                    Ok(format!(
                        "Create a QA plan for the product based on the following information:\n\nUX Design:\n{}\n\nBackend Architecture:\n{}\n\nFrontend Plan:\n{}\n\nInclude test strategies, edge cases, and automation ideas.",
                        context.require("ux")?,
                        context.require("backend")?,
                        context.require("frontend")?
                    ))
                },
            )
            .with_expected_output("Comprehensive QA plan including manual and automated tests."),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use cascade_core::PipelineContext;

    use super::*;

    #[test]
    fn builds_with_four_stages_in_order() {
        let pipeline = product_team().unwrap();
        let names: Vec<&str> = pipeline.stages().iter().map(Stage::name).collect();
        assert_eq!(names, vec!["ux", "backend", "frontend", "qa"]);
    }

    #[test]
    fn qa_prompt_embeds_all_three_plans() {
        let pipeline = product_team().unwrap();
        let mut context = PipelineContext::new("a water tracking app");
        context.record("ux", "UX: three screens");
        context.record("backend", "BACKEND: rest api");
        context.record("frontend", "FRONTEND: react");

        let prompt = pipeline.stages()[3].build_prompt(&context).unwrap();
        assert!(prompt.contains("UX: three screens"));
        assert!(prompt.contains("BACKEND: rest api"));
        assert!(prompt.contains("FRONTEND: react"));
        assert!(prompt.contains("Include test strategies, edge cases, and automation ideas."));
    }

    #[test]
    fn backend_prompt_requires_the_ux_output() {
        let pipeline = product_team().unwrap();
        let context = PipelineContext::new("an idea");
        assert!(pipeline.stages()[1].build_prompt(&context).is_err());
    }

    #[test]
    fn ux_prompt_embeds_the_idea() {
        let pipeline = product_team().unwrap();
        let context = PipelineContext::new("a water tracking app");
        let prompt = pipeline.stages()[0].build_prompt(&context).unwrap();
        assert!(prompt.contains("a water tracking app"));
        assert!(prompt.ends_with("Expected output: UX flow, key screens, and design rationale."));
    }
}
