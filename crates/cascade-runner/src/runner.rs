//! Stage-by-stage pipeline execution.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use cascade_core::{Pipeline, PipelineContext, PipelineError, PipelineEvent};
use cascade_llm::TextBackend;

use crate::run::PipelineRun;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Executes pipelines against one text backend.
///
/// The runner keeps no per-run state: each [`run`](PipelineRunner::run)
/// call creates its own [`PipelineRun`], so independent runs may execute
/// concurrently on a shared runner.
pub struct PipelineRunner {
    backend: Arc<dyn TextBackend>,
}

impl PipelineRunner {
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        Self { backend }
    }

    /// Execute `pipeline` against `input`, emitting progress on `events`.
    ///
    /// Stages run strictly in order; each stage's prompt is built from the
    /// context accumulated so far and its output is appended before the
    /// next stage starts. The first failure aborts the run, and a partial
    /// context is never returned. A dropped event receiver does not abort
    /// the run.
    pub async fn run(
        &self,
        pipeline: &Pipeline,
        input: &str,
        events: mpsc::Sender<PipelineEvent>,
    ) -> Result<PipelineContext> {
        if input.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let mut run = PipelineRun::new(pipeline.name(), input);
        let run_id = run.id().to_string();
        let run_timer = Timer::start();

        log::debug!(
            "[{}] starting pipeline '{}' ({} stages) on backend '{}'",
            run_id,
            run.pipeline(),
            pipeline.len(),
            self.backend.name()
        );

        let _ = events
            .send(PipelineEvent::RunStarted {
                run_id: run_id.clone(),
                pipeline: pipeline.name().to_string(),
                stages: pipeline.len(),
            })
            .await;

        for (index, stage) in pipeline.stages().iter().enumerate() {
            run.begin_stage(index);

            let _ = events
                .send(PipelineEvent::StageStarted {
                    index,
                    name: stage.name().to_string(),
                    role: stage.persona().role.clone(),
                })
                .await;

            let prompt = match stage.build_prompt(run.context()) {
                Ok(prompt) => prompt,
                Err(source) => {
                    let error = PipelineError::Template {
                        stage: stage.name().to_string(),
                        source,
                    };
                    return Err(abort(&mut run, &events, &run_id, error).await);
                }
            };

            let stage_timer = Timer::start();
            let output = match self.backend.generate(stage.persona(), &prompt).await {
                Ok(output) => output,
                Err(cause) => {
                    let error = PipelineError::Backend {
                        stage: stage.name().to_string(),
                        cause: cause.to_string(),
                    };
                    return Err(abort(&mut run, &events, &run_id, error).await);
                }
            };

            log::debug!(
                "[{}] stage '{}' completed in {}ms ({} chars)",
                run_id,
                stage.name(),
                stage_timer.elapsed_ms(),
                output.len()
            );

            run.record_output(stage.name(), output.clone());

            let _ = events
                .send(PipelineEvent::StageCompleted {
                    index,
                    name: stage.name().to_string(),
                    output,
                    elapsed_ms: stage_timer.elapsed_ms(),
                })
                .await;
        }

        run.complete();
        log::debug!(
            "[{}] pipeline '{}' completed in {}ms",
            run_id,
            run.pipeline(),
            run_timer.elapsed_ms()
        );

        let _ = events
            .send(PipelineEvent::RunCompleted {
                run_id,
                elapsed_ms: run_timer.elapsed_ms(),
            })
            .await;

        Ok(run.into_context())
    }
}

/// Move the run to its failed state, emit the terminal event, and hand the
/// error back for the caller to return.
async fn abort(
    run: &mut PipelineRun,
    events: &mpsc::Sender<PipelineEvent>,
    run_id: &str,
    error: PipelineError,
) -> PipelineError {
    run.fail();
    log::error!("[{}] {}", run_id, error);
    let _ = events
        .send(PipelineEvent::RunFailed {
            stage: error.stage().unwrap_or_default().to_string(),
            error: error.to_string(),
        })
        .await;
    error
}

struct Timer {
    start: Instant,
}

impl Timer {
    fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
