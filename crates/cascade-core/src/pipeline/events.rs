use serde::{Deserialize, Serialize};

/// Progress events emitted while a pipeline run executes.
///
/// Events become observable as soon as the runner produces them, so a
/// consumer can render each stage's output without waiting for the whole
/// run to finish. For a run of `n` stages the well-formed sequence is
/// `RunStarted`, then `StageStarted`/`StageCompleted` per stage in order,
/// closed by exactly one `RunCompleted` or `RunFailed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    RunStarted {
        run_id: String,
        pipeline: String,
        stages: usize,
    },
    StageStarted {
        index: usize,
        name: String,
        role: String,
    },
    StageCompleted {
        index: usize,
        name: String,
        output: String,
        elapsed_ms: u64,
    },
    RunCompleted {
        run_id: String,
        elapsed_ms: u64,
    },
    RunFailed {
        stage: String,
        error: String,
    },
}
