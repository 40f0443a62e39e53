use uuid::Uuid;

use cascade_core::PipelineContext;

/// Execution state of one pipeline run.
///
/// `Pending` moves to `Running {0}`, then through each stage index in
/// order, and ends in exactly one of the terminal states. A terminal state
/// is never left again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running { stage: usize },
    Completed,
    Failed { stage: usize },
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed { .. })
    }
}

/// One execution of a pipeline against one initial input.
///
/// Owns the accumulated context while the run is in flight. The runner
/// creates a fresh run per invocation, so independent runs never share
/// state.
#[derive(Debug)]
pub struct PipelineRun {
    id: String,
    pipeline: String,
    state: RunState,
    context: PipelineContext,
}

impl PipelineRun {
    pub fn new(pipeline: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            pipeline: pipeline.into(),
            state: RunState::Pending,
            context: PipelineContext::new(input),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Mark stage `index` as the one currently executing.
    pub fn begin_stage(&mut self, index: usize) {
        self.state = RunState::Running { stage: index };
    }

    /// Append the output of the stage that just finished.
    pub fn record_output(&mut self, name: impl Into<String>, output: impl Into<String>) {
        self.context.record(name, output);
    }

    /// Mark the run complete. All stages have recorded their output.
    pub fn complete(&mut self) {
        self.state = RunState::Completed;
    }

    /// Mark the run failed at the stage currently executing.
    pub fn fail(&mut self) {
        if let RunState::Running { stage } = self.state {
            self.state = RunState::Failed { stage };
        }
    }

    /// Consume the run, keeping only the accumulated context.
    pub fn into_context(self) -> PipelineContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_is_pending_with_empty_context() {
        let run = PipelineRun::new("code-review", "def f(x): return x+1");
        assert_eq!(run.state(), RunState::Pending);
        assert_eq!(run.pipeline(), "code-review");
        assert_eq!(run.context().input(), "def f(x): return x+1");
        assert!(run.context().is_empty());
        assert!(!run.id().is_empty());
    }

    #[test]
    fn runs_get_distinct_ids() {
        let a = PipelineRun::new("p", "x");
        let b = PipelineRun::new("p", "x");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn stages_advance_in_order_to_completed() {
        let mut run = PipelineRun::new("p", "x");

        run.begin_stage(0);
        assert_eq!(run.state(), RunState::Running { stage: 0 });
        run.record_output("review", "ISSUE: none");

        run.begin_stage(1);
        assert_eq!(run.state(), RunState::Running { stage: 1 });
        run.record_output("analysis", "ANALYSIS: trivial");

        run.complete();
        assert_eq!(run.state(), RunState::Completed);
        assert!(run.state().is_terminal());

        let context = run.into_context();
        assert_eq!(context.output("review"), Some("ISSUE: none"));
        assert_eq!(context.output("analysis"), Some("ANALYSIS: trivial"));
    }

    #[test]
    fn fail_records_the_running_stage() {
        let mut run = PipelineRun::new("p", "x");
        run.begin_stage(0);
        run.record_output("review", "ISSUE: none");
        run.begin_stage(1);
        run.fail();
        assert_eq!(run.state(), RunState::Failed { stage: 1 });
        assert!(run.state().is_terminal());
    }

    #[test]
    fn terminal_states_are_terminal() {
        assert!(!RunState::Pending.is_terminal());
        assert!(!RunState::Running { stage: 3 }.is_terminal());
        assert!(RunState::Completed.is_terminal());
        assert!(RunState::Failed { stage: 0 }.is_terminal());
    }
}
