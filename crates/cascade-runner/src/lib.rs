pub mod run;
pub mod runner;

pub use run::{PipelineRun, RunState};
pub use runner::PipelineRunner;
