use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::sync::mpsc;

use cascade_core::{Pipeline, PipelineEvent};
use cascade_llm::{BackendConfig, OpenAiBackend};
use cascade_presets::{code_review, product_team};
use cascade_runner::PipelineRunner;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Sequential persona pipelines over a chat completion backend")]
#[command(version)]
struct Cli {
    /// Model override (otherwise config file or backend default)
    #[arg(long)]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    api_base: Option<String>,

    /// Print raw pipeline events as JSON lines
    #[arg(long, default_value = "false")]
    json: bool,

    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review, analyze, and fix a piece of Python code
    Review {
        /// Code to review; reads stdin when neither this nor --file is given
        code: Option<String>,

        /// Read the code from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Walk a product idea through UX, backend, frontend, and QA planning
    Team {
        /// Product or feature idea; reads stdin when neither this nor --file is given
        idea: Option<String>,

        /// Read the idea from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List the stages of the built-in pipelines
    Stages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match &cli.command {
        Commands::Review { code, file } => {
            let input = read_input(code.as_deref(), file.as_deref())?;
            run_pipeline(&cli, code_review()?, &input).await
        }
        Commands::Team { idea, file } => {
            let input = read_input(idea.as_deref(), file.as_deref())?;
            run_pipeline(&cli, product_team()?, &input).await
        }
        Commands::Stages => print_stages(),
    }
}

fn init_logging(debug: bool) {
    let filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn read_input(inline: Option<&str>, file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(text) = inline {
        return Ok(text.to_string());
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}

async fn run_pipeline(cli: &Cli, pipeline: Pipeline, input: &str) -> anyhow::Result<()> {
    let mut config = BackendConfig::load();
    if let Some(model) = &cli.model {
        config.model = Some(model.clone());
    }
    if let Some(base) = &cli.api_base {
        config.api_base = Some(base.clone());
    }

    let backend = OpenAiBackend::from_config(&config)?;

    if !cli.json {
        println!(
            "{}",
            format!(
                "🚀 Running '{}' ({} stages, model {})",
                pipeline.name(),
                pipeline.len(),
                backend.model()
            )
            .cyan()
        );
    }

    let runner = PipelineRunner::new(Arc::new(backend));
    let (event_tx, mut event_rx) = mpsc::channel(32);

    let json = cli.json;
    let renderer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            render_event(&event, json);
        }
    });

    // The sender is dropped when the run finishes, which ends the renderer.
    let result = runner.run(&pipeline, input, event_tx).await;
    renderer.await?;

    result.map(|_| ()).map_err(Into::into)
}

fn render_event(event: &PipelineEvent, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
        return;
    }

    match event {
        PipelineEvent::RunStarted { run_id, .. } => {
            println!("{}", format!("run {}", run_id).dimmed());
        }
        PipelineEvent::StageStarted { index, role, .. } => {
            println!();
            println!("{}", format!("▶ Step {}: {}", index + 1, role).cyan().bold());
            println!("{}", "─".repeat(50).dimmed());
        }
        PipelineEvent::StageCompleted {
            output, elapsed_ms, ..
        } => {
            println!("{output}");
            println!("{}", format!("({} ms)", elapsed_ms).dimmed());
        }
        PipelineEvent::RunCompleted { elapsed_ms, .. } => {
            println!();
            println!("{}", format!("✨ Run complete in {} ms", elapsed_ms).cyan());
        }
        PipelineEvent::RunFailed { stage, error } => {
            println!();
            println!("{}", format!("❌ Failed at '{}': {}", stage, error).red());
        }
    }
}

fn print_stages() -> anyhow::Result<()> {
    for pipeline in [code_review()?, product_team()?] {
        println!("{}", pipeline.name().cyan().bold());
        for (index, stage) in pipeline.stages().iter().enumerate() {
            println!(
                "  {}. {} ({})",
                index + 1,
                stage.name(),
                stage.persona().role
            );
            println!(
                "     {}",
                format!("goal: {}", stage.persona().goal).dimmed()
            );
            if !stage.expected_output().is_empty() {
                println!(
                    "     {}",
                    format!("expects: {}", stage.expected_output()).dimmed()
                );
            }
        }
        println!();
    }
    Ok(())
}
