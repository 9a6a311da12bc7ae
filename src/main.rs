//! `beens`: run framework analyses and orchestrator workflows from the command line.
//!
//! Usage:
//!   beens frameworks
//!   beens analyze --framework braved --signals signals.json --tier intermediate
//!   beens workflow analyze_user_profile --params profile.json
//!   beens dispatch InterestAnalysisUnit analyze_interests --params topics.json
//!
//! Results go to stdout as pretty JSON; logs go to stderr.

use anyhow::{Context, Result, bail};
use beens_mind::build_orchestrator;
use beens_mind::config::Config;
use beens_mind::units::{AnalysisUnit, TaskParams};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "beens")]
#[command(about = "Interest classification, alignment scoring and unit orchestration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered frameworks and their components
    Frameworks,
    /// Run a full framework analysis over a signals file
    Analyze {
        #[arg(long)]
        framework: String,
        /// JSON array of signals, or the object form keyed by category
        #[arg(long)]
        signals: PathBuf,
        #[arg(long)]
        tier: Option<String>,
    },
    /// Run a named orchestrator workflow
    Workflow {
        task: String,
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Dispatch a single task to a registered unit
    Dispatch {
        unit: String,
        task: String,
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.as_str())
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let (registry, orchestrator) = build_orchestrator(&config)?;

    let output = match cli.command {
        Commands::Frameworks => {
            let frameworks: Vec<_> = registry.frameworks().iter().map(|f| f.as_ref()).collect();
            serde_json::to_value(frameworks)?
        }
        Commands::Analyze {
            framework,
            signals,
            tier,
        } => {
            let framework = registry.get(&framework)?;
            let mut params = TaskParams::new();
            params.insert("interests".to_string(), read_json(&signals)?);
            if let Some(tier) = tier {
                params.insert("skill_level".to_string(), json!(tier));
            }
            let unit = format!("{}AnalysisUnit", framework.name);
            info!("Analyzing {} signals from {}", framework.name, signals.display());
            orchestrator
                .dispatch(&format!("analyze_{}", framework.key), &unit, params)
                .await?
        }
        Commands::Workflow { task, params } => {
            let params = read_params(params.as_deref())?;
            orchestrator.execute(&task, params).await?
        }
        Commands::Dispatch { unit, task, params } => {
            let params = read_params(params.as_deref())?;
            orchestrator.dispatch(&task, &unit, params).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn read_params(path: Option<&Path>) -> Result<TaskParams> {
    let Some(path) = path else {
        return Ok(TaskParams::new());
    };
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        other => bail!(
            "{} must contain a JSON object of task parameters, got {}",
            path.display(),
            other
        ),
    }
}
