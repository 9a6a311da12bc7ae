//! Task orchestrator: named dispatch to registered units, fixed workflows,
//! and aggregation of their results.
//!
//! Steps run strictly one after another. Every dispatch is bounded by the
//! configured timeout and races the orchestrator's cancellation token; a
//! failing step aborts the workflow and its error is returned unchanged.

pub mod workflow;

pub use workflow::{ANALYZE_FRAMEWORKS, ANALYZE_USER_PROFILE, Aggregate, StepResult, Workflow, aggregate};

use crate::catalog::{ContentCatalog, Tier};
use crate::config::Config;
use crate::error::{BeensMindError, Result, closest_match};
use crate::taxonomy::TaxonomyRegistry;
use crate::units::interest::{self, InterestAnalysisUnit};
use crate::units::learning_path::{self, LearningPathUnit};
use crate::units::neuroscience::NeuroscienceUnit;
use crate::units::{AnalysisUnit, FrameworkUnit, TaskParams, to_value, unknown_task};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub const ORCHESTRATOR_NAME: &str = "MrsBeens";

/// Registry of units plus the workflows that sequence them.
pub struct Orchestrator {
    units: HashMap<String, Arc<dyn AnalysisUnit>>,
    /// (unit name, primary task) for each framework unit, in workflow order.
    framework_steps: Vec<(String, String)>,
    dispatch_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// Empty registry, no timeout. Framework steps default to BRAVED then BALAJIS.
    pub fn new() -> Self {
        Self {
            units: HashMap::new(),
            framework_steps: vec![
                ("BRAVEDAnalysisUnit".to_string(), "analyze_braved".to_string()),
                ("BALAJISAnalysisUnit".to_string(), "analyze_balajis".to_string()),
            ],
            dispatch_timeout: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Register the interest, learning path and neuroscience units plus one
    /// framework unit per framework.
    pub fn with_default_units(
        config: &Config,
        registry: &TaxonomyRegistry,
        catalog: Arc<dyn ContentCatalog>,
    ) -> Result<Self> {
        let tier = Tier::parse(&config.orchestrator.default_tier).ok_or_else(|| {
            BeensMindError::Config {
                message: format!("invalid default_tier '{}'", config.orchestrator.default_tier),
            }
        })?;

        let mut orchestrator = Self::new().with_timeout_ms(config.orchestrator.dispatch_timeout_ms);
        orchestrator.framework_steps.clear();
        orchestrator.register(Arc::new(InterestAnalysisUnit::new()));
        for framework in registry.frameworks() {
            let unit = FrameworkUnit::new(
                framework.clone(),
                config.analysis.clone(),
                catalog.clone(),
                tier,
            );
            orchestrator
                .framework_steps
                .push((unit.name().to_string(), format!("analyze_{}", framework.key)));
            orchestrator.register(Arc::new(unit));
        }
        orchestrator.register(Arc::new(LearningPathUnit::new(tier)));
        orchestrator.register(Arc::new(NeuroscienceUnit::new()));

        tracing::info!(
            units = orchestrator.units.len(),
            timeout_ms = config.orchestrator.dispatch_timeout_ms,
            "Orchestrator ready"
        );
        Ok(orchestrator)
    }

    /// 0 disables the per-dispatch timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.dispatch_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Register under `name`, replacing any unit already registered there.
    pub fn register_unit(&mut self, name: &str, unit: Arc<dyn AnalysisUnit>) {
        if self.units.insert(name.to_string(), unit).is_some() {
            tracing::debug!("Replaced unit {}", name);
        } else {
            tracing::debug!("Registered unit {}", name);
        }
    }

    /// Register under the unit's own name.
    pub fn register(&mut self, unit: Arc<dyn AnalysisUnit>) {
        let name = unit.name().to_string();
        self.register_unit(&name, unit);
    }

    /// Registered unit names, sorted.
    pub fn unit_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.units.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn unit(&self, name: &str) -> Result<Arc<dyn AnalysisUnit>> {
        self.units
            .get(name)
            .cloned()
            .ok_or_else(|| BeensMindError::UnknownUnit {
                name: name.to_string(),
                suggestion: closest_match(name, self.units.keys().map(String::as_str)),
            })
    }

    /// Forward `(task, params)` to `unit_name` and return its result untouched.
    pub async fn dispatch(&self, task: &str, unit_name: &str, params: TaskParams) -> Result<Value> {
        let unit = self.unit(unit_name)?;
        let operation = format!("{}.{}", unit_name, task);
        if self.cancel.is_cancelled() {
            return Err(BeensMindError::Cancelled { operation });
        }

        tracing::info!(unit = unit_name, task, "Dispatching task");
        let started = Instant::now();
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(BeensMindError::Cancelled {
                operation: operation.clone(),
            }),
            res = bounded(unit.execute(task, params), self.dispatch_timeout, &operation) => res,
        };
        tracing::info!(
            unit = unit_name,
            task,
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dispatch finished"
        );
        result
    }

    /// Run a named workflow and aggregate its step results.
    pub async fn run_workflow(&self, task: &str, params: TaskParams) -> Result<Aggregate> {
        let workflow = Workflow::parse(task)
            .ok_or_else(|| unknown_task(ORCHESTRATOR_NAME, task, &Workflow::names()))?;
        tracing::info!(workflow = workflow.as_str(), "Starting workflow");

        let mut steps = Vec::new();
        match workflow {
            Workflow::AnalyzeUserProfile => self.analyze_user_profile(params, &mut steps).await?,
            Workflow::AnalyzeFrameworks => self.analyze_frameworks(params, &mut steps).await?,
        }

        if self.cancel.is_cancelled() {
            return Err(BeensMindError::Cancelled {
                operation: workflow.as_str().to_string(),
            });
        }
        Ok(aggregate(steps))
    }

    async fn analyze_user_profile(
        &self,
        params: TaskParams,
        steps: &mut Vec<StepResult>,
    ) -> Result<()> {
        // Caller-supplied interests skip the interest analysis step
        let interests = match params.get("interests") {
            Some(v) if !v.is_null() => v.clone(),
            _ => {
                let analysis = self
                    .step(steps, interest::UNIT_NAME, interest::ANALYZE_INTERESTS, params.clone())
                    .await?;
                analysis
                    .get("learning_opportunities")
                    .cloned()
                    .unwrap_or_else(|| json!({}))
            }
        };

        let mut forward = TaskParams::new();
        forward.insert("interests".to_string(), interests);
        if let Some(level) = params.get("skill_level") {
            forward.insert("skill_level".to_string(), level.clone());
        }

        for (unit, task) in &self.framework_steps {
            self.step(steps, unit, task, forward.clone()).await?;
        }

        if let Some(start) = params.get("start_date") {
            forward.insert("start_date".to_string(), start.clone());
        }
        self.step(
            steps,
            learning_path::UNIT_NAME,
            learning_path::GENERATE_LEARNING_PATH,
            forward,
        )
        .await?;
        Ok(())
    }

    async fn analyze_frameworks(
        &self,
        params: TaskParams,
        steps: &mut Vec<StepResult>,
    ) -> Result<()> {
        for (unit, task) in &self.framework_steps {
            self.step(steps, unit, task, params.clone()).await?;
        }
        Ok(())
    }

    /// Dispatch one workflow step, recording its result or logging the failure.
    async fn step(
        &self,
        steps: &mut Vec<StepResult>,
        unit: &str,
        task: &str,
        params: TaskParams,
    ) -> Result<Value> {
        if self.cancel.is_cancelled() {
            return Err(BeensMindError::Cancelled {
                operation: format!("{}.{}", unit, task),
            });
        }
        match self.dispatch(task, unit, params).await {
            Ok(result) => {
                steps.push(StepResult::new(unit, task, result.clone()));
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    step = steps.len() + 1,
                    unit,
                    task,
                    "Workflow step failed: {}",
                    e
                );
                Err(e)
            }
        }
    }
}

async fn bounded<F>(fut: F, limit: Option<Duration>, operation: &str) -> Result<Value>
where
    F: Future<Output = Result<Value>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
            BeensMindError::Timeout {
                operation: operation.to_string(),
                timeout_ms: limit.as_millis() as u64,
            }
        })?,
        None => fut.await,
    }
}

#[async_trait]
impl AnalysisUnit for Orchestrator {
    fn name(&self) -> &str {
        ORCHESTRATOR_NAME
    }

    fn tasks(&self) -> Vec<String> {
        Workflow::names()
    }

    async fn execute(&self, task: &str, params: TaskParams) -> Result<Value> {
        to_value(&self.run_workflow(task, params).await?)
    }
}
