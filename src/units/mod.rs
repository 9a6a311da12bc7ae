//! Analysis units: named components invoked through a uniform task contract.

pub mod framework_unit;
pub mod interest;
pub mod learning_path;
pub mod neuroscience;

pub use framework_unit::FrameworkUnit;
pub use interest::InterestAnalysisUnit;
pub use learning_path::LearningPathUnit;
pub use neuroscience::NeuroscienceUnit;

use crate::error::{BeensMindError, Result, closest_match};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Named task parameters passed to a unit.
pub type TaskParams = Map<String, Value>;

/// Anything the orchestrator can dispatch a named task to.
#[async_trait]
pub trait AnalysisUnit: Send + Sync {
    /// Registration key; unique within an orchestrator.
    fn name(&self) -> &str;

    /// Task names this unit accepts.
    fn tasks(&self) -> Vec<String>;

    async fn execute(&self, task: &str, params: TaskParams) -> Result<Value>;
}

/// Build an `UnknownTask` error, suggesting the closest known task.
pub fn unknown_task(unit: &str, task: &str, known: &[String]) -> BeensMindError {
    BeensMindError::UnknownTask {
        task: task.to_string(),
        unit: unit.to_string(),
        suggestion: closest_match(task, known.iter().map(String::as_str)),
    }
}

pub(crate) fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Deserialize a required parameter, reporting shape problems as `InvalidParams`.
pub(crate) fn required_param<T: DeserializeOwned>(params: &TaskParams, key: &str) -> Result<T> {
    let raw = params
        .get(key)
        .cloned()
        .ok_or_else(|| BeensMindError::InvalidParams {
            message: format!("missing required parameter '{}'", key),
        })?;
    serde_json::from_value(raw).map_err(|e| BeensMindError::InvalidParams {
        message: format!("invalid '{}': {}", key, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_task_suggests_closest() {
        let known = vec!["analyze_braved".to_string(), "assess_alignment".to_string()];
        let err = unknown_task("BRAVEDAnalysisUnit", "analyse_braved", &known);
        assert!(matches!(
            err,
            BeensMindError::UnknownTask { ref suggestion, .. }
                if suggestion.as_deref() == Some("analyze_braved")
        ));
    }

    #[test]
    fn test_required_param_errors() {
        let mut params = TaskParams::new();
        assert!(matches!(
            required_param::<Vec<String>>(&params, "topics"),
            Err(BeensMindError::InvalidParams { .. })
        ));
        params.insert("topics".into(), json!(7));
        let err = required_param::<Vec<String>>(&params, "topics").unwrap_err();
        assert!(err.to_string().contains("invalid 'topics'"));
        params.insert("topics".into(), json!(["ai"]));
        assert_eq!(required_param::<Vec<String>>(&params, "topics").unwrap(), ["ai"]);
    }
}
