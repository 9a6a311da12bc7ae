//! Named multi-step workflows and the aggregate they produce.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ANALYZE_USER_PROFILE: &str = "analyze_user_profile";
pub const ANALYZE_FRAMEWORKS: &str = "analyze_frameworks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Interests, every framework unit, then a learning path.
    AnalyzeUserProfile,
    /// Every framework unit on caller-supplied interests.
    AnalyzeFrameworks,
}

impl Workflow {
    pub fn parse(task: &str) -> Option<Workflow> {
        match task {
            ANALYZE_USER_PROFILE | "analyze_profile" => Some(Workflow::AnalyzeUserProfile),
            ANALYZE_FRAMEWORKS => Some(Workflow::AnalyzeFrameworks),
            _ => None,
        }
    }

    pub fn names() -> Vec<String> {
        vec![
            ANALYZE_USER_PROFILE.to_string(),
            "analyze_profile".to_string(),
            ANALYZE_FRAMEWORKS.to_string(),
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Workflow::AnalyzeUserProfile => ANALYZE_USER_PROFILE,
            Workflow::AnalyzeFrameworks => ANALYZE_FRAMEWORKS,
        }
    }
}

/// One dispatched call and what it returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// 1-based position in the aggregate.
    pub step: usize,
    pub unit: String,
    pub task: String,
    pub result: Value,
}

impl StepResult {
    pub fn new(unit: &str, task: &str, result: Value) -> Self {
        Self {
            step: 0,
            unit: unit.to_string(),
            task: task.to_string(),
            result,
        }
    }
}

/// Labeled collection of step results, in dispatch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub aggregated_results: Vec<StepResult>,
    pub summary: String,
}

impl Aggregate {
    /// First result produced by `unit`.
    pub fn result_of(&self, unit: &str) -> Option<&Value> {
        self.aggregated_results
            .iter()
            .find(|r| r.unit == unit)
            .map(|r| &r.result)
    }

    pub fn len(&self) -> usize {
        self.aggregated_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregated_results.is_empty()
    }
}

/// Combine results without merging them; order and provenance are kept.
pub fn aggregate(results: Vec<StepResult>) -> Aggregate {
    let units: Vec<&str> = {
        let mut seen = Vec::new();
        for r in &results {
            if !seen.contains(&r.unit.as_str()) {
                seen.push(r.unit.as_str());
            }
        }
        seen
    };
    let summary = if units.is_empty() {
        "No unit results to combine".to_string()
    } else {
        format!("Combined analysis from {}", units.join(", "))
    };
    let aggregated_results = results
        .into_iter()
        .enumerate()
        .map(|(i, r)| StepResult { step: i + 1, ..r })
        .collect();
    Aggregate {
        aggregated_results,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aggregate_preserves_order_and_provenance() {
        let agg = aggregate(vec![
            StepResult::new("B", "t1", json!(1)),
            StepResult::new("A", "t2", json!({"x": 2})),
            StepResult::new("B", "t3", json!(null)),
        ]);
        assert_eq!(agg.len(), 3);
        let order: Vec<(usize, &str, &str)> = agg
            .aggregated_results
            .iter()
            .map(|r| (r.step, r.unit.as_str(), r.task.as_str()))
            .collect();
        assert_eq!(order, [(1, "B", "t1"), (2, "A", "t2"), (3, "B", "t3")]);
        assert_eq!(agg.summary, "Combined analysis from B, A");
        assert_eq!(agg.result_of("A"), Some(&json!({"x": 2})));
    }

    #[test]
    fn test_aggregate_empty() {
        let agg = aggregate(Vec::new());
        assert!(agg.is_empty());
        assert_eq!(agg.summary, "No unit results to combine");
    }

    #[test]
    fn test_workflow_aliases() {
        assert_eq!(
            Workflow::parse("analyze_profile"),
            Some(Workflow::AnalyzeUserProfile)
        );
        assert_eq!(Workflow::parse("analyze_posts"), None);
    }
}
