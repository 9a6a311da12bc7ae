//! One analysis unit per framework: classify, recommend, assess.

use super::{AnalysisUnit, TaskParams, required_param, to_value, unknown_task};
use crate::analysis::{
    Classifier, ComponentScoreMap, DistributionAnalyzer, signals_from_value,
};
use crate::catalog::{ContentCatalog, Tier};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::synthesis::Synthesizer;
use crate::taxonomy::Framework;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

pub struct FrameworkUnit {
    name: String,
    primary_task: String,
    framework: Arc<Framework>,
    classifier: Classifier,
    analyzer: DistributionAnalyzer,
    synthesizer: Synthesizer,
    default_tier: Tier,
}

impl FrameworkUnit {
    /// Unit named `<DISPLAY NAME>AnalysisUnit` with primary task `analyze_<key>`.
    pub fn new(
        framework: Arc<Framework>,
        config: AnalysisConfig,
        catalog: Arc<dyn ContentCatalog>,
        default_tier: Tier,
    ) -> Self {
        Self {
            name: format!("{}AnalysisUnit", framework.name),
            primary_task: format!("analyze_{}", framework.key),
            classifier: Classifier::new(config.clone()),
            analyzer: DistributionAnalyzer::new(config),
            synthesizer: Synthesizer::new(catalog),
            framework,
            default_tier,
        }
    }

    pub fn framework(&self) -> &Framework {
        &self.framework
    }

    /// Classify, synthesize recommendations and assess alignment in one pass.
    async fn analyze(&self, params: &TaskParams) -> Result<Value> {
        let signals = signals_from_value(params.get("interests"))?;
        let tier = Tier::from_param(params.get("skill_level"), self.default_tier)?;

        let classification = self.classifier.classify(&signals, &self.framework);
        let recommendations = self
            .synthesizer
            .synthesize(&classification.component_scores, &self.framework, tier)
            .await;
        let report = self
            .analyzer
            .analyze(&classification.component_scores, &self.framework);

        tracing::info!(
            unit = %self.name,
            signals = signals.len(),
            recommendations = recommendations.len(),
            alignment = report.alignment_score,
            "{} analysis complete",
            self.framework.name
        );

        Ok(json!({
            "framework": self.framework.name,
            "analysis": {
                "component_scores": to_value(&classification.component_scores)?,
                "component_details": to_value(&classification.component_details)?,
                "dominant_components": to_value(&classification.dominant_components)?,
            },
            "recommendations": to_value(&recommendations)?,
            "alignment_assessment": to_value(&report)?,
        }))
    }
}

#[async_trait]
impl AnalysisUnit for FrameworkUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn tasks(&self) -> Vec<String> {
        vec![
            self.primary_task.clone(),
            "analyze_framework".to_string(),
            "classify_components".to_string(),
            "assess_alignment".to_string(),
            "generate_recommendations".to_string(),
        ]
    }

    async fn execute(&self, task: &str, params: TaskParams) -> Result<Value> {
        match task {
            t if t == self.primary_task || t == "analyze_framework" => self.analyze(&params).await,
            "classify_components" => {
                let signals = signals_from_value(params.get("interests"))?;
                to_value(&self.classifier.classify(&signals, &self.framework))
            }
            "assess_alignment" => {
                let scores: ComponentScoreMap = required_param(&params, "component_scores")?;
                to_value(&self.analyzer.analyze(&scores, &self.framework))
            }
            "generate_recommendations" => {
                let scores: ComponentScoreMap = required_param(&params, "component_scores")?;
                let tier = Tier::from_param(params.get("skill_level"), self.default_tier)?;
                let set = self
                    .synthesizer
                    .synthesize(&scores, &self.framework, tier)
                    .await;
                to_value(&set)
            }
            other => Err(unknown_task(&self.name, other, &self.tasks())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::error::BeensMindError;
    use crate::taxonomy::TaxonomyRegistry;

    fn unit(key: &str) -> FrameworkUnit {
        FrameworkUnit::new(
            TaxonomyRegistry::builtin().get(key).unwrap(),
            AnalysisConfig::default(),
            Arc::new(StaticCatalog::bundled().unwrap()),
            Tier::Beginner,
        )
    }

    fn params(v: Value) -> TaskParams {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_analyze_braved_result_shape() {
        let unit = unit("braved");
        assert_eq!(unit.name(), "BRAVEDAnalysisUnit");
        let out = unit
            .execute(
                "analyze_braved",
                params(json!({
                    "interests": {
                        "technology": {"primary_interest": "Bitcoin trading", "confidence_score": 0.8}
                    },
                    "skill_level": "intermediate"
                })),
            )
            .await
            .unwrap();
        assert_eq!(out["framework"], "BRAVED");
        assert_eq!(out["analysis"]["component_scores"]["B"], 0.8);
        assert_eq!(out["analysis"]["dominant_components"][0]["id"], "B");
        assert_eq!(out["recommendations"]["B"]["tier"], "intermediate");
        assert!(out["recommendations"].get("R").is_none());
        assert_eq!(out["alignment_assessment"]["level"], "limited_alignment");
    }

    #[tokio::test]
    async fn test_empty_interests_report_none_detected() {
        let out = unit("balajis")
            .execute("analyze_framework", TaskParams::new())
            .await
            .unwrap();
        assert_eq!(out["alignment_assessment"]["level"], "none_detected");
        assert_eq!(
            out["alignment_assessment"]["assessment"],
            "No BALAJIS components detected"
        );
        assert_eq!(out["recommendations"], json!({}));
    }

    #[tokio::test]
    async fn test_assess_alignment_requires_scores() {
        let unit = unit("braved");
        let err = unit
            .execute("assess_alignment", TaskParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BeensMindError::InvalidParams { .. }));

        let out = unit
            .execute(
                "assess_alignment",
                params(json!({"component_scores": {"B": 1, "R": 1, "A": 1, "V": 1, "E": 1, "D": 1}})),
            )
            .await
            .unwrap();
        assert_eq!(out["level"], "well_aligned");
    }

    #[tokio::test]
    async fn test_bad_skill_level_is_invalid_params() {
        let err = unit("braved")
            .execute(
                "generate_recommendations",
                params(json!({"component_scores": {"B": 1.0}, "skill_level": "wizard"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BeensMindError::InvalidParams { .. }));
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let err = unit("braved")
            .execute("analyze_balajis", TaskParams::new())
            .await
            .unwrap_err();
        match err {
            BeensMindError::UnknownTask { unit, suggestion, .. } => {
                assert_eq!(unit, "BRAVEDAnalysisUnit");
                assert_eq!(suggestion.as_deref(), Some("analyze_braved"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
