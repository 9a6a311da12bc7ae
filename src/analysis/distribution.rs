//! Score normalization and alignment against a uniform distribution.

use super::types::{AlignmentLevel, AlignmentReport, ComponentScoreMap};
use crate::config::AnalysisConfig;
use crate::taxonomy::Framework;

#[derive(Debug, Clone)]
pub struct DistributionAnalyzer {
    config: AnalysisConfig,
}

impl DistributionAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Normalize `scores` over the framework's components and measure how far
    /// the result is from uniform.
    ///
    /// Ids the framework does not know are ignored. Negative scores count as
    /// zero. A zero total is reported as [`AlignmentLevel::NoneDetected`].
    pub fn analyze(&self, scores: &ComponentScoreMap, framework: &Framework) -> AlignmentReport {
        for (id, _) in scores.iter() {
            if framework.component(id).is_none() {
                tracing::warn!(
                    framework = %framework.key,
                    component = %id,
                    "Ignoring score for unknown component"
                );
            }
        }

        let values: Vec<(&str, f64)> = framework
            .ids()
            .map(|id| (id, scores.get(id).unwrap_or(0.0).max(0.0)))
            .collect();
        let total: f64 = values.iter().map(|(_, s)| s).sum();

        if !(total > 0.0 && total.is_finite()) {
            return AlignmentReport {
                alignment_score: 0.0,
                level: AlignmentLevel::NoneDetected,
                assessment: format!("No {} components detected", framework.name),
                component_distribution: ComponentScoreMap::default(),
                recommendations: vec![format!(
                    "Explore interests across all {} components",
                    framework.name
                )],
            };
        }

        let ideal = 1.0 / framework.len() as f64;
        let distribution =
            ComponentScoreMap::from_pairs(values.iter().map(|&(id, s)| (id, s / total)));
        let deviation: f64 = distribution.iter().map(|(_, p)| (p - ideal).abs()).sum();
        let alignment_score = 1.0 - deviation;

        let (level, assessment) = if alignment_score > self.config.well_aligned_threshold {
            (
                AlignmentLevel::WellAligned,
                format!("Well aligned across {} components", framework.name),
            )
        } else if alignment_score > self.config.moderate_threshold {
            (
                AlignmentLevel::ModeratelyAligned,
                "Moderately aligned, some components could use more attention".to_string(),
            )
        } else {
            (
                AlignmentLevel::LimitedAlignment,
                format!(
                    "Limited alignment with {}, consider diversifying across more components",
                    framework.name
                ),
            )
        };

        let floor = ideal * self.config.underrepresentation_multiplier;
        let recommendations = framework
            .components()
            .iter()
            .filter(|c| distribution.get(&c.id).unwrap_or(0.0) < floor)
            .map(|c| format!("Consider exploring more {} related interests", c.name))
            .collect();

        tracing::debug!(
            framework = %framework.key,
            alignment_score,
            level = level.as_str(),
            "distribution analyzed"
        );

        AlignmentReport {
            alignment_score,
            level,
            assessment,
            component_distribution: distribution,
            recommendations,
        }
    }
}
