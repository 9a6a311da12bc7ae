//! Keyword-driven component classifier.

use super::types::{
    Classification, ComponentDetail, ComponentScoreMap, Contribution, DominantComponent,
    InterestSignal,
};
use crate::config::AnalysisConfig;
use crate::taxonomy::Framework;

/// Scores interest signals against the components of a framework.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: AnalysisConfig,
}

impl Classifier {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Accumulate each signal's confidence into every component it matches.
    ///
    /// A signal may contribute to several components. Signals without
    /// primary-interest text are skipped; unmatched text contributes nothing.
    pub fn classify(&self, signals: &[InterestSignal], framework: &Framework) -> Classification {
        let mut scores = ComponentScoreMap::zeroed(framework.ids());
        let mut details: Vec<ComponentDetail> = framework
            .ids()
            .map(|id| ComponentDetail {
                component_id: id.to_string(),
                contributions: Vec::new(),
            })
            .collect();
        let mut skipped = 0usize;

        for signal in signals {
            let Some(text) = signal.primary_text() else {
                skipped += 1;
                continue;
            };
            let Some(confidence) = self.effective_confidence(signal) else {
                tracing::warn!(
                    category = %signal.category,
                    "Skipping signal with non-finite confidence"
                );
                skipped += 1;
                continue;
            };
            let lowered = text.to_lowercase();
            for (component, detail) in framework.components().iter().zip(details.iter_mut()) {
                let matched = component.matched_keywords(&lowered);
                if matched.is_empty() {
                    continue;
                }
                tracing::debug!(
                    framework = %framework.key,
                    component = %component.id,
                    interest = %text,
                    confidence,
                    "signal matched component"
                );
                scores.add(&component.id, confidence);
                detail.contributions.push(Contribution {
                    category: signal.category.clone(),
                    interest: text.to_string(),
                    confidence,
                    matched_keywords: matched.into_iter().map(str::to_string).collect(),
                });
            }
        }

        details.retain(|d| !d.contributions.is_empty());
        let dominant_components =
            dominant_components(&scores, framework, self.config.dominant_count);

        Classification {
            framework: framework.key.clone(),
            component_scores: scores,
            component_details: details,
            dominant_components,
            skipped_signals: skipped,
        }
    }

    /// Missing confidence takes the configured default; out-of-range values
    /// are clamped into [0, 1]; NaN/inf yields `None`.
    fn effective_confidence(&self, signal: &InterestSignal) -> Option<f64> {
        match signal.confidence_score {
            None => Some(self.config.default_confidence),
            Some(c) if !c.is_finite() => None,
            Some(c) => Some(c.clamp(0.0, 1.0)),
        }
    }
}

/// Top `n` components by score, descending; ties keep framework order.
pub fn dominant_components(
    scores: &ComponentScoreMap,
    framework: &Framework,
    n: usize,
) -> Vec<DominantComponent> {
    let mut ranked: Vec<DominantComponent> = framework
        .components()
        .iter()
        .map(|c| DominantComponent {
            id: c.id.clone(),
            name: c.name.clone(),
            score: scores.get(&c.id).unwrap_or(0.0),
        })
        .collect();
    // sort_by is stable, so equal scores stay in framework order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Component, TaxonomyRegistry};

    fn classifier() -> Classifier {
        Classifier::new(AnalysisConfig::default())
    }

    fn braved() -> std::sync::Arc<Framework> {
        TaxonomyRegistry::builtin().get("braved").unwrap()
    }

    #[test]
    fn test_single_signal_scores_one_component() {
        let fw = Framework::new(
            "mini",
            "MINI",
            vec![
                Component::new("B", "Bitcoin", &["bitcoin"], ""),
                Component::new("X", "Other", &["xylophone"], ""),
                Component::new("Y", "Yet another", &["yacht"], ""),
            ],
        )
        .unwrap();
        let signals = vec![InterestSignal::new("tech", "bitcoin trading", Some(0.8))];
        let result = classifier().classify(&signals, &fw);

        assert_eq!(result.component_scores.get("B"), Some(0.8));
        assert_eq!(result.component_scores.get("X"), Some(0.0));
        assert_eq!(result.component_scores.get("Y"), Some(0.0));
        assert_eq!(result.dominant_components[0].name, "Bitcoin");
        assert_eq!(result.dominant_components[0].score, 0.8);
        assert!(result.dominant_components[1..].iter().all(|d| d.score == 0.0));
    }

    #[test]
    fn test_matches_accumulate_additively() {
        let signals = vec![
            InterestSignal::new("a", "Bitcoin maximalism", Some(0.25)),
            InterestSignal::new("b", "DeFi yield", Some(0.5)),
        ];
        let result = classifier().classify(&signals, &braved());
        assert_eq!(result.component_scores.get("B"), Some(0.75));
        let detail = result.details_for("B").unwrap();
        assert_eq!(detail.contributions.len(), 2);
        assert_eq!(detail.contributions[0].category, "a");
        assert_eq!(detail.contributions[1].category, "b");
    }

    #[test]
    fn test_one_signal_can_hit_several_components() {
        // "metaverse" is a keyword of both R and V; "trading" also hits B
        let signals = vec![InterestSignal::new("x", "Metaverse trading", None)];
        let result = classifier().classify(&signals, &braved());
        assert_eq!(result.component_scores.get("B"), Some(0.5));
        assert_eq!(result.component_scores.get("R"), Some(0.5));
        assert_eq!(result.component_scores.get("V"), Some(0.5));
        assert_eq!(result.component_scores.get("A"), Some(0.0));
    }

    #[test]
    fn test_empty_input_yields_zero_map() {
        let fw = braved();
        let result = classifier().classify(&[], &fw);
        assert_eq!(result.component_scores.len(), fw.len());
        assert_eq!(result.component_scores.total(), 0.0);
        assert!(result.component_details.is_empty());
        assert_eq!(result.skipped_signals, 0);
    }

    #[test]
    fn test_missing_text_and_bad_confidence_are_skipped() {
        let signals = vec![
            InterestSignal {
                category: "empty".into(),
                ..Default::default()
            },
            InterestSignal::new("nan", "bitcoin", Some(f64::NAN)),
            InterestSignal::new("high", "bitcoin", Some(4.0)),
            InterestSignal::new("none", "knitting", Some(0.9)),
        ];
        let result = classifier().classify(&signals, &braved());
        assert_eq!(result.skipped_signals, 2);
        assert_eq!(result.component_scores.get("B"), Some(1.0));
        assert_eq!(result.component_scores.total(), 1.0);
    }

    #[test]
    fn test_dominant_ties_keep_framework_order() {
        let fw = braved();
        let scores = ComponentScoreMap::from_pairs([
            ("B", 0.0),
            ("R", 1.0),
            ("A", 0.0),
            ("V", 1.0),
            ("E", 2.0),
            ("D", 1.0),
        ]);
        let top = dominant_components(&scores, &fw, 3);
        let ids: Vec<&str> = top.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["E", "R", "V"]);
        assert!(dominant_components(&scores, &fw, 10).len() <= fw.len());
    }
}
