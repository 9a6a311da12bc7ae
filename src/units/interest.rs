//! Turns raw topics plus engagement counts into categorized interest signals.

use super::{AnalysisUnit, TaskParams, unknown_task};
use crate::error::{BeensMindError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

pub const UNIT_NAME: &str = "InterestAnalysisUnit";
pub const ANALYZE_INTERESTS: &str = "analyze_interests";

const FREQUENCY_WEIGHT: f64 = 0.4;
const ENGAGEMENT_WEIGHT: f64 = 0.6;
const TOP_PER_CATEGORY: usize = 3;

/// Interest categories, checked in order; first match wins.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("technology", &["programming", "ai", "blockchain", "web3", "crypto"]),
    ("business", &["entrepreneurship", "startups", "investing", "finance"]),
    ("personal_development", &["productivity", "mindfulness", "leadership"]),
    ("creative", &["design", "art", "writing", "music"]),
    ("science", &["physics", "biology", "chemistry", "mathematics"]),
];

#[derive(Debug, Deserialize)]
struct InterestParams {
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    engagement_data: HashMap<String, f64>,
}

#[derive(Debug, Default)]
pub struct InterestAnalysisUnit;

impl InterestAnalysisUnit {
    pub fn new() -> Self {
        Self
    }

    /// First category whose keyword occurs in `topic` (case-insensitive).
    pub fn category_for(topic: &str) -> Option<&'static str> {
        let lowered = topic.to_lowercase();
        CATEGORIES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(name, _)| *name)
    }

    /// `0.4 * frequency share + 0.6 * engagement share` per distinct topic.
    pub fn score_topics(topics: &[String], engagement: &HashMap<String, f64>) -> Vec<(String, f64)> {
        let total_engagement: f64 = engagement.values().sum();
        let mut scored: Vec<(String, f64)> = Vec::new();
        for topic in topics {
            if scored.iter().any(|(t, _)| t == topic) {
                continue;
            }
            let count = topics.iter().filter(|t| *t == topic).count();
            let frequency = count as f64 / topics.len() as f64;
            let engaged = if total_engagement > 0.0 {
                engagement.get(topic).copied().unwrap_or(0.0) / total_engagement
            } else {
                0.0
            };
            scored.push((
                topic.clone(),
                frequency * FREQUENCY_WEIGHT + engaged * ENGAGEMENT_WEIGHT,
            ));
        }
        scored
    }

    fn analyze(&self, params: TaskParams) -> Result<Value> {
        let InterestParams {
            topics,
            engagement_data,
        } = serde_json::from_value(Value::Object(params)).map_err(|e| {
            BeensMindError::InvalidParams {
                message: format!("analyze_interests: {}", e),
            }
        })?;

        let mut categorized: Vec<(&str, Vec<String>)> =
            CATEGORIES.iter().map(|(name, _)| (*name, Vec::new())).collect();
        let mut uncategorized: Vec<String> = Vec::new();
        for topic in &topics {
            match Self::category_for(topic) {
                Some(category) => {
                    if let Some((_, bucket)) = categorized.iter_mut().find(|(c, _)| *c == category) {
                        if !bucket.contains(topic) {
                            bucket.push(topic.clone());
                        }
                    }
                }
                None if !uncategorized.contains(topic) => uncategorized.push(topic.clone()),
                None => {}
            }
        }

        let scores = Self::score_topics(&topics, &engagement_data);
        let score_of = |topic: &str| {
            scores
                .iter()
                .find(|(t, _)| t == topic)
                .map(|(_, s)| *s)
                .unwrap_or(0.0)
        };

        let mut opportunities = Map::new();
        for (category, bucket) in &categorized {
            if bucket.is_empty() {
                continue;
            }
            let mut ranked: Vec<(&str, f64)> =
                bucket.iter().map(|t| (t.as_str(), score_of(t))).collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            ranked.truncate(TOP_PER_CATEGORY);
            let confidence = ranked.iter().map(|(_, s)| s).sum::<f64>() / ranked.len() as f64;
            opportunities.insert(
                category.to_string(),
                json!({
                    "primary_interest": ranked[0].0,
                    "secondary_interests": ranked[1..].iter().map(|(t, _)| *t).collect::<Vec<_>>(),
                    "confidence_score": confidence,
                }),
            );
        }

        tracing::info!(
            topics = topics.len(),
            opportunities = opportunities.len(),
            uncategorized = uncategorized.len(),
            "Interest analysis complete"
        );

        let categorized_map: Map<String, Value> = categorized
            .into_iter()
            .map(|(c, topics)| (c.to_string(), json!(topics)))
            .collect();
        let scores_map: Map<String, Value> =
            scores.into_iter().map(|(t, s)| (t, json!(s))).collect();

        Ok(json!({
            "categorized_interests": categorized_map,
            "uncategorized_topics": uncategorized,
            "interest_scores": scores_map,
            "learning_opportunities": opportunities,
        }))
    }
}

#[async_trait]
impl AnalysisUnit for InterestAnalysisUnit {
    fn name(&self) -> &str {
        UNIT_NAME
    }

    fn tasks(&self) -> Vec<String> {
        vec![ANALYZE_INTERESTS.to_string()]
    }

    async fn execute(&self, task: &str, params: TaskParams) -> Result<Value> {
        match task {
            ANALYZE_INTERESTS => self.analyze(params),
            other => Err(unknown_task(UNIT_NAME, other, &self.tasks())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::signals_from_value;

    fn params(v: Value) -> TaskParams {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_first_matching_category_wins() {
        // "crypto" (technology) is checked before "investing" (business)
        assert_eq!(
            InterestAnalysisUnit::category_for("Crypto investing"),
            Some("technology")
        );
        assert_eq!(
            InterestAnalysisUnit::category_for("Startups"),
            Some("business")
        );
        assert_eq!(InterestAnalysisUnit::category_for("gardening"), None);
    }

    #[test]
    fn test_scores_weight_frequency_and_engagement() {
        let topics: Vec<String> = ["bitcoin", "bitcoin", "design", "physics"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let engagement = HashMap::from([("design".to_string(), 30.0), ("physics".to_string(), 10.0)]);
        let scores = InterestAnalysisUnit::score_topics(&topics, &engagement);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], ("bitcoin".to_string(), 0.5 * 0.4));
        assert!((scores[1].1 - (0.25 * 0.4 + 0.75 * 0.6)).abs() < 1e-12);
        assert!((scores[2].1 - (0.25 * 0.4 + 0.25 * 0.6)).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_opportunities_feed_signal_parser() {
        let unit = InterestAnalysisUnit::new();
        let out = unit
            .execute(
                ANALYZE_INTERESTS,
                params(json!({
                    "topics": ["AI agents", "blockchain", "web3 gaming", "programming", "music", "gardening"],
                    "engagement_data": {"blockchain": 50, "AI agents": 30, "music": 20}
                })),
            )
            .await
            .unwrap();

        let tech = &out["learning_opportunities"]["technology"];
        assert_eq!(tech["primary_interest"], "blockchain");
        assert_eq!(tech["secondary_interests"], json!(["AI agents", "web3 gaming"]));
        assert!(out["learning_opportunities"].get("science").is_none());
        assert_eq!(out["uncategorized_topics"], json!(["gardening"]));
        assert_eq!(out["categorized_interests"]["science"], json!([]));

        let signals = signals_from_value(Some(&out["learning_opportunities"])).unwrap();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].category, "technology");
        assert_eq!(signals[1].category, "creative");
    }

    #[tokio::test]
    async fn test_empty_topics_and_bad_params() {
        let unit = InterestAnalysisUnit::new();
        let out = unit.execute(ANALYZE_INTERESTS, TaskParams::new()).await.unwrap();
        assert_eq!(out["learning_opportunities"], json!({}));

        let err = unit
            .execute(ANALYZE_INTERESTS, params(json!({"topics": "ai"})))
            .await
            .unwrap_err();
        assert!(matches!(err, BeensMindError::InvalidParams { .. }));

        let err = unit.execute("analyze_posts", TaskParams::new()).await.unwrap_err();
        assert!(matches!(err, BeensMindError::UnknownTask { .. }));
    }
}
