//! Recommendation synthesis: keyed catalog lookup for every scored component.

use crate::analysis::ComponentScoreMap;
use crate::catalog::{ContentCatalog, LearningPath, LearningStage, Project, ResourceGroups, Tier};
use crate::taxonomy::Framework;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Catalog content assembled for one scored component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub component_id: String,
    pub name: String,
    pub description: String,
    pub score: f64,
    pub tier: Tier,
    pub learning_path: LearningPath,
    /// The learning path stage for `tier`.
    pub focus: LearningStage,
    pub resources: ResourceGroups,
    pub projects: Vec<Project>,
    pub tier_projects: Vec<Project>,
}

/// Recommendations in framework order. Serializes as `{component_id: Recommendation}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationSet {
    items: Vec<Recommendation>,
    missing: Vec<String>,
}

impl RecommendationSet {
    pub fn get(&self, component_id: &str) -> Option<&Recommendation> {
        self.items.iter().find(|r| r.component_id == component_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Scored components the catalog had no usable entry for.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }
}

impl Serialize for RecommendationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for r in &self.items {
            map.serialize_entry(&r.component_id, r)?;
        }
        map.end()
    }
}

#[derive(Clone)]
pub struct Synthesizer {
    catalog: Arc<dyn ContentCatalog>,
}

impl Synthesizer {
    pub fn new(catalog: Arc<dyn ContentCatalog>) -> Self {
        Self { catalog }
    }

    /// Assemble a recommendation for every component with a score strictly
    /// above zero. Catalog gaps and catalog errors skip that component.
    pub async fn synthesize(
        &self,
        scores: &ComponentScoreMap,
        framework: &Framework,
        tier: Tier,
    ) -> RecommendationSet {
        let mut set = RecommendationSet::default();
        for component in framework.components() {
            let score = scores.get(&component.id).unwrap_or(0.0);
            if !(score > 0.0) {
                continue;
            }
            let entry = match self.catalog.entry(&framework.key, &component.id).await {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    tracing::warn!(
                        framework = %framework.key,
                        component = %component.id,
                        "No catalog entry for scored component, skipping"
                    );
                    set.missing.push(component.id.clone());
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        framework = %framework.key,
                        component = %component.id,
                        "Catalog lookup failed, skipping: {}",
                        e
                    );
                    set.missing.push(component.id.clone());
                    continue;
                }
            };
            set.items.push(Recommendation {
                component_id: component.id.clone(),
                name: component.name.clone(),
                description: component.description.clone(),
                score,
                tier,
                focus: entry.learning_path.stage(tier).clone(),
                tier_projects: entry.projects_for(tier),
                learning_path: entry.learning_path,
                resources: entry.resources,
                projects: entry.projects,
            });
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, StaticCatalog};
    use crate::error::{BeensMindError, Result};
    use crate::taxonomy::TaxonomyRegistry;
    use async_trait::async_trait;

    struct BrokenCatalog;

    #[async_trait]
    impl ContentCatalog for BrokenCatalog {
        async fn entry(&self, _: &str, _: &str) -> Result<Option<CatalogEntry>> {
            Err(BeensMindError::Catalog {
                message: "backing store offline".into(),
            })
        }
    }

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(Arc::new(StaticCatalog::bundled().unwrap()))
    }

    #[tokio::test]
    async fn test_zero_scored_components_are_omitted() {
        let fw = TaxonomyRegistry::builtin().get("braved").unwrap();
        let scores = ComponentScoreMap::from_pairs([("B", 0.8), ("R", 0.0), ("A", 0.3)]);
        let set = synthesizer().synthesize(&scores, &fw, Tier::Beginner).await;
        assert_eq!(set.len(), 2);
        assert!(set.get("R").is_none());
        let b = set.get("B").unwrap();
        assert_eq!(b.score, 0.8);
        assert_eq!(b.focus.title, "Crypto Fundamentals");
        assert!(b.tier_projects.iter().all(|p| p.tier == Tier::Beginner));
        let ids: Vec<&str> = set.iter().map(|r| r.component_id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
    }

    #[tokio::test]
    async fn test_catalog_gap_is_skipped_not_fatal() {
        let bundled = StaticCatalog::bundled().unwrap();
        let algorithms = bundled.entry("balajis", "AL").await.unwrap().unwrap();
        let mut partial = StaticCatalog::empty();
        partial.insert("balajis", "AL", algorithms);

        let fw = TaxonomyRegistry::builtin().get("balajis").unwrap();
        let scores = ComponentScoreMap::from_pairs([("A", 1.0), ("AL", 0.5)]);
        let set = Synthesizer::new(Arc::new(partial))
            .synthesize(&scores, &fw, Tier::Advanced)
            .await;
        assert_eq!(set.len(), 1);
        assert!(set.get("AL").is_some());
        assert_eq!(set.missing(), ["A"]);
    }

    #[tokio::test]
    async fn test_catalog_errors_are_skipped() {
        let fw = TaxonomyRegistry::builtin().get("braved").unwrap();
        let scores = ComponentScoreMap::from_pairs([("B", 1.0)]);
        let set = Synthesizer::new(Arc::new(BrokenCatalog))
            .synthesize(&scores, &fw, Tier::Beginner)
            .await;
        assert!(set.is_empty());
        assert_eq!(set.missing(), ["B"]);
    }

    #[tokio::test]
    async fn test_serializes_as_map_keyed_by_component() {
        let fw = TaxonomyRegistry::builtin().get("braved").unwrap();
        let scores = ComponentScoreMap::from_pairs([("D", 0.4), ("B", 0.1)]);
        let set = synthesizer().synthesize(&scores, &fw, Tier::Intermediate).await;
        let v = serde_json::to_value(&set).unwrap();
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["B", "D"]);
        assert_eq!(v["D"]["tier"], "intermediate");
    }
}
