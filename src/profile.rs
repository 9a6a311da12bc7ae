//! Profile records and the storage contract a calling layer persists them through.

use crate::analysis::ComponentScoreMap;
use crate::error::{BeensMindError, Result};
use crate::orchestrator::Aggregate;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub interests: Vec<String>,
    /// Framework key to its component scores.
    #[serde(default)]
    pub framework_scores: BTreeMap<String, ComponentScoreMap>,
    /// Framework key to its recommendation tree.
    #[serde(default)]
    pub recommendations: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn new(username: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            interests: Vec::new(),
            framework_scores: BTreeMap::new(),
            recommendations: Value::Object(Map::new()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy interests, score maps and recommendation trees out of a workflow result.
    ///
    /// Steps that do not look like framework or interest analyses are ignored.
    /// The record is left untouched when any step fails to parse.
    pub fn apply_workflow(&mut self, aggregate: &Aggregate) -> Result<()> {
        let mut interests = None;
        let mut framework_scores = self.framework_scores.clone();
        let mut recommendations = match &self.recommendations {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        for step in &aggregate.aggregated_results {
            let result = &step.result;
            if let Some(scores) = result.get("interest_scores").and_then(Value::as_object) {
                interests = Some(scores.keys().cloned().collect());
            }
            let Some(framework) = result.get("framework").and_then(Value::as_str) else {
                continue;
            };
            let key = framework.to_lowercase();
            if let Some(scores) = result.pointer("/analysis/component_scores") {
                let scores: ComponentScoreMap = serde_json::from_value(scores.clone())?;
                framework_scores.insert(key.clone(), scores);
            }
            if let Some(recs) = result.get("recommendations") {
                recommendations.insert(key, recs.clone());
            }
        }
        if let Some(interests) = interests {
            self.interests = interests;
        }
        self.framework_scores = framework_scores;
        self.recommendations = Value::Object(recommendations);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub interests: Option<Vec<String>>,
    pub framework_scores: Option<BTreeMap<String, ComponentScoreMap>>,
    pub recommendations: Option<Value>,
}

impl ProfileUpdate {
    fn apply_to(self, record: &mut ProfileRecord) {
        if let Some(username) = self.username {
            record.username = username;
        }
        if let Some(interests) = self.interests {
            record.interests = interests;
        }
        if let Some(scores) = self.framework_scores {
            record.framework_scores = scores;
        }
        if let Some(recs) = self.recommendations {
            record.recommendations = recs;
        }
        record.updated_at = Utc::now();
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(&self, record: ProfileRecord) -> Result<ProfileRecord>;
    async fn get_profile(&self, id: Uuid) -> Result<Option<ProfileRecord>>;
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Option<ProfileRecord>>;
    /// `true` if a record was removed.
    async fn delete_profile(&self, id: Uuid) -> Result<bool>;
    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>>;
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, ProfileRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn create_profile(&self, mut record: ProfileRecord) -> Result<ProfileRecord> {
        if record.username.trim().is_empty() {
            return Err(BeensMindError::Validation {
                message: "username cannot be empty".into(),
            });
        }
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&record.id) {
            return Err(BeensMindError::Storage {
                message: format!("profile {} already exists", record.id),
            });
        }
        let now = Utc::now();
        record.created_at = now;
        record.updated_at = now;
        profiles.insert(record.id, record.clone());
        tracing::debug!(id = %record.id, "Profile created");
        Ok(record)
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<ProfileRecord>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Option<ProfileRecord>> {
        let mut profiles = self.profiles.write().await;
        let Some(record) = profiles.get_mut(&id) else {
            return Ok(None);
        };
        update.apply_to(record);
        Ok(Some(record.clone()))
    }

    async fn delete_profile(&self, id: Uuid) -> Result<bool> {
        Ok(self.profiles.write().await.remove(&id).is_some())
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>> {
        let mut all: Vec<ProfileRecord> = self.profiles.read().await.values().cloned().collect();
        all.sort_by_key(|p| p.created_at);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{StepResult, aggregate};
    use serde_json::json;

    #[tokio::test]
    async fn test_crud_roundtrip() {
        let store = InMemoryProfileStore::new();
        let created = store.create_profile(ProfileRecord::new("ada")).await.unwrap();
        assert_eq!(
            store.get_profile(created.id).await.unwrap().unwrap().username,
            "ada"
        );

        let updated = store
            .update_profile(
                created.id,
                ProfileUpdate {
                    interests: Some(vec!["bitcoin".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.username, "ada");
        assert_eq!(updated.interests, ["bitcoin"]);
        assert!(updated.updated_at >= created.updated_at);

        assert_eq!(store.list_profiles().await.unwrap().len(), 1);
        assert!(store.delete_profile(created.id).await.unwrap());
        assert!(!store.delete_profile(created.id).await.unwrap());
        assert!(store.get_profile(created.id).await.unwrap().is_none());
        assert!(
            store
                .update_profile(created.id, ProfileUpdate::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let store = InMemoryProfileStore::new();
        let err = store.create_profile(ProfileRecord::new("  ")).await.unwrap_err();
        assert!(matches!(err, BeensMindError::Validation { .. }));
    }

    #[test]
    fn test_apply_workflow_extracts_framework_results() {
        let agg = aggregate(vec![
            StepResult::new(
                "InterestAnalysisUnit",
                "analyze_interests",
                json!({"interest_scores": {"bitcoin": 0.4, "music": 0.6}}),
            ),
            StepResult::new(
                "BRAVEDAnalysisUnit",
                "analyze_braved",
                json!({
                    "framework": "BRAVED",
                    "analysis": {"component_scores": {"B": 0.4, "R": 0.0}},
                    "recommendations": {"B": {"score": 0.4}}
                }),
            ),
            StepResult::new("LearningPathUnit", "generate_learning_path", json!({"modules": []})),
        ]);
        let mut profile = ProfileRecord::new("ada");
        profile.apply_workflow(&agg).unwrap();
        assert_eq!(profile.interests, ["bitcoin", "music"]);
        assert_eq!(profile.framework_scores["braved"].get("B"), Some(0.4));
        assert_eq!(profile.recommendations["braved"]["B"]["score"], 0.4);
        assert!(profile.recommendations.get("balajis").is_none());
    }

    #[test]
    fn test_failed_apply_leaves_record_unchanged() {
        let mut profile = ProfileRecord::new("ada");
        profile.interests = vec!["bitcoin".into()];
        profile
            .framework_scores
            .insert("braved".into(), ComponentScoreMap::from_pairs([("B", 0.4)]));
        profile.recommendations = json!({"braved": {"B": {"score": 0.4}}});
        let before = profile.clone();

        let agg = aggregate(vec![
            StepResult::new(
                "InterestAnalysisUnit",
                "analyze_interests",
                json!({"interest_scores": {"music": 0.6}}),
            ),
            StepResult::new(
                "BRAVEDAnalysisUnit",
                "analyze_braved",
                json!({
                    "framework": "BRAVED",
                    "analysis": {"component_scores": {"B": 0.9}},
                    "recommendations": {"B": {"score": 0.9}}
                }),
            ),
            StepResult::new(
                "BALAJISAnalysisUnit",
                "analyze_balajis",
                json!({
                    "framework": "BALAJIS",
                    "analysis": {"component_scores": {"B": "oops"}}
                }),
            ),
        ]);
        assert!(profile.apply_workflow(&agg).is_err());
        assert_eq!(profile, before);
    }
}
