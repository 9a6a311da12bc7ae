//! Types for interest signals, component scores and alignment reports.

use crate::deserializers::{de_option_confidence_forgiving, de_secondary_interests};
use crate::error::BeensMindError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// One caller-supplied statement of interest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InterestSignal {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub primary_interest: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_secondary_interests",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub secondary_interests: Vec<String>,
    #[serde(
        default,
        deserialize_with = "de_option_confidence_forgiving",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence_score: Option<f64>,
}

impl InterestSignal {
    pub fn new(category: &str, primary_interest: &str, confidence_score: Option<f64>) -> Self {
        Self {
            category: category.to_string(),
            primary_interest: Some(primary_interest.to_string()),
            secondary_interests: Vec::new(),
            confidence_score,
        }
    }

    pub fn with_secondary(mut self, secondary: &[&str]) -> Self {
        self.secondary_interests = secondary.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Primary interest text, if present and not blank.
    pub fn primary_text(&self) -> Option<&str> {
        self.primary_interest
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Parse signals from a unit parameter.
///
/// Accepts an array of signal objects or the object form
/// `{category: {primary_interest, secondary_interests, confidence_score}}`.
/// Individual malformed entries are skipped with a warning.
pub fn signals_from_value(value: Option<&Value>) -> crate::error::Result<Vec<InterestSignal>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| parse_signal(item, None, &format!("#{}", idx)))
            .collect()),
        Value::Object(map) => Ok(map
            .iter()
            .filter_map(|(category, data)| parse_signal(data, Some(category), category))
            .collect()),
        other => Err(BeensMindError::InvalidParams {
            message: format!(
                "'interests' must be an array or an object keyed by category, got {}",
                json_type(other)
            ),
        }),
    }
}

fn parse_signal(data: &Value, category: Option<&str>, label: &str) -> Option<InterestSignal> {
    match data {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            if let Some(category) = category {
                fields
                    .entry("category")
                    .or_insert_with(|| Value::String(category.to_string()));
            }
            match serde_json::from_value::<InterestSignal>(Value::Object(fields)) {
                Ok(signal) => Some(signal),
                Err(e) => {
                    tracing::warn!("Skipping malformed interest signal {}: {}", label, e);
                    None
                }
            }
        }
        Value::String(text) => Some(InterestSignal {
            category: category.unwrap_or_default().to_string(),
            primary_interest: Some(text.clone()),
            ..Default::default()
        }),
        other => {
            tracing::warn!(
                "Skipping interest signal {}: expected object, got {}",
                label,
                json_type(other)
            );
            None
        }
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScore {
    pub id: String,
    pub score: f64,
}

/// Accumulated score per component, kept in framework order.
///
/// Serializes as a JSON object `{id: score}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentScoreMap {
    scores: Vec<ComponentScore>,
}

impl ComponentScoreMap {
    /// Every id present with a zero score.
    pub fn zeroed<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            scores: ids
                .into_iter()
                .map(|id| ComponentScore {
                    id: id.to_string(),
                    score: 0.0,
                })
                .collect(),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut map = Self::default();
        for (id, score) in pairs {
            map.set(id, score);
        }
        map
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.scores.iter().find(|c| c.id == id).map(|c| c.score)
    }

    /// Insert or overwrite.
    pub fn set(&mut self, id: &str, score: f64) {
        match self.scores.iter_mut().find(|c| c.id == id) {
            Some(c) => c.score = score,
            None => self.scores.push(ComponentScore {
                id: id.to_string(),
                score,
            }),
        }
    }

    pub(crate) fn add(&mut self, id: &str, amount: f64) {
        let current = self.get(id).unwrap_or(0.0);
        self.set(id, current + amount);
    }

    pub fn total(&self) -> f64 {
        self.scores.iter().map(|c| c.score).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|c| (c.id.as_str(), c.score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Serialize for ComponentScoreMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scores.len()))?;
        for c in &self.scores {
            map.serialize_entry(&c.id, &c.score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ComponentScoreMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = ComponentScoreMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of component id to numeric score")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut map = ComponentScoreMap::default();
                while let Some((id, score)) = access.next_entry::<String, f64>()? {
                    map.set(&id, score);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// One signal's contribution to a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub category: String,
    pub interest: String,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

/// Contributions to one component, in input signal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDetail {
    pub component_id: String,
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantComponent {
    pub id: String,
    pub name: String,
    pub score: f64,
}

/// Output of [`crate::analysis::Classifier::classify`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub framework: String,
    pub component_scores: ComponentScoreMap,
    pub component_details: Vec<ComponentDetail>,
    pub dominant_components: Vec<DominantComponent>,
    /// Signals skipped for missing text or unusable confidence.
    pub skipped_signals: usize,
}

impl Classification {
    pub fn details_for(&self, id: &str) -> Option<&ComponentDetail> {
        self.component_details.iter().find(|d| d.component_id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentLevel {
    NoneDetected,
    WellAligned,
    ModeratelyAligned,
    LimitedAlignment,
}

impl AlignmentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentLevel::NoneDetected => "no components detected",
            AlignmentLevel::WellAligned => "well aligned",
            AlignmentLevel::ModeratelyAligned => "moderately aligned",
            AlignmentLevel::LimitedAlignment => "limited alignment",
        }
    }
}

/// Output of [`crate::analysis::DistributionAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentReport {
    /// `1 - sum(|share - 1/n|)`; not clamped, may be negative.
    pub alignment_score: f64,
    pub level: AlignmentLevel,
    pub assessment: String,
    /// Empty when no component scored.
    pub component_distribution: ComponentScoreMap,
    pub recommendations: Vec<String>,
}
