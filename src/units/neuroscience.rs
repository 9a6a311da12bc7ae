//! Learning-style, timing and retention analysis plus per-topic mastery assessment.

use super::{AnalysisUnit, TaskParams, to_value, unknown_task};
use crate::error::{BeensMindError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub const UNIT_NAME: &str = "NeuroscienceUnit";
pub const ANALYZE_LEARNING_PATTERNS: &str = "analyze_learning_patterns";
pub const ASSESS_MASTERY_LEVEL: &str = "assess_mastery_level";

/// (style, weight, activity type indicators)
const LEARNING_STYLES: &[(&str, f64, &[&str])] = &[
    ("visual", 0.3, &["diagrams", "videos", "images"]),
    ("auditory", 0.3, &["podcasts", "discussions", "lectures"]),
    ("kinesthetic", 0.2, &["projects", "exercises", "hands-on"]),
    ("reading_writing", 0.2, &["articles", "notes", "documentation"]),
];

const STRONG_STYLE_SCORE: f64 = 0.7;

const QUIZ_WEIGHT: f64 = 0.3;
const PROJECT_WEIGHT: f64 = 0.3;
const TIME_WEIGHT: f64 = 0.2;
const ENGAGEMENT_WEIGHT: f64 = 0.2;

const STRENGTH_ABOVE: f64 = 0.8;
const IMPROVE_BELOW: f64 = 0.6;

/// Mastery levels in ascending order of their score threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    Novice,
    Intermediate,
    Advanced,
    Expert,
}

impl MasteryLevel {
    pub const ALL: [MasteryLevel; 4] = [
        MasteryLevel::Novice,
        MasteryLevel::Intermediate,
        MasteryLevel::Advanced,
        MasteryLevel::Expert,
    ];

    pub fn threshold(&self) -> f64 {
        match self {
            MasteryLevel::Novice => 0.3,
            MasteryLevel::Intermediate => 0.6,
            MasteryLevel::Advanced => 0.8,
            MasteryLevel::Expert => 0.95,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MasteryLevel::Novice => "Basic understanding",
            MasteryLevel::Intermediate => "Good working knowledge",
            MasteryLevel::Advanced => "Deep understanding",
            MasteryLevel::Expert => "Mastery level",
        }
    }

    /// Highest level whose threshold `score` reaches; `None` below novice.
    pub fn for_score(score: f64) -> Option<MasteryLevel> {
        Self::ALL
            .iter()
            .rev()
            .find(|level| score >= level.threshold())
            .copied()
    }
}

#[derive(Debug, Deserialize)]
struct Activity {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    engagement_score: f64,
}

#[derive(Debug, Deserialize)]
struct ActivityTime {
    timestamp: DateTime<Utc>,
    #[serde(default)]
    success_rate: f64,
}

#[derive(Debug, Deserialize)]
struct QuizResult {
    topic: String,
    total_questions: u32,
    correct_answers: u32,
}

#[derive(Debug, Deserialize)]
struct PatternParams {
    #[serde(default)]
    activities: Vec<Activity>,
    #[serde(default)]
    activity_times: Option<Vec<ActivityTime>>,
    #[serde(default)]
    quiz_results: Option<Vec<QuizResult>>,
}

/// Inputs for a mastery assessment. Fractions are in [0, 1].
#[derive(Debug, Clone, Deserialize)]
pub struct TopicProgress {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quiz_scores: Vec<f64>,
    #[serde(default)]
    pub project_completion: f64,
    #[serde(default)]
    pub time_spent: f64,
    #[serde(default = "default_expected_time")]
    pub expected_time: f64,
    #[serde(default)]
    pub engagement_score: f64,
}

fn default_expected_time() -> f64 {
    1.0
}

impl Default for TopicProgress {
    fn default() -> Self {
        Self {
            name: None,
            quiz_scores: Vec::new(),
            project_completion: 0.0,
            time_spent: 0.0,
            expected_time: default_expected_time(),
            engagement_score: 0.0,
        }
    }
}

impl TopicProgress {
    fn quiz_average(&self) -> Option<f64> {
        if self.quiz_scores.is_empty() {
            None
        } else {
            Some(self.quiz_scores.iter().sum::<f64>() / self.quiz_scores.len() as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalTime {
    pub hour: u32,
    pub success_rate: f64,
    pub activity_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicRetention {
    pub topic: String,
    pub total_questions: u32,
    pub correct_answers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Retention {
    /// Percentage of all questions answered correctly.
    pub overall_retention: f64,
    pub topic_retention: Vec<TopicRetention>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl Suggestion {
    fn new(kind: &str, message: String, suggestions: &[&str]) -> Self {
        Self {
            kind: kind.to_string(),
            message,
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasteryAssessment {
    pub topic: Option<String>,
    pub mastery_level: Option<MasteryLevel>,
    pub description: Option<&'static str>,
    pub score: f64,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<Suggestion>,
}

#[derive(Debug, Default)]
pub struct NeuroscienceUnit;

impl NeuroscienceUnit {
    pub fn new() -> Self {
        Self
    }

    /// Mean engagement over activities whose type mentions any indicator.
    pub fn style_score(activities: &[(String, f64)], indicators: &[&str]) -> f64 {
        let matched: Vec<f64> = activities
            .iter()
            .filter(|(kind, _)| {
                let kind = kind.to_lowercase();
                indicators.iter().any(|i| kind.contains(i))
            })
            .map(|(_, engagement)| *engagement)
            .collect();
        if matched.is_empty() {
            0.0
        } else {
            matched.iter().sum::<f64>() / matched.len() as f64
        }
    }

    /// Weighted blend of quiz average, project completion, time ratio and engagement.
    pub fn mastery_score(progress: &TopicProgress) -> f64 {
        let quiz = progress.quiz_average().unwrap_or(0.0).clamp(0.0, 1.0);
        let project = progress.project_completion.clamp(0.0, 1.0);
        let time = if progress.expected_time > 0.0 {
            (progress.time_spent / progress.expected_time).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let engagement = progress.engagement_score.clamp(0.0, 1.0);
        quiz * QUIZ_WEIGHT + project * PROJECT_WEIGHT + time * TIME_WEIGHT + engagement * ENGAGEMENT_WEIGHT
    }

    pub fn assess(progress: &TopicProgress) -> Result<MasteryAssessment> {
        if !(progress.expected_time > 0.0) {
            return Err(BeensMindError::InvalidParams {
                message: format!(
                    "expected_time must be positive, got {}",
                    progress.expected_time
                ),
            });
        }

        let score = Self::mastery_score(progress);
        let level = MasteryLevel::for_score(score);

        let mut strengths = Vec::new();
        let mut improve = Vec::new();
        if let Some(avg) = progress.quiz_average() {
            if avg > STRENGTH_ABOVE {
                strengths.push("Strong theoretical understanding".to_string());
            }
            if avg < IMPROVE_BELOW {
                improve.push("Need to strengthen theoretical understanding".to_string());
            }
        }
        if progress.project_completion > STRENGTH_ABOVE {
            strengths.push("Excellent practical application".to_string());
        }
        if progress.project_completion < IMPROVE_BELOW {
            improve.push("Need more practical experience".to_string());
        }
        if progress.engagement_score > STRENGTH_ABOVE {
            strengths.push("High engagement and participation".to_string());
        }
        if progress.engagement_score < IMPROVE_BELOW {
            improve.push("Need to increase engagement".to_string());
        }

        Ok(MasteryAssessment {
            topic: progress.name.clone(),
            mastery_level: level,
            description: level.map(|l| l.description()),
            score,
            strengths,
            areas_for_improvement: improve,
            recommendations: mastery_recommendations(level),
        })
    }

    /// Success rate per hour of day, best first. Ties keep first-seen order.
    fn optimal_times(times: &[ActivityTime]) -> Vec<OptimalTime> {
        let mut slots: Vec<(u32, usize, f64)> = Vec::new();
        for t in times {
            let hour = t.timestamp.hour();
            match slots.iter_mut().find(|(h, _, _)| *h == hour) {
                Some((_, count, total)) => {
                    *count += 1;
                    *total += t.success_rate;
                }
                None => slots.push((hour, 1, t.success_rate)),
            }
        }
        let mut optimal: Vec<OptimalTime> = slots
            .into_iter()
            .map(|(hour, count, total)| OptimalTime {
                hour,
                success_rate: total / count as f64,
                activity_count: count,
            })
            .collect();
        optimal.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate));
        optimal
    }

    fn retention(results: &[QuizResult]) -> Retention {
        let total: u32 = results.iter().map(|q| q.total_questions).sum();
        let correct: u32 = results.iter().map(|q| q.correct_answers).sum();
        let mut topics: Vec<TopicRetention> = Vec::new();
        for quiz in results {
            match topics.iter_mut().find(|t| t.topic == quiz.topic) {
                Some(t) => {
                    t.total_questions += quiz.total_questions;
                    t.correct_answers += quiz.correct_answers;
                }
                None => topics.push(TopicRetention {
                    topic: quiz.topic.clone(),
                    total_questions: quiz.total_questions,
                    correct_answers: quiz.correct_answers,
                }),
            }
        }
        Retention {
            overall_retention: if total > 0 {
                f64::from(correct) / f64::from(total) * 100.0
            } else {
                0.0
            },
            topic_retention: topics,
        }
    }

    fn analyze_patterns(&self, params: TaskParams) -> Result<Value> {
        let PatternParams {
            activities,
            activity_times,
            quiz_results,
        } = serde_json::from_value(Value::Object(params)).map_err(|e| {
            BeensMindError::InvalidParams {
                message: format!("{}: {}", ANALYZE_LEARNING_PATTERNS, e),
            }
        })?;

        let activities: Vec<(String, f64)> = activities
            .into_iter()
            .map(|a| (a.kind, a.engagement_score))
            .collect();

        let mut preferences = Map::new();
        let mut recommendations = Vec::new();
        for (style, weight, indicators) in LEARNING_STYLES {
            let score = Self::style_score(&activities, indicators);
            preferences.insert(style.to_string(), json!({"score": score, "weight": weight}));
            if score > STRONG_STYLE_SCORE {
                recommendations.push(Suggestion::new(
                    "learning_style",
                    format!("Leverage your strong {} learning preference", style),
                    style_suggestions(style),
                ));
            }
        }

        let optimal = activity_times
            .as_deref()
            .map(Self::optimal_times)
            .unwrap_or_default();
        if let Some(best) = optimal.first() {
            recommendations.push(Suggestion::new(
                "timing",
                format!("Schedule learning sessions around {}:00", best.hour),
                &["Plan intensive learning during optimal hours"],
            ));
        }

        let retention = match quiz_results.as_deref() {
            Some(results) => to_value(&Self::retention(results))?,
            None => json!({}),
        };

        tracing::debug!(
            activities = activities.len(),
            timing_slots = optimal.len(),
            "Analyzed learning patterns"
        );

        Ok(json!({
            "learning_style_preferences": preferences,
            "optimal_learning_times": optimal,
            "retention_patterns": retention,
            "recommendations": recommendations,
        }))
    }

    fn assess_mastery(&self, params: TaskParams) -> Result<Value> {
        let progress: TopicProgress =
            serde_json::from_value(Value::Object(params)).map_err(|e| {
                BeensMindError::InvalidParams {
                    message: format!("{}: {}", ASSESS_MASTERY_LEVEL, e),
                }
            })?;
        to_value(&Self::assess(&progress)?)
    }
}

fn style_suggestions(style: &str) -> &'static [&'static str] {
    match style {
        "visual" => &[
            "Use mind maps for note-taking",
            "Watch video tutorials",
            "Create visual diagrams",
        ],
        "auditory" => &[
            "Listen to educational podcasts",
            "Participate in group discussions",
            "Record and listen to your notes",
        ],
        "kinesthetic" => &[
            "Build hands-on projects",
            "Use physical models",
            "Practice with real-world applications",
        ],
        "reading_writing" => &[
            "Write detailed notes",
            "Read technical documentation",
            "Create written summaries",
        ],
        _ => &[],
    }
}

fn mastery_recommendations(level: Option<MasteryLevel>) -> Vec<Suggestion> {
    match level {
        None | Some(MasteryLevel::Novice) => vec![Suggestion::new(
            "foundation",
            "Focus on building strong fundamentals".to_string(),
            &[
                "Complete basic tutorials",
                "Practice with simple exercises",
                "Review core concepts regularly",
            ],
        )],
        Some(MasteryLevel::Intermediate) => vec![Suggestion::new(
            "practice",
            "Enhance practical application".to_string(),
            &[
                "Work on more complex projects",
                "Participate in peer reviews",
                "Teach basic concepts to others",
            ],
        )],
        Some(MasteryLevel::Advanced) => vec![Suggestion::new(
            "expertise",
            "Develop advanced expertise".to_string(),
            &[
                "Contribute to open-source projects",
                "Write technical articles",
                "Mentor others",
            ],
        )],
        Some(MasteryLevel::Expert) => Vec::new(),
    }
}

#[async_trait]
impl AnalysisUnit for NeuroscienceUnit {
    fn name(&self) -> &str {
        UNIT_NAME
    }

    fn tasks(&self) -> Vec<String> {
        vec![
            ANALYZE_LEARNING_PATTERNS.to_string(),
            ASSESS_MASTERY_LEVEL.to_string(),
        ]
    }

    async fn execute(&self, task: &str, params: TaskParams) -> Result<Value> {
        match task {
            ANALYZE_LEARNING_PATTERNS => self.analyze_patterns(params),
            ASSESS_MASTERY_LEVEL => self.assess_mastery(params),
            _ => Err(unknown_task(UNIT_NAME, task, &self.tasks())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(v: Value) -> TaskParams {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_mastery_score_is_weighted() {
        let progress = TopicProgress {
            quiz_scores: vec![0.9, 0.7],
            project_completion: 0.5,
            time_spent: 30.0,
            expected_time: 40.0,
            engagement_score: 1.0,
            ..Default::default()
        };
        // 0.8*0.3 + 0.5*0.3 + 0.75*0.2 + 1.0*0.2
        let score = NeuroscienceUnit::mastery_score(&progress);
        assert!((score - 0.74).abs() < 1e-12);
    }

    #[test]
    fn test_time_ratio_is_capped() {
        let progress = TopicProgress {
            time_spent: 500.0,
            expected_time: 10.0,
            ..Default::default()
        };
        assert!((NeuroscienceUnit::mastery_score(&progress) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(MasteryLevel::for_score(0.0), None);
        assert_eq!(MasteryLevel::for_score(0.29), None);
        assert_eq!(MasteryLevel::for_score(0.3), Some(MasteryLevel::Novice));
        assert_eq!(MasteryLevel::for_score(0.59), Some(MasteryLevel::Novice));
        assert_eq!(MasteryLevel::for_score(0.6), Some(MasteryLevel::Intermediate));
        assert_eq!(MasteryLevel::for_score(0.8), Some(MasteryLevel::Advanced));
        assert_eq!(MasteryLevel::for_score(0.94), Some(MasteryLevel::Advanced));
        assert_eq!(MasteryLevel::for_score(0.95), Some(MasteryLevel::Expert));
        assert_eq!(MasteryLevel::for_score(1.0), Some(MasteryLevel::Expert));
    }

    #[test]
    fn test_assessment_strengths_and_gaps() {
        let progress = TopicProgress {
            name: Some("rust".into()),
            quiz_scores: vec![0.9],
            project_completion: 0.4,
            time_spent: 1.0,
            expected_time: 1.0,
            engagement_score: 0.7,
        };
        let a = NeuroscienceUnit::assess(&progress).unwrap();
        // 0.27 + 0.12 + 0.2 + 0.14
        assert!((a.score - 0.73).abs() < 1e-12);
        assert_eq!(a.mastery_level, Some(MasteryLevel::Intermediate));
        assert_eq!(a.strengths, ["Strong theoretical understanding"]);
        assert_eq!(a.areas_for_improvement, ["Need more practical experience"]);
        assert_eq!(a.recommendations[0].kind, "practice");
    }

    #[test]
    fn test_non_positive_expected_time_is_invalid() {
        let progress = TopicProgress {
            expected_time: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            NeuroscienceUnit::assess(&progress),
            Err(BeensMindError::InvalidParams { .. })
        ));
    }

    #[tokio::test]
    async fn test_learning_patterns() {
        let unit = NeuroscienceUnit::new();
        let out = unit
            .execute(
                ANALYZE_LEARNING_PATTERNS,
                params(json!({
                    "activities": [
                        {"type": "YouTube videos", "engagement_score": 0.9},
                        {"type": "diagrams", "engagement_score": 0.7},
                        {"type": "podcasts", "engagement_score": 0.4}
                    ],
                    "activity_times": [
                        {"timestamp": "2024-01-01T09:15:00Z", "success_rate": 0.6},
                        {"timestamp": "2024-01-02T20:00:00Z", "success_rate": 0.9},
                        {"timestamp": "2024-01-03T09:45:00Z", "success_rate": 0.8}
                    ],
                    "quiz_results": [
                        {"topic": "rust", "total_questions": 10, "correct_answers": 7},
                        {"topic": "rust", "total_questions": 10, "correct_answers": 9},
                        {"topic": "go", "total_questions": 5, "correct_answers": 4}
                    ]
                })),
            )
            .await
            .unwrap();

        let prefs = &out["learning_style_preferences"];
        let styles: Vec<&String> = prefs.as_object().unwrap().keys().collect();
        assert_eq!(styles, ["visual", "auditory", "kinesthetic", "reading_writing"]);
        assert!((prefs["visual"]["score"].as_f64().unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(prefs["auditory"]["score"], 0.4);
        assert_eq!(prefs["kinesthetic"]["score"], 0.0);

        assert_eq!(out["optimal_learning_times"][0]["hour"], 20);
        assert_eq!(out["optimal_learning_times"][1]["hour"], 9);
        assert_eq!(out["optimal_learning_times"][1]["activity_count"], 2);

        assert_eq!(out["retention_patterns"]["overall_retention"], 80.0);
        assert_eq!(out["retention_patterns"]["topic_retention"][0]["topic"], "rust");
        assert_eq!(
            out["retention_patterns"]["topic_retention"][0]["correct_answers"],
            16
        );

        let kinds: Vec<&str> = out["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["type"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, ["learning_style", "timing"]);
    }

    #[tokio::test]
    async fn test_patterns_without_optional_data() {
        let out = NeuroscienceUnit::new()
            .execute(ANALYZE_LEARNING_PATTERNS, TaskParams::new())
            .await
            .unwrap();
        assert_eq!(out["optimal_learning_times"], json!([]));
        assert_eq!(out["retention_patterns"], json!({}));
        assert_eq!(out["recommendations"], json!([]));
    }

    #[tokio::test]
    async fn test_assess_mastery_task() {
        let out = NeuroscienceUnit::new()
            .execute(
                ASSESS_MASTERY_LEVEL,
                params(json!({
                    "name": "solidity",
                    "quiz_scores": [1.0, 1.0],
                    "project_completion": 1.0,
                    "time_spent": 12,
                    "expected_time": 10,
                    "engagement_score": 0.9
                })),
            )
            .await
            .unwrap();
        assert_eq!(out["topic"], "solidity");
        assert_eq!(out["mastery_level"], "expert");
        assert_eq!(out["description"], "Mastery level");
        assert_eq!(out["recommendations"], json!([]));

        let err = NeuroscienceUnit::new()
            .execute("assess_mastery", TaskParams::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BeensMindError::UnknownTask { ref suggestion, .. }
                if suggestion.as_deref() == Some(ASSESS_MASTERY_LEVEL)
        ));
    }
}
