//! Learning modules and a weekly schedule built from interest signals.

use super::{AnalysisUnit, TaskParams, to_value, unknown_task};
use crate::analysis::signals_from_value;
use crate::catalog::{ResourceEntry, ResourceGroups, Tier};
use crate::error::{BeensMindError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Value, json};

pub const UNIT_NAME: &str = "LearningPathUnit";
pub const GENERATE_LEARNING_PATH: &str = "generate_learning_path";

const MODULE_WEEKS: u32 = 4;
const WEEKLY_COMMITMENT: &str = "5-7 hours";

#[derive(Debug, Clone, Serialize)]
pub struct LearningModule {
    pub title: String,
    pub category: String,
    pub skill_level: Tier,
    pub duration_weeks: u32,
    pub objectives: Vec<String>,
    pub prerequisites: Vec<String>,
    pub resources: ResourceGroups,
}

#[derive(Debug, Clone, Serialize)]
pub struct Milestone {
    pub week: u32,
    pub description: String,
    pub tasks: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleSchedule {
    pub module_title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub weekly_commitment: String,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub start_date: DateTime<Utc>,
    pub modules: Vec<ModuleSchedule>,
}

#[derive(Debug)]
pub struct LearningPathUnit {
    default_tier: Tier,
}

impl LearningPathUnit {
    pub fn new(default_tier: Tier) -> Self {
        Self { default_tier }
    }

    pub fn build_module(topic: &str, category: &str, tier: Tier) -> LearningModule {
        LearningModule {
            title: format!("{} Fundamentals", title_case(topic)),
            category: category.to_string(),
            skill_level: tier,
            duration_weeks: MODULE_WEEKS,
            objectives: vec![
                format!("Understand core concepts of {}", topic),
                format!("Apply {} principles in practice", topic),
                format!("Build a foundation for advanced {} topics", topic),
            ],
            prerequisites: Vec::new(),
            resources: module_resources(topic, tier),
        }
    }

    /// Modules run back to back from `start`, one milestone per week.
    /// Milestone tasks cycle through the module's objectives.
    pub fn build_schedule(modules: &[LearningModule], start: DateTime<Utc>) -> Schedule {
        let mut current = start;
        let mut scheduled = Vec::with_capacity(modules.len());
        for module in modules {
            let end = current + Duration::weeks(i64::from(module.duration_weeks));
            let milestones = (0..module.duration_weeks)
                .map(|i| {
                    let description = format!("Week {} objectives", i + 1);
                    let tasks = if module.objectives.is_empty() {
                        format!("Study {}", module.title)
                    } else {
                        module.objectives[i as usize % module.objectives.len()].clone()
                    };
                    Milestone {
                        week: i + 1,
                        description,
                        tasks,
                    }
                })
                .collect();
            scheduled.push(ModuleSchedule {
                module_title: module.title.clone(),
                start_date: current,
                end_date: end,
                weekly_commitment: WEEKLY_COMMITMENT.to_string(),
                milestones,
            });
            current = end;
        }
        Schedule {
            start_date: start,
            modules: scheduled,
        }
    }

    fn generate(&self, params: &TaskParams) -> Result<Value> {
        let signals = signals_from_value(params.get("interests"))?;
        let tier = Tier::from_param(params.get("skill_level"), self.default_tier)?;
        let start = match params.get("start_date") {
            None | Some(Value::Null) => Utc::now(),
            Some(Value::String(s)) => parse_start_date(s)?,
            Some(other) => {
                return Err(BeensMindError::InvalidParams {
                    message: format!("start_date must be a string, got {}", other),
                });
            }
        };

        let modules: Vec<LearningModule> = signals
            .iter()
            .filter_map(|s| s.primary_text().map(|t| Self::build_module(t, &s.category, tier)))
            .collect();
        let schedule = Self::build_schedule(&modules, start);
        let total_weeks: u32 = modules.iter().map(|m| m.duration_weeks).sum();

        tracing::info!(modules = modules.len(), total_weeks, "Learning path generated");

        Ok(json!({
            "modules": to_value(&modules)?,
            "schedule": to_value(&schedule)?,
            "total_duration_weeks": total_weeks,
        }))
    }
}

#[async_trait]
impl AnalysisUnit for LearningPathUnit {
    fn name(&self) -> &str {
        UNIT_NAME
    }

    fn tasks(&self) -> Vec<String> {
        vec![GENERATE_LEARNING_PATH.to_string()]
    }

    async fn execute(&self, task: &str, params: TaskParams) -> Result<Value> {
        match task {
            GENERATE_LEARNING_PATH => self.generate(&params),
            other => Err(unknown_task(UNIT_NAME, other, &self.tasks())),
        }
    }
}

/// RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_start_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| BeensMindError::InvalidParams {
            message: format!("start_date '{}' is not RFC 3339 or YYYY-MM-DD", s),
        })
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

fn slug(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn module_resources(topic: &str, tier: Tier) -> ResourceGroups {
    let title = title_case(topic);
    let slug = slug(topic);
    let entry = |title: String, locator: String, source: &str| ResourceEntry {
        title,
        locator,
        tier: Some(tier),
        source: Some(source.to_string()),
    };
    let mut resources = ResourceGroups::new();
    resources.push(
        "courses",
        vec![
            entry(
                format!("{} for {}s", title, title_case(tier.as_str())),
                format!("https://udemy.com/courses/{}-{}", slug, tier),
                "udemy",
            ),
            entry(
                format!("Introduction to {}", topic),
                format!("https://coursera.org/learn/{}", slug),
                "coursera",
            ),
        ],
    );
    resources.push(
        "books",
        vec![entry(
            format!("The Complete Guide to {}", title),
            format!("https://books.com/{}", slug),
            "Expert Author",
        )],
    );
    resources.push(
        "videos",
        vec![entry(
            format!("{} Tutorial Series", title),
            format!("https://youtube.com/playlist?list={}", slug),
            "youtube",
        )],
    );
    resources.push(
        "communities",
        vec![entry(
            format!("{} Community", title),
            format!("https://discord.gg/{}", slug),
            "discord",
        )],
    );
    resources.push(
        "practice",
        vec![entry(
            format!("{} Practice Projects", title),
            format!("https://github.com/topics/{}-projects", slug),
            "github",
        )],
    );
    resources
}
