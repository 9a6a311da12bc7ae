//! Content catalog: tiered learning paths, resources and projects per component.
//!
//! The catalog is externally maintained reference data. It is read-only and
//! may lag the taxonomy, so a missing entry is a normal answer (`None`).

use crate::error::{BeensMindError, Result};
use async_trait::async_trait;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

static BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Skill tier selecting recommendation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Beginner,
    Intermediate,
    Advanced,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Beginner, Tier::Intermediate, Tier::Advanced];

    /// Case-insensitive parse; `None` for anything else.
    pub fn parse(s: &str) -> Option<Tier> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Tier::Beginner),
            "intermediate" => Some(Tier::Intermediate),
            "advanced" => Some(Tier::Advanced),
            _ => None,
        }
    }

    /// Read a `skill_level` parameter, falling back to `default` when absent or null.
    pub fn from_param(value: Option<&Value>, default: Tier) -> Result<Tier> {
        match value {
            None | Some(Value::Null) => Ok(default),
            Some(Value::String(s)) => Tier::parse(s).ok_or_else(|| BeensMindError::InvalidParams {
                message: format!(
                    "unknown skill_level '{}', expected beginner, intermediate or advanced",
                    s
                ),
            }),
            Some(other) => Err(BeensMindError::InvalidParams {
                message: format!("skill_level must be a string, got {}", other),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Beginner => "beginner",
            Tier::Intermediate => "intermediate",
            Tier::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStage {
    pub title: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub beginner: LearningStage,
    pub intermediate: LearningStage,
    pub advanced: LearningStage,
}

impl LearningPath {
    pub fn stage(&self, tier: Tier) -> &LearningStage {
        match tier {
            Tier::Beginner => &self.beginner,
            Tier::Intermediate => &self.intermediate,
            Tier::Advanced => &self.advanced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub title: String,
    pub locator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    /// Platform, author or channel description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Resource kind (courses, books, ...) to entries, in catalog order.
///
/// Serializes as a JSON object `{kind: [entry, ...]}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceGroups {
    groups: Vec<(String, Vec<ResourceEntry>)>,
}

impl ResourceGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries to `kind`, creating the group at the end if new.
    pub fn push(&mut self, kind: &str, entries: Vec<ResourceEntry>) {
        match self.groups.iter_mut().find(|(k, _)| k == kind) {
            Some((_, existing)) => existing.extend(entries),
            None => self.groups.push((kind.to_string(), entries)),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&[ResourceEntry]> {
        self.groups
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for ResourceGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (kind, entries) in &self.groups {
            map.serialize_entry(kind, entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResourceGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = ResourceGroups;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of resource kind to a list of resources")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut groups = ResourceGroups::default();
                while let Some((kind, entries)) =
                    access.next_entry::<String, Vec<ResourceEntry>>()?
                {
                    groups.push(&kind, entries);
                }
                Ok(groups)
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub tier: Tier,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub outcomes: Vec<String>,
    #[serde(default)]
    pub locators: Vec<String>,
}

/// Everything the catalog knows about one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub learning_path: LearningPath,
    #[serde(default)]
    pub resources: ResourceGroups,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl CatalogEntry {
    pub fn projects_for(&self, tier: Tier) -> Vec<Project> {
        self.projects
            .iter()
            .filter(|p| p.tier == tier)
            .cloned()
            .collect()
    }
}

/// Read-only source of catalog entries keyed by framework and component id.
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    /// `Ok(None)` when the catalog has nothing for this component.
    async fn entry(&self, framework: &str, component_id: &str) -> Result<Option<CatalogEntry>>;
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct CatalogFile {
    #[serde(default)]
    version: Option<String>,
    frameworks: BTreeMap<String, BTreeMap<String, CatalogEntry>>,
}

/// In-memory catalog parsed from the JSON catalog format.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    version: Option<String>,
    entries: BTreeMap<String, BTreeMap<String, CatalogEntry>>,
}

impl StaticCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    /// Use `path` when given, otherwise the bundled catalog.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::bundled(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BeensMindError::Catalog {
            message: format!("cannot read catalog {}: {}", path.display(), e),
        })?;
        let catalog = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded catalog {} ({} entries) from {}",
            catalog.version.as_deref().unwrap_or("unversioned"),
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(content).map_err(|e| BeensMindError::Catalog {
                message: format!("invalid catalog JSON: {}", e),
            })?;
        Ok(Self {
            version: file.version,
            entries: file
                .frameworks
                .into_iter()
                .map(|(fw, entries)| (fw.to_lowercase(), entries))
                .collect(),
        })
    }

    pub fn insert(&mut self, framework: &str, component_id: &str, entry: CatalogEntry) {
        self.entries
            .entry(framework.to_lowercase())
            .or_default()
            .insert(component_id.to_string(), entry);
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, framework: &str, component_id: &str) -> Option<&CatalogEntry> {
        self.entries
            .get(&framework.to_lowercase())
            .and_then(|fw| fw.get(component_id))
    }
}

#[async_trait]
impl ContentCatalog for StaticCatalog {
    async fn entry(&self, framework: &str, component_id: &str) -> Result<Option<CatalogEntry>> {
        Ok(self.lookup(framework, component_id).cloned())
    }
}
