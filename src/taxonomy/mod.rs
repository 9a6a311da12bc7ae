//! Taxonomy registry: frameworks, their components, and definition loading.
//!
//! Frameworks are loaded once at process start and are read-only afterward.
//! Component identifiers must be unique within a framework; definitions that
//! reuse an identifier are rejected instead of silently overwritten.

pub mod balajis;
pub mod braved;

use crate::error::{BeensMindError, Result, closest_match};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// One named category within a framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    /// Stored lower-cased; matched as substrings.
    pub keywords: Vec<String>,
    pub description: String,
}

impl Component {
    pub fn new(id: &str, name: &str, keywords: &[&str], description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            description: description.to_string(),
        }
    }

    /// True if any keyword occurs in `lowered` (caller lower-cases once per signal).
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Keywords found in `lowered`, in definition order.
    pub fn matched_keywords(&self, lowered: &str) -> Vec<&str> {
        self.keywords
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
            .map(|k| k.as_str())
            .collect()
    }
}

/// A fixed, ordered taxonomy of components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Framework {
    /// Lookup key, e.g. "braved".
    pub key: String,
    /// Display name, e.g. "BRAVED".
    pub name: String,
    components: Vec<Component>,
}

impl Framework {
    pub fn new(key: &str, name: &str, components: Vec<Component>) -> Result<Self> {
        if key.trim().is_empty() {
            return Err(BeensMindError::Validation {
                message: "framework key cannot be empty".into(),
            });
        }
        if components.is_empty() {
            return Err(BeensMindError::Validation {
                message: format!("framework '{}' has no components", key),
            });
        }
        let mut seen = HashSet::new();
        for c in &components {
            if c.id.trim().is_empty() {
                return Err(BeensMindError::Validation {
                    message: format!("framework '{}' has a component with an empty id", key),
                });
            }
            if !seen.insert(c.id.as_str()) {
                return Err(BeensMindError::DuplicateComponent {
                    framework: key.to_string(),
                    id: c.id.clone(),
                });
            }
        }
        Ok(Self {
            key: key.to_lowercase(),
            name: name.to_string(),
            components,
        })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Serialized component definition: `{id, name, keywords, description}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Serialized framework definition with its ordered components.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FrameworkDef {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    pub components: Vec<ComponentDef>,
}

impl FrameworkDef {
    pub fn build(&self) -> Result<Framework> {
        let components = self
            .components
            .iter()
            .map(|c| Component {
                id: c.id.trim().to_string(),
                name: c.name.clone(),
                keywords: c
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
                description: c.description.clone(),
            })
            .collect();
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| self.key.to_uppercase());
        Framework::new(&self.key, &name, components)
    }
}

/// Top-level definition file layout (TOML or JSON).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FrameworkDefinitions {
    pub frameworks: Vec<FrameworkDef>,
}

/// Holds every framework known to the process.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyRegistry {
    frameworks: Vec<Arc<Framework>>,
}

static BUILTIN: Lazy<TaxonomyRegistry> = Lazy::new(|| TaxonomyRegistry {
    frameworks: vec![Arc::new(braved::framework()), Arc::new(balajis::framework())],
});

impl TaxonomyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in BRAVED and BALAJIS frameworks.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Use `path` when given, otherwise the built-ins.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::builtin()),
        }
    }

    /// Load definitions from a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BeensMindError::Config {
            message: format!("cannot read framework definitions {}: {}", path.display(), e),
        })?;
        let defs: FrameworkDefinitions = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        let registry = Self::from_definitions(&defs)?;
        tracing::info!(
            "Loaded {} framework(s) from {}",
            registry.frameworks.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn from_definitions(defs: &FrameworkDefinitions) -> Result<Self> {
        let mut registry = Self::new();
        for def in &defs.frameworks {
            registry.register(def.build()?)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, framework: Framework) -> Result<()> {
        if self.frameworks.iter().any(|f| f.key == framework.key) {
            return Err(BeensMindError::Validation {
                message: format!("framework '{}' is already registered", framework.key),
            });
        }
        self.frameworks.push(Arc::new(framework));
        Ok(())
    }

    /// Case-insensitive lookup by key or display name.
    pub fn get(&self, name: &str) -> Result<Arc<Framework>> {
        let wanted = name.trim().to_lowercase();
        self.frameworks
            .iter()
            .find(|f| f.key == wanted || f.name.to_lowercase() == wanted)
            .cloned()
            .ok_or_else(|| BeensMindError::UnknownFramework {
                name: match closest_match(name, self.frameworks.iter().map(|f| f.key.as_str())) {
                    Some(s) => format!("{} (did you mean '{}'?)", name, s),
                    None => name.to_string(),
                },
            })
    }

    pub fn frameworks(&self) -> &[Arc<Framework>] {
        &self.frameworks
    }
}
