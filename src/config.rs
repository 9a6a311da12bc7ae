use crate::error::{BeensMindError, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from beens_mind.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub orchestrator: OrchestratorConfig,
    pub taxonomy: TaxonomyConfig,
    pub catalog: CatalogConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Thresholds and weights used by the classifier and distribution analyzer.
///
/// Passed explicitly to [`crate::analysis::Classifier`] and
/// [`crate::analysis::DistributionAnalyzer`]; never read from globals.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Alignment strictly above this is "well aligned".
    pub well_aligned_threshold: f64,
    /// Alignment strictly above this (and not well aligned) is "moderately aligned".
    pub moderate_threshold: f64,
    /// Components whose normalized share is below `ideal * multiplier` are underrepresented.
    pub underrepresentation_multiplier: f64,
    /// Confidence applied to signals that carry none.
    pub default_confidence: f64,
    pub dominant_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            well_aligned_threshold: 0.8,
            moderate_threshold: 0.6,
            underrepresentation_multiplier: 0.5,
            default_confidence: 0.5,
            dominant_count: 3,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.well_aligned_threshold) {
            return Err(config_err("well_aligned_threshold must be between 0.0 and 1.0"));
        }
        if !unit.contains(&self.moderate_threshold) {
            return Err(config_err("moderate_threshold must be between 0.0 and 1.0"));
        }
        if self.moderate_threshold > self.well_aligned_threshold {
            return Err(config_err(
                "moderate_threshold must not exceed well_aligned_threshold",
            ));
        }
        if !unit.contains(&self.underrepresentation_multiplier) {
            return Err(config_err(
                "underrepresentation_multiplier must be between 0.0 and 1.0",
            ));
        }
        if !unit.contains(&self.default_confidence) {
            return Err(config_err("default_confidence must be between 0.0 and 1.0"));
        }
        if self.dominant_count == 0 {
            return Err(config_err("dominant_count must be at least 1"));
        }
        Ok(())
    }
}

/// Orchestrator dispatch behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Per-dispatch timeout; 0 disables the timeout.
    pub dispatch_timeout_ms: u64,
    pub default_tier: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_ms: 15_000,
            default_tier: "beginner".to_string(),
        }
    }
}

/// Optional external framework definitions replacing the built-ins
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    pub frameworks_path: Option<String>,
}

/// Optional external content catalog replacing the bundled one
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: Option<String>,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "beens_mind=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "beens_mind=info".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses BEENS_MIND_CONFIG environment variable or defaults to "beens_mind.toml"
    pub fn load() -> Result<Self> {
        if let Ok(env_path) = std::env::var("BEENS_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path = std::env::var("BEENS_MIND_CONFIG")
            .unwrap_or_else(|_| "beens_mind.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply BEENS_* environment overrides (env-first)
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse::<f64>("BEENS_WELL_ALIGNED_THRESHOLD") {
            self.analysis.well_aligned_threshold = v;
        }
        if let Some(v) = env_parse::<f64>("BEENS_MODERATE_THRESHOLD") {
            self.analysis.moderate_threshold = v;
        }
        if let Some(v) = env_parse::<f64>("BEENS_UNDERREP_MULTIPLIER") {
            self.analysis.underrepresentation_multiplier = v;
        }
        if let Some(v) = env_parse::<f64>("BEENS_DEFAULT_CONFIDENCE") {
            self.analysis.default_confidence = v;
        }
        if let Some(v) = env_parse::<u64>("BEENS_DISPATCH_TIMEOUT_MS") {
            self.orchestrator.dispatch_timeout_ms = v;
        }
        if let Ok(tier) = std::env::var("BEENS_DEFAULT_TIER") {
            self.orchestrator.default_tier = tier;
        }
        if let Ok(path) = std::env::var("BEENS_FRAMEWORKS_PATH") {
            tracing::debug!("BEENS_FRAMEWORKS_PATH env override applied");
            self.taxonomy.frameworks_path = Some(path);
        }
        if let Ok(path) = std::env::var("BEENS_CATALOG_PATH") {
            tracing::debug!("BEENS_CATALOG_PATH env override applied");
            self.catalog.path = Some(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        if crate::catalog::Tier::parse(&self.orchestrator.default_tier).is_none() {
            return Err(config_err(&format!(
                "default_tier '{}' must be one of beginner, intermediate, advanced",
                self.orchestrator.default_tier
            )));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn config_err(message: &str) -> BeensMindError {
    BeensMindError::Config {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.well_aligned_threshold, 0.8);
        assert_eq!(config.analysis.moderate_threshold, 0.6);
        assert_eq!(config.analysis.underrepresentation_multiplier, 0.5);
        assert_eq!(config.orchestrator.dispatch_timeout_ms, 15_000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [analysis]
            well_aligned_threshold = 0.9

            [orchestrator]
            default_tier = "advanced"
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.well_aligned_threshold, 0.9);
        assert_eq!(config.analysis.moderate_threshold, 0.6);
        assert_eq!(config.orchestrator.default_tier, "advanced");
        assert_eq!(config.orchestrator.dispatch_timeout_ms, 15_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = Config::default();
        config.analysis.moderate_threshold = 0.9;
        config.analysis.well_aligned_threshold = 0.7;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("moderate_threshold"));
    }

    #[test]
    fn test_unknown_default_tier_rejected() {
        let mut config = Config::default();
        config.orchestrator.default_tier = "expert".into();
        assert!(config.validate().is_err());
    }
}
