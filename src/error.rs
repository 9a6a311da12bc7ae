//! Domain-specific error types for beens-mind

use thiserror::Error;

/// Main error type for framework scoring and unit orchestration
#[derive(Error, Debug)]
pub enum BeensMindError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Duplicate component '{id}' in framework '{framework}'")]
    DuplicateComponent { framework: String, id: String },

    #[error("Unknown framework: {name}")]
    UnknownFramework { name: String },

    #[error("Unknown unit: {name}{}", did_you_mean(.suggestion))]
    UnknownUnit {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Unknown task: '{task}' for {unit}{}", did_you_mean(.suggestion))]
    UnknownTask {
        task: String,
        unit: String,
        suggestion: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Cancelled: {operation}")]
    Cancelled { operation: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

impl BeensMindError {
    /// Lookup failures (unknown unit, task or framework).
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            BeensMindError::UnknownUnit { .. }
                | BeensMindError::UnknownTask { .. }
                | BeensMindError::UnknownFramework { .. }
        )
    }
}

impl From<anyhow::Error> for BeensMindError {
    fn from(err: anyhow::Error) -> Self {
        BeensMindError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BeensMindError {
    fn from(err: serde_json::Error) -> Self {
        BeensMindError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BeensMindError {
    fn from(err: toml::de::Error) -> Self {
        BeensMindError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}

impl From<std::io::Error> for BeensMindError {
    fn from(err: std::io::Error) -> Self {
        BeensMindError::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<chrono::ParseError> for BeensMindError {
    fn from(err: chrono::ParseError) -> Self {
        BeensMindError::Validation {
            message: format!("Date parsing error: {}", err),
        }
    }
}

/// Pick the closest candidate name for a "did you mean" hint.
pub fn closest_match<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    candidates
        .into_iter()
        .map(|c| (c, strsim::jaro_winkler(&input_lower, &c.to_lowercase())))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c.to_string())
}

/// Result type alias for beens-mind operations
pub type Result<T> = std::result::Result<T, BeensMindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_unit_message_includes_suggestion() {
        let err = BeensMindError::UnknownUnit {
            name: "BravedUnit".into(),
            suggestion: Some("BRAVEDAnalysisUnit".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Unknown unit: BravedUnit"));
        assert!(msg.contains("Did you mean 'BRAVEDAnalysisUnit'?"));
        assert!(err.is_lookup());
    }

    #[test]
    fn test_unknown_task_without_suggestion() {
        let err = BeensMindError::UnknownTask {
            task: "xyz".into(),
            unit: "InterestAnalysisUnit".into(),
            suggestion: None,
        };
        assert_eq!(
            err.to_string(),
            "Unknown task: 'xyz' for InterestAnalysisUnit"
        );
    }

    #[test]
    fn test_closest_match() {
        let names = ["analyze_braved", "classify_components", "assess_alignment"];
        assert_eq!(
            closest_match("analyse_braved", names.iter().copied()),
            Some("analyze_braved".to_string())
        );
        assert_eq!(closest_match("zzz", names.iter().copied()), None);
    }
}
