//! Custom deserializers for flexible signal parsing in beens-mind.
//!
//! Interest signals arrive from several producers (the interest analysis
//! unit, CLI files, calling layers), so numeric and list fields accept a few
//! loose encodings.

use serde::{Deserialize, Deserializer};

/// Deserializes `confidence_score` with support for floats, numeric strings and presets.
///
/// # Accepted Formats
///
/// * **Float / integer**: used directly (range handling is done by the classifier)
/// * **String presets** (case-insensitive):
///   - `"low"` → 0.2
///   - `"medium"` → 0.5
///   - `"high"` → 0.9
/// * **String numeric**: `"0.75"` → 0.75
///
/// Null, missing and empty strings all map to `None` so the configured
/// default confidence applies.
pub fn de_option_confidence_forgiving<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    match v {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("invalid numeric for confidence_score")),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.to_lowercase().as_str() {
                "low" => Ok(Some(0.2)),
                "medium" => Ok(Some(0.5)),
                "high" => Ok(Some(0.9)),
                _ => s.parse::<f64>().map(Some).map_err(|_| {
                    D::Error::custom(format!(
                        "Invalid confidence_score '{}'. Use a number 0.0-1.0 or one of: low, medium, high.",
                        s
                    ))
                }),
            }
        }
        other => Err(D::Error::custom(format!(
            "invalid type for confidence_score: {}",
            other
        ))),
    }
}

/// Deserializes `secondary_interests` from a list of strings or a comma-separated string.
pub fn de_secondary_interests<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    match opt {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::String(s)) => Ok(s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()),
        Some(serde_json::Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect()),
        Some(other) => Err(D::Error::custom(format!(
            "invalid type for secondary_interests: {}",
            other
        ))),
    }
}
