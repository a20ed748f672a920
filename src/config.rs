//! Engine configuration.
//!
//! Every field has a default, so the app can send a partial JSON object
//! (or `{}`) across the JNI boundary.

use serde::{Deserialize, Serialize};

use crate::error::RoutingResult;
use crate::instructions::Language;

/// Travel profile requested from the external provider.
///
/// Only walking is used by the app; the others are passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Walking,
    Cycling,
    Driving,
}

impl Profile {
    /// Profile segment used in OSRM-style URLs.
    pub fn as_path(self) -> &'static str {
        match self {
            Profile::Walking => "foot",
            Profile::Cycling => "bike",
            Profile::Driving => "driving",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the OSRM-compatible directions service. `None` skips
    /// the external provider entirely.
    pub provider_endpoint: Option<String>,
    pub profile: Profile,
    /// Total timeout for the provider request, in milliseconds.
    pub timeout_ms: u64,
    /// Used to estimate durations for routes the provider did not time.
    pub walking_speed_m_per_min: f64,
    /// Provider steps shorter than this are dropped.
    pub min_step_distance_m: f64,
    pub language: Language,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider_endpoint: Some("https://routing.openstreetmap.de/routed-foot".to_string()),
            profile: Profile::Walking,
            timeout_ms: 5_000,
            walking_speed_m_per_min: 80.0,
            min_step_distance_m: 5.0,
            language: Language::En,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a JSON object. Missing fields take defaults.
    pub fn from_json(json: &str) -> RoutingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Estimated walking time in seconds for `distance_m`.
    pub fn walking_duration_s(&self, distance_m: f64) -> f64 {
        if self.walking_speed_m_per_min <= 0.0 {
            return 0.0;
        }
        distance_m / self.walking_speed_m_per_min * 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config = EngineConfig::from_json(
            r#"{"provider_endpoint": null, "language": "de", "timeout_ms": 1500}"#,
        )
        .unwrap();
        assert!(config.provider_endpoint.is_none());
        assert_eq!(config.language, Language::De);
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.min_step_distance_m, 5.0);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(EngineConfig::from_json("not json").is_err());
    }

    #[test]
    fn walking_duration_at_default_speed() {
        let config = EngineConfig::default();
        // 80 m/min: 800 m takes 10 minutes
        assert!((config.walking_duration_s(800.0) - 600.0).abs() < 1e-9);
    }

    #[test]
    fn walking_duration_with_zero_speed() {
        let config = EngineConfig {
            walking_speed_m_per_min: 0.0,
            ..EngineConfig::default()
        };
        assert_eq!(config.walking_duration_s(500.0), 0.0);
    }

    #[test]
    fn profile_paths() {
        assert_eq!(Profile::Walking.as_path(), "foot");
        assert_eq!(Profile::Driving.as_path(), "driving");
    }
}
