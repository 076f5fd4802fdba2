//! Configuration types and loading
//!
//! Values come from the environment (the binary loads `.env` first).

use serde::{Deserialize, Serialize};

/// Priority literals accepted by the backend schema
const PRIORITY_LITERALS: [&str; 4] = ["low", "medium", "high", "urgent"];

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Hosted backend connection
    pub backend: BackendConfig,

    /// Status workflow rules
    pub workflow: WorkflowConfig,

    /// Work order page behaviour
    pub page: PageConfig,

    /// Log filter
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: Option<String>,
    pub request_timeout_seconds: u64,
    /// JSON document used to seed the in-memory backend
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Reject status changes outside the transition table
    pub enforce_transitions: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageConfig {
    /// Advance from list to detail when the policy picks a record
    pub auto_advance_to_detail: bool,
    /// Priority given to new work orders when the form leaves it unset
    pub default_priority: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: None,
                request_timeout_seconds: 30,
                seed_file: None,
            },
            workflow: WorkflowConfig {
                enforce_transitions: true,
            },
            page: PageConfig {
                auto_advance_to_detail: true,
                default_priority: "medium".to_string(),
            },
            logging: LoggingConfig {
                filter: "info,mx_coordinator=debug".to_string(),
            },
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        AppConfig::default().workflow
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        AppConfig::default().page
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Backend
        if let Some(url) = lookup("MX_BACKEND_URL") {
            config.backend.url = url;
        }
        if let Some(key) = lookup("MX_BACKEND_ANON_KEY") {
            config.backend.anon_key = Some(key);
        }
        if let Some(timeout) = lookup("MX_REQUEST_TIMEOUT_SECONDS") {
            config.backend.request_timeout_seconds =
                timeout.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "MX_REQUEST_TIMEOUT_SECONDS".to_string(),
                    message: format!("expected a number of seconds, got {:?}", timeout),
                })?;
        }
        if let Some(path) = lookup("MX_SEED_FILE") {
            config.backend.seed_file = Some(path);
        }

        // Workflow
        if let Some(v) = lookup("MX_ENFORCE_TRANSITIONS") {
            config.workflow.enforce_transitions = parse_bool("MX_ENFORCE_TRANSITIONS", &v)?;
        }

        // Page
        if let Some(v) = lookup("MX_AUTO_ADVANCE") {
            config.page.auto_advance_to_detail = parse_bool("MX_AUTO_ADVANCE", &v)?;
        }
        if let Some(priority) = lookup("MX_DEFAULT_PRIORITY") {
            let priority = priority.trim().to_lowercase();
            if !PRIORITY_LITERALS.contains(&priority.as_str()) {
                return Err(ConfigError::InvalidValue {
                    key: "MX_DEFAULT_PRIORITY".to_string(),
                    message: format!("expected one of {}", PRIORITY_LITERALS.join(", ")),
                });
            }
            config.page.default_priority = priority;
        }

        // Logging
        if let Some(filter) = lookup("RUST_LOG") {
            config.logging.filter = filter;
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {:?}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.backend.request_timeout_seconds, 30);
        assert!(config.workflow.enforce_transitions);
        assert!(config.page.auto_advance_to_detail);
        assert_eq!(config.page.default_priority, "medium");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MX_BACKEND_URL", "https://example.supabase.co"),
            ("MX_ENFORCE_TRANSITIONS", "no"),
            ("MX_DEFAULT_PRIORITY", "High"),
            ("MX_SEED_FILE", "seed.json"),
        ]))
        .unwrap();

        assert_eq!(config.backend.url, "https://example.supabase.co");
        assert!(!config.workflow.enforce_transitions);
        assert_eq!(config.page.default_priority, "high");
        assert_eq!(config.backend.seed_file.as_deref(), Some("seed.json"));
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::from_lookup(lookup_from(&[("MX_AUTO_ADVANCE", "maybe")]));
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })));

        let err = AppConfig::from_lookup(lookup_from(&[("MX_DEFAULT_PRIORITY", "critical")]));
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })));

        let err = AppConfig::from_lookup(lookup_from(&[("MX_REQUEST_TIMEOUT_SECONDS", "soon")]));
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })));
    }
}
