//! Configuration management for Lambda functions.

use std::env;

use crate::{Error, Result};

/// Habits database the automation writes to.
pub const DEFAULT_HABITS_DATABASE_ID: &str = "232de792635b80e6a595da782add070a";

pub const DEFAULT_NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// First API version exposing data sources.
pub const DEFAULT_NOTION_VERSION: &str = "2025-09-03";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Notion integration token, when provided directly
    pub notion_token: Option<String>,
    /// ARN of the secret containing the Notion token
    pub notion_token_secret_arn: Option<String>,
    /// Habits database id
    pub habits_database_id: String,
    /// Notion API base URL
    pub notion_api_base_url: String,
    /// Value of the `Notion-Version` header
    pub notion_version: String,
    /// API Gateway stage prefix to strip from request paths (e.g. `/prod`)
    pub stage_prefix: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let notion_token = non_empty("NOTION_TOKEN");
        let notion_token_secret_arn = non_empty("NOTION_TOKEN_SECRET_ARN");

        if notion_token.is_none() && notion_token_secret_arn.is_none() {
            return Err(Error::Config(
                "NOTION_TOKEN or NOTION_TOKEN_SECRET_ARN must be set".to_string(),
            ));
        }

        Ok(Self {
            notion_token,
            notion_token_secret_arn,
            habits_database_id: non_empty("NOTION_HABITS_DATABASE_ID")
                .unwrap_or_else(|| DEFAULT_HABITS_DATABASE_ID.to_string()),
            notion_api_base_url: non_empty("NOTION_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_NOTION_API_BASE_URL.to_string()),
            notion_version: non_empty("NOTION_VERSION")
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
            stage_prefix: non_empty("WEBHOOK_STAGE_PREFIX")
                .map(|prefix| format!("/{}", prefix.trim().trim_matches('/')))
                .filter(|prefix| prefix.len() > 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("NOTION_TOKEN", "secret_abc")]).unwrap();
        assert_eq!(config.notion_token.as_deref(), Some("secret_abc"));
        assert_eq!(config.habits_database_id, DEFAULT_HABITS_DATABASE_ID);
        assert_eq!(config.notion_api_base_url, DEFAULT_NOTION_API_BASE_URL);
        assert_eq!(config.notion_version, DEFAULT_NOTION_VERSION);
        assert!(config.stage_prefix.is_none());
    }

    #[test]
    fn test_stage_prefix_normalized() {
        for raw in ["prod", "/prod", "/prod/"] {
            let config =
                config_from(&[("NOTION_TOKEN", "secret_abc"), ("WEBHOOK_STAGE_PREFIX", raw)])
                    .unwrap();
            assert_eq!(config.stage_prefix.as_deref(), Some("/prod"));
        }

        let config =
            config_from(&[("NOTION_TOKEN", "secret_abc"), ("WEBHOOK_STAGE_PREFIX", "/")]).unwrap();
        assert!(config.stage_prefix.is_none());
    }

    #[test]
    fn test_secret_arn_is_enough() {
        let config = config_from(&[(
            "NOTION_TOKEN_SECRET_ARN",
            "arn:aws:secretsmanager:us-east-1:123:secret:notion",
        )])
        .unwrap();
        assert!(config.notion_token.is_none());
        assert!(config.notion_token_secret_arn.is_some());
    }

    #[test]
    fn test_missing_token_source() {
        let err = config_from(&[("NOTION_TOKEN", "  ")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
