//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use tracing::info;

use crate::{Config, Error, Result};

/// Notion credentials stored as a JSON secret.
#[derive(Debug, Deserialize)]
pub struct NotionCredentials {
    #[serde(alias = "NOTION_TOKEN")]
    pub token: String,
}

/// Get a secret string from Secrets Manager.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    response
        .secret_string()
        .map(str::to_string)
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))
}

/// Extract the Notion token from a secret, stored either raw or as JSON.
pub fn token_from_secret(secret: &str) -> Result<String> {
    let secret = secret.trim();

    let token = if secret.starts_with('{') {
        serde_json::from_str::<NotionCredentials>(secret)
            .map_err(|e| Error::Config(format!("Failed to parse Notion credentials: {}", e)))?
            .token
    } else {
        secret.to_string()
    };

    if token.trim().is_empty() {
        return Err(Error::Config("Notion token is empty".to_string()));
    }

    Ok(token.trim().to_string())
}

/// Resolve the Notion token, preferring the environment over Secrets Manager.
pub async fn resolve_notion_token(config: &Config) -> Result<String> {
    if let Some(token) = &config.notion_token {
        return Ok(token.clone());
    }

    let secret_arn = config
        .notion_token_secret_arn
        .as_deref()
        .ok_or_else(|| Error::Config("No Notion token source configured".to_string()))?;

    info!(secret_arn, "Fetching Notion token from Secrets Manager");

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = SecretsClient::new(&aws_config);

    token_from_secret(&get_secret(&client, secret_arn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_token() {
        assert_eq!(token_from_secret("ntn_abc123\n").unwrap(), "ntn_abc123");
    }

    #[test]
    fn test_json_token() {
        assert_eq!(token_from_secret(r#"{"token":"ntn_abc"}"#).unwrap(), "ntn_abc");
        assert_eq!(
            token_from_secret(r#"{"NOTION_TOKEN":"ntn_def"}"#).unwrap(),
            "ntn_def"
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(token_from_secret("  "), Err(Error::Config(_))));
        assert!(matches!(
            token_from_secret(r#"{"token":""}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            token_from_secret(r#"{"password":"x"}"#),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_env_token_wins() {
        let config = Config::from_vars(|key| match key {
            "NOTION_TOKEN" => Some("ntn_env".to_string()),
            "NOTION_TOKEN_SECRET_ARN" => Some("arn:unused".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(resolve_notion_token(&config).await.unwrap(), "ntn_env");
    }
}
