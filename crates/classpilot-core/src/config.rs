//! Configuration from environment variables with documented defaults.

use serde::{Deserialize, Serialize};

/// Default Bedrock region when `AWS_REGION` is unset.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Default foundation model when `CLASSPILOT_MODEL_ID` is unset.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-5-sonnet-20241022-v2:0";

/// Bedrock service configuration.
///
/// A missing knowledge-base id is not an error here; the retrieval client
/// reports it as a configuration failure at call time so the chat interaction
/// still completes with an inline error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BedrockConfig {
    pub region: String,
    pub model_id: String,
    pub knowledge_base_id: Option<String>,
    /// Bearer token for the Bedrock HTTP APIs (`AWS_BEARER_TOKEN_BEDROCK`).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl BedrockConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.into()),
            model_id: std::env::var("CLASSPILOT_MODEL_ID")
                .unwrap_or_else(|_| DEFAULT_MODEL_ID.into()),
            knowledge_base_id: std::env::var("KNOWLEDGE_BASE_ID").ok(),
            api_key: std::env::var("AWS_BEARER_TOKEN_BEDROCK").ok(),
        }
    }

    /// Base URL of the Bedrock runtime API (converse).
    pub fn runtime_endpoint(&self) -> String {
        format!("https://bedrock-runtime.{}.amazonaws.com", self.region)
    }

    /// Base URL of the Bedrock agent-runtime API (retrieve).
    pub fn agent_endpoint(&self) -> String {
        format!("https://bedrock-agent-runtime.{}.amazonaws.com", self.region)
    }

    /// Foundation-model ARN used by retrieveAndGenerate.
    pub fn model_arn(&self) -> String {
        format!(
            "arn:aws:bedrock:{}::foundation-model/{}",
            self.region, self.model_id
        )
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.into(),
            model_id: DEFAULT_MODEL_ID.into(),
            knowledge_base_id: None,
            api_key: None,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub bedrock: BedrockConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3003);
        Self {
            port,
            bedrock: BedrockConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BedrockConfig::default();
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
        assert!(config.knowledge_base_id.is_none());
    }

    #[test]
    fn test_endpoints() {
        let config = BedrockConfig {
            region: "us-east-1".into(),
            ..Default::default()
        };
        assert_eq!(
            config.runtime_endpoint(),
            "https://bedrock-runtime.us-east-1.amazonaws.com"
        );
        assert_eq!(
            config.agent_endpoint(),
            "https://bedrock-agent-runtime.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn test_model_arn() {
        let config = BedrockConfig::default();
        assert_eq!(
            config.model_arn(),
            format!("arn:aws:bedrock:us-west-2::foundation-model/{}", DEFAULT_MODEL_ID)
        );
    }
}
