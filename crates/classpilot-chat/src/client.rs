//! LLM and retrieval service clients.
//!
//! Both services sit behind object-safe traits so the orchestrator can be
//! exercised with scripted fakes. The production implementation speaks the
//! Bedrock runtime and agent-runtime HTTP APIs with bearer-token auth.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use classpilot_core::{BedrockConfig, Error, Result};

use crate::types::{Message, RetrievedPassage};

/// Stateless text-generation call: role-tagged messages in, generated text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn converse(
        &self,
        messages: &[Message],
        system: Option<&str>,
        max_tokens: u32,
    ) -> Result<String>;
}

/// Stateless similarity-search call against the managed knowledge base.
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Ranked passages for a free-text query.
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>>;

    /// One-shot retrieval-plus-generation (no citation metadata returned).
    async fn retrieve_and_generate(&self, query: &str) -> Result<String>;
}

/// Bedrock HTTP client implementing both service traits.
///
/// Long-lived and reusable across calls; construct once and share.
pub struct BedrockClient {
    config: BedrockConfig,
    http: reqwest::Client,
}

impl BedrockClient {
    pub fn new(config: BedrockConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Http(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("AWS_BEARER_TOKEN_BEDROCK is not set".into()))
    }

    fn knowledge_base_id(&self) -> Result<&str> {
        self.config
            .knowledge_base_id
            .as_deref()
            .ok_or_else(|| Error::Config("KNOWLEDGE_BASE_ID is not set".into()))
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key()?))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Service(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!("Bedrock API error {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Service(format!("malformed response: {}", e)))
    }
}

#[async_trait]
impl LlmClient for BedrockClient {
    async fn converse(
        &self,
        messages: &[Message],
        system: Option<&str>,
        max_tokens: u32,
    ) -> Result<String> {
        let url = format!(
            "{}/model/{}/converse",
            self.config.runtime_endpoint(),
            self.config.model_id
        );

        let wire_messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": [{"text": m.content}]}))
            .collect();

        let mut body = json!({
            "messages": wire_messages,
            "inferenceConfig": { "maxTokens": max_tokens },
        });
        if let Some(system) = system {
            body["system"] = json!([{ "text": system }]);
        }

        debug!("Converse via {} ({} messages)", self.config.model_id, messages.len());
        let response = self.post_json(&url, &body).await?;

        response["output"]["message"]["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Service("converse response missing output text".into()))
    }
}

#[async_trait]
impl RetrievalClient for BedrockClient {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        let url = format!(
            "{}/knowledgebases/{}/retrieve",
            self.config.agent_endpoint(),
            self.knowledge_base_id()?
        );

        let body = json!({
            "retrievalQuery": { "text": query },
            "retrievalConfiguration": {
                "vectorSearchConfiguration": { "numberOfResults": top_k }
            },
        });

        debug!("Retrieve top-{} for query ({} chars)", top_k, query.len());
        let response = self.post_json(&url, &body).await?;

        let results = response["retrievalResults"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        Ok(results.iter().map(parse_retrieval_result).collect())
    }

    async fn retrieve_and_generate(&self, query: &str) -> Result<String> {
        let url = format!("{}/retrieveandgenerate", self.config.agent_endpoint());

        let body = json!({
            "input": { "text": query },
            "retrieveAndGenerateConfiguration": {
                "type": "KNOWLEDGE_BASE",
                "knowledgeBaseConfiguration": {
                    "knowledgeBaseId": self.knowledge_base_id()?,
                    "modelArn": self.config.model_arn(),
                },
            },
        });

        let response = self.post_json(&url, &body).await?;

        response["output"]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Service("retrieveAndGenerate response missing output text".into()))
    }
}

fn parse_retrieval_result(result: &Value) -> RetrievedPassage {
    let text = result["content"]["text"].as_str().unwrap_or_default().to_string();
    let metadata = result["metadata"].as_object().cloned().unwrap_or_default();
    let location_uri = result["location"]["s3Location"]["uri"]
        .as_str()
        .or_else(|| result["location"]["webLocation"]["url"].as_str())
        .map(str::to_string);

    RetrievedPassage {
        text,
        metadata,
        location_uri,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retrieval_result() {
        let raw = json!({
            "content": { "text": "A passage." },
            "metadata": { "title": "Unit Guide", "x-amz-bedrock-kb-source-uri": "s3://b/k" },
            "location": { "s3Location": { "uri": "s3://b/k" } },
            "score": 0.71,
        });
        let passage = parse_retrieval_result(&raw);
        assert_eq!(passage.text, "A passage.");
        assert_eq!(passage.metadata["title"], "Unit Guide");
        assert_eq!(passage.location_uri.as_deref(), Some("s3://b/k"));
    }

    #[test]
    fn test_parse_retrieval_result_sparse() {
        let passage = parse_retrieval_result(&json!({}));
        assert!(passage.text.is_empty());
        assert!(passage.metadata.is_empty());
        assert!(passage.location_uri.is_none());
    }

    #[test]
    fn test_missing_knowledge_base_id_is_config_error() {
        let client = BedrockClient::new(BedrockConfig {
            api_key: Some("key".into()),
            ..Default::default()
        })
        .unwrap();
        let err = client.knowledge_base_id().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
