//! KinOS HTTP client wrapper.
//!
//! Every operation is a single POST with bearer auth. Failures never cross
//! this boundary as errors: a transport fault, non-2xx status, or unparsable
//! body is logged with whatever detail is available and surfaces to the
//! caller as `None`. Callers report the failure and carry on.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::KinosSettings;

use super::agent::AgentRef;
use super::request::{
    AnalysisPayload, CreateKinPayload, ImageGenPayload, MessagePayload, ThinkingPayload,
};

pub struct KinosClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl KinosClient {
    pub fn new(settings: &KinosSettings) -> Self {
        Self {
            http: Client::new(),
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST `payload` to `path`, returning the parsed JSON body on 2xx and
    /// `None` on any failure.
    pub async fn post<T: Serialize>(&self, path: &str, payload: &T) -> Option<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = match self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("HTTP {} from {}: {}", status, url, body);
            return None;
        }

        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid JSON from {}: {}", url, e);
                None
            }
        }
    }

    pub async fn send_message(&self, agent: &AgentRef, payload: &MessagePayload) -> Option<Value> {
        self.post(&agent.messages_path(), payload).await
    }

    pub async fn analyze(&self, agent: &AgentRef, payload: &AnalysisPayload) -> Option<Value> {
        self.post(&agent.analysis_path(), payload).await
    }

    pub async fn autonomous_thinking(
        &self,
        agent: &AgentRef,
        payload: &ThinkingPayload,
    ) -> Option<Value> {
        self.post(&agent.autonomous_thinking_path(), payload).await
    }

    pub async fn create_kin(&self, agent: &AgentRef, payload: &CreateKinPayload) -> Option<Value> {
        self.post(&agent.kins_path(), payload).await
    }

    pub async fn generate_image(
        &self,
        agent: &AgentRef,
        payload: &ImageGenPayload,
    ) -> Option<Value> {
        self.post(&agent.images_path(), payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinos::request::Mode;
    use crate::kinos::response::reply_text;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> KinosClient {
        KinosClient::new(&KinosSettings {
            api_key: "test-key".to_string(),
            base_url: server.url(),
        })
    }

    #[tokio::test]
    async fn test_send_message_returns_normalized_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/blueprints/simba/kins/simba/messages")
            .match_header("authorization", "Bearer test-key")
            .match_header("content-type", "application/json")
            // Exact body match: proves the empty images field is omitted
            // entirely rather than sent as [].
            .match_body(Matcher::Json(json!({
                "content": "hello",
                "mode": "creative",
                "model": "claude-3-5-haiku-latest",
                "history_length": 25,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":"hi there","status":"ok"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let payload = MessagePayload::new("hello").with_mode(Mode::Creative);
        let result = client.send_message(&AgentRef::simba(), &payload).await;

        mock.assert_async().await;
        let result = result.unwrap();
        assert_eq!(reply_text(&result).as_deref(), Some("hi there"));
    }

    #[tokio::test]
    async fn test_non_2xx_yields_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v2/blueprints/simba/kins/simba/analysis")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client
            .analyze(&AgentRef::simba(), &AnalysisPayload::new("how are you"))
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_yields_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v2/blueprints/simba/kins")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client
            .create_kin(&AgentRef::simba(), &CreateKinPayload::new("simba"))
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_thinking_payload_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/blueprints/simba/kins/simba/autonomous_thinking")
            .match_body(Matcher::Json(json!({"iterations": 3, "wait_time": 600})))
            .with_status(200)
            .with_body(r#"{"status":"started","iterations":3,"wait_time":600}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client
            .autonomous_thinking(&AgentRef::simba(), &ThinkingPayload::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["status"], "started");
    }
}
