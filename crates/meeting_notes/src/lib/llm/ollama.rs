use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    llm::model::{ChatRequest, LanguageModel, SamplingOptions},
    types::ModelDescriptor,
};

/// Client for a local Ollama runtime's REST API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:11434";
    pub const DEFAULT_PORT: u16 = 11434;

    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            model: model.into(),
        }
    }

    /// Points the client at another runtime.
    ///
    /// Accepts the same shapes as the runtime's own `OLLAMA_HOST`: a full URL, or a
    /// bare `host[:port]`, which is taken as plain HTTP on [`Self::DEFAULT_PORT`]
    /// unless a port is given.
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        let raw = url.as_ref().trim();
        let invalid = |reason: String| Error::InvalidBaseUrl {
            url: raw.to_string(),
            reason,
        };

        let parsed = if raw.contains("://") {
            Url::parse(raw).map_err(|e| invalid(e.to_string()))?
        } else {
            let mut parsed =
                Url::parse(&format!("http://{raw}")).map_err(|e| invalid(e.to_string()))?;
            if parsed.port().is_none() {
                parsed
                    .set_port(Some(Self::DEFAULT_PORT))
                    .map_err(|_| invalid("cannot carry a port".into()))?;
            }
            parsed
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }

        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_body<'a>(&'a self, request: &'a ChatRequest) -> ChatBody<'a> {
        ChatBody {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            stream: false,
            format: request.options.json_mode.then_some("json"),
            options: request.options,
        }
    }

    #[tracing::instrument(skip(self, request), fields(model = %self.model))]
    pub async fn send_chat_request(&self, request: &ChatRequest) -> Result<ChatResponse, Error> {
        let resp = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&self.chat_body(request))
            .send()
            .await
            .map_err(Error::from_transport)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Api { status, message });
        }

        Ok(resp.json::<ChatResponse>().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn send_tags_request(&self) -> Result<TagsResponse, Error> {
        let resp = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(Error::from_transport)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Api { status, message });
        }

        Ok(resp.json::<TagsResponse>().await?)
    }
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

impl LanguageModel for OllamaClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, Error> {
        let response = self
            .send_chat_request(&request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to complete chat"))?;

        response
            .message
            .and_then(|m| m.content)
            .ok_or(Error::EmptyResponse)
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, Error> {
        let response = self
            .send_tags_request()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to list models"))?;

        Ok(response.models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_body_requests_json_mode_and_sampling() {
        let client = OllamaClient::new("llama3.2");
        let request = ChatRequest {
            prompt: "Analyze this".into(),
            options: SamplingOptions::default(),
        };

        let body = serde_json::to_value(client.chat_body(&request)).unwrap();
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], false);
        assert_eq!(body["format"], "json");
        assert_eq!(
            body["messages"],
            json!([{"role": "user", "content": "Analyze this"}])
        );

        let temperature = body["options"]["temperature"].as_f64().unwrap();
        let top_p = body["options"]["top_p"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
        assert!((top_p - 0.9).abs() < 1e-6);
        assert!(body["options"].get("json_mode").is_none());
    }

    #[test]
    fn test_chat_body_omits_format_without_json_mode() {
        let client = OllamaClient::new("phi3");
        let request = ChatRequest {
            prompt: "hi".into(),
            options: SamplingOptions {
                json_mode: false,
                ..Default::default()
            },
        };

        let body = serde_json::to_value(client.chat_body(&request)).unwrap();
        assert!(body.get("format").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = OllamaClient::new("phi3")
            .with_base_url("http://localhost:11434/")
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_schemeless_base_url_is_plain_http() {
        let cases = [
            ("0.0.0.0", "http://0.0.0.0:11434"),
            ("0.0.0.0:11434", "http://0.0.0.0:11434"),
            ("localhost:8080", "http://localhost:8080"),
            ("ollama.internal", "http://ollama.internal:11434"),
            ("https://ollama.example.com/", "https://ollama.example.com"),
            ("http://10.0.0.5:11434/ollama/", "http://10.0.0.5:11434/ollama"),
        ];

        for (raw, expected) in cases {
            let client = OllamaClient::new("phi3").with_base_url(raw).unwrap();
            assert_eq!(client.base_url(), expected, "base url from {raw:?}");
        }
    }

    #[test]
    fn test_unusable_base_url_is_rejected() {
        for raw in ["", "http://", "ftp://ollama.internal", "local host:11434"] {
            let result = OllamaClient::new("phi3").with_base_url(raw);
            assert!(
                matches!(result, Err(Error::InvalidBaseUrl { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    fn chat_request() -> ChatRequest {
        ChatRequest {
            prompt: "Analyze this".into(),
            options: SamplingOptions::default(),
        }
    }

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn spawn_stub_runtime(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_refused_connection_is_a_connection_error() {
        // nothing listens on port 1
        let client = OllamaClient::new("phi3")
            .with_base_url("http://127.0.0.1:1")
            .unwrap();

        let err = client.chat(chat_request()).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)), "got {err:?}");
        assert!(err.is_connection());

        let err = client.list_models().await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_error_status_is_an_api_error() {
        use axum::{http::StatusCode, routing::post};

        let router = axum::Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::NOT_FOUND, "model 'phi3' not found") }),
        );
        let client = OllamaClient::new("phi3")
            .with_base_url(spawn_stub_runtime(router).await)
            .unwrap();

        match client.chat(chat_request()).await {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("model 'phi3' not found"));
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reply_without_content_is_empty_response() {
        use axum::{routing::post, Json};

        let router = axum::Router::new()
            .route("/api/chat", post(|| async { Json(json!({"message": {}})) }))
            .route("/done-only/api/chat", post(|| async { Json(json!({"done": true})) }));
        let base_url = spawn_stub_runtime(router).await;

        for base_url in [base_url.clone(), format!("{base_url}/done-only")] {
            let client = OllamaClient::new("phi3").with_base_url(&base_url).unwrap();
            let err = client.chat(chat_request()).await.unwrap_err();
            assert!(matches!(err, Error::EmptyResponse), "got {err:?}");
            assert!(!err.is_connection());
        }
    }

    #[tokio::test]
    async fn test_chat_posts_request_body_to_runtime() {
        use axum::{routing::post, Json};
        use serde_json::Value;

        let router = axum::Router::new().route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "message": {"role": "assistant", "content": body["messages"][0]["content"]}
                }))
            }),
        );
        let client = OllamaClient::new("phi3")
            .with_base_url(spawn_stub_runtime(router).await)
            .unwrap();

        let reply = client.chat(chat_request()).await.unwrap();
        assert_eq!(reply, "Analyze this");
    }

    #[test]
    fn test_parses_runtime_replies() {
        let chat: ChatResponse = serde_json::from_value(json!({
            "model": "llama3.2",
            "created_at": "2024-10-01T10:00:00Z",
            "message": {"role": "assistant", "content": "{\"summary\": \"ok\"}"},
            "done": true
        }))
        .unwrap();
        assert_eq!(
            chat.message.and_then(|m| m.content).as_deref(),
            Some("{\"summary\": \"ok\"}")
        );

        let tags: TagsResponse = serde_json::from_value(json!({
            "models": [
                {"name": "llama3.2:latest", "model": "llama3.2:latest", "size": 2019393189u64},
                {"name": "mistral:7b", "model": "mistral:7b"}
            ]
        }))
        .unwrap();
        let names = tags
            .models
            .iter()
            .map(|m| m.name().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["llama3.2:latest", "mistral:7b"]);

        let empty: TagsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.models.is_empty());
    }
}
