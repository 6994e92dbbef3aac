// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Content generator backed by the Gemini `generateContent` REST endpoint.

use cardsmith_core::ContentGenerator;
use cardsmith_core::Fallible as CoreFallible;
use cardsmith_core::GenerationRequest;
use cardsmith_core::LearningContent;
use cardsmith_core::Source;
use cardsmith_core::generate::parse_generated;
use cardsmith_core::generate::response_schema;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::config::api_key_from_env;
use crate::error::Fallible;
use crate::error::fail;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const TEMPERATURE: f32 = 0.4;

/// Where the API key comes from. An environment key is read when a request
/// is made.
pub enum ApiKey {
    Value(String),
    Env(String),
}

impl ApiKey {
    fn resolve(&self) -> Fallible<String> {
        match self {
            ApiKey::Value(key) => Ok(key.clone()),
            ApiKey::Env(var) => api_key_from_env(var),
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: ApiKey,
}

impl GeminiClient {
    pub fn new(api_key: ApiKey, model: String) -> Self {
        Self::with_base_url(GEMINI_BASE_URL.to_string(), api_key, model)
    }

    pub fn with_base_url(base_url: String, api_key: ApiKey, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            model,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn call(&self, request: &GenerationRequest) -> Fallible<LearningContent> {
        let api_key = self.api_key.resolve()?;
        log::debug!(
            "Requesting {} cards ({} source) from {}",
            request.settings.card_count,
            request.source_kind(),
            self.model
        );
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body(request))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return fail(error_message(status, &text));
        }
        let body: GenerateContentResponse = serde_json::from_str(&text)?;
        if let Some(error) = body.error {
            return fail(error.message);
        }
        Ok(parse_generated(&response_text(body))?)
    }
}

/// The API's own error message when the body carries one, else the status.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<GenerateContentResponse>(body)
        .ok()
        .and_then(|body| body.error)
        .map(|error| error.message)
        .unwrap_or_else(|| format!("Generator returned HTTP {status}"))
}

impl ContentGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> CoreFallible<LearningContent> {
        Ok(self.call(request).await?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn request_body(request: &GenerationRequest) -> GenerateContentRequest {
    let prompt = Part::Text {
        text: request.prompt(),
    };
    let parts = match &request.source {
        Source::VideoTitle(_) => vec![prompt],
        Source::Document { data, .. } => vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: request.mime_type().unwrap_or_default().to_string(),
                    data: data.clone(),
                },
            },
            prompt,
        ],
    };
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
            temperature: TEMPERATURE,
        },
    }
}

/// Concatenated text of the first candidate; empty when there is none.
fn response_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::Router;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use cardsmith_core::AdvancedSettings;
    use cardsmith_core::Card;
    use portpicker::pick_unused_port;
    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio::spawn;

    use super::*;
    use crate::utils::wait_for_server;

    const TEST_HOST: &str = "127.0.0.1";

    #[test]
    fn test_text_request_body() -> Fallible<()> {
        let request = GenerationRequest::new(
            Source::VideoTitle("Krebs Cycle Explained".to_string()),
            AdvancedSettings::default(),
        );
        let body = serde_json::to_value(request_body(&request))?;
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts.as_array().map(Vec::len), Some(1));
        assert!(
            parts[0]["text"]
                .as_str()
                .is_some_and(|t| t.contains("Krebs Cycle Explained"))
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], response_schema());
        Ok(())
    }

    #[test]
    fn test_document_request_body() -> Fallible<()> {
        let request = GenerationRequest::new(
            Source::Document {
                data: "aGVsbG8=".to_string(),
                mime_type: Some("text/markdown".to_string()),
            },
            AdvancedSettings::default(),
        );
        let body = serde_json::to_value(request_body(&request))?;
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "text/markdown");
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert!(parts[1]["text"].is_string());
        Ok(())
    }

    #[test]
    fn test_response_text() -> Fallible<()> {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}]
        }))?;
        assert_eq!(response_text(response), "{\"a\":1}");
        let empty: GenerateContentResponse = serde_json::from_value(json!({}))?;
        assert_eq!(response_text(empty), "");
        Ok(())
    }

    async fn stub_generate(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
            return Json(json!({"error": {"code": 403, "message": "API key not valid."}}));
        }
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or("");
        let deck = json!({
            "title": "Stub",
            "summary": prompt.lines().next().unwrap_or(""),
            "flashcards": [{"front": "ATP", "back": "Adenosine triphosphate"}],
        });
        Json(json!({
            "candidates": [{"content": {"parts": [{"text": deck.to_string()}]}}]
        }))
    }

    async fn start_stub() -> Fallible<String> {
        let port = pick_unused_port().unwrap();
        let app = Router::new().route("/models/{model}", post(stub_generate));
        let listener = TcpListener::bind(format!("{TEST_HOST}:{port}")).await?;
        spawn(async move { axum::serve(listener, app).await });
        wait_for_server(TEST_HOST, port).await?;
        Ok(format!("http://{TEST_HOST}:{port}"))
    }

    #[tokio::test]
    async fn test_generate_against_stub() -> Fallible<()> {
        let base_url = start_stub().await?;
        let client = GeminiClient::with_base_url(
            base_url,
            ApiKey::Value("secret".to_string()),
            "test-model".to_string(),
        );
        let request = GenerationRequest::new(
            Source::VideoTitle("Cellular Respiration".to_string()),
            AdvancedSettings::default(),
        );
        let content = client.generate(&request).await?;
        assert_eq!(content.title, "Stub");
        assert!(content.summary.contains("Cellular Respiration"));
        assert_eq!(
            content.flashcards,
            vec![Card::new("ATP", "Adenosine triphosphate")]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error() -> Fallible<()> {
        let base_url = start_stub().await?;
        let client = GeminiClient::with_base_url(
            base_url,
            ApiKey::Value("wrong".to_string()),
            "test-model".to_string(),
        );
        let request = GenerationRequest::new(
            Source::VideoTitle("Anything".to_string()),
            AdvancedSettings::default(),
        );
        let err = client.generate(&request).await.unwrap_err();
        assert_eq!(err.message(), "API key not valid.");
        Ok(())
    }

    async fn stub_overloaded() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "upstream overloaded")
    }

    async fn stub_rejected() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "Invalid model."}})),
        )
    }

    #[tokio::test]
    async fn test_generate_reports_http_status() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let app = Router::new()
            .route("/models/{model}", post(stub_overloaded))
            .route("/v2/models/{model}", post(stub_rejected));
        let listener = TcpListener::bind(format!("{TEST_HOST}:{port}")).await?;
        spawn(async move { axum::serve(listener, app).await });
        wait_for_server(TEST_HOST, port).await?;
        let request = GenerationRequest::new(
            Source::VideoTitle("Anything".to_string()),
            AdvancedSettings::default(),
        );

        // A plain-text error page.
        let client = GeminiClient::with_base_url(
            format!("http://{TEST_HOST}:{port}"),
            ApiKey::Value("secret".to_string()),
            "m".to_string(),
        );
        let err = client.generate(&request).await.unwrap_err();
        assert_eq!(
            err.message(),
            "Generator returned HTTP 503 Service Unavailable"
        );

        // A JSON error body on a failed status.
        let client = GeminiClient::with_base_url(
            format!("http://{TEST_HOST}:{port}/v2"),
            ApiKey::Value("secret".to_string()),
            "m".to_string(),
        );
        let err = client.generate(&request).await.unwrap_err();
        assert_eq!(err.message(), "Invalid model.");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        // Nothing listens on port 1; the key is checked first.
        let client = GeminiClient::with_base_url(
            "http://127.0.0.1:1".to_string(),
            ApiKey::Env("CARDSMITH_TEST_KEY_THAT_IS_NOT_SET".to_string()),
            "m".to_string(),
        );
        let request = GenerationRequest::new(
            Source::VideoTitle("Anything".to_string()),
            AdvancedSettings::default(),
        );
        let err = client.generate(&request).await.unwrap_err();
        assert_eq!(
            err.message(),
            "CARDSMITH_TEST_KEY_THAT_IS_NOT_SET is missing from environment variables."
        );
    }
}
