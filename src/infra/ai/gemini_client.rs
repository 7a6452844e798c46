// =============================================================================
// GEMINI CLIENT - Google AI Studio API Integration
// =============================================================================
//
// Implements `TextGenerator` on top of the Gemini generateContent endpoint
// (https://ai.google.dev/gemini-api/docs).
//
// - Authentication: the API key travels as a query parameter (`?key=API_KEY`).
// - Request format: `contents[]` with nested `parts`, plus `generationConfig`.
// - Response format: the answer is the last text part of
//   `candidates[0].content.parts`. Thinking models put their reasoning in the
//   earlier parts.

use crate::core::content::{ContentError, GenerationSettings, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// =============================================================================
// GEMINI API DATA STRUCTURES
// =============================================================================
//
// See: https://ai.google.dev/api/generate-content

/// A single part of content. Only text parts matter here; anything else in a
/// response (function calls, inline data) deserializes to `text: None`.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct Content {
    /// "user" or "model"
    role: String,
    parts: Vec<Part>,
}

/// See: https://ai.google.dev/api/generate-content#generationconfig
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

impl From<&GenerationSettings> for GenerationConfig {
    fn from(settings: &GenerationSettings) -> Self {
        Self {
            temperature: Some(settings.temperature),
            max_output_tokens: Some(settings.max_output_tokens),
            top_p: Some(settings.top_p),
            top_k: Some(settings.top_k),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,

    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[allow(dead_code)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

// =============================================================================
// GEMINI CLIENT IMPLEMENTATION
// =============================================================================

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
        }
    }

    fn build_request(prompt: &str, settings: &GenerationSettings) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: Some(GenerationConfig::from(settings)),
        }
    }

    /// The last text part of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> Result<String, ContentError> {
        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| {
                ContentError::Generation(
                    "No content in Gemini response - the model may have been blocked by safety filters"
                        .to_string(),
                )
            })?;

        candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .last()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ContentError::Generation("Gemini returned an empty answer".to_string()))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, ContentError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );
        let request = Self::build_request(prompt, settings);

        // Never log the URL, it carries the API key.
        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ContentError::Generation(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| ContentError::Generation(e.without_url().to_string()))?;

            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                return Err(ContentError::Generation(format!(
                    "Gemini API error ({}): {}",
                    status, error_response.error.message
                )));
            }

            return Err(ContentError::Generation(format!(
                "Gemini API error: {} - {}",
                status, error_text
            )));
        }

        let response_json: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ContentError::Generation(e.without_url().to_string()))?;

        let text = Self::extract_text(response_json)?;
        tracing::debug!("Gemini response received: {} chars", text.len());
        Ok(text)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_serialization() {
        let request = GeminiClient::build_request("Write a post", &GenerationSettings::default());

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Write a post");
        let config = &json["generationConfig"];
        assert_eq!(config["maxOutputTokens"], 4000);
        assert_eq!(config["topK"], 40);
        assert!(config["topP"].as_f64().unwrap() > 0.89);
        assert!(config["temperature"].as_f64().unwrap() > 0.79);
    }

    #[test]
    fn test_unset_options_are_skipped() {
        let json = serde_json::to_string(&GenerationConfig {
            temperature: Some(0.7),
            ..Default::default()
        })
        .unwrap();

        assert!(json.contains("\"temperature\""));
        assert!(!json.contains("topK"));
        assert!(!json.contains("maxOutputTokens"));
    }

    #[test]
    fn test_last_text_part_is_the_answer() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [
                {"text": "thinking about it"},
                {"functionCall": {"name": "noop", "args": {}}},
                {"text": "{\"title\": \"t\"}"}
            ]}, "finishReason": "STOP"}]}"#,
        )
        .unwrap();

        assert_eq!(
            GeminiClient::extract_text(response).unwrap(),
            "{\"title\": \"t\"}"
        );
    }

    #[test]
    fn test_blocked_response_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();

        assert!(matches!(
            GeminiClient::extract_text(response),
            Err(ContentError::Generation(_))
        ));
    }
}
