use super::{PredictionProvider, RandomPredictor, Suggestion, SuggestionSource};
use crate::{LotteryError, Result};
use async_trait::async_trait;
use luxbet_core::GameConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
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

impl GenerateResponse {
    fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.text.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// The JSON object the prompt asks the model for.
#[derive(Debug, Deserialize)]
struct LuckyNumber {
    number: i64,
    reason: String,
}

/// Suggestions from the Gemini `generateContent` REST endpoint.
///
/// Without an API key no request is ever sent; the offline predictor answers
/// instead. Any transport, status or payload problem yields a random
/// fallback suggestion.
pub struct GeminiPredictor {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
    max_number: u8,
    demo: RandomPredictor,
}

impl GeminiPredictor {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let prediction = &config.prediction;
        let client = reqwest::Client::builder()
            .timeout(prediction.request_timeout)
            .build()?;

        let api_key = prediction
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        Ok(Self {
            client,
            api_key,
            url: format!(
                "{}/models/{}:generateContent",
                prediction.endpoint.trim_end_matches('/'),
                prediction.model
            ),
            max_number: config.max_number,
            demo: RandomPredictor::new(prediction.demo_delay, config.max_number),
        })
    }

    pub fn is_online(&self) -> bool {
        self.api_key.is_some()
    }

    fn prompt(&self) -> String {
        format!(
            "Pick a random lucky number between 1 and {} for a lottery game. \
             Provide the response in strictly JSON format: \
             {{ \"number\": integer, \"reason\": \"short mystical reason string\" }}.",
            self.max_number
        )
    }

    async fn try_request(&self, api_key: &str) -> Result<Suggestion> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: self.prompt(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: GenerateResponse = response.json().await?;
        let text = payload
            .text()
            .ok_or_else(|| LotteryError::prediction("No response from model"))?;

        parse_suggestion(text, self.max_number)
    }
}

#[async_trait]
impl PredictionProvider for GeminiPredictor {
    async fn request_suggestion(&self) -> Suggestion {
        let Some(api_key) = self.api_key.as_deref() else {
            return self.demo.request_suggestion().await;
        };

        match self.try_request(api_key).await {
            Ok(suggestion) => {
                tracing::debug!("Model suggested #{}", suggestion.number);
                suggestion
            }
            Err(e) => {
                tracing::warn!("Gemini prediction failed, picking at random: {}", e);
                Suggestion::fallback(self.max_number)
            }
        }
    }
}

/// Validate the model's JSON answer. Anything outside `1..=max_number` or
/// without a reason is an error, never a partial suggestion.
pub fn parse_suggestion(text: &str, max_number: u8) -> Result<Suggestion> {
    let data: LuckyNumber = serde_json::from_str(strip_code_fence(text))?;

    if !(1..=i64::from(max_number)).contains(&data.number) {
        return Err(LotteryError::prediction(format!(
            "Suggested number {} outside 1..={}",
            data.number, max_number
        )));
    }

    let reason = data.reason.trim();
    if reason.is_empty() {
        return Err(LotteryError::prediction("Suggestion has no reason"));
    }

    Ok(Suggestion {
        number: data.number as u8,
        reason: reason.to_string(),
        source: SuggestionSource::Model,
    })
}

// models sometimes wrap JSON in ```json fences despite the mime type
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_valid_suggestion() {
        let suggestion =
            parse_suggestion(r#"{"number": 17, "reason": "Jupiter smiles"}"#, 50).unwrap();
        assert_eq!(suggestion.number, 17);
        assert_eq!(suggestion.reason, "Jupiter smiles");
        assert_eq!(suggestion.source, SuggestionSource::Model);

        let fenced = "```json\n{\"number\": 50, \"reason\": \"edge\"}\n```";
        assert_eq!(parse_suggestion(fenced, 50).unwrap().number, 50);
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert!(parse_suggestion("not json", 50).is_err());
        assert!(parse_suggestion(r#"{"reason": "no number"}"#, 50).is_err());
        assert!(parse_suggestion(r#"{"number": 7}"#, 50).is_err());
        assert!(parse_suggestion(r#"{"number": 0, "reason": "zero"}"#, 50).is_err());
        assert!(parse_suggestion(r#"{"number": 51, "reason": "too big"}"#, 50).is_err());
        assert!(parse_suggestion(r#"{"number": 7, "reason": "  "}"#, 50).is_err());
        assert!(parse_suggestion(r#"{"number": "7", "reason": "string"}"#, 50).is_err());
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "{\"number\": 3, \"reason\": \"three\"}"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;
        let payload: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            payload.text(),
            Some("{\"number\": 3, \"reason\": \"three\"}")
        );

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(empty.text().is_none());

        let blocked: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(blocked.text().is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let mut config = GameConfig::default().with_api_key("test-key");
        config.prediction.endpoint = "http://127.0.0.1:9".to_string();
        config.prediction.request_timeout = Duration::from_secs(2);

        let predictor = GeminiPredictor::new(&config).unwrap();
        assert!(predictor.is_online());

        let suggestion = predictor.request_suggestion().await;
        assert_eq!(suggestion.source, SuggestionSource::Fallback);
        assert!((1..=50).contains(&suggestion.number));
        assert!(!suggestion.reason.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_uses_demo() {
        let mut config = GameConfig::default();
        config.prediction.demo_delay = Duration::ZERO;

        let predictor = GeminiPredictor::new(&config).unwrap();
        assert!(!predictor.is_online());
        assert_eq!(
            predictor.request_suggestion().await.source,
            SuggestionSource::Demo
        );
    }
}
