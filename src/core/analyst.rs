use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::domain::model::{CalcBreakdown, PropertyType};
use crate::domain::ports::Analyst;
use crate::utils::error::{KpaError, Result};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 60;

const SYSTEM_PROMPT: &str = "You are a German real-estate valuation expert. \
Explain income-capitalization (Ertragswertverfahren) results in clear, non-technical \
language for a financially literate but non-expert user. Keep it under about 400 words. \
Write in English, but keep German technical terms like 'Liegenschaftszins' where helpful.";

const USER_REQUIREMENTS: &str = "Requirements:\n\
1) Explicitly state whether the property was treated as RESIDENTIAL (Wohnen) or \
COMMERCIAL (Gewerbe) and how this affected administration costs, maintenance, and the \
risk of rent loss.\n\
2) Explain that maintenance (and, for residential, administration) costs were adjusted \
using the official German Consumer Price Index (VPI) for October of the year before the \
purchase date, and briefly what this means for the amounts.\n\
3) Clearly compare the theoretical total value from the income approach with the actual \
purchase price, and say whether the agreed purchase price is above or below the \
theoretical value and by roughly what percentage.\n\
4) Structure the answer into short paragraphs or bullet points so that it is easy to scan.\n";

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Narrates a computed allocation through the OpenAI chat-completions API.
///
/// Strictly a side channel: one attempt, no retries, and the engine turns
/// any failure into a placeholder string rather than failing the valuation.
pub struct OpenAiAnalyst {
    client: Client,
    api_url: String,
    model: String,
}

impl OpenAiAnalyst {
    pub fn new(api_key: &str, model: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
                KpaError::Analyst {
                    message: "OPENAI_API_KEY contains invalid characters".to_string(),
                }
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| KpaError::Analyst {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url: API_URL.to_string(),
            model,
        })
    }

    /// Build from settings; `None` when no API key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        match &settings.openai_api_key {
            Some(key) if !key.is_empty() => {
                Ok(Some(Self::new(key, settings.openai_model.clone())?))
            }
            _ => Ok(None),
        }
    }

    /// Point the analyst at a different endpoint (mock servers in tests).
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }
}

#[async_trait::async_trait]
impl Analyst for OpenAiAnalyst {
    async fn narrate(
        &self,
        property_type: PropertyType,
        cpi_index: f64,
        index_factor: f64,
        calc: &CalcBreakdown,
    ) -> Result<String> {
        let payload = serde_json::json!({
            "property_type": property_type.to_string(),
            "cpi_index_prev_year": cpi_index,
            "index_factor_vs_oct_2001": index_factor,
            "calc": calc,
        });

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            temperature: 0.3,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Use the following structured data to explain the calc.\n\n\
                         JSON data:\n{}\n\n{}",
                        serde_json::to_string_pretty(&payload)?,
                        USER_REQUIREMENTS
                    ),
                },
            ],
        };

        tracing::debug!("Requesting analysis from model {}", self.model);
        let response = self
            .client
            .post(&self.api_url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| KpaError::Analyst {
                message: format!("OpenAI request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KpaError::Analyst {
                message: format!("OpenAI request failed: HTTP {}: {}", status, body),
            });
        }

        let data: ChatCompletionResponse =
            response.json().await.map_err(|e| KpaError::Analyst {
                message: format!("OpenAI response was not valid JSON: {}", e),
            })?;

        Ok(data
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}
