use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::model::AddonType;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Environment variable the client reads its API key from.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// The behavior/resource JSON pair produced by one generation call. Both
/// fields are required in the model's response; `explanation` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub behavior_json: String,
    pub resource_json: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Blocking client for the Gemini generateContent endpoint.
///
/// One call per invocation, no retry and no timeout of our own; callers keep
/// the item's prior JSON fields untouched when this returns `Err`.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    api_key: String,
    model: String,
}

impl GenerationClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, String> {
        std::env::var(API_KEY_VAR)
            .map(Self::new)
            .map_err(|_| format!("{} is not set", API_KEY_VAR))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn generate(
        &self,
        ty: AddonType,
        name: &str,
        description: &str,
    ) -> Result<GeneratedContent, String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );
        let response = ureq::post(&url)
            .set("Content-Type", "application/json")
            .send_json(request_body(ty, name, description))
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => {
                    let body = response.into_string().unwrap_or_default();
                    format!("generation request failed ({}): {}", code, body)
                }
                other => format!("generation request failed: {}", other),
            })?;
        let reply: serde_json::Value = response
            .into_json()
            .map_err(|e| format!("failed to read generation response: {}", e))?;
        let text =
            candidate_text(&reply).ok_or_else(|| "no generated text in response".to_string())?;
        parse_generated(text)
    }
}

/// generateContent request constraining the reply to a JSON object with the
/// two required string fields plus an optional explanation.
pub fn request_body(ty: AddonType, name: &str, description: &str) -> serde_json::Value {
    let prompt = format!(
        "Generate a valid Minecraft Bedrock Edition JSON for a {} called \"{}\".\n\
         Context: {}\n\n\
         You must provide two JSON objects:\n\
         1. Behavior Pack JSON\n\
         2. Resource Pack JSON (if applicable, otherwise provide an empty object)\n\n\
         Return the response in JSON format.",
        ty, name, description
    );
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "behavior_json": {
                        "type": "STRING",
                        "description": "The behavior pack JSON content as a string"
                    },
                    "resource_json": {
                        "type": "STRING",
                        "description": "The resource pack JSON content as a string"
                    },
                    "explanation": {
                        "type": "STRING",
                        "description": "A brief explanation of what was generated"
                    }
                },
                "required": ["behavior_json", "resource_json"]
            }
        }
    })
}

/// Text of the first candidate part in a generateContent response.
pub fn candidate_text(response: &serde_json::Value) -> Option<&str> {
    response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

pub fn parse_generated(text: &str) -> Result<GeneratedContent, String> {
    serde_json::from_str(text.trim()).map_err(|e| format!("malformed generation payload: {}", e))
}
