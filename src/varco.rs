use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const VARCO_API_URL: &str = "https://openapi.ai.nc.com/mt/chat-content/v1/translate";
pub const OPENAPI_KEY_HEADER: &str = "openapi_key";
pub const UPSTREAM_PROVIDER: &str = "chat";

/// Outbound request to the VARCO machine-translation endpoint. A fresh TID
/// is generated per request; the upstream echoes it back untouched.
#[derive(Debug, Clone, Serialize)]
pub struct VarcoRequest {
    #[serde(rename = "TID")]
    pub tid: String,
    pub game_code: String,
    pub provider: String,
    pub source_lang: String,
    pub source_text: String,
    pub target_lang: String,
}

impl VarcoRequest {
    pub fn new(source_text: &str, source_lang: &str, target_lang: &str, game_code: &str) -> Self {
        Self {
            tid: Uuid::new_v4().to_string(),
            game_code: game_code.to_string(),
            provider: UPSTREAM_PROVIDER.to_string(),
            source_lang: source_lang.to_string(),
            source_text: source_text.to_string(),
            target_lang: target_lang.to_string(),
        }
    }
}

/// Upstream response. Only `target_text` is required; the echoed request
/// fields and the glossary are forwarded when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarcoResponse {
    #[serde(rename = "TID", skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    pub target_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glossary: Option<Vec<GlossaryTerm>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryTerm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ko: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<String>,
}

/// Turns a failure body into a displayable message: the JSON `message` field
/// when present and non-empty, the raw body when it is not JSON, and a
/// generic fallback otherwise.
pub fn upstream_error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            let message = value
                .get("message")
                .and_then(|message| message.as_str())
                .unwrap_or_default();
            if message.is_empty() {
                "Translation failed".to_string()
            } else {
                message.to_string()
            }
        }
        Err(_) => {
            if body.is_empty() {
                "Translation failed".to_string()
            } else {
                body.to_string()
            }
        }
    }
}
