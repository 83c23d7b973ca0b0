use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct RelayRequest {
    pub(crate) source_text: Option<String>,
    pub(crate) source_lang: Option<String>,
    pub(crate) target_lang: Option<String>,
    pub(crate) game_code: Option<String>,
    pub(crate) api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) details: Option<String>,
}
