use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use crate::error::{TranslateError, TranslateResult};
use crate::settings::{DEFAULT_GAME_CODE, Settings, TranslationMode};
use crate::varco::upstream_error_message;

pub type TranslateFuture = Pin<Box<dyn Future<Output = TranslateResult<String>> + Send>>;

/// One outbound translation call, resolved against the active settings.
pub trait TranslationClient: Clone + Send + Sync {
    fn translate(&self, source_text: &str, settings: &Settings) -> TranslateFuture;
}

#[derive(Debug, Clone, Default)]
pub struct TranslateRequestOptions {
    pub api_key: Option<String>,
    pub game_code: Option<String>,
}

/// HTTP client for the relay endpoint. Both modes go through the relay; in
/// personal mode the caller's key travels in the request body instead of
/// being read from the relay's own configuration.
#[derive(Debug, Clone)]
pub struct RelayClient {
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn translate_text(
        &self,
        mode: TranslationMode,
        source_text: &str,
        source_lang: &str,
        target_lang: &str,
        options: &TranslateRequestOptions,
    ) -> TranslateResult<String> {
        let request = build_request(mode, source_text, source_lang, target_lang, options)?;

        let client = reqwest::Client::new();
        let url = format!("{}/translate", self.base_url);
        let response = client.post(&url).json(&request).send().await?;

        let status = response.status();
        if status.is_success() {
            let payload: RelayResponseBody = response.json().await?;
            return Ok(payload.target_text);
        }
        let text = response.text().await.unwrap_or_default();
        Err(TranslateError::Upstream(upstream_error_message(&text)))
    }
}

impl TranslationClient for RelayClient {
    fn translate(&self, source_text: &str, settings: &Settings) -> TranslateFuture {
        let client = self.clone();
        let source_text = source_text.to_string();
        let mode = settings.mode;
        let source_lang = settings.source_lang.clone();
        let target_lang = settings.target_lang.clone();
        let options = TranslateRequestOptions {
            api_key: settings.api_key.clone(),
            game_code: Some(settings.game_code.clone()),
        };
        Box::pin(async move {
            client
                .translate_text(mode, &source_text, &source_lang, &target_lang, &options)
                .await
        })
    }
}

fn build_request(
    mode: TranslationMode,
    source_text: &str,
    source_lang: &str,
    target_lang: &str,
    options: &TranslateRequestOptions,
) -> TranslateResult<RelayRequestBody> {
    let api_key = match mode {
        TranslationMode::Personal => {
            let Some(key) = options.api_key.as_deref().filter(|key| !key.is_empty()) else {
                return Err(TranslateError::InvalidArgument(
                    "API key is required for Personal mode".to_string(),
                ));
            };
            Some(key.to_string())
        }
        TranslationMode::Server => None,
    };
    let game_code = options
        .game_code
        .as_deref()
        .filter(|code| !code.is_empty())
        .unwrap_or(DEFAULT_GAME_CODE);

    Ok(RelayRequestBody {
        source_text: source_text.to_string(),
        source_lang: source_lang.to_string(),
        target_lang: target_lang.to_string(),
        game_code: game_code.to_string(),
        api_key,
    })
}

#[derive(Debug, Serialize)]
struct RelayRequestBody {
    source_text: String,
    source_lang: String,
    target_lang: String,
    game_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayResponseBody {
    target_text: String,
}
