use tracing::{debug, error};

use crate::settings::{DEFAULT_GAME_CODE, Settings};
use crate::varco::{
    OPENAPI_KEY_HEADER, VARCO_API_URL, VarcoRequest, VarcoResponse, upstream_error_message,
};

use super::models::RelayRequest;
use super::state::ServerState;

/// Environment variable consulted when a request carries no key of its own.
pub(crate) const API_KEY_ENV: &str = "VARCO_API_KEY";

#[derive(Debug)]
pub(crate) struct RelayError {
    pub(crate) status: axum::http::StatusCode,
    pub(crate) message: String,
    pub(crate) details: Option<String>,
}

impl RelayError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: axum::http::StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }
}

/// Forwards one translation request to the VARCO endpoint.
///
/// The key is resolved before the fields are validated, so an unconfigured
/// relay reports the missing key even for an empty request. Upstream failures
/// keep their original status code; the body is condensed into a message plus
/// the raw response text as details.
pub(crate) async fn relay_translate(
    state: &ServerState,
    request: RelayRequest,
) -> Result<VarcoResponse, RelayError> {
    let Some(api_key) = resolve_api_key(request.api_key.as_deref(), &state.settings) else {
        return Err(RelayError::internal(
            "API key not configured. Please set VARCO_API_KEY environment variable or provide your own API key.",
        ));
    };

    let (Some(source_text), Some(source_lang), Some(target_lang)) = (
        non_empty(request.source_text),
        non_empty(request.source_lang),
        non_empty(request.target_lang),
    ) else {
        return Err(RelayError::bad_request(
            "Missing required fields: source_text, source_lang, target_lang",
        ));
    };

    let game_code = request
        .game_code
        .unwrap_or_else(|| DEFAULT_GAME_CODE.to_string());
    let payload = VarcoRequest::new(&source_text, &source_lang, &target_lang, &game_code);
    debug!(
        "relaying {} -> {} ({} chars, TID {})",
        source_lang,
        target_lang,
        source_text.chars().count(),
        payload.tid
    );

    let client = reqwest::Client::new();
    let response = client
        .post(VARCO_API_URL)
        .header(OPENAPI_KEY_HEADER, api_key)
        .json(&payload)
        .send()
        .await
        .map_err(|err| {
            error!("upstream request failed: {}", err);
            RelayError::internal("Internal server error")
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("upstream error response ({}): {}", status, body);
        return Err(RelayError {
            status,
            message: upstream_error_message(&body),
            details: Some(body),
        });
    }

    response.json::<VarcoResponse>().await.map_err(|err| {
        error!("failed to decode upstream response: {}", err);
        RelayError::internal("Internal server error")
    })
}

/// Key precedence: request body, then the environment, then stored settings.
fn resolve_api_key(request_key: Option<&str>, settings: &Settings) -> Option<String> {
    if let Some(key) = request_key.filter(|key| !key.is_empty()) {
        return Some(key.to_string());
    }
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.is_empty() {
            return Some(key);
        }
    }
    settings.api_key.clone().filter(|key| !key.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
