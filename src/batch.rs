use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::client::TranslationClient;
use crate::error::{TranslateError, TranslateResult};
use crate::session::{Session, TranslationStatus};
use crate::settings::{Settings, TranslationMode};

pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay: RATE_LIMIT_DELAY,
        }
    }
}

/// Translates every untranslated entry in session order, one call at a time.
/// A failed entry is recorded on that entry and the batch moves on; the delay
/// runs between calls but not after the last one. Returns how many entries
/// were attempted, `Ok(0)` when there was nothing to do.
pub async fn translate_all<C, F>(
    session: &mut Session,
    client: &C,
    settings: &Settings,
    options: &BatchOptions,
    mut progress: F,
) -> TranslateResult<usize>
where
    C: TranslationClient,
    F: FnMut(usize, usize),
{
    let selected = session.untranslated_ids();
    if selected.is_empty() {
        return Ok(0);
    }
    if settings.mode == TranslationMode::Personal
        && settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .is_none()
    {
        return Err(TranslateError::InvalidArgument(
            "API key is required for Personal mode".to_string(),
        ));
    }

    let total = selected.len();
    progress(0, total);

    for (index, id) in selected.iter().enumerate() {
        if let Some(entry) = session.get_mut(id) {
            entry.status = TranslationStatus::Translating;
            let source_text = entry.entry.source_text.clone();
            match client.translate(&source_text, settings).await {
                Ok(translated) => {
                    entry.entry.translated_text = translated;
                    entry.status = TranslationStatus::Translated;
                    entry.error = None;
                }
                Err(err) => {
                    warn!("translation failed for {}: {}", id, err);
                    entry.status = TranslationStatus::Error;
                    entry.error = Some(err.to_string());
                }
            }
        }
        progress(index + 1, total);
        if index + 1 < total {
            sleep(options.delay).await;
        }
    }

    Ok(total)
}

/// Same sequential policy over bare strings. A failed call keeps the
/// original text in that slot instead of touching any status.
pub async fn translate_texts<C, F>(
    client: &C,
    texts: &[String],
    settings: &Settings,
    options: &BatchOptions,
    mut progress: F,
) -> Vec<String>
where
    C: TranslationClient,
    F: FnMut(usize, usize),
{
    let total = texts.len();
    let mut results = Vec::with_capacity(total);
    for (index, text) in texts.iter().enumerate() {
        match client.translate(text, settings).await {
            Ok(translated) => results.push(translated),
            Err(err) => {
                warn!("translation failed for text {}: {}", index, err);
                results.push(text.clone());
            }
        }
        progress(index + 1, total);
        if index + 1 < total {
            sleep(options.delay).await;
        }
    }
    results
}
