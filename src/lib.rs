use anyhow::{Result, anyhow};
use tracing::{info, warn};

pub mod batch;
pub mod catalog;
pub mod client;
pub mod error;
pub mod languages;
pub mod logging;
pub mod po;
mod server;
pub mod session;
pub mod settings;
#[cfg(test)]
mod test_util;
mod varco;

pub use batch::{BatchOptions, translate_all, translate_texts};
pub use catalog::{Catalog, Entry, TranslationStats};
pub use client::{RelayClient, TranslationClient};
pub use error::{TranslateError, TranslateResult};
pub use po::PoDocument;
pub use server::run_server;
pub use session::{Session, SessionEntry, TranslationStatus};
pub use settings::{Settings, TranslationMode};

#[derive(Debug, Clone)]
pub struct Config {
    pub lang: Option<String>,
    pub source_lang: Option<String>,
    pub mode: Option<String>,
    pub key: Option<String>,
    pub game_code: Option<String>,
    pub relay_url: Option<String>,
    pub show_languages: bool,
    pub show_stats: bool,
    pub save_settings: bool,
    pub clear_settings: bool,
}

pub async fn run(config: Config, input: Option<String>) -> Result<String> {
    let mut settings = settings::load_settings();
    apply_overrides(&mut settings, &config)?;

    if config.clear_settings {
        settings::clear_settings()?;
        return Ok("settings cleared".to_string());
    }
    if config.save_settings {
        settings::save_settings(&settings)?;
        return Ok("settings saved".to_string());
    }
    if config.show_languages {
        return Ok(languages::format_language_list());
    }

    let input = input.unwrap_or_default();
    if input.trim().is_empty() {
        return Err(anyhow!("input is empty"));
    }
    let document = po::parse(&input)?;

    if config.show_stats {
        let stats = catalog::translation_stats(document.catalog.entries());
        return Ok(format_stats(&stats));
    }

    let mut session = Session::from_catalog(&document.catalog);
    let before = session.stats();
    info!(
        "loaded {} entries ({} untranslated)",
        before.total, before.untranslated
    );

    let client = RelayClient::new(settings.relay_url.as_str());
    let attempted = batch::translate_all(
        &mut session,
        &client,
        &settings,
        &BatchOptions::default(),
        |done, total| info!("translated {}/{}", done, total),
    )
    .await?;

    if attempted == 0 {
        info!("nothing to translate");
    }
    let after = session.stats();
    info!(
        "{} of {} entries translated ({}%)",
        after.translated, after.total, after.progress
    );

    Ok(po::serialize(&session.durable_entries(), &input)?)
}

pub fn apply_overrides(settings: &mut Settings, config: &Config) -> Result<()> {
    if let Some(mode) = config.mode.as_deref() {
        settings.mode = settings::mode_from_name(mode).ok_or_else(|| {
            anyhow!(
                "unknown translation mode '{}' (expected server or personal)",
                mode
            )
        })?;
    }
    if let Some(key) = config.key.as_deref() {
        settings.api_key = Some(key.to_string());
    }
    if let Some(code) = config.game_code.as_deref() {
        settings.game_code = code.to_string();
    }
    if let Some(url) = config.relay_url.as_deref() {
        settings.relay_url = url.to_string();
    }
    if let Some(lang) = config.lang.as_deref() {
        settings.target_lang = normalize_lang(lang, "target");
    }
    if let Some(lang) = config.source_lang.as_deref() {
        settings.source_lang = normalize_lang(lang, "source");
    }
    Ok(())
}

/// Unknown codes go through unchanged; the upstream service is the judge.
fn normalize_lang(code: &str, role: &str) -> String {
    let normalized = code.trim().to_lowercase();
    if !languages::is_supported(&normalized) {
        warn!(
            "{} language '{}' is not in the supported list (--show-languages)",
            role, code
        );
    }
    normalized
}

fn format_stats(stats: &TranslationStats) -> String {
    let lines = vec![
        format!("total\t{}", stats.total),
        format!("translated\t{}", stats.translated),
        format!("untranslated\t{}", stats.untranslated),
        format!("progress\t{}%", stats.progress),
    ];
    lines.join("\n")
}
