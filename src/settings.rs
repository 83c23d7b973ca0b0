use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_GAME_CODE: &str = "linw";
pub const DEFAULT_SOURCE_LANG: &str = "en";
pub const DEFAULT_TARGET_LANG: &str = "ko";
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8787";

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    Server,
    Personal,
}

impl TranslationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMode::Server => "server",
            TranslationMode::Personal => "personal",
        }
    }
}

pub fn mode_from_name(name: &str) -> Option<TranslationMode> {
    match name.trim().to_lowercase().as_str() {
        "server" => Some(TranslationMode::Server),
        "personal" => Some(TranslationMode::Personal),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub mode: TranslationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub game_code: String,
    pub source_lang: String,
    pub target_lang: String,
    pub relay_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: TranslationMode::Server,
            api_key: None,
            game_code: DEFAULT_GAME_CODE.to_string(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
        }
    }
}

/// Loads persisted settings, falling back to defaults when no file exists or
/// the stored content cannot be read.
pub fn load_settings() -> Settings {
    let Some(path) = settings_path() else {
        return Settings::default();
    };
    if !path.exists() {
        return Settings::default();
    }
    match read_settings(&path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("using default settings: {:#}", err);
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = settings_path()
        .context("HOME is not set, cannot resolve the settings directory")?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create settings directory: {}", dir.display()))?;
    }
    let content = serde_json::to_string_pretty(settings).context("failed to encode settings")?;
    fs::write(&path, content)
        .with_context(|| format!("failed to write settings: {}", path.display()))?;
    Ok(())
}

pub fn clear_settings() -> Result<()> {
    let Some(path) = settings_path() else {
        return Ok(());
    };
    if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("failed to remove settings: {}", path.display()))?;
    }
    Ok(())
}

fn read_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse settings: {}", path.display()))?;
    Ok(settings)
}

fn settings_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(SETTINGS_FILE))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".po-translator-rust"))
        }
    })
}
