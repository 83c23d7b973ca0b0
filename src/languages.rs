/// Language codes accepted by the translation provider, with display labels.
pub const SUPPORTED_LANGUAGES: [(&str, &str); 12] = [
    ("en", "English"),
    ("ko", "한국어 (Korean)"),
    ("ja", "日本語 (Japanese)"),
    ("cn", "简体中文 (Chinese Simplified)"),
    ("tw", "繁體中文 (Chinese Traditional)"),
    ("vi", "Tiếng Việt (Vietnamese)"),
    ("id", "Bahasa Indonesia (Indonesian)"),
    ("th", "ไทย (Thai)"),
    ("ru", "Русский (Russian)"),
    ("ar", "العربية (Arabic)"),
    ("tr", "Türkçe (Turkish)"),
    ("it", "Italiano (Italian)"),
];

pub fn language_label(code: &str) -> Option<&'static str> {
    let code = code.trim().to_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, label)| *label)
}

pub fn is_supported(code: &str) -> bool {
    language_label(code).is_some()
}

pub fn format_language_list() -> String {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, label)| format!("{}\t{}", code, label))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_labels_case_insensitively() {
        assert_eq!(language_label("ko"), Some("한국어 (Korean)"));
        assert_eq!(language_label(" EN "), Some("English"));
        assert_eq!(language_label("fr"), None);
    }

    #[test]
    fn supported_set_matches_provider() {
        assert!(is_supported("tw"));
        assert!(is_supported("ar"));
        assert!(!is_supported("zh"));
        assert_eq!(SUPPORTED_LANGUAGES.len(), 12);
    }

    #[test]
    fn list_is_tab_separated_lines() {
        let list = format_language_list();
        assert!(list.starts_with("en\tEnglish"));
        assert_eq!(list.lines().count(), 12);
    }
}
