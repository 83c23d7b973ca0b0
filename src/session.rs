use crate::catalog::{Catalog, Entry, TranslationStats, translation_stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationStatus {
    Untranslated,
    Translating,
    Translated,
    Error,
}

impl TranslationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationStatus::Untranslated => "untranslated",
            TranslationStatus::Translating => "translating",
            TranslationStatus::Translated => "translated",
            TranslationStatus::Error => "error",
        }
    }
}

/// Durable entry plus the transient orchestration state layered on top.
/// Only `entry` survives into serialization.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub id: String,
    pub entry: Entry,
    pub status: TranslationStatus,
    pub error: Option<String>,
}

/// In-memory working set for one loaded document. Ids are stable within the
/// session only; loading a new document replaces the whole collection.
#[derive(Debug, Clone, Default)]
pub struct Session {
    entries: Vec<SessionEntry>,
}

impl Session {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let entries = catalog
            .entries()
            .enumerate()
            .map(|(index, entry)| SessionEntry {
                id: entry_id(entry, index),
                entry: entry.clone(),
                status: if entry.translated_text.is_empty() {
                    TranslationStatus::Untranslated
                } else {
                    TranslationStatus::Translated
                },
                error: None,
            })
            .collect();
        Self { entries }
    }

    pub fn replace(&mut self, catalog: &Catalog) {
        *self = Self::from_catalog(catalog);
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SessionEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SessionEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    /// Applies a manual edit. The entry is marked translated regardless of
    /// the new text; a stale error message is left in place.
    pub fn edit(&mut self, id: &str, translation: &str) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.entry.translated_text = translation.to_string();
                entry.status = TranslationStatus::Translated;
                true
            }
            None => false,
        }
    }

    /// Ids of entries still lacking a translation, in session order. The
    /// check is on the raw text, so whitespace-only translations do not
    /// count as untranslated here even though `stats` trims.
    pub fn untranslated_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.entry.translated_text.is_empty())
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// The durable entries with transient state stripped, ready for
    /// serialization.
    pub fn durable_entries(&self) -> Vec<Entry> {
        self.entries.iter().map(|entry| entry.entry.clone()).collect()
    }

    pub fn stats(&self) -> TranslationStats {
        translation_stats(self.entries.iter().map(|entry| &entry.entry))
    }
}

fn entry_id(entry: &Entry, index: usize) -> String {
    let context = entry
        .context
        .as_deref()
        .filter(|context| !context.is_empty())
        .unwrap_or("no-context");
    format!("{}-{}", context, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Comments;

    fn entry(context: Option<&str>, source: &str, translation: &str) -> Entry {
        Entry {
            source_text: source.to_string(),
            translated_text: translation.to_string(),
            context: context.map(str::to_string),
            comments: Comments::default(),
        }
    }

    fn catalog(entries: Vec<Entry>) -> Catalog {
        entries.into_iter().collect()
    }

    #[test]
    fn ids_combine_context_and_ordinal() {
        let session = Session::from_catalog(&catalog(vec![
            entry(None, "Hello", ""),
            entry(None, "World", ""),
            entry(Some("menu"), "Open", ""),
            entry(Some(""), "Close", ""),
        ]));
        let ids: Vec<_> = session.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["no-context-0", "no-context-1", "menu-2", "no-context-3"]
        );
    }

    #[test]
    fn initial_status_uses_raw_translation() {
        let session = Session::from_catalog(&catalog(vec![
            entry(None, "a", ""),
            entry(None, "b", "done"),
            entry(None, "c", "   "),
        ]));
        let statuses: Vec<_> = session.entries().iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                TranslationStatus::Untranslated,
                TranslationStatus::Translated,
                TranslationStatus::Translated,
            ]
        );
    }

    #[test]
    fn edit_updates_text_and_marks_translated() {
        let mut session = Session::from_catalog(&catalog(vec![entry(None, "Hello", "")]));
        assert!(session.edit("no-context-0", "안녕"));
        let updated = session.get("no-context-0").unwrap();
        assert_eq!(updated.entry.translated_text, "안녕");
        assert_eq!(updated.status, TranslationStatus::Translated);

        assert!(!session.edit("missing-9", "x"));
    }

    #[test]
    fn edit_leaves_previous_error_in_place() {
        let mut session = Session::from_catalog(&catalog(vec![entry(None, "Hello", "")]));
        if let Some(failed) = session.get_mut("no-context-0") {
            failed.status = TranslationStatus::Error;
            failed.error = Some("boom".to_string());
        }
        session.edit("no-context-0", "안녕");
        let updated = session.get("no-context-0").unwrap();
        assert_eq!(updated.status, TranslationStatus::Translated);
        assert_eq!(updated.error.as_deref(), Some("boom"));
    }

    #[test]
    fn untranslated_selection_ignores_whitespace_translations() {
        let session = Session::from_catalog(&catalog(vec![
            entry(None, "a", ""),
            entry(None, "b", "   "),
            entry(None, "c", "done"),
            entry(None, "d", ""),
        ]));
        assert_eq!(session.untranslated_ids(), vec!["no-context-0", "no-context-3"]);
    }

    #[test]
    fn replace_swaps_whole_collection() {
        let mut session = Session::from_catalog(&catalog(vec![entry(None, "old", "x")]));
        session.replace(&catalog(vec![
            entry(Some("menu"), "new", ""),
            entry(None, "other", ""),
        ]));
        assert_eq!(session.len(), 2);
        assert!(session.get("no-context-0").is_none());
        assert!(session.get("menu-0").is_some());
    }

    #[test]
    fn stats_trim_whitespace_translations() {
        let session = Session::from_catalog(&catalog(vec![
            entry(None, "a", ""),
            entry(None, "b", "   "),
            entry(None, "c", "done"),
        ]));
        let stats = session.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.translated, 1);
        assert_eq!(stats.untranslated, 2);
        assert_eq!(stats.progress, 33);
    }

    #[test]
    fn durable_entries_drop_transient_state() {
        let mut session = Session::from_catalog(&catalog(vec![entry(Some("menu"), "Open", "")]));
        session.edit("menu-0", "열기");
        let durable = session.durable_entries();
        assert_eq!(durable.len(), 1);
        assert_eq!(durable[0].translated_text, "열기");
        assert_eq!(durable[0].context.as_deref(), Some("menu"));
    }
}
