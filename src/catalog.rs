use serde::Serialize;
use std::collections::HashMap;

/// One translatable unit. `source_text` together with `context` forms the
/// natural key; `context: None` is distinct from `Some("")` and both survive
/// round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub source_text: String,
    pub translated_text: String,
    pub context: Option<String>,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comments {
    pub reference: Option<String>,
    pub extracted: Option<String>,
    pub translator: Option<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.reference.is_none() && self.extracted.is_none() && self.translator.is_none()
    }
}

#[derive(Debug, Clone)]
struct ContextGroup {
    context: Option<String>,
    entries: Vec<Entry>,
}

/// Ordered entry collection: contexts in first-seen order, entries in
/// document order within each context. Inserting an existing
/// (context, source_text) key replaces the entry in place, keeping the
/// original position (last write wins).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    groups: Vec<ContextGroup>,
    index: HashMap<(Option<String>, String), (usize, usize)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: Entry) {
        let key = (entry.context.clone(), entry.source_text.clone());
        if let Some(&(group, slot)) = self.index.get(&key) {
            self.groups[group].entries[slot] = entry;
            return;
        }

        let group = match self
            .groups
            .iter()
            .position(|group| group.context == entry.context)
        {
            Some(found) => found,
            None => {
                self.groups.push(ContextGroup {
                    context: entry.context.clone(),
                    entries: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let slot = self.groups[group].entries.len();
        self.groups[group].entries.push(entry);
        self.index.insert(key, (group, slot));
    }

    pub fn get(&self, context: Option<&str>, source_text: &str) -> Option<&Entry> {
        let key = (context.map(str::to_string), source_text.to_string());
        let &(group, slot) = self.index.get(&key)?;
        Some(&self.groups[group].entries[slot])
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Flattened iteration in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.groups
            .into_iter()
            .flat_map(|group| group.entries)
            .collect()
    }
}

impl FromIterator<Entry> for Catalog {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    pub total: usize,
    pub translated: usize,
    pub untranslated: usize,
    pub progress: u32,
}

/// Counts translation coverage. An entry counts as translated when its
/// translation is non-empty after trimming whitespace.
pub fn translation_stats<'a, I>(entries: I) -> TranslationStats
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut total = 0usize;
    let mut translated = 0usize;
    for entry in entries {
        total += 1;
        if !entry.translated_text.trim().is_empty() {
            translated += 1;
        }
    }
    let progress = if total > 0 {
        ((translated as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };
    TranslationStats {
        total,
        translated,
        untranslated: total - translated,
        progress,
    }
}
