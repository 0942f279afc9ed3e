use std::collections::HashMap;

use serde::Deserialize;

use crate::assets::read_locale_asset;
use crate::error::Result;
use crate::normalizer::{is_punctuation_char, normalize};

#[derive(Deserialize)]
struct ConfusionFile {
    entries: HashMap<String, Vec<String>>,
}

/// Homophone alternates accepted in place of a reference word.
///
/// Entries are authored data and need not be symmetric. Keys and
/// alternates are normalized on construction so lookups compare
/// normalized words directly.
#[derive(Clone, Debug, Default)]
pub struct ConfusionTable {
    entries: HashMap<String, Vec<String>>,
}

impl ConfusionTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table bundled for `locale` (e.g. `"english"`).
    pub fn for_locale(locale: &str) -> Result<Self> {
        Self::from_json(read_locale_asset("confusions", locale)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfusionFile = serde_json::from_str(json)?;
        Ok(Self::from_entries(file.entries))
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table: HashMap<String, Vec<String>> = HashMap::new();
        for (word, alternates) in entries {
            let word = normalize(word.as_ref());
            if !is_single_word(&word) {
                continue;
            }
            let slot = table.entry(word.clone()).or_default();
            for alt in alternates {
                let alt = normalize(alt.as_ref());
                // "its"/"it's" collapse to the same word once normalized
                if is_single_word(&alt) && alt != word && !slot.contains(&alt) {
                    slot.push(alt);
                }
            }
        }
        table.retain(|_, alternates| !alternates.is_empty());
        Self { entries: table }
    }

    /// Alternates for `word`; empty for unknown words.
    pub fn confusions(&self, word: &str) -> &[String] {
        self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_confusion(&self, target: &str, spoken: &str) -> bool {
        self.confusions(target).iter().any(|alt| alt == spoken)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_single_word(w: &str) -> bool {
    !w.is_empty() && !w.contains(' ') && !w.chars().all(is_punctuation_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_table_has_common_homophones() {
        let table = ConfusionTable::for_locale("english").unwrap();
        assert!(table.is_confusion("to", "too"));
        assert!(table.is_confusion("to", "two"));
        assert!(table.is_confusion("there", "their"));
        // apostrophes are normalized away
        assert!(table.is_confusion("there", "theyre"));
        assert!(table.confusions("theyre").contains(&"there".to_string()));
    }

    #[test]
    fn unknown_word_has_no_alternates() {
        let table = ConfusionTable::for_locale("english").unwrap();
        assert!(table.confusions("xylophone").is_empty());
        assert!(!table.is_confusion("xylophone", "zylophone"));
    }

    #[test]
    fn lookup_is_directional() {
        let table = ConfusionTable::from_entries([("cat", vec!["kat"])]);
        assert!(table.is_confusion("cat", "kat"));
        assert!(!table.is_confusion("kat", "cat"));
    }

    #[test]
    fn entries_are_normalized_and_deduplicated() {
        let table = ConfusionTable::from_entries([("Your", vec!["You're", "youre", "!!"])]);
        assert_eq!(table.confusions("your"), &["youre".to_string()]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn alternates_equal_to_the_word_are_dropped() {
        let table = ConfusionTable::from_entries([("its", vec!["it's"]), ("it's", vec!["its"])]);
        assert!(table.confusions("its").is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn bundled_table_has_no_self_alternates() {
        let table = ConfusionTable::for_locale("english").unwrap();
        for (word, alternates) in &table.entries {
            assert!(!alternates.is_empty(), "{word} has no alternates");
            assert!(!alternates.contains(word), "{word} lists itself");
        }
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(ConfusionTable::from_json("not json").is_err());
    }

    #[test]
    fn empty_table() {
        let table = ConfusionTable::empty();
        assert!(table.is_empty());
        assert!(table.confusions("to").is_empty());
    }
}
