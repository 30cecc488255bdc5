//! Inverted index: for every word, how many documents contain it and which.

use common::{App, KeyValue};
use itertools::Itertools;
use unicode_general_category::{get_general_category, GeneralCategory};

pub const APP: App = App {
    name: "ii",
    map,
    reduce,
};

// Unicode category L only: letter numbers, symbols and combining marks split words.
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Emits `(word, document)` once per distinct run of letters. Case-sensitive, no stemming.
pub fn map(document: &str, contents: &str) -> Vec<KeyValue> {
    contents
        .split(|c: char| !is_letter(c))
        .filter(|w| !w.is_empty())
        .unique()
        .map(|w| KeyValue::new(w, document))
        .collect()
}

// Does not dedupe: a document mapped twice is counted twice.
pub fn reduce(_word: &str, documents: Vec<String>) -> String {
    format!("{} {}", documents.len(), documents.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn map_emits_each_distinct_word_once() {
        let kvs = map("d1", "The cat sat. The CAT ran.");
        assert_eq!(kvs.len(), 5);
        let got: HashSet<_> = kvs.into_iter().collect();
        let want: HashSet<_> = ["The", "cat", "sat", "CAT", "ran"]
            .into_iter()
            .map(|w| KeyValue::new(w, "d1"))
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn map_splits_on_every_non_letter() {
        let words: Vec<_> = map("d", "it's x2y\tnaïve--über_42")
            .into_iter()
            .map(|kv| kv.key)
            .collect();
        assert_eq!(words, ["it", "s", "x", "y", "naïve", "über"]);
    }

    #[test]
    fn alphabetic_non_letters_are_delimiters() {
        assert!(map("d", "Ⅻ").is_empty());
        assert!(map("d", "Ⓐ Ⓑ").is_empty());
        let words: Vec<_> = map("d", "हिन्दी").into_iter().map(|kv| kv.key).collect();
        assert_eq!(words, ["ह", "न", "द"]);
    }

    #[test]
    fn map_of_text_without_letters_is_empty() {
        assert!(map("d", "").is_empty());
        assert!(map("d", "123 -- 456\n").is_empty());
    }

    #[test]
    fn reduce_counts_and_joins() {
        assert_eq!(
            reduce("cat", vec!["a.txt".into(), "b.txt".into()]),
            "2 a.txt,b.txt"
        );
        assert_eq!(reduce("dog", vec!["z.txt".into()]), "1 z.txt");
    }

    #[test]
    fn reduce_keeps_cross_shard_duplicates() {
        assert_eq!(reduce("w", vec!["a".into(), "a".into()]), "2 a,a");
    }

    #[test]
    fn app_wires_both_callbacks() {
        assert_eq!(APP.name, "ii");
        assert_eq!((APP.map)("d", "a a").len(), 1);
        assert_eq!((APP.reduce)("a", vec!["d".into()]), "1 d");
    }
}
