use unicode_normalization::UnicodeNormalization;

use crate::types::Note;

/// Compiled title query. Recomputed per keystroke; there is no index.
#[derive(Debug, Clone, Default)]
pub struct TitleSearch {
    needle: String,
}

impl TitleSearch {
    pub fn compile(raw_query: &str) -> Self {
        Self {
            needle: normalize_for_search(raw_query),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.is_empty() || normalize_for_search(&note.title).contains(&self.needle)
    }

    /// Keep the notes whose title contains the query, preserving input order.
    pub fn filter<'a, I>(&self, notes: I) -> Vec<&'a Note>
    where
        I: IntoIterator<Item = &'a Note>,
    {
        notes.into_iter().filter(|note| self.matches(note)).collect()
    }
}

/// Case-insensitive substring filter over titles.
pub fn filter<'a>(notes: &[&'a Note], query: &str) -> Vec<&'a Note> {
    TitleSearch::compile(query).filter(notes.iter().copied())
}

fn normalize_for_search(value: &str) -> String {
    value.to_lowercase().nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(id: u64, title: &str) -> Note {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Note {
            id,
            title: title.into(),
            content: String::new(),
            date: at,
            changed_at: at,
        }
    }

    #[test]
    fn test_empty_query_keeps_everything_in_order() {
        let notes = vec![note(2, "Shopping"), note(1, "Work")];
        let refs: Vec<&Note> = notes.iter().collect();
        let result = filter(&refs, "");
        assert_eq!(result.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let notes = vec![note(1, "Weekly PLAN"), note(2, "Recipes"), note(3, "planets")];
        let refs: Vec<&Note> = notes.iter().collect();
        let result = filter(&refs, "Plan");
        assert_eq!(result.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let notes = vec![note(1, "Welcome!")];
        let refs: Vec<&Note> = notes.iter().collect();
        assert!(filter(&refs, "zzz").is_empty());
    }

    #[test]
    fn test_composed_and_decomposed_forms_match() {
        let notes = vec![note(1, "Caf\u{e9} list")];
        let search = TitleSearch::compile("cafe\u{301}");
        assert!(search.matches(&notes[0]));
    }

    #[test]
    fn test_content_is_not_searched() {
        let mut n = note(1, "Title");
        n.content = "needle".into();
        assert!(!TitleSearch::compile("needle").matches(&n));
    }
}
