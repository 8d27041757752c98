use std::collections::{HashMap, HashSet};

use chrono::Utc;
use memchr::memmem;

use crate::query::Matcher;

/// One ingested log line. Immutable once created; ids are assigned by the
/// store and strictly increase in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub text: String,
}

/// Append-only store of log entries with a secondary trigram index.
///
/// The primary collection and the index are only ever mutated together,
/// inside a single `&mut self` call, so no reader can observe one without
/// the other. Entries are never modified in place; the only removal is
/// `trim`, which drops a contiguous id prefix from both structures.
pub struct EntryStore {
    entries: Vec<LogEntry>,
    postings: HashMap<String, Vec<u64>>,
    next_id: u64,
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            postings: HashMap::new(),
            next_id: 1,
        }
    }

    /// Appends one line, assigning the next id and the current wall-clock
    /// timestamp. Primary collection and trigram index are updated as one
    /// unit before the method returns.
    pub fn append(&mut self, text: String) -> LogEntry {
        let entry = LogEntry {
            id: self.next_id,
            timestamp: Utc::now().timestamp_millis(),
            text,
        };
        self.next_id += 1;

        for gram in trigrams(&entry.text) {
            // Posting lists stay sorted because ids are handed out in
            // insertion order.
            self.postings.entry(gram).or_default().push(entry.id);
        }
        self.entries.push(entry.clone());
        entry
    }

    /// Full corpus in insertion order.
    pub fn all(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns matching entries in insertion order.
    ///
    /// Literal matchers of three or more characters take the token-indexed
    /// path: intersect the posting lists of the needle's trigrams, then
    /// verify the substring to reject cross-boundary false positives.
    /// Shorter literals scan the corpus with memmem. Pattern matchers always
    /// take the full-scan path; the index is never asked to approximate an
    /// arbitrary regex.
    pub fn search(&self, matcher: &Matcher) -> Vec<&LogEntry> {
        match matcher {
            Matcher::Empty => self.entries.iter().collect(),
            Matcher::Literal(needle) => {
                if needle.chars().count() >= 3 {
                    self.search_indexed(needle)
                } else {
                    let finder = memmem::Finder::new(needle.as_bytes());
                    self.entries
                        .iter()
                        .filter(|e| finder.find(e.text.as_bytes()).is_some())
                        .collect()
                }
            }
            Matcher::Pattern(re) => self
                .entries
                .iter()
                .filter(|e| re.is_match(&e.text))
                .collect(),
        }
    }

    fn search_indexed(&self, needle: &str) -> Vec<&LogEntry> {
        let mut candidate_ids: Option<Vec<u64>> = None;
        for gram in trigrams(needle) {
            let Some(posting) = self.postings.get(&gram) else {
                return Vec::new();
            };
            candidate_ids = Some(match candidate_ids {
                None => posting.clone(),
                Some(current) => intersect_sorted(&current, posting),
            });
            if candidate_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
                return Vec::new();
            }
        }

        let finder = memmem::Finder::new(needle.as_bytes());
        candidate_ids
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.entry_by_id(*id))
            .filter(|e| finder.find(e.text.as_bytes()).is_some())
            .collect()
    }

    fn entry_by_id(&self, id: u64) -> Option<&LogEntry> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Removes every entry with `id < before_id` from both the primary
    /// collection and the trigram index. Runs inside one `&mut self` call,
    /// so readers never see the two structures disagree.
    pub fn trim(&mut self, before_id: u64) {
        self.entries.retain(|e| e.id >= before_id);
        self.postings.retain(|_, ids| {
            ids.retain(|id| *id >= before_id);
            !ids.is_empty()
        });
    }
}

/// Distinct char-level trigrams of `text`, mirroring a trigram tokenizer.
/// Char windows keep this safe on multi-byte input.
fn trigrams(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

fn intersect_sorted(a: &[u64], b: &[u64]) -> Vec<u64> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn store_with(lines: &[&str]) -> EntryStore {
        let mut store = EntryStore::new();
        for line in lines {
            store.append((*line).to_string());
        }
        store
    }

    #[test]
    fn test_append_assigns_increasing_ids_from_one() {
        let mut store = EntryStore::new();
        let a = store.append("first".to_string());
        let b = store.append("second".to_string());
        let c = store.append("third".to_string());

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(c.id, 3);

        let ids: Vec<u64> = store.all().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let store = store_with(&["zebra", "apple", "mango"]);
        let texts: Vec<&str> = store.all().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_indexed_literal_search_in_insertion_order() {
        let store = store_with(&["apple pie", "banana split", "apple tart"]);
        let results = store.search(&Matcher::Literal("apple".to_string()));
        let texts: Vec<&str> = results.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["apple pie", "apple tart"]);
    }

    #[test]
    fn test_short_literal_falls_back_to_scan() {
        let store = store_with(&["ab cd", "xy zw", "abab"]);
        let results = store.search(&Matcher::Literal("ab".to_string()));
        let texts: Vec<&str> = results.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["ab cd", "abab"]);
    }

    #[test]
    fn test_trigram_false_positives_are_verified_away() {
        // Both trigrams of "abcd" exist somewhere, but never contiguously.
        let store = store_with(&["abc xyz", "bcd xyz", "zz abcd zz"]);
        let results = store.search(&Matcher::Literal("abcd".to_string()));
        let texts: Vec<&str> = results.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["zz abcd zz"]);
    }

    #[test]
    fn test_pattern_search_scans_corpus() {
        let store = store_with(&["ERROR timeout", "INFO ok", "ERROR disk full"]);
        let re = Regex::new("^ERROR .*full$").unwrap();
        let results = store.search(&Matcher::Pattern(re));
        let texts: Vec<&str> = results.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["ERROR disk full"]);
    }

    #[test]
    fn test_empty_matcher_returns_everything() {
        let store = store_with(&["a", "b", "c"]);
        assert_eq!(store.search(&Matcher::Empty).len(), 3);
    }

    #[test]
    fn test_search_missing_term_is_empty() {
        let store = store_with(&["apple pie"]);
        assert!(store.search(&Matcher::Literal("banana".to_string())).is_empty());
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let store = store_with(&["héllo wörld", "日本語のログ行"]);
        let results = store.search(&Matcher::Literal("日本語".to_string()));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_trim_removes_prefix_from_both_structures() {
        let mut store = EntryStore::new();
        for i in 1..=10 {
            store.append(format!("entry number {i}"));
        }
        store.trim(3);

        let ids: Vec<u64> = store.all().iter().map(|e| e.id).collect();
        assert_eq!(ids, (3..=10).collect::<Vec<u64>>());

        // Trimmed entries are gone from the indexed path too.
        let results = store.search(&Matcher::Literal("entry number".to_string()));
        assert_eq!(results.len(), 8);
        assert!(store.search(&Matcher::Literal("number 1".to_string()))
            .iter()
            .all(|e| e.id >= 3));

        // And from the scan path.
        let re = Regex::new("number (1|2)$").unwrap();
        assert!(store.search(&Matcher::Pattern(re)).is_empty());
    }

    #[test]
    fn test_ids_keep_increasing_after_trim() {
        let mut store = store_with(&["a line", "b line"]);
        store.trim(3);
        let entry = store.append("c line".to_string());
        assert_eq!(entry.id, 3);
    }
}
