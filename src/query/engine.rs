use tracing::debug;

use crate::query::matcher::Matcher;
use crate::query::regex_cache::get_or_compile_regex;
use crate::store::{EntryStore, LogEntry};

/// Outcome of interpreting a raw query string. When `valid` is false the
/// matcher is the most recent one that did compile, so an in-progress edit
/// never blanks the view.
pub struct CompileResult {
    pub matcher: Matcher,
    pub valid: bool,
}

pub struct EvalResult<'a> {
    pub entries: Vec<&'a LogEntry>,
    pub valid: bool,
}

/// Compiles operator-typed queries and runs them against the store, keeping
/// the last successfully compiled matcher as explicit fallback state.
pub struct QueryEngine {
    last_good: Matcher,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    pub fn new() -> Self {
        Self {
            last_good: Matcher::Empty,
        }
    }

    /// Interprets `raw` as a matcher. A raw string without regex
    /// metacharacters becomes a `Literal`; anything else compiles as a
    /// regex. On a malformed pattern `last_good` is left untouched and
    /// returned with `valid = false`.
    pub fn compile(&mut self, raw: &str) -> CompileResult {
        if raw.is_empty() {
            self.last_good = Matcher::Empty;
            return CompileResult {
                matcher: Matcher::Empty,
                valid: true,
            };
        }

        if Matcher::is_plain_literal(raw) {
            self.last_good = Matcher::Literal(raw.to_string());
            return CompileResult {
                matcher: self.last_good.clone(),
                valid: true,
            };
        }

        match get_or_compile_regex(raw) {
            Ok(re) => {
                self.last_good = Matcher::Pattern(re);
                CompileResult {
                    matcher: self.last_good.clone(),
                    valid: true,
                }
            }
            Err(e) => {
                debug!("query does not compile yet: {e}");
                CompileResult {
                    matcher: self.last_good.clone(),
                    valid: false,
                }
            }
        }
    }

    /// Evaluates `raw` against the store. An empty raw string is the
    /// identity filter, never "zero entries". `valid` reports whether the
    /// current raw string specifically compiled, even when the results come
    /// from the last-good matcher.
    pub fn evaluate<'a>(&mut self, raw: &str, store: &'a EntryStore) -> EvalResult<'a> {
        if raw.is_empty() {
            self.last_good = Matcher::Empty;
            return EvalResult {
                entries: store.all().iter().collect(),
                valid: true,
            };
        }

        let compiled = self.compile(raw);
        EvalResult {
            entries: store.search(&compiled.matcher),
            valid: compiled.valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> EntryStore {
        let mut store = EntryStore::new();
        for line in ["apple pie", "banana split", "apple tart"] {
            store.append(line.to_string());
        }
        store
    }

    fn texts<'a>(result: &EvalResult<'a>) -> Vec<&'a str> {
        result.entries.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let store = corpus();
        let mut engine = QueryEngine::new();
        let result = engine.evaluate("", &store);
        assert!(result.valid);
        assert_eq!(texts(&result), vec!["apple pie", "banana split", "apple tart"]);
    }

    #[test]
    fn test_literal_query() {
        let store = corpus();
        let mut engine = QueryEngine::new();
        let result = engine.evaluate("apple", &store);
        assert!(result.valid);
        assert_eq!(texts(&result), vec!["apple pie", "apple tart"]);
    }

    #[test]
    fn test_pattern_query() {
        let store = corpus();
        let mut engine = QueryEngine::new();
        let result = engine.evaluate("^banana", &store);
        assert!(result.valid);
        assert_eq!(texts(&result), vec!["banana split"]);
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_last_good() {
        let store = corpus();
        let mut engine = QueryEngine::new();

        let good = engine.evaluate("apple", &store);
        assert!(good.valid);

        // An unmatched bracket mid-type keeps serving the apple filter.
        let bad = engine.evaluate("[", &store);
        assert!(!bad.valid);
        assert_eq!(texts(&bad), vec!["apple pie", "apple tart"]);
    }

    #[test]
    fn test_invalid_pattern_does_not_mutate_last_good() {
        let store = corpus();
        let mut engine = QueryEngine::new();

        engine.evaluate("apple", &store);
        engine.evaluate("[", &store);
        engine.evaluate("[a", &store);

        // Still the apple filter after repeated failures.
        let result = engine.evaluate("[a-", &store);
        assert!(!result.valid);
        assert_eq!(texts(&result), vec!["apple pie", "apple tart"]);
    }

    #[test]
    fn test_recovery_once_pattern_becomes_valid() {
        let store = corpus();
        let mut engine = QueryEngine::new();

        engine.evaluate("apple", &store);
        engine.evaluate("[", &store);

        let recovered = engine.evaluate("[bs]plit|banana", &store);
        assert!(recovered.valid);
        assert_eq!(texts(&recovered), vec!["banana split"]);
    }

    #[test]
    fn test_initial_fallback_accepts_everything() {
        let store = corpus();
        let mut engine = QueryEngine::new();

        // First keystroke is already broken; last_good starts as match-all.
        let result = engine.evaluate("[", &store);
        assert!(!result.valid);
        assert_eq!(result.entries.len(), 3);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let store = corpus();
        let mut engine = QueryEngine::new();

        let first = texts(&engine.evaluate("apple", &store));
        let second = texts(&engine.evaluate("apple", &store));
        assert_eq!(first, second);
    }

    #[test]
    fn test_ids_strictly_increase_in_results() {
        let store = corpus();
        let mut engine = QueryEngine::new();
        let result = engine.evaluate("apple", &store);
        let ids: Vec<u64> = result.entries.iter().map(|e| e.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
