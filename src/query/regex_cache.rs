use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

static REGEX_CACHE: OnceLock<Mutex<LruCache<String, Regex>>> = OnceLock::new();

fn get_cache() -> &'static Mutex<LruCache<String, Regex>> {
    REGEX_CACHE.get_or_init(|| {
        let capacity =
            NonZeroUsize::new(128).expect("128 is a valid non-zero capacity for regex cache");
        Mutex::new(LruCache::new(capacity))
    })
}

/// Compiles `pattern`, reusing a previous compilation when the same raw
/// string comes around again. Live per-keystroke filtering recompiles the
/// same prefixes constantly, so misses are the exception here.
pub fn get_or_compile_regex(pattern: &str) -> Result<Regex, regex::Error> {
    if let Ok(mut cache) = get_cache().try_lock()
        && let Some(regex) = cache.get(pattern)
    {
        return Ok(regex.clone());
    }

    let regex = Regex::new(pattern)?;

    if let Ok(mut cache) = get_cache().try_lock() {
        cache.put(pattern.to_string(), regex.clone());
    }

    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_cache_roundtrip() {
        let regex1 = get_or_compile_regex("tail.*").unwrap();
        assert!(regex1.is_match("tailing"));

        // Second call serves the cached compilation.
        let regex2 = get_or_compile_regex("tail.*").unwrap();
        assert_eq!(regex1.as_str(), regex2.as_str());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(get_or_compile_regex("[").is_err());
    }
}
