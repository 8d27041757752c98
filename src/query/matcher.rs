use regex::Regex;

/// Executable predicate over entry text.
///
/// `Literal` is served by the store's trigram index; `Pattern` always goes
/// through the full-scan path. `Empty` accepts everything and is the
/// distinguished "no filter" case.
#[derive(Clone, Debug)]
pub enum Matcher {
    Empty,
    Literal(String),
    Pattern(Regex),
}

/// Characters that give a query regex meaning. A raw string containing none
/// of these is a plain substring and can use the index.
const REGEX_METACHARACTERS: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$',
];

impl Matcher {
    pub fn is_plain_literal(raw: &str) -> bool {
        !raw.contains(REGEX_METACHARACTERS)
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Empty => true,
            Matcher::Literal(needle) => text.contains(needle.as_str()),
            Matcher::Pattern(re) => re.is_match(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_classification() {
        assert!(Matcher::is_plain_literal("apple"));
        assert!(Matcher::is_plain_literal("ERROR timeout"));
        assert!(!Matcher::is_plain_literal("app.*le"));
        assert!(!Matcher::is_plain_literal("^ERROR"));
        assert!(!Matcher::is_plain_literal("["));
    }

    #[test]
    fn test_matches() {
        assert!(Matcher::Empty.matches("anything"));
        assert!(Matcher::Literal("app".to_string()).matches("apple"));
        assert!(!Matcher::Literal("app".to_string()).matches("orange"));
        let re = Regex::new("^a+$").unwrap();
        assert!(Matcher::Pattern(re).matches("aaa"));
    }
}
