use std::collections::BTreeSet;

/// Structured content query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentQuery {
    /// Search text, or the pattern when `use_regex` is set
    pub text: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
    /// Scan cached documents with `text` as a regex instead of using the token index
    pub use_regex: bool,
    /// When non-empty, only documents in one of these packages match
    pub include_packages: BTreeSet<String>,
    /// Documents in these packages never match, even if also included
    pub exclude_packages: BTreeSet<String>,
    /// Keep at most this many results, in path order
    pub max_results: Option<usize>,
}

impl ContentQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Regex query over document content
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::new(pattern).use_regex(true)
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    pub fn use_regex(mut self, yes: bool) -> Self {
        self.use_regex = yes;
        self
    }

    pub fn include_package(mut self, package: impl Into<String>) -> Self {
        self.include_packages.insert(package.into());
        self
    }

    pub fn exclude_package(mut self, package: impl Into<String>) -> Self {
        self.exclude_packages.insert(package.into());
        self
    }

    pub fn max_results(mut self, limit: usize) -> Self {
        self.max_results = Some(limit);
        self
    }

    /// True when the query has no text to search for.
    ///
    /// Whitespace is meaningful in a regex, so only an empty pattern counts.
    pub fn is_empty(&self) -> bool {
        if self.use_regex {
            self.text.is_empty()
        } else {
            self.text.trim().is_empty()
        }
    }

    /// Check if any package filter is set
    pub fn has_package_filters(&self) -> bool {
        !self.include_packages.is_empty() || !self.exclude_packages.is_empty()
    }
}

/// Parse a one-line query string into a [`ContentQuery`].
///
/// Supported syntax:
/// - `foo bar`, `"foo bar"`: search text (all terms must match)
/// - `pkg:com.x`, `-pkg:com.x`: include / exclude a package
/// - `re:/pattern/`: regex search
/// - `case:yes`, `word:yes`: case-sensitive / whole-word matching
/// - `top:N`: result limit, `top:0` for unlimited
///
/// Never fails; anything unrecognized becomes search text. A regex replaces
/// the search text entirely: in `re:/x/ foo` the term `foo` is dropped, and
/// with several `re:/../` items the last one wins.
pub fn parse_query(input: &str) -> ContentQuery {
    let mut parser = QueryParser::new(input);
    parser.parse()
}

/// Query parser
struct QueryParser<'a> {
    input: &'a str,
    pos: usize,
    terms: Vec<String>,
    query: ContentQuery,
}

impl<'a> QueryParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            terms: Vec::new(),
            query: ContentQuery::default(),
        }
    }

    fn parse(&mut self) -> ContentQuery {
        loop {
            self.skip_whitespace();
            if self.is_eof() {
                break;
            }
            self.parse_item();
        }

        let mut query = std::mem::take(&mut self.query);
        if !query.use_regex {
            query.text = self.terms.join(" ");
        }
        query
    }

    fn parse_item(&mut self) {
        if self.peek_char() == Some('"') {
            let phrase = self.parse_phrase();
            if !phrase.is_empty() {
                self.terms.push(phrase);
            }
            return;
        }

        if self.remaining().starts_with("re:/") {
            self.parse_regex();
            return;
        }

        if self.remaining().starts_with("-pkg:") {
            self.pos += "-pkg:".len();
            let value = self.read_value();
            if !value.is_empty() {
                self.query.exclude_packages.insert(value);
            }
            return;
        }

        self.parse_term();
    }

    fn parse_phrase(&mut self) -> String {
        self.consume_char('"');
        let start = self.pos;

        while !self.is_eof() && self.peek_char() != Some('"') {
            self.advance();
        }

        let phrase = self.input[start..self.pos].to_string();
        self.consume_char('"');
        phrase
    }

    fn parse_regex(&mut self) {
        // Skip "re:/"
        self.pos += 4;
        let start = self.pos;

        // Find closing /, allowing \/ inside the pattern
        let mut escaped = false;
        while let Some(ch) = self.peek_char() {
            if ch == '/' && !escaped {
                break;
            }
            escaped = ch == '\\' && !escaped;
            self.advance();
        }

        let pattern = self.input[start..self.pos].replace("\\/", "/");
        self.consume_char('/');

        self.query.text = pattern;
        self.query.use_regex = true;
    }

    fn parse_term(&mut self) {
        let start = self.pos;
        let word = self.read_value();

        if let Some((field, value)) = word.split_once(':') {
            if self.apply_field(field, value) {
                return;
            }
        }

        if word.is_empty() {
            // Lone quote or similar; step over it
            self.pos = start;
            self.advance();
            return;
        }
        self.terms.push(word);
    }

    /// Apply a `field:value` item, returning false for unknown fields
    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field.to_lowercase().as_str() {
            "pkg" | "package" => {
                if !value.is_empty() {
                    self.query.include_packages.insert(value.to_string());
                }
                true
            }
            "case" => {
                self.query.case_sensitive = parse_flag(value);
                true
            }
            "word" => {
                self.query.whole_word = parse_flag(value);
                true
            }
            "top" => {
                if let Ok(n) = value.parse::<usize>() {
                    self.query.max_results = if n == 0 { None } else { Some(n) };
                }
                true
            }
            _ => false,
        }
    }

    /// Read until whitespace or a quote
    fn read_value(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == '"' {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "yes" | "y" | "true" | "on" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_terms() {
        let q = parse_query("foo bar");
        assert_eq!(q.text, "foo bar");
        assert!(!q.use_regex);
        assert!(!q.has_package_filters());
    }

    #[test]
    fn test_phrase() {
        let q = parse_query("\"the cat\" word:yes");
        assert_eq!(q.text, "the cat");
        assert!(q.whole_word);
    }

    #[test]
    fn test_package_filters() {
        let q = parse_query("Logger pkg:com.x -pkg:com.y");
        assert_eq!(q.text, "Logger");
        assert!(q.include_packages.contains("com.x"));
        assert!(q.exclude_packages.contains("com.y"));
    }

    #[test]
    fn test_regex() {
        let q = parse_query(r"re:/get\w+\(/ case:yes");
        assert!(q.use_regex);
        assert!(q.case_sensitive);
        assert_eq!(q.text, r"get\w+\(");
    }

    #[test]
    fn test_regex_drops_bare_terms() {
        let q = parse_query("foo re:/x+/ bar");
        assert!(q.use_regex);
        assert_eq!(q.text, "x+");

        let q = parse_query("re:/first/ re:/second/");
        assert_eq!(q.text, "second");
    }

    #[test]
    fn test_whitespace_regex_is_not_empty() {
        assert!(!ContentQuery::regex(" ").is_empty());
        assert!(ContentQuery::regex("").is_empty());
        assert!(ContentQuery::new(" ").is_empty());
    }

    #[test]
    fn test_regex_escaped_slash() {
        let q = parse_query(r"re:/a\/b/");
        assert_eq!(q.text, "a/b");
    }

    #[test]
    fn test_top_limit() {
        assert_eq!(parse_query("top:5 foo").max_results, Some(5));
        assert_eq!(parse_query("top:0 foo").max_results, None);
        assert_eq!(parse_query("top:abc foo").max_results, None);
    }

    #[test]
    fn test_unknown_field_is_literal() {
        let q = parse_query("http://example foo");
        assert_eq!(q.text, "http://example foo");
    }

    #[test]
    fn test_empty_query() {
        let q = parse_query("   ");
        assert!(q.is_empty());
        let q = parse_query("pkg:com.x");
        assert!(q.is_empty());
    }

    #[test]
    fn test_unterminated_quote() {
        let q = parse_query("\"open phrase");
        assert_eq!(q.text, "open phrase");
    }

    #[test]
    fn test_builder() {
        let q = ContentQuery::new("Logger")
            .case_sensitive(true)
            .include_package("com.x")
            .exclude_package("com.y")
            .max_results(3);
        assert!(q.case_sensitive);
        assert!(q.has_package_filters());
        assert_eq!(q.max_results, Some(3));
        assert!(ContentQuery::regex("a+").use_regex);
    }
}
