//! Glob patterns.
//!
//! Patterns match whole strings, with no notion of path separators:
//!
//! | Syntax       | Matches                                  |
//! |--------------|------------------------------------------|
//! | `*`, `**`    | any sequence of characters, even empty   |
//! | `?`          | any single character                     |
//! | `[abc]`      | one of the listed characters             |
//! | `[a-z]`      | one character in the range               |
//! | `[!abc]`     | one character not listed                 |
//! | `{foo,bar}`  | either alternative; alternatives nest    |
//! | `\x`         | the character `x` literally              |
//!
//! A pattern is translated into an anchored [`Regex`] once, at compile time.
//!
//! ```
//! use recsel::GlobPattern;
//!
//! let pattern = GlobPattern::new("src/**.{rs,toml}").unwrap();
//! assert!(pattern.matches("src/ast/tokens.rs"));
//! assert!(pattern.matches("src/Cargo.toml"));
//! assert!(!pattern.matches("tests/lexer_tests.rs"));
//! ```

use std::fmt;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlobError {
    #[error("unterminated character class starting at offset {0}")]
    UnterminatedClass(usize),

    #[error("empty character class at offset {0}")]
    EmptyClass(usize),

    #[error("unterminated alternation starting at offset {0}")]
    UnterminatedAlternation(usize),

    #[error("pattern ends with an unfinished escape")]
    TrailingEscape,

    #[error("pattern could not be compiled: {0}")]
    Regex(String),
}

#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(source: &str) -> Result<Self, GlobError> {
        let translated = Translator::new(source).translate()?;
        let regex = Regex::new(&translated).map_err(|e| GlobError::Regex(e.to_string()))?;

        Ok(GlobPattern {
            source: source.to_string(),
            regex,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Translator {
    input: Vec<char>,
    position: usize,
    output: String,
    /// Offsets of the `{` of each open alternation
    open_alternations: Vec<usize>,
}

impl Translator {
    fn new(source: &str) -> Self {
        Translator {
            input: source.chars().collect(),
            position: 0,
            output: String::from("(?s)^(?:"),
            open_alternations: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current_char();
        self.position += 1;
        ch
    }

    fn push_literal(&mut self, ch: char) {
        let mut buf = [0; 4];
        self.output.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
    }

    fn translate(mut self) -> Result<String, GlobError> {
        while let Some(ch) = self.advance() {
            match ch {
                '*' => {
                    while self.current_char() == Some('*') {
                        self.advance();
                    }
                    self.output.push_str(".*");
                }
                '?' => self.output.push('.'),
                '[' => self.read_class()?,
                '{' => {
                    self.open_alternations.push(self.position - 1);
                    self.output.push_str("(?:");
                }
                '}' if !self.open_alternations.is_empty() => {
                    self.open_alternations.pop();
                    self.output.push(')');
                }
                ',' if !self.open_alternations.is_empty() => self.output.push('|'),
                '\\' => {
                    let escaped = self.advance().ok_or(GlobError::TrailingEscape)?;
                    self.push_literal(escaped);
                }
                _ => self.push_literal(ch),
            }
        }

        if let Some(&start) = self.open_alternations.first() {
            return Err(GlobError::UnterminatedAlternation(start));
        }

        self.output.push_str(")$");
        Ok(self.output)
    }

    /// Reads a class body after its `[`, up to and including the closing `]`.
    fn read_class(&mut self) -> Result<(), GlobError> {
        let start = self.position - 1;
        let negated = self.current_char() == Some('!');
        if negated {
            self.advance();
        }

        let mut body = String::new();
        loop {
            match self.advance() {
                None => return Err(GlobError::UnterminatedClass(start)),
                Some(']') => break,
                Some('-') => body.push('-'),
                Some(ch) => {
                    if matches!(ch, '\\' | '[' | ']' | '^' | '&' | '~') {
                        body.push('\\');
                    }
                    body.push(ch);
                }
            }
        }

        if body.is_empty() {
            return Err(GlobError::EmptyClass(start));
        }

        self.output.push('[');
        if negated {
            self.output.push('^');
        }
        self.output.push_str(&body);
        self.output.push(']');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(source: &str) -> GlobPattern {
        GlobPattern::new(source).unwrap()
    }

    #[test]
    fn test_star_and_question_mark() {
        let pattern = glob("a*.txt");
        assert!(pattern.matches("a.txt"));
        assert!(pattern.matches("abc.txt"));
        assert!(!pattern.matches("b.txt"));
        assert!(!pattern.matches("a.txt.bak"));

        let pattern = glob("v?.?");
        assert!(pattern.matches("v1.2"));
        assert!(!pattern.matches("v10.2"));
    }

    #[test]
    fn test_double_star_inside_component() {
        let pattern = glob("src**.rs");
        assert!(pattern.matches("src.rs"));
        assert!(pattern.matches("src/ast/literals.rs"));
        assert!(!pattern.matches("tests/lexer_tests.rs"));
    }

    #[test]
    fn test_star_crosses_separators() {
        assert!(glob("a*z").matches("a/b/c\nz"));
    }

    #[test]
    fn test_character_classes() {
        let pattern = glob("[abc]x");
        assert!(pattern.matches("bx"));
        assert!(!pattern.matches("dx"));

        let pattern = glob("[a-c]x");
        assert!(pattern.matches("cx"));
        assert!(!pattern.matches("-x"));

        let pattern = glob("[!a-c]x");
        assert!(pattern.matches("dx"));
        assert!(!pattern.matches("ax"));

        // Regex class metacharacters are taken literally
        assert!(glob("[^]").matches("^"));
    }

    #[test]
    fn test_alternation() {
        let pattern = glob("*.{rs,toml}");
        assert!(pattern.matches("lib.rs"));
        assert!(pattern.matches("Cargo.toml"));
        assert!(!pattern.matches("README.md"));

        let pattern = glob("{feat,fix{,es}}: *");
        assert!(pattern.matches("feat: parser"));
        assert!(pattern.matches("fix: lexer"));
        assert!(pattern.matches("fixes: lexer"));
        assert!(!pattern.matches("chore: deps"));
    }

    #[test]
    fn test_braces_and_commas_outside_alternation_are_literal() {
        assert!(glob("a,b").matches("a,b"));
        assert!(glob("a}").matches("a}"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = glob("1.0 (rc)+$");
        assert!(pattern.matches("1.0 (rc)+$"));
        assert!(!pattern.matches("1x0 (rc)+$"));
    }

    #[test]
    fn test_escapes() {
        let pattern = glob(r"what\?");
        assert!(pattern.matches("what?"));
        assert!(!pattern.matches("whats"));
        assert!(glob(r"\{a,b\}").matches("{a,b}"));
    }

    #[test]
    fn test_malformed_patterns() {
        assert_eq!(
            GlobPattern::new("[abc").unwrap_err(),
            GlobError::UnterminatedClass(0)
        );
        assert_eq!(GlobPattern::new("x[]").unwrap_err(), GlobError::EmptyClass(1));
        assert_eq!(
            GlobPattern::new("a{b,c").unwrap_err(),
            GlobError::UnterminatedAlternation(1)
        );
        assert_eq!(GlobPattern::new("a\\").unwrap_err(), GlobError::TrailingEscape);
        assert!(matches!(
            GlobPattern::new("[z-a]").unwrap_err(),
            GlobError::Regex(_)
        ));
    }

    #[test]
    fn test_source_is_preserved() {
        let pattern = glob("src/**/{a,b}.rs");
        assert_eq!(pattern.as_str(), "src/**/{a,b}.rs");
        assert_eq!(pattern.to_string(), "src/**/{a,b}.rs");
        assert_eq!(pattern, glob("src/**/{a,b}.rs"));
    }
}
