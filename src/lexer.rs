use std::fmt;

use rust_decimal::Decimal;

use crate::ast::{PositionedToken, Token};

/// A 1-based line/column location in the query source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Position { line, col }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, col: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Errors raised while scanning a query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("{pos}: unexpected character '{ch}'")]
    UnexpectedChar { ch: char, pos: Position },

    #[error("{pos}: unterminated string: missing closing quote")]
    UnterminatedString { pos: Position },

    #[error("{pos}: invalid escape sequence: \\{ch}")]
    InvalidEscape { ch: char, pos: Position },

    #[error("{pos}: invalid number: {text}")]
    InvalidNumber { text: String, pos: Position },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            col: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn pos(&self) -> Position {
        Position::new(self.line, self.col)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Source text between `start` and the current cursor.
    fn text_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, start: Position) -> Result<String, LexError> {
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_pos = self.pos();
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some(ch) => return Err(LexError::InvalidEscape { ch, pos: escape_pos }),
                        None => return Err(LexError::UnterminatedString { pos: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { pos: start })
    }

    fn read_number(&mut self, start: Position) -> Result<Decimal, LexError> {
        let mut number = String::new();
        let mut is_fraction = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_fraction
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_fraction = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        number
            .parse::<Decimal>()
            .map_err(|_| LexError::InvalidNumber { text: number, pos: start })
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Consumes `second` if it follows the current character.
    fn pair(&mut self, second: char, matched: Token, single: Token) -> Token {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            matched
        } else {
            self.advance();
            single
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.next_positioned().map(|positioned| positioned.token)
    }

    /// Scans the next token together with its raw source text and start position.
    pub fn next_positioned(&mut self) -> Result<PositionedToken, LexError> {
        self.skip_whitespace();

        let start = self.position;
        let pos = self.pos();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('=') => self.single(Token::Eq),
            Some('!') => self.pair('=', Token::NotEq, Token::Not),
            Some('<') => self.pair('=', Token::LtEq, Token::Lt),
            Some('>') => self.pair('=', Token::GtEq, Token::Gt),
            Some('"') => Token::String(self.read_string(pos)?),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.to_ascii_uppercase().as_str() {
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    "NOT" => Token::Not,
                    "GLOB" => Token::Glob,
                    "REGEXP" => Token::Regexp,
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => Token::Number(self.read_number(pos)?),
            Some(ch) => return Err(LexError::UnexpectedChar { ch, pos }),
        };

        Ok(PositionedToken {
            token,
            value: self.text_from(start),
            pos,
        })
    }

    /// Scans the whole input, ending with an `Eof` token.
    pub fn tokenize(&mut self) -> Result<Vec<PositionedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_positioned()?;
            let done = token.token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and OR Not glob REGEXP");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::Glob);
    assert_eq!(lexer.next_token().unwrap(), Token::Regexp);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_positions_across_lines() {
    let mut lexer = Lexer::new("name = \"x\"\n  AND size > 10");
    let name = lexer.next_positioned().unwrap();
    assert_eq!(name.pos, Position::new(1, 1));
    let _ = lexer.next_positioned().unwrap();
    let literal = lexer.next_positioned().unwrap();
    assert_eq!(literal.pos, Position::new(1, 8));
    assert_eq!(literal.value, "\"x\"");
    let and = lexer.next_positioned().unwrap();
    assert_eq!(and.pos, Position::new(2, 3));
}
