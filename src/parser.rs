use std::mem;

use crate::{
    ast::{BinOp, Expr, Identifier, NumberLiteral, PositionedToken, StringLiteral, Token, UnaryOp},
    lexer::{LexError, Lexer, Position},
};

/// Errors raised while building the expression tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("{pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        pos: Position,
    },
}

/// Recursive-descent parser for query expressions.
///
/// Precedence, loosest first: `OR`, `AND`, `NOT`, comparison, primary.
/// The parser checks syntax only; `name AND "x"` parses fine and is left for
/// validation to reject.
pub struct Parser {
    lexer: Lexer,
    current_token: PositionedToken,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_positioned()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    /// Moves to the next token, returning the one just consumed.
    fn advance(&mut self) -> Result<PositionedToken, ParseError> {
        let next = self.lexer.next_positioned()?;
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token.token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current_token.token.clone(),
            pos: self.current_token.pos,
        }
    }

    fn expect(&mut self, expected: Token, description: &'static str) -> Result<PositionedToken, ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(description));
        }
        self.advance()
    }

    /// Parse primary expressions: identifiers, literals, parenthesized groups
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match &self.current_token.token {
            Token::Identifier(_) => {
                let token = self.advance()?;
                Ok(Expr::Identifier(Identifier { token }))
            }
            Token::String(value) => {
                let value = value.clone();
                let token = self.advance()?;
                Ok(Expr::String(StringLiteral { value, token }))
            }
            Token::Number(value) => {
                let value = *value;
                let token = self.advance()?;
                Ok(Expr::Number(NumberLiteral { value, token }))
            }
            Token::LParen => {
                let open = self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(Expr::Paren {
                    inner: Box::new(inner),
                    pos: open.pos,
                })
            }
            _ => Err(self.unexpected("a field, literal or `(`")),
        }
    }

    fn comparison_op(&self) -> Option<BinOp> {
        match self.current_token.token {
            Token::Eq => Some(BinOp::Equal),
            Token::NotEq => Some(BinOp::NotEqual),
            Token::Lt => Some(BinOp::LessThan),
            Token::Gt => Some(BinOp::GreaterThan),
            Token::LtEq => Some(BinOp::LessEqual),
            Token::GtEq => Some(BinOp::GreaterEqual),
            Token::Glob => Some(BinOp::Glob),
            Token::Regexp => Some(BinOp::Regexp),
            _ => None,
        }
    }

    // Non-associative: `a = b = c` leaves a dangling `=` for the caller to reject
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_primary()?;

        let Some(op) = self.comparison_op() else {
            return Ok(left);
        };

        self.advance()?;
        let right = self.parse_primary()?;

        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if !self.check(&Token::Not) {
            return self.parse_comparison();
        }

        let token = self.advance()?;
        let operand = self.parse_not()?;

        Ok(Expr::Unary {
            op: UnaryOp::Not,
            token,
            operand: Box::new(operand),
        })
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;

        while self.check(&Token::And) {
            self.advance()?;
            let right = self.parse_not()?;

            left = Expr::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::Or) {
            self.advance()?;
            let right = self.parse_and()?;

            left = Expr::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse a complete query; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof, "end of input")?;
        Ok(expr)
    }
}
