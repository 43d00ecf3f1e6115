//! Tokenizer for the expression grammar.
//!
//! The whole token sequence is materialized upfront by [`tokenize`]; the
//! parser walks it with one token of lookahead and exact error columns.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Real;
use crate::error::{ExprError, Result};
use crate::value::Value;

/// Classifies the kind of token produced during lexical analysis.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// An integer literal.
    Integer,
    /// A floating-point literal.
    Float,
    /// A variable or function identifier.
    Name,
    /// An operator such as `+`, `-`, `*`, `/`, `//`, `**`.
    Operator,
    /// An opening parenthesis.
    Open,
    /// A closing parenthesis.
    Close,
    /// The argument separator `,`.
    Separator,
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::Name => "name",
            TokenKind::Operator => "operator",
            TokenKind::Open => "'('",
            TokenKind::Close => "')'",
            TokenKind::Separator => "','",
        };
        f.write_str(s)
    }
}

/// A token produced by the lexer.
///
/// Literal tokens carry their decoded value, name and operator tokens carry
/// their text. Tokens are immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Decoded payload of integer and float literals.
    pub value: Option<Value>,
    /// Spelling of name and operator tokens.
    pub text: Option<String>,
    /// 0-based source offset, for diagnostics.
    pub column: usize,
}

/// The lexer struct, which produces tokens from an input string.
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Peek at the current character.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advance the position by one character.
    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Skip whitespace.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Get the next token from the input, or `None` at the end.
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        // Number (integer or float, possibly scientific notation). A leading
        // '.' enters the scan as well so that ".5" is a float literal and "."
        // a lexical error rather than an unknown character.
        if c.is_ascii_digit() || c == '.' {
            return self.number(start).map(Some);
        }

        // Identifier (variable or function name)
        if c.is_ascii_alphabetic() {
            let mut end = self.pos;
            while let Some(nc) = self.input[end..].chars().next() {
                if nc.is_ascii_alphanumeric() {
                    end += nc.len_utf8();
                } else {
                    break;
                }
            }
            let ident = &self.input[self.pos..end];
            self.pos = end;
            return Ok(Some(Token {
                kind: TokenKind::Name,
                value: None,
                text: Some(String::from(ident)),
                column: start,
            }));
        }

        // Operators, with maximal munch: '**' before '*', '//' before '/'
        if matches!(c, '+' | '-' | '*' | '/') {
            self.advance();
            let text = if (c == '*' || c == '/') && self.peek() == Some(c) {
                self.advance();
                if c == '*' { "**" } else { "//" }
            } else {
                match c {
                    '+' => "+",
                    '-' => "-",
                    '*' => "*",
                    _ => "/",
                }
            };
            return Ok(Some(Token {
                kind: TokenKind::Operator,
                value: None,
                text: Some(String::from(text)),
                column: start,
            }));
        }

        // Punctuation
        let kind = match c {
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            ',' => TokenKind::Separator,
            _ => return Err(ExprError::Lex { column: start }),
        };
        self.advance();
        Ok(Some(Token {
            kind,
            value: None,
            text: None,
            column: start,
        }))
    }

    /// Scan a numeric literal.
    ///
    /// The character class is consumed greedily and the lexeme validated
    /// afterwards, so "." and ".e100" are accepted by the scan but rejected
    /// here with a lexical error instead of silently matching.
    fn number(&mut self, start: usize) -> Result<Token> {
        let mut saw_dot = false;
        let mut saw_exp = false;
        let mut mantissa_digits = false;
        let mut exp_digits = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                if saw_exp {
                    exp_digits = true;
                } else {
                    mantissa_digits = true;
                }
                self.advance();
            } else if c == '.' && !saw_dot && !saw_exp {
                saw_dot = true;
                self.advance();
            } else if (c == 'e' || c == 'E') && !saw_exp {
                saw_exp = true;
                self.advance();
                // Optional sign directly after the exponent marker
                if let Some(sign) = self.peek() {
                    if sign == '+' || sign == '-' {
                        self.advance();
                    }
                }
            } else {
                break;
            }
        }

        if !mantissa_digits || (saw_exp && !exp_digits) {
            return Err(ExprError::Lex { column: start });
        }

        let lexeme = &self.input[start..self.pos];
        if !saw_dot && !saw_exp {
            // All digit sequences are plain decimal, including leading zeros:
            // "0777" is 777, never octal. Out-of-range literals are a lexical
            // error, not a silent wrap.
            let value = lexeme
                .parse::<i64>()
                .map_err(|_| ExprError::Lex { column: start })?;
            return Ok(Token {
                kind: TokenKind::Integer,
                value: Some(Value::Int(value)),
                text: None,
                column: start,
            });
        }

        let value = lexeme
            .parse::<Real>()
            .map_err(|_| ExprError::Lex { column: start })?;
        Ok(Token {
            kind: TokenKind::Float,
            value: Some(Value::Float(value)),
            text: None,
            column: start,
        })
    }
}

/// Tokenize an input string into the full token sequence.
///
/// Fails with [`ExprError::Lex`] on the first unrecognized character or
/// malformed numeric literal.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
