use std::fmt;

use quill_common::error::LexErrorKind;
use quill_common::token::TokenKind;

use crate::grammar::NonTerminal;

/// The specific kind of error recorded during a parse run.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// A lexical error surfaced while pulling the next meaningful token.
    Lexical(LexErrorKind),
    /// The stack top is a terminal and the current token is not it.
    TokenMismatch {
        found: TokenKind,
        lexeme: String,
        expected: TokenKind,
    },
    /// The stack top is a non-terminal with no table entry for the token.
    InvalidToken {
        found: TokenKind,
        lexeme: String,
        top: NonTerminal,
    },
    /// Input continued past the point where the stack emptied.
    TrailingInput { found: TokenKind },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical(e) => write!(f, "{e}"),
            Self::TokenMismatch {
                found,
                lexeme,
                expected,
            } => write!(
                f,
                "The token {found} for lexeme {lexeme}  does not match with the expected token {expected}"
            ),
            Self::InvalidToken { found, lexeme, top } => write!(
                f,
                "Invalid token {found} encountered with value {lexeme} stack top {top}"
            ),
            Self::TrailingInput { found } => {
                write!(f, "Unexpected token {found} encountered at end")
            }
        }
    }
}

/// One recorded error, at most one per source line per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: u32,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}\tError: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}
