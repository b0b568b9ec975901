use std::fmt;

/// The specific kind of lexical error.
///
/// Errors are attached to the error token rather than aborting the scan,
/// so the caller can keep pulling tokens past a bad lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    /// A single character that begins no lexeme, e.g. `$` or a lone `=`.
    UnknownSymbol(char),
    /// A multi-character prefix that matches no pattern, e.g. `<--` or `23.`.
    UnknownPattern(String),
    /// A variable identifier longer than 20 characters.
    VariableIdTooLong,
    /// A function identifier longer than 30 characters.
    FunctionIdTooLong,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSymbol(c) => write!(f, "Unknown symbol <{c}>"),
            Self::UnknownPattern(p) => write!(f, "Unknown pattern <{p}>"),
            Self::VariableIdTooLong => write!(
                f,
                "Variable identifier is longer than the prescribed length of 20 characters"
            ),
            Self::FunctionIdTooLong => write!(
                f,
                "Function identifier is longer than the prescribed length of 30 characters"
            ),
        }
    }
}
