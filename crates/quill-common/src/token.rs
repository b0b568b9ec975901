use std::fmt;

use crate::error::LexErrorKind;

/// Longest lexeme the front-end will keep. Longer matches are truncated
/// when extracted from the character buffer.
pub const MAX_LEXEME_LEN: usize = 256;

/// Every kind of token in the Quill language.
///
/// This enum is the complete vocabulary for the scanner. The declaration
/// order is fixed: the parse table and the grammar index terminals by
/// `kind as usize`, so variants must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<---`
    Assignop,
    /// `%` to end of line. Listed by the token lister, filtered by the parser.
    Comment,
    /// Lowercase run that is not a keyword, e.g. `xcoord`.
    FieldId,
    /// Variable identifier: `[b-d][2-7][b-d]*[2-7]*`, length 2..=20.
    Id,
    /// Integer literal.
    Num,
    /// Real literal: `dd.dd` with optional `E[+-]dd` exponent.
    Rnum,
    /// Function identifier: `_` then letters then digits, length <= 30.
    FunId,
    /// Record/union identifier: `#` then lowercase letters.
    Ruid,

    // ── Keywords (27) ──────────────────────────────────────────────────
    With,
    Parameters,
    End,
    While,
    Union,
    Endunion,
    Definetype,
    As,
    Type,
    /// The literal lexeme `_main`.
    Main,
    Global,
    Parameter,
    List,

    // ── Brackets and punctuation ───────────────────────────────────────
    /// `[`
    Sql,
    /// `]`
    Sqr,
    Input,
    Output,
    Int,
    Real,
    /// `,`
    Comma,
    /// `;`
    Sem,
    /// `:`
    Colon,
    /// `.`
    Dot,
    Endwhile,
    /// `(`
    Op,
    /// `)`
    Cl,
    If,
    Then,
    Endif,
    Read,
    Write,
    Return,

    // ── Operators ──────────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    Call,
    Record,
    Endrecord,
    Else,
    /// `&&&`
    And,
    /// `@@@`
    Or,
    /// `~`
    Not,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `!=`
    Ne,

    // ── Special (3) ────────────────────────────────────────────────────
    /// End of input.
    Eof,
    /// Lexical error. Carries a [`LexErrorKind`] on the token.
    Error,
    /// The empty production marker. Only ever appears inside the grammar,
    /// never in the scanner's output.
    Epsilon,
}

impl TokenKind {
    /// Number of token kinds. Parse-table rows are this wide.
    pub const COUNT: usize = 60;

    /// All kinds in declaration order. `ALL[k as usize] == k`.
    pub const ALL: [TokenKind; Self::COUNT] = [
        TokenKind::Assignop,
        TokenKind::Comment,
        TokenKind::FieldId,
        TokenKind::Id,
        TokenKind::Num,
        TokenKind::Rnum,
        TokenKind::FunId,
        TokenKind::Ruid,
        TokenKind::With,
        TokenKind::Parameters,
        TokenKind::End,
        TokenKind::While,
        TokenKind::Union,
        TokenKind::Endunion,
        TokenKind::Definetype,
        TokenKind::As,
        TokenKind::Type,
        TokenKind::Main,
        TokenKind::Global,
        TokenKind::Parameter,
        TokenKind::List,
        TokenKind::Sql,
        TokenKind::Sqr,
        TokenKind::Input,
        TokenKind::Output,
        TokenKind::Int,
        TokenKind::Real,
        TokenKind::Comma,
        TokenKind::Sem,
        TokenKind::Colon,
        TokenKind::Dot,
        TokenKind::Endwhile,
        TokenKind::Op,
        TokenKind::Cl,
        TokenKind::If,
        TokenKind::Then,
        TokenKind::Endif,
        TokenKind::Read,
        TokenKind::Write,
        TokenKind::Return,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Mul,
        TokenKind::Div,
        TokenKind::Call,
        TokenKind::Record,
        TokenKind::Endrecord,
        TokenKind::Else,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Not,
        TokenKind::Lt,
        TokenKind::Le,
        TokenKind::Eq,
        TokenKind::Gt,
        TokenKind::Ge,
        TokenKind::Ne,
        TokenKind::Eof,
        TokenKind::Error,
        TokenKind::Epsilon,
    ];

    /// The token's official name in the language specification, as printed
    /// in the token listing, the parse-tree file and error messages.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Assignop => "TK_ASSIGNOP",
            TokenKind::Comment => "TK_COMMENT",
            TokenKind::FieldId => "TK_FIELDID",
            TokenKind::Id => "TK_ID",
            TokenKind::Num => "TK_NUM",
            TokenKind::Rnum => "TK_RNUM",
            TokenKind::FunId => "TK_FUNID",
            TokenKind::Ruid => "TK_RUID",
            TokenKind::With => "TK_WITH",
            TokenKind::Parameters => "TK_PARAMETERS",
            TokenKind::End => "TK_END",
            TokenKind::While => "TK_WHILE",
            TokenKind::Union => "TK_UNION",
            TokenKind::Endunion => "TK_ENDUNION",
            TokenKind::Definetype => "TK_DEFINETYPE",
            TokenKind::As => "TK_AS",
            TokenKind::Type => "TK_TYPE",
            TokenKind::Main => "TK_MAIN",
            TokenKind::Global => "TK_GLOBAL",
            TokenKind::Parameter => "TK_PARAMETER",
            TokenKind::List => "TK_LIST",
            TokenKind::Sql => "TK_SQL",
            TokenKind::Sqr => "TK_SQR",
            TokenKind::Input => "TK_INPUT",
            TokenKind::Output => "TK_OUTPUT",
            TokenKind::Int => "TK_INT",
            TokenKind::Real => "TK_REAL",
            TokenKind::Comma => "TK_COMMA",
            TokenKind::Sem => "TK_SEM",
            TokenKind::Colon => "TK_COLON",
            TokenKind::Dot => "TK_DOT",
            TokenKind::Endwhile => "TK_ENDWHILE",
            TokenKind::Op => "TK_OP",
            TokenKind::Cl => "TK_CL",
            TokenKind::If => "TK_IF",
            TokenKind::Then => "TK_THEN",
            TokenKind::Endif => "TK_ENDIF",
            TokenKind::Read => "TK_READ",
            TokenKind::Write => "TK_WRITE",
            TokenKind::Return => "TK_RETURN",
            TokenKind::Plus => "TK_PLUS",
            TokenKind::Minus => "TK_MINUS",
            TokenKind::Mul => "TK_MUL",
            TokenKind::Div => "TK_DIV",
            TokenKind::Call => "TK_CALL",
            TokenKind::Record => "TK_RECORD",
            TokenKind::Endrecord => "TK_ENDRECORD",
            TokenKind::Else => "TK_ELSE",
            TokenKind::And => "TK_AND",
            TokenKind::Or => "TK_OR",
            TokenKind::Not => "TK_NOT",
            TokenKind::Lt => "TK_LT",
            TokenKind::Le => "TK_LE",
            TokenKind::Eq => "TK_EQ",
            TokenKind::Gt => "TK_GT",
            TokenKind::Ge => "TK_GE",
            TokenKind::Ne => "TK_NE",
            TokenKind::Eof => "TK_EOF",
            TokenKind::Error => "TK_ERROR",
            TokenKind::Epsilon => "TK_EPSILON",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up a keyword from its string representation.
///
/// Returns `Some(TokenKind)` if the string is a Quill keyword, `None`
/// otherwise. The scanner calls this after consuming a maximal lowercase
/// run; a miss means the run is a field identifier.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "with" => Some(TokenKind::With),
        "parameters" => Some(TokenKind::Parameters),
        "end" => Some(TokenKind::End),
        "while" => Some(TokenKind::While),
        "union" => Some(TokenKind::Union),
        "endunion" => Some(TokenKind::Endunion),
        "definetype" => Some(TokenKind::Definetype),
        "as" => Some(TokenKind::As),
        "type" => Some(TokenKind::Type),
        "global" => Some(TokenKind::Global),
        "parameter" => Some(TokenKind::Parameter),
        "list" => Some(TokenKind::List),
        "input" => Some(TokenKind::Input),
        "output" => Some(TokenKind::Output),
        "int" => Some(TokenKind::Int),
        "real" => Some(TokenKind::Real),
        "endwhile" => Some(TokenKind::Endwhile),
        "if" => Some(TokenKind::If),
        "then" => Some(TokenKind::Then),
        "endif" => Some(TokenKind::Endif),
        "read" => Some(TokenKind::Read),
        "write" => Some(TokenKind::Write),
        "return" => Some(TokenKind::Return),
        "call" => Some(TokenKind::Call),
        "record" => Some(TokenKind::Record),
        "endrecord" => Some(TokenKind::Endrecord),
        "else" => Some(TokenKind::Else),
        _ => None,
    }
}

/// Attribute value attached to numeric literal tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenValue {
    Int(i64),
    Real(f64),
}

/// A token produced by the Quill scanner.
///
/// Tokens are by-value records: the lexeme text is owned, the line number
/// is the line of the lexeme's first character, and numeric literals carry
/// their parsed value. When `kind` is [`TokenKind::Error`], `error` holds
/// the lexical-error subtype.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub value: Option<TokenValue>,
    pub error: Option<LexErrorKind>,
}

impl Token {
    /// Create a plain token with no attribute value.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            value: None,
            error: None,
        }
    }

    /// Create a token carrying a numeric attribute value.
    pub fn with_value(kind: TokenKind, lexeme: impl Into<String>, line: u32, value: TokenValue) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            value: Some(value),
            error: None,
        }
    }

    /// Create an error token with its lexical-error subtype.
    pub fn error(lexeme: impl Into<String>, line: u32, error: LexErrorKind) -> Self {
        Self {
            kind: TokenKind::Error,
            lexeme: lexeme.into(),
            line,
            value: None,
            error: Some(error),
        }
    }

    /// Whether this token carries an attribute value.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_recognizes_all_keywords() {
        let keywords = [
            ("with", TokenKind::With),
            ("parameters", TokenKind::Parameters),
            ("end", TokenKind::End),
            ("while", TokenKind::While),
            ("union", TokenKind::Union),
            ("endunion", TokenKind::Endunion),
            ("definetype", TokenKind::Definetype),
            ("as", TokenKind::As),
            ("type", TokenKind::Type),
            ("global", TokenKind::Global),
            ("parameter", TokenKind::Parameter),
            ("list", TokenKind::List),
            ("input", TokenKind::Input),
            ("output", TokenKind::Output),
            ("int", TokenKind::Int),
            ("real", TokenKind::Real),
            ("endwhile", TokenKind::Endwhile),
            ("if", TokenKind::If),
            ("then", TokenKind::Then),
            ("endif", TokenKind::Endif),
            ("read", TokenKind::Read),
            ("write", TokenKind::Write),
            ("return", TokenKind::Return),
            ("call", TokenKind::Call),
            ("record", TokenKind::Record),
            ("endrecord", TokenKind::Endrecord),
            ("else", TokenKind::Else),
        ];

        for (s, expected) in &keywords {
            assert_eq!(
                keyword_from_str(s),
                Some(*expected),
                "keyword_from_str({s:?}) should return Some({expected:?})"
            );
        }
        assert_eq!(keywords.len(), 27, "must test all 27 keywords");
    }

    #[test]
    fn keyword_from_str_rejects_non_keywords() {
        assert_eq!(keyword_from_str("xcoord"), None);
        assert_eq!(keyword_from_str("ends"), None);
        assert_eq!(keyword_from_str(""), None);
        assert_eq!(keyword_from_str("END"), None); // case-sensitive
        assert_eq!(keyword_from_str("_main"), None); // handled by the funid path
    }

    #[test]
    fn all_table_is_in_declaration_order() {
        for (i, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i, "ALL[{i}] is out of order: {kind:?}");
        }
    }

    #[test]
    fn token_constructors() {
        let tok = Token::new(TokenKind::Sem, ";", 3);
        assert_eq!(tok.kind, TokenKind::Sem);
        assert_eq!(tok.lexeme, ";");
        assert_eq!(tok.line, 3);
        assert!(!tok.has_value());

        let num = Token::with_value(TokenKind::Num, "42", 1, TokenValue::Int(42));
        assert!(num.has_value());
        assert_eq!(num.value, Some(TokenValue::Int(42)));
    }

    #[test]
    fn kind_names_match_language_spec() {
        assert_eq!(TokenKind::Assignop.name(), "TK_ASSIGNOP");
        assert_eq!(TokenKind::Ruid.name(), "TK_RUID");
        assert_eq!(TokenKind::Sql.name(), "TK_SQL");
        assert_eq!(TokenKind::Eof.name(), "TK_EOF");
        assert_eq!(TokenKind::Ne.to_string(), "TK_NE");
    }
}
