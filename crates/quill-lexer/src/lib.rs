// Quill lexer -- twin-buffer DFA tokenizer for the Quill language.

mod twin_buffer;

use std::io::Read;

use quill_common::error::LexErrorKind;
use quill_common::token::{keyword_from_str, Token, TokenKind, TokenValue};

pub use twin_buffer::{TwinBuffer, HALF_SIZE};

/// The Quill lexer. Converts a byte stream into a stream of tokens.
///
/// Wraps a [`TwinBuffer`] for character access with O(1) retraction and
/// implements `Iterator<Item = Token>` so callers can consume tokens lazily
/// or collect them into a `Vec`. The final [`TokenKind::Eof`] token is
/// yielded exactly once.
///
/// Each call to [`next_token`] marks the lexeme start, records the starting
/// line, and runs a hand-written DFA over character classes. Whitespace and
/// nothing else is skipped silently; comments come back as tokens (the
/// parser filters them), and malformed input comes back as error tokens
/// carrying a [`LexErrorKind`].
///
/// [`next_token`]: Lexer::next_token
pub struct Lexer<R> {
    buffer: TwinBuffer<R>,
    emitted_eof: bool,
}

impl<R: Read> Lexer<R> {
    /// Create a new lexer over a reader.
    pub fn new(reader: R) -> Self {
        Self {
            buffer: TwinBuffer::new(reader),
            emitted_eof: false,
        }
    }

    /// Convenience: tokenize the entire input into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(reader: R) -> Vec<Token> {
        Lexer::new(reader).collect()
    }

    /// Scan and return the next token.
    ///
    /// Returns an `Eof` token at end of input, forever after.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.buffer.begin_lexeme();
            let line = self.buffer.line();

            let Some(c) = self.buffer.next() else {
                return Token::new(TokenKind::Eof, "EOF", line);
            };

            match c {
                b' ' | b'\t' | b'\n' | b'\r' => self.skip_whitespace(),

                b'%' => return self.lex_comment(line),
                b'0'..=b'9' => return self.lex_number(line),
                b'_' => return self.lex_function_id(line),
                b'#' => return self.lex_record_id(line),
                b'b' | b'c' | b'd' => return self.lex_bcd(line),
                b'a'..=b'z' => return self.lex_word(line),

                b'<' => return self.lex_less(line),
                b'>' => return self.lex_greater(line),
                b'=' => return self.lex_equals(line),
                b'!' => return self.lex_bang(line),
                b'&' => return self.lex_amp(line),
                b'@' => return self.lex_at(line),

                b'~' => return Token::new(TokenKind::Not, "~", line),
                b'+' => return Token::new(TokenKind::Plus, "+", line),
                b'-' => return Token::new(TokenKind::Minus, "-", line),
                b'*' => return Token::new(TokenKind::Mul, "*", line),
                b'/' => return Token::new(TokenKind::Div, "/", line),
                b',' => return Token::new(TokenKind::Comma, ",", line),
                b';' => return Token::new(TokenKind::Sem, ";", line),
                b':' => return Token::new(TokenKind::Colon, ":", line),
                b'.' => return Token::new(TokenKind::Dot, ".", line),
                b'(' => return Token::new(TokenKind::Op, "(", line),
                b')' => return Token::new(TokenKind::Cl, ")", line),
                b'[' => return Token::new(TokenKind::Sql, "[", line),
                b']' => return Token::new(TokenKind::Sqr, "]", line),

                _ => {
                    let c = c as char;
                    return Token::error(c.to_string(), line, LexErrorKind::UnknownSymbol(c));
                }
            }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Consume bytes while the predicate holds; return the first byte that
    /// broke it (`None` at end of input).
    fn eat_while(&mut self, pred: fn(u8) -> bool) -> Option<u8> {
        loop {
            match self.buffer.next() {
                Some(c) if pred(c) => continue,
                other => return other,
            }
        }
    }

    /// Put back the byte that terminated a lexeme. End of input never
    /// advances the forward pointer, so there is nothing to retract then.
    fn give_back(&mut self, stop: Option<u8>) {
        if stop.is_some() {
            self.buffer.retract(1);
        }
    }

    /// Skip a whitespace run. The first whitespace byte is already consumed.
    fn skip_whitespace(&mut self) {
        let stop = self.eat_while(is_ws);
        self.give_back(stop);
    }

    /// Finish a maximal lowercase run: keyword or field identifier.
    fn word_token(&mut self, line: u32) -> Token {
        let lexeme = self.buffer.lexeme();
        let kind = keyword_from_str(&lexeme).unwrap_or(TokenKind::FieldId);
        Token::new(kind, lexeme, line)
    }

    /// Emit the consumed lexeme as an unknown-pattern error.
    fn pattern_error(&mut self, line: u32) -> Token {
        let lexeme = self.buffer.lexeme();
        Token::error(lexeme.clone(), line, LexErrorKind::UnknownPattern(lexeme))
    }

    /// Emit the consumed lexeme as an integer literal.
    fn int_token(&mut self, line: u32) -> Token {
        let lexeme = self.buffer.lexeme();
        match lexeme.parse::<i64>() {
            Ok(v) => Token::with_value(TokenKind::Num, lexeme, line, TokenValue::Int(v)),
            Err(_) => Token::new(TokenKind::Num, lexeme, line),
        }
    }

    /// Emit the consumed lexeme as a real literal.
    fn real_token(&mut self, line: u32) -> Token {
        let lexeme = self.buffer.lexeme();
        match lexeme.parse::<f64>() {
            Ok(v) => Token::with_value(TokenKind::Rnum, lexeme, line, TokenValue::Real(v)),
            Err(_) => Token::new(TokenKind::Rnum, lexeme, line),
        }
    }

    // ── Lexeme scanners ────────────────────────────────────────────────

    /// `%` consumes the rest of the line but leaves the newline for the
    /// whitespace skipper, so line accounting stays in one place.
    fn lex_comment(&mut self, line: u32) -> Token {
        let stop = self.eat_while(|c| c != b'\n');
        self.give_back(stop);
        Token::new(TokenKind::Comment, "%", line)
    }

    /// Maximal lowercase run starting outside `b|c|d`.
    fn lex_word(&mut self, line: u32) -> Token {
        let stop = self.eat_while(is_lower);
        self.give_back(stop);
        self.word_token(line)
    }

    /// A leading `b`, `c` or `d`: variable identifier, keyword, or field
    /// identifier, depending on what follows.
    fn lex_bcd(&mut self, line: u32) -> Token {
        match self.buffer.next() {
            Some(d) if is_digit_2_7(d) => {
                // Variable id [b-d][2-7][b-d]*[2-7]*. The mandatory digit
                // is consumed; advance past it before the tail loops, or a
                // tail starting with b/c/d is silently skipped.
                let mut stop = self.buffer.next();
                while stop.map_or(false, is_bd) {
                    stop = self.buffer.next();
                }
                while stop.map_or(false, is_digit_2_7) {
                    stop = self.buffer.next();
                }
                match stop {
                    Some(c) if is_lower(c) || is_digit(c) => {
                        // The tail broke the pattern; the whole run is a
                        // lowercase word as far as it reaches.
                        if is_lower(c) {
                            let stop = self.eat_while(is_lower);
                            self.give_back(stop);
                        } else {
                            self.give_back(Some(c));
                        }
                        self.word_token(line)
                    }
                    other => {
                        self.give_back(other);
                        let lexeme = self.buffer.lexeme();
                        if (2..=20).contains(&lexeme.len()) {
                            Token::new(TokenKind::Id, lexeme, line)
                        } else {
                            Token::error(lexeme, line, LexErrorKind::VariableIdTooLong)
                        }
                    }
                }
            }
            Some(c) if is_lower(c) => {
                let stop = self.eat_while(is_lower);
                self.give_back(stop);
                self.word_token(line)
            }
            other => {
                // A single b/c/d on its own is a (one-letter) field id.
                self.give_back(other);
                self.word_token(line)
            }
        }
    }

    /// `_` then letters then digits: `_main` or a function identifier.
    fn lex_function_id(&mut self, line: u32) -> Token {
        let mut stop = self.buffer.next();
        if !stop.map_or(false, is_letter) {
            self.give_back(stop);
            return Token::error("_", line, LexErrorKind::UnknownSymbol('_'));
        }
        while stop.map_or(false, is_letter) {
            stop = self.buffer.next();
        }
        while stop.map_or(false, is_digit) {
            stop = self.buffer.next();
        }
        self.give_back(stop);

        let lexeme = self.buffer.lexeme();
        if lexeme == "_main" {
            Token::new(TokenKind::Main, lexeme, line)
        } else if lexeme.len() <= 30 {
            Token::new(TokenKind::FunId, lexeme, line)
        } else {
            Token::error(lexeme, line, LexErrorKind::FunctionIdTooLong)
        }
    }

    /// `#` then lowercase letters: record/union identifier.
    fn lex_record_id(&mut self, line: u32) -> Token {
        match self.buffer.next() {
            Some(c) if is_lower(c) => {
                let stop = self.eat_while(is_lower);
                self.give_back(stop);
                let lexeme = self.buffer.lexeme();
                Token::new(TokenKind::Ruid, lexeme, line)
            }
            other => {
                self.give_back(other);
                Token::error("#", line, LexErrorKind::UnknownSymbol('#'))
            }
        }
    }

    /// `digit+` then optionally `. digit digit` then optionally an
    /// exponent with exactly two digits.
    fn lex_number(&mut self, line: u32) -> Token {
        let stop = self.eat_while(is_digit);
        if stop != Some(b'.') {
            self.give_back(stop);
            return self.int_token(line);
        }

        // The dot is consumed: exactly two fraction digits must follow.
        let d1 = self.buffer.next();
        if !d1.map_or(false, is_digit) {
            self.give_back(d1);
            return self.pattern_error(line); // e.g. "23."
        }
        let d2 = self.buffer.next();
        if !d2.map_or(false, is_digit) {
            self.give_back(d2);
            return self.pattern_error(line); // e.g. "23.4"
        }

        let e = self.buffer.next();
        if e != Some(b'E') {
            self.give_back(e);
            return self.real_token(line); // "23.45"
        }

        // Exponent: optional sign, then exactly two digits.
        let mut x = self.buffer.next();
        let has_sign = matches!(x, Some(b'+') | Some(b'-'));
        if has_sign {
            x = self.buffer.next();
        }
        if !x.map_or(false, is_digit) {
            // The exponent never materialized. Retract to the end of the
            // dd.dd prefix and emit that as the real literal; the E and
            // anything after it are rescanned as their own lexemes.
            let consumed = 1 + usize::from(has_sign) + usize::from(x.is_some());
            self.buffer.retract(consumed);
            return self.real_token(line);
        }
        let x2 = self.buffer.next();
        if !x2.map_or(false, is_digit) {
            self.give_back(x2);
            return self.pattern_error(line); // e.g. "12.34E5"
        }

        self.real_token(line) // "12.34E+56"
    }

    /// `<`, `<=`, `<---`, and their near misses.
    fn lex_less(&mut self, line: u32) -> Token {
        match self.buffer.next() {
            Some(b'=') => Token::new(TokenKind::Le, "<=", line),
            Some(b'-') => match self.buffer.next() {
                Some(b'-') => match self.buffer.next() {
                    Some(b'-') => Token::new(TokenKind::Assignop, "<---", line),
                    other => {
                        self.give_back(other);
                        self.pattern_error(line) // "<--"
                    }
                },
                other => {
                    // `<-` is no operator prefix: emit `<` and put both
                    // consumed characters back so the next call sees `-`.
                    self.buffer.retract(1 + usize::from(other.is_some()));
                    Token::new(TokenKind::Lt, "<", line)
                }
            },
            other => {
                self.give_back(other);
                Token::new(TokenKind::Lt, "<", line)
            }
        }
    }

    fn lex_greater(&mut self, line: u32) -> Token {
        match self.buffer.next() {
            Some(b'=') => Token::new(TokenKind::Ge, ">=", line),
            other => {
                self.give_back(other);
                Token::new(TokenKind::Gt, ">", line)
            }
        }
    }

    fn lex_equals(&mut self, line: u32) -> Token {
        match self.buffer.next() {
            Some(b'=') => Token::new(TokenKind::Eq, "==", line),
            other => {
                self.give_back(other);
                Token::error("=", line, LexErrorKind::UnknownSymbol('='))
            }
        }
    }

    fn lex_bang(&mut self, line: u32) -> Token {
        match self.buffer.next() {
            Some(b'=') => Token::new(TokenKind::Ne, "!=", line),
            other => {
                self.give_back(other);
                Token::error("!", line, LexErrorKind::UnknownSymbol('!'))
            }
        }
    }

    fn lex_amp(&mut self, line: u32) -> Token {
        match self.buffer.next() {
            Some(b'&') => match self.buffer.next() {
                Some(b'&') => Token::new(TokenKind::And, "&&&", line),
                other => {
                    self.give_back(other);
                    Token::error("&&", line, LexErrorKind::UnknownPattern("&&".into()))
                }
            },
            other => {
                self.give_back(other);
                Token::error("&", line, LexErrorKind::UnknownSymbol('&'))
            }
        }
    }

    fn lex_at(&mut self, line: u32) -> Token {
        match self.buffer.next() {
            Some(b'@') => match self.buffer.next() {
                Some(b'@') => Token::new(TokenKind::Or, "@@@", line),
                other => {
                    self.give_back(other);
                    Token::error("@@", line, LexErrorKind::UnknownPattern("@@".into()))
                }
            },
            other => {
                self.give_back(other);
                Token::error("@", line, LexErrorKind::UnknownSymbol('@'))
            }
        }
    }
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let tok = self.next_token();
        if tok.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(tok)
    }
}

// ── Character classes ──────────────────────────────────────────────────

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn is_digit_2_7(c: u8) -> bool {
    (b'2'..=b'7').contains(&c)
}

fn is_lower(c: u8) -> bool {
    c.is_ascii_lowercase()
}

fn is_bd(c: u8) -> bool {
    matches!(c, b'b' | b'c' | b'd')
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ws(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}
