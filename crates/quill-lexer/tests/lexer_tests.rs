use std::io::Cursor;

use quill_common::error::LexErrorKind;
use quill_common::token::{Token, TokenKind, TokenValue};
use quill_lexer::Lexer;

fn tokenize(source: &str) -> Vec<Token> {
    Lexer::tokenize(Cursor::new(source.as_bytes().to_vec()))
}

/// Token kinds without the trailing Eof.
fn kinds(source: &str) -> Vec<TokenKind> {
    let mut v: Vec<TokenKind> = tokenize(source).into_iter().map(|t| t.kind).collect();
    assert_eq!(v.pop(), Some(TokenKind::Eof), "stream must end with Eof");
    v
}

fn lexemes(source: &str) -> Vec<String> {
    let mut toks = tokenize(source);
    toks.pop(); // Eof
    toks.into_iter().map(|t| t.lexeme).collect()
}

// ── Operators and punctuation ──────────────────────────────────────────

#[test]
fn assignment_operator() {
    let toks = tokenize("<---");
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].kind, TokenKind::Assignop);
    assert_eq!(toks[0].lexeme, "<---");
    assert_eq!(toks[0].line, 1);
}

#[test]
fn less_minus_is_two_tokens() {
    // `<-` is not an operator prefix: the scanner retracts twice so the
    // minus is rescanned on its own.
    let toks = tokenize("<-");
    assert_eq!(toks[0].kind, TokenKind::Lt);
    assert_eq!(toks[0].lexeme, "<");
    assert_eq!(toks[1].kind, TokenKind::Minus);
    assert_eq!(toks[1].lexeme, "-");
    assert_eq!(toks[0].line, 1);
    assert_eq!(toks[1].line, 1);
    assert_eq!(toks[2].kind, TokenKind::Eof);
}

#[test]
fn less_minus_before_operand() {
    let toks = tokenize("b2 <- c3");
    assert_eq!(
        toks.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Id,
            TokenKind::Lt,
            TokenKind::Minus,
            TokenKind::Id,
            TokenKind::Eof
        ]
    );
}

#[test]
fn incomplete_assignment_is_pattern_error() {
    let toks = tokenize("<--x");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].lexeme, "<--");
    assert_eq!(
        toks[0].error,
        Some(LexErrorKind::UnknownPattern("<--".into()))
    );
    assert_eq!(toks[1].kind, TokenKind::FieldId);
    assert_eq!(toks[1].lexeme, "x");
}

#[test]
fn relational_operators() {
    assert_eq!(
        kinds("< <= > >= == !="),
        vec![
            TokenKind::Lt,
            TokenKind::Le,
            TokenKind::Gt,
            TokenKind::Ge,
            TokenKind::Eq,
            TokenKind::Ne
        ]
    );
}

#[test]
fn lone_equals_and_bang_are_errors() {
    let toks = tokenize("= !");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].error, Some(LexErrorKind::UnknownSymbol('=')));
    assert_eq!(toks[1].kind, TokenKind::Error);
    assert_eq!(toks[1].error, Some(LexErrorKind::UnknownSymbol('!')));
}

#[test]
fn logical_operators_and_their_prefixes() {
    assert_eq!(kinds("&&& @@@"), vec![TokenKind::And, TokenKind::Or]);

    let toks = tokenize("&& & @@ @");
    assert_eq!(
        toks[0].error,
        Some(LexErrorKind::UnknownPattern("&&".into()))
    );
    assert_eq!(toks[1].error, Some(LexErrorKind::UnknownSymbol('&')));
    assert_eq!(
        toks[2].error,
        Some(LexErrorKind::UnknownPattern("@@".into()))
    );
    assert_eq!(toks[3].error, Some(LexErrorKind::UnknownSymbol('@')));
}

#[test]
fn single_character_tokens() {
    assert_eq!(
        kinds("~ + - * / , ; : . ( ) [ ]"),
        vec![
            TokenKind::Not,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Mul,
            TokenKind::Div,
            TokenKind::Comma,
            TokenKind::Sem,
            TokenKind::Colon,
            TokenKind::Dot,
            TokenKind::Op,
            TokenKind::Cl,
            TokenKind::Sql,
            TokenKind::Sqr
        ]
    );
}

#[test]
fn unknown_character_is_an_error() {
    let toks = tokenize("$");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].error, Some(LexErrorKind::UnknownSymbol('$')));
}

// ── Keywords and identifiers ───────────────────────────────────────────

#[test]
fn keywords_lex_as_keywords() {
    assert_eq!(
        kinds("while endwhile record endrecord union endunion definetype as"),
        vec![
            TokenKind::While,
            TokenKind::Endwhile,
            TokenKind::Record,
            TokenKind::Endrecord,
            TokenKind::Union,
            TokenKind::Endunion,
            TokenKind::Definetype,
            TokenKind::As
        ]
    );
    assert_eq!(
        kinds("input output parameter parameters list global int real"),
        vec![
            TokenKind::Input,
            TokenKind::Output,
            TokenKind::Parameter,
            TokenKind::Parameters,
            TokenKind::List,
            TokenKind::Global,
            TokenKind::Int,
            TokenKind::Real
        ]
    );
    assert_eq!(
        kinds("if then endif else read write return call type with end"),
        vec![
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Endif,
            TokenKind::Else,
            TokenKind::Read,
            TokenKind::Write,
            TokenKind::Return,
            TokenKind::Call,
            TokenKind::Type,
            TokenKind::With,
            TokenKind::End
        ]
    );
}

#[test]
fn non_keyword_words_are_field_ids() {
    let toks = tokenize("xcoord ycoord ends whiles");
    for t in &toks[..4] {
        assert_eq!(t.kind, TokenKind::FieldId, "lexeme {:?}", t.lexeme);
    }
}

#[test]
fn variable_identifiers() {
    let toks = tokenize("b2 c3d4 d5cc34 b7bcd234");
    for t in &toks[..4] {
        assert_eq!(t.kind, TokenKind::Id, "lexeme {:?}", t.lexeme);
    }
    assert_eq!(toks[2].lexeme, "d5cc34");
}

#[test]
fn variable_id_tail_with_bcd_letters() {
    // Regression: after the mandatory [2-7] digit the scanner must advance
    // before the tail loops, or a tail starting with b/c/d is dropped.
    let toks = tokenize("d5cc34");
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].kind, TokenKind::Id);
    assert_eq!(toks[0].lexeme, "d5cc34");
}

#[test]
fn variable_id_length_limits() {
    // 21 characters: one over the limit.
    let long = format!("b{}", "2".repeat(20));
    let toks = tokenize(&long);
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].error, Some(LexErrorKind::VariableIdTooLong));

    // Exactly 20 is fine.
    let ok = format!("b{}", "2".repeat(19));
    let toks = tokenize(&ok);
    assert_eq!(toks[0].kind, TokenKind::Id);
}

#[test]
fn bcd_words_fall_back_to_keyword_lookup() {
    // `call` starts with c; `definetype` with d; both are keywords.
    assert_eq!(kinds("call definetype"), vec![TokenKind::Call, TokenKind::Definetype]);
    // A lone b/c/d is a one-letter field id.
    let toks = tokenize("b c d");
    for t in &toks[..3] {
        assert_eq!(t.kind, TokenKind::FieldId);
    }
    // b then a non-2-7 digit: the word stops before the digit.
    let toks = tokenize("b9");
    assert_eq!(toks[0].kind, TokenKind::FieldId);
    assert_eq!(toks[0].lexeme, "b");
    assert_eq!(toks[1].kind, TokenKind::Num);
    assert_eq!(toks[1].lexeme, "9");
}

#[test]
fn function_identifiers() {
    let toks = tokenize("_main _compute _fn12");
    assert_eq!(toks[0].kind, TokenKind::Main);
    assert_eq!(toks[1].kind, TokenKind::FunId);
    assert_eq!(toks[1].lexeme, "_compute");
    assert_eq!(toks[2].kind, TokenKind::FunId);

    // `_main2` is an ordinary function id, not the main marker.
    let toks = tokenize("_main2");
    assert_eq!(toks[0].kind, TokenKind::FunId);
}

#[test]
fn function_id_length_limit() {
    let long = format!("_{}", "a".repeat(30)); // 31 characters
    let toks = tokenize(&long);
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].error, Some(LexErrorKind::FunctionIdTooLong));

    let ok = format!("_{}", "a".repeat(29)); // exactly 30
    let toks = tokenize(&ok);
    assert_eq!(toks[0].kind, TokenKind::FunId);
}

#[test]
fn lone_underscore_is_an_error() {
    let toks = tokenize("_ 5");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].error, Some(LexErrorKind::UnknownSymbol('_')));
    assert_eq!(toks[1].kind, TokenKind::Num);
}

#[test]
fn record_union_identifiers() {
    let toks = tokenize("#point #marks");
    assert_eq!(toks[0].kind, TokenKind::Ruid);
    assert_eq!(toks[0].lexeme, "#point");
    assert_eq!(toks[1].kind, TokenKind::Ruid);

    let toks = tokenize("# 5");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].error, Some(LexErrorKind::UnknownSymbol('#')));
}

// ── Numeric literals ───────────────────────────────────────────────────

#[test]
fn integer_literal() {
    let toks = tokenize("42");
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].kind, TokenKind::Num);
    assert_eq!(toks[0].lexeme, "42");
    assert_eq!(toks[0].line, 1);
    assert_eq!(toks[0].value, Some(TokenValue::Int(42)));
    assert_eq!(toks[1].kind, TokenKind::Eof);
}

#[test]
fn real_literals() {
    let toks = tokenize("23.45 0.50 12.34E12 23.45E+02 23.45E-02");
    for t in &toks[..5] {
        assert_eq!(t.kind, TokenKind::Rnum, "lexeme {:?}", t.lexeme);
        assert!(t.has_value());
    }
    assert_eq!(toks[0].value, Some(TokenValue::Real(23.45)));
    assert_eq!(toks[3].value, Some(TokenValue::Real(23.45e2)));
    assert_eq!(toks[4].value, Some(TokenValue::Real(23.45e-2)));
}

#[test]
fn trailing_dot_is_a_pattern_error() {
    let toks = tokenize("23.");
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].lexeme, "23.");
    assert_eq!(
        toks[0].error,
        Some(LexErrorKind::UnknownPattern("23.".into()))
    );
    assert_eq!(toks[1].kind, TokenKind::Eof);
}

#[test]
fn one_fraction_digit_is_a_pattern_error() {
    let toks = tokenize("23.4 rest");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].lexeme, "23.4");
    assert_eq!(toks[1].kind, TokenKind::FieldId);
}

#[test]
fn dot_followed_by_word_splits() {
    // "23.abc" -> "23." error, then "abc" as a field id.
    let toks = tokenize("23.abc");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].lexeme, "23.");
    assert_eq!(toks[1].kind, TokenKind::FieldId);
    assert_eq!(toks[1].lexeme, "abc");
}

#[test]
fn abandoned_exponent_backtracks_to_real() {
    // No digits after E: the dd.dd prefix is the literal and the E is
    // rescanned on its own.
    let toks = tokenize("12.34Ex");
    assert_eq!(toks[0].kind, TokenKind::Rnum);
    assert_eq!(toks[0].lexeme, "12.34");
    assert_eq!(toks[1].kind, TokenKind::Error); // E is no lexeme start
    assert_eq!(toks[1].error, Some(LexErrorKind::UnknownSymbol('E')));
    assert_eq!(toks[2].kind, TokenKind::FieldId);
    assert_eq!(toks[2].lexeme, "x");

    // Same with a sign consumed.
    let toks = tokenize("12.34E+;");
    assert_eq!(toks[0].kind, TokenKind::Rnum);
    assert_eq!(toks[0].lexeme, "12.34");
}

#[test]
fn one_exponent_digit_is_a_pattern_error() {
    let toks = tokenize("12.34E5 ;");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].lexeme, "12.34E5");
    assert_eq!(toks[1].kind, TokenKind::Sem);

    let toks = tokenize("12.34E+5;");
    assert_eq!(toks[0].kind, TokenKind::Error);
    assert_eq!(toks[0].lexeme, "12.34E+5");
}

// ── Comments and whitespace ────────────────────────────────────────────

#[test]
fn comment_token_and_line_tracking() {
    let toks = tokenize("% a comment\nb2");
    assert_eq!(toks[0].kind, TokenKind::Comment);
    assert_eq!(toks[0].lexeme, "%");
    assert_eq!(toks[0].line, 1);
    assert_eq!(toks[1].kind, TokenKind::Id);
    assert_eq!(toks[1].line, 2);
}

#[test]
fn comment_at_end_of_input() {
    let toks = tokenize("b2 % trailing");
    assert_eq!(toks[0].kind, TokenKind::Id);
    assert_eq!(toks[1].kind, TokenKind::Comment);
    assert_eq!(toks[2].kind, TokenKind::Eof);
}

#[test]
fn whitespace_only_input_terminates() {
    let toks = tokenize("   \t  \n\n  ");
    assert_eq!(toks.len(), 1);
    assert_eq!(toks[0].kind, TokenKind::Eof);
}

#[test]
fn trailing_whitespace_terminates() {
    let toks = tokenize("b2   \n  ");
    assert_eq!(toks.len(), 2);
    assert_eq!(toks[0].kind, TokenKind::Id);
    assert_eq!(toks[1].kind, TokenKind::Eof);
}

#[test]
fn eof_is_stable() {
    let mut lexer = Lexer::new(Cursor::new(b"b2".to_vec()));
    assert_eq!(lexer.next_token().kind, TokenKind::Id);
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}

// ── Line attribution ───────────────────────────────────────────────────

#[test]
fn tokens_carry_the_line_of_their_first_character() {
    let source = "b2 <--- 4;\nwhile (b2 < 10)\nb2 <--- b2 + 1;\nendwhile";
    let toks = tokenize(source);
    let lines: Vec<(String, u32)> = toks
        .iter()
        .map(|t| (t.lexeme.clone(), t.line))
        .collect();
    assert_eq!(lines[0], ("b2".into(), 1));
    assert_eq!(lines[3], (";".into(), 1));
    assert_eq!(lines[4], ("while".into(), 2));
    assert_eq!(lines[10], ("b2".into(), 3));
    assert_eq!(lines[16], ("endwhile".into(), 4));
}

#[test]
fn retraction_across_newline_keeps_lines_straight() {
    // The `<` is terminated by a newline; retracting it must not disturb
    // the line of the following token.
    let toks = tokenize("<\n-");
    assert_eq!(toks[0].kind, TokenKind::Lt);
    assert_eq!(toks[0].line, 1);
    assert_eq!(toks[1].kind, TokenKind::Minus);
    assert_eq!(toks[1].line, 2);
}

// ── Longer streams ─────────────────────────────────────────────────────

#[test]
fn statement_stream() {
    assert_eq!(
        lexemes("b2.xcoord <--- c3 * 2 + 1;"),
        vec!["b2", ".", "xcoord", "<---", "c3", "*", "2", "+", "1", ";"]
    );
}

#[test]
fn source_longer_than_one_buffer_half() {
    // Force a reload of the second half and a wrap back into the first.
    let unit = "type int : b2;\n";
    let source = unit.repeat(700); // ~10.5 KB, past both halves
    let toks = tokenize(&source);
    assert_eq!(toks.len(), 700 * 5 + 1);
    for chunk in toks[..toks.len() - 1].chunks(5) {
        assert_eq!(chunk[0].kind, TokenKind::Type);
        assert_eq!(chunk[1].kind, TokenKind::Int);
        assert_eq!(chunk[2].kind, TokenKind::Colon);
        assert_eq!(chunk[3].kind, TokenKind::Id);
        assert_eq!(chunk[4].kind, TokenKind::Sem);
    }
    let last = &toks[toks.len() - 2];
    assert_eq!(last.kind, TokenKind::Sem);
    assert_eq!(last.line, 700);
}
