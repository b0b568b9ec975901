//! The predictive parser: a pushdown recognizer over the parse table.
//!
//! The stack holds (symbol, tree node) pairs. Terminals match and bind the
//! current token into their leaf; non-terminals expand through the table,
//! appending one child per right-hand-side symbol and pushing them in
//! reverse so the leftmost is handled next. Comment and error tokens never
//! reach the stack: the parser filters them between every read, recording
//! lexical errors as it goes, so lexical trouble cannot desynchronize the
//! recognition.
//!
//! On a syntax error the parser stays inside panic mode until the current
//! token is one the remaining stack can actually consume. Function
//! boundaries (a function id, `_main`, `end`) additionally unwind the
//! stack, which lets a ruined function body recover at the next function.

use std::io::Read;

use quill_common::token::{Token, TokenKind};
use quill_lexer::Lexer;

use crate::error::{ParseError, ParseErrorKind};
use crate::grammar::{Grammar, Symbol};
use crate::table::ParseTable;
use crate::tree::{NodeId, ParseTree};

/// Hard ceiling on recorded errors; a run that reaches it stops.
pub const ERROR_CAP: usize = 10_000;

/// Tokens that plausibly delimit a syntactic region and are worth
/// resynchronizing on.
fn is_sync_token(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Sem
            | TokenKind::Endrecord
            | TokenKind::Endunion
            | TokenKind::Endif
            | TokenKind::Endwhile
            | TokenKind::Else
            | TokenKind::Cl
            | TokenKind::Sqr
            | TokenKind::End
            | TokenKind::Eof
            | TokenKind::FunId
            | TokenKind::Main
    )
}

/// The outcome of a parse run: the tree (whatever shape errors left it in)
/// and every recorded error in source order.
pub struct Parse {
    pub tree: ParseTree,
    pub errors: Vec<ParseError>,
}

impl Parse {
    /// Whether the run recorded no errors at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Pushdown parser over a token stream.
///
/// The grammar and table are built once per run and shared by reference;
/// the parser owns the lexer and pulls tokens on demand.
pub struct Parser<'g, R> {
    lexer: Lexer<R>,
    table: &'g ParseTable,
    errors: Vec<ParseError>,
    last_error_line: Option<u32>,
}

impl<'g, R: Read> Parser<'g, R> {
    pub fn new(table: &'g ParseTable, lexer: Lexer<R>) -> Self {
        Self {
            lexer,
            table,
            errors: Vec::new(),
            last_error_line: None,
        }
    }

    /// Run the parse to completion and return the tree plus errors.
    pub fn parse(mut self, grammar: &Grammar) -> Parse {
        let mut tree = ParseTree::new(grammar.start());
        let mut stack: Vec<(Symbol, Option<NodeId>)> = vec![
            (Symbol::Terminal(TokenKind::Eof), None),
            (Symbol::NonTerminal(grammar.start()), Some(tree.root())),
        ];
        let mut cur = self.next_meaningful();

        while let Some((symbol, node)) = stack.pop() {
            if self.errors.len() >= ERROR_CAP {
                break;
            }

            match symbol {
                Symbol::Terminal(TokenKind::Epsilon) => {}

                Symbol::Terminal(TokenKind::Eof) => {
                    if cur.kind != TokenKind::Eof {
                        self.report(cur.line, ParseErrorKind::TrailingInput { found: cur.kind });
                    }
                    break;
                }

                Symbol::Terminal(expected) => {
                    if expected == cur.kind {
                        if let Some(id) = node {
                            tree.bind_token(id, cur.clone());
                        }
                        cur = self.next_meaningful();
                    } else {
                        self.report(
                            cur.line,
                            ParseErrorKind::TokenMismatch {
                                found: cur.kind,
                                lexeme: cur.lexeme.clone(),
                                expected,
                            },
                        );
                        // The expected terminal is already discarded, which
                        // is progress; if the token in hand is a function
                        // boundary, unwind to whatever can consume it.
                        if matches!(cur.kind, TokenKind::FunId | TokenKind::Main | TokenKind::End) {
                            self.unwind_to_consumer(&mut stack, cur.kind);
                        }
                    }
                }

                Symbol::NonTerminal(nt) => {
                    if let Some(idx) = self.table.get(nt, cur.kind) {
                        let Some(parent) = node else { continue };
                        let prod = &grammar.productions()[idx];
                        let children: Vec<NodeId> = prod
                            .rhs
                            .iter()
                            .map(|&sym| tree.add_child(parent, sym))
                            .collect();
                        for (&sym, &id) in prod.rhs.iter().zip(children.iter()).rev() {
                            stack.push((sym, Some(id)));
                        }
                    } else {
                        if cur.kind != TokenKind::Eof {
                            self.report(
                                cur.line,
                                ParseErrorKind::InvalidToken {
                                    found: cur.kind,
                                    lexeme: cur.lexeme.clone(),
                                    top: nt,
                                },
                            );
                        }
                        self.recover(&mut stack, &mut cur);
                    }
                }
            }
        }

        Parse {
            tree,
            errors: self.errors,
        }
    }

    /// Pull the next token the parser should look at, filtering comments
    /// and recording lexical errors along the way.
    fn next_meaningful(&mut self) -> Token {
        loop {
            let tok = self.lexer.next_token();
            match tok.kind {
                TokenKind::Comment => {}
                TokenKind::Error => {
                    if let Some(kind) = tok.error {
                        self.report(tok.line, ParseErrorKind::Lexical(kind));
                    }
                }
                _ => return tok,
            }
        }
    }

    /// Record an error unless this line already contributed one.
    fn report(&mut self, line: u32, kind: ParseErrorKind) {
        if self.last_error_line == Some(line) {
            return;
        }
        self.last_error_line = Some(line);
        self.errors.push(ParseError { line, kind });
    }

    /// Panic-mode recovery after a failed table lookup.
    ///
    /// Skip to a sync token, then keep skipping sync tokens until one of
    /// them is consumable by something still on the stack. Landing on a
    /// function boundary unwinds the stack to its consumer so parsing
    /// resumes at the next function.
    fn recover(&mut self, stack: &mut Vec<(Symbol, Option<NodeId>)>, cur: &mut Token) {
        self.advance_to_sync(cur);
        while cur.kind != TokenKind::Eof
            && cur.kind != TokenKind::FunId
            && cur.kind != TokenKind::Main
        {
            if self.stack_can_consume(stack, cur.kind) {
                break;
            }
            *cur = self.next_meaningful();
            self.advance_to_sync(cur);
        }
        if matches!(cur.kind, TokenKind::FunId | TokenKind::Main | TokenKind::End) {
            self.unwind_to_consumer(stack, cur.kind);
        }
    }

    fn advance_to_sync(&mut self, cur: &mut Token) {
        while cur.kind != TokenKind::Eof && !is_sync_token(cur.kind) {
            *cur = self.next_meaningful();
        }
    }

    /// Whether any stack entry can consume the token: a matching terminal,
    /// or a non-terminal whose table row has an entry for it.
    fn stack_can_consume(&self, stack: &[(Symbol, Option<NodeId>)], kind: TokenKind) -> bool {
        stack.iter().rev().any(|&(sym, _)| self.consumes(sym, kind))
    }

    /// Discard stack entries until the top can consume the token. If
    /// nothing on the stack can, the stack empties and the run ends.
    fn unwind_to_consumer(&self, stack: &mut Vec<(Symbol, Option<NodeId>)>, kind: TokenKind) {
        while let Some(&(sym, _)) = stack.last() {
            if self.consumes(sym, kind) {
                break;
            }
            stack.pop();
        }
    }

    fn consumes(&self, sym: Symbol, kind: TokenKind) -> bool {
        match sym {
            Symbol::Terminal(t) => t == kind,
            Symbol::NonTerminal(nt) => self.table.get(nt, kind).is_some(),
        }
    }
}
