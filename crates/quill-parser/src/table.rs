//! Predictive parse-table construction.
//!
//! For each rule `A -> alpha`, every terminal in FIRST(alpha) selects the
//! rule in row A; if alpha is nullable, so does every terminal in
//! FOLLOW(A). Two different rules landing in one cell mean the grammar is
//! not LL(1); construction stops and reports the collision instead of
//! silently clobbering either entry.

use std::fmt;

use quill_common::token::TokenKind;

use crate::first_follow::FirstFollow;
use crate::grammar::{Grammar, NonTerminal};

/// Two productions claimed the same parse-table cell: the grammar is not
/// LL(1). Fatal at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictError {
    pub non_terminal: NonTerminal,
    pub terminal: TokenKind,
    /// Rule number already in the cell.
    pub kept: usize,
    /// Rule number that collided with it.
    pub rejected: usize,
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grammar conflict at M[{}][{}]: rule {} and rule {} both apply",
            self.non_terminal,
            self.terminal,
            self.kept,
            self.rejected
        )
    }
}

impl std::error::Error for ConflictError {}

/// The LL(1) parse table: `(non-terminal, terminal) -> production index`.
///
/// Rows are non-terminals, columns are token kinds (end-of-file is an
/// ordinary column). Cells hold indices into the grammar's production
/// list, or nothing where no rule applies.
#[derive(Debug)]
pub struct ParseTable {
    entries: Vec<Option<u16>>,
}

impl ParseTable {
    /// Derive the table from a grammar and its FIRST/FOLLOW sets.
    pub fn build(grammar: &Grammar, ff: &FirstFollow) -> Result<ParseTable, ConflictError> {
        let mut entries: Vec<Option<u16>> = vec![None; NonTerminal::COUNT * TokenKind::COUNT];

        for (idx, prod) in grammar.productions().iter().enumerate() {
            let (first_alpha, nullable) = ff.first_of_sequence(&prod.rhs);

            let mut targets: Vec<TokenKind> = first_alpha.into_iter().collect();
            if nullable {
                targets.extend(ff.follow(prod.lhs).iter().copied());
            }

            for t in targets {
                let cell = &mut entries[prod.lhs as usize * TokenKind::COUNT + t as usize];
                match *cell {
                    None => *cell = Some(idx as u16),
                    Some(existing) if existing as usize == idx => {}
                    Some(existing) => {
                        return Err(ConflictError {
                            non_terminal: prod.lhs,
                            terminal: t,
                            kept: grammar.productions()[existing as usize].number,
                            rejected: prod.number,
                        })
                    }
                }
            }
        }

        Ok(ParseTable { entries })
    }

    /// Look up the production index for `(nt, t)`, if any.
    pub fn get(&self, nt: NonTerminal, t: TokenKind) -> Option<usize> {
        self.entries[nt as usize * TokenKind::COUNT + t as usize].map(|i| i as usize)
    }
}
