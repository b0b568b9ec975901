//! LL(1) front-end for the Quill language.
//!
//! The pipeline is table-driven end to end: a declarative [`Grammar`]
//! feeds a fixed-point [`FirstFollow`] computation, which derives the
//! predictive [`ParseTable`], which drives the pushdown [`Parser`] that
//! builds a [`ParseTree`] while recovering from errors in panic mode.
//!
//! The grammar, sets and table are immutable once built and may be shared
//! across parse runs; each run gets its own lexer, stack and tree.

mod error;
mod first_follow;
mod grammar;
mod parser;
mod table;
mod tree;

use std::io::Read;

use quill_lexer::Lexer;

pub use error::{ParseError, ParseErrorKind};
pub use first_follow::FirstFollow;
pub use grammar::{Grammar, NonTerminal, Production, Symbol};
pub use parser::{Parse, Parser, ERROR_CAP};
pub use table::{ConflictError, ParseTable};
pub use tree::{NodeId, ParseTree};

/// One-shot convenience: build the Quill grammar and table, then parse the
/// reader. Hosts that parse repeatedly should build the pieces once and
/// drive [`Parser`] directly.
pub fn parse<R: Read>(reader: R) -> Result<Parse, ConflictError> {
    let grammar = Grammar::quill();
    let ff = FirstFollow::compute(&grammar);
    let table = ParseTable::build(&grammar, &ff)?;
    Ok(Parser::new(&table, Lexer::new(reader)).parse(&grammar))
}
