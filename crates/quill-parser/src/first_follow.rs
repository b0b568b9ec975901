//! Fixed-point computation of FIRST and FOLLOW sets.
//!
//! Both computations iterate over the whole production list until no set
//! grows. Monotonicity guarantees termination; the iteration count is
//! still capped and convergence asserted, so a grammar bug fails loudly
//! instead of spinning.

use rustc_hash::FxHashSet;

use quill_common::token::TokenKind;

use crate::grammar::{Grammar, NonTerminal, Symbol};

const MAX_ITERATIONS: usize = 50;

/// FIRST and FOLLOW sets for every non-terminal of a grammar.
///
/// Epsilon membership in FIRST is kept as a separate nullable flag rather
/// than a set element, so the sets themselves only ever hold real
/// terminals.
pub struct FirstFollow {
    first: Vec<FxHashSet<TokenKind>>,
    nullable: Vec<bool>,
    follow: Vec<FxHashSet<TokenKind>>,
}

impl FirstFollow {
    /// Compute both set families for a grammar.
    pub fn compute(grammar: &Grammar) -> FirstFollow {
        let mut ff = FirstFollow {
            first: vec![FxHashSet::default(); NonTerminal::COUNT],
            nullable: vec![false; NonTerminal::COUNT],
            follow: vec![FxHashSet::default(); NonTerminal::COUNT],
        };
        ff.compute_first(grammar);
        ff.compute_follow(grammar);
        ff
    }

    /// Terminals that can begin a string derived from `nt`.
    pub fn first(&self, nt: NonTerminal) -> &FxHashSet<TokenKind> {
        &self.first[nt as usize]
    }

    /// Whether `nt` derives the empty string.
    pub fn is_nullable(&self, nt: NonTerminal) -> bool {
        self.nullable[nt as usize]
    }

    /// Terminals that can follow `nt` in some sentential form.
    pub fn follow(&self, nt: NonTerminal) -> &FxHashSet<TokenKind> {
        &self.follow[nt as usize]
    }

    /// FIRST of a symbol sequence, plus whether the whole sequence is
    /// nullable. This is what the parse-table builder needs per rule.
    pub fn first_of_sequence(&self, rhs: &[Symbol]) -> (FxHashSet<TokenKind>, bool) {
        let mut set = FxHashSet::default();
        for sym in rhs {
            match *sym {
                Symbol::Terminal(TokenKind::Epsilon) => return (set, true),
                Symbol::Terminal(t) => {
                    set.insert(t);
                    return (set, false);
                }
                Symbol::NonTerminal(b) => {
                    set.extend(self.first(b).iter().copied());
                    if !self.is_nullable(b) {
                        return (set, false);
                    }
                }
            }
        }
        (set, true)
    }

    fn compute_first(&mut self, grammar: &Grammar) {
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            let mut changed = false;
            for prod in grammar.productions() {
                let lhs = prod.lhs as usize;
                if prod.is_epsilon() {
                    if !self.nullable[lhs] {
                        self.nullable[lhs] = true;
                        changed = true;
                    }
                    continue;
                }

                let mut all_nullable = true;
                for sym in &prod.rhs {
                    match *sym {
                        Symbol::Terminal(t) => {
                            if self.first[lhs].insert(t) {
                                changed = true;
                            }
                            all_nullable = false;
                            break;
                        }
                        Symbol::NonTerminal(b) => {
                            if b as usize != lhs {
                                let from = self.first[b as usize].clone();
                                let before = self.first[lhs].len();
                                self.first[lhs].extend(from);
                                if self.first[lhs].len() != before {
                                    changed = true;
                                }
                            }
                            if !self.nullable[b as usize] {
                                all_nullable = false;
                                break;
                            }
                        }
                    }
                }
                if all_nullable && !self.nullable[lhs] {
                    self.nullable[lhs] = true;
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }
        }
        assert!(converged, "FIRST sets did not converge in {MAX_ITERATIONS} passes");
    }

    fn compute_follow(&mut self, grammar: &Grammar) {
        self.follow[grammar.start() as usize].insert(TokenKind::Eof);

        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            let mut changed = false;
            for prod in grammar.productions() {
                for (j, sym) in prod.rhs.iter().enumerate() {
                    let Symbol::NonTerminal(b) = *sym else {
                        continue;
                    };
                    let b = b as usize;

                    // FIRST of the tail after this occurrence goes into
                    // FOLLOW(b); if the tail is fully nullable (or empty)
                    // so does FOLLOW(lhs).
                    let mut tail_nullable = true;
                    for beta in &prod.rhs[j + 1..] {
                        match *beta {
                            Symbol::Terminal(TokenKind::Epsilon) => {}
                            Symbol::Terminal(t) => {
                                if self.follow[b].insert(t) {
                                    changed = true;
                                }
                                tail_nullable = false;
                                break;
                            }
                            Symbol::NonTerminal(c) => {
                                let from = self.first[c as usize].clone();
                                let before = self.follow[b].len();
                                self.follow[b].extend(from);
                                if self.follow[b].len() != before {
                                    changed = true;
                                }
                                if !self.nullable[c as usize] {
                                    tail_nullable = false;
                                    break;
                                }
                            }
                        }
                    }
                    if tail_nullable {
                        let from = self.follow[prod.lhs as usize].clone();
                        let before = self.follow[b].len();
                        self.follow[b].extend(from);
                        if self.follow[b].len() != before {
                            changed = true;
                        }
                    }
                }
            }
            if !changed {
                converged = true;
                break;
            }
        }
        assert!(converged, "FOLLOW sets did not converge in {MAX_ITERATIONS} passes");
    }
}
