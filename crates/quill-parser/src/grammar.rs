//! Static description of the Quill grammar.
//!
//! The grammar is a flat list of productions numbered 1..N in declaration
//! order. Rule numbers are stable: the parse table and diagnostics refer to
//! them. The grammar here is the left-factored LL(1) variant: lists use a
//! tail non-terminal, arithmetic precedence is split into
//! term/factor/prime chains, and the if-statement's else arm is factored
//! into its own non-terminal.

use std::fmt;

use quill_common::token::TokenKind;

/// Every non-terminal of the Quill grammar.
///
/// Declaration order is fixed; parse-table rows are indexed by
/// `non_terminal as usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerminal {
    Program,
    MainFunction,
    OtherFunctions,
    Function,
    InputPar,
    OutputPar,
    ParameterList,
    DataType,
    PrimitiveDatatype,
    ConstructedDatatype,
    RemainingList,
    Stmts,
    TypeDefinitions,
    ActualOrRedefined,
    TypeDefinition,
    FieldDefinitions,
    FieldType,
    FieldDefinition,
    MoreFields,
    Declarations,
    Declaration,
    GlobalOrNot,
    OtherStmts,
    Stmt,
    AssignmentStmt,
    SingleOrRecId,
    OptionExpansion,
    OneExpansion,
    MoreExpansions,
    FunCallStmt,
    OutputParameters,
    InputParameters,
    IterativeStmt,
    ConditionalStmt,
    ElsePart,
    IoStmt,
    ArithmeticExpression,
    ExpPrime,
    Term,
    TermPrime,
    Factor,
    HighPrecedenceOp,
    LowPrecedenceOp,
    BooleanExpression,
    Var,
    LogicalOp,
    RelationalOp,
    ReturnStmt,
    OptionalReturn,
    IdList,
    MoreIds,
    DefinetypeStmt,
    RecordOrUnion,
}

impl NonTerminal {
    /// Number of non-terminals. Parse-table columns are this tall.
    pub const COUNT: usize = 53;

    /// All non-terminals in declaration order. `ALL[nt as usize] == nt`.
    pub const ALL: [NonTerminal; Self::COUNT] = [
        NonTerminal::Program,
        NonTerminal::MainFunction,
        NonTerminal::OtherFunctions,
        NonTerminal::Function,
        NonTerminal::InputPar,
        NonTerminal::OutputPar,
        NonTerminal::ParameterList,
        NonTerminal::DataType,
        NonTerminal::PrimitiveDatatype,
        NonTerminal::ConstructedDatatype,
        NonTerminal::RemainingList,
        NonTerminal::Stmts,
        NonTerminal::TypeDefinitions,
        NonTerminal::ActualOrRedefined,
        NonTerminal::TypeDefinition,
        NonTerminal::FieldDefinitions,
        NonTerminal::FieldType,
        NonTerminal::FieldDefinition,
        NonTerminal::MoreFields,
        NonTerminal::Declarations,
        NonTerminal::Declaration,
        NonTerminal::GlobalOrNot,
        NonTerminal::OtherStmts,
        NonTerminal::Stmt,
        NonTerminal::AssignmentStmt,
        NonTerminal::SingleOrRecId,
        NonTerminal::OptionExpansion,
        NonTerminal::OneExpansion,
        NonTerminal::MoreExpansions,
        NonTerminal::FunCallStmt,
        NonTerminal::OutputParameters,
        NonTerminal::InputParameters,
        NonTerminal::IterativeStmt,
        NonTerminal::ConditionalStmt,
        NonTerminal::ElsePart,
        NonTerminal::IoStmt,
        NonTerminal::ArithmeticExpression,
        NonTerminal::ExpPrime,
        NonTerminal::Term,
        NonTerminal::TermPrime,
        NonTerminal::Factor,
        NonTerminal::HighPrecedenceOp,
        NonTerminal::LowPrecedenceOp,
        NonTerminal::BooleanExpression,
        NonTerminal::Var,
        NonTerminal::LogicalOp,
        NonTerminal::RelationalOp,
        NonTerminal::ReturnStmt,
        NonTerminal::OptionalReturn,
        NonTerminal::IdList,
        NonTerminal::MoreIds,
        NonTerminal::DefinetypeStmt,
        NonTerminal::RecordOrUnion,
    ];

    /// The non-terminal's name as printed in the parse-tree listing and in
    /// diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            NonTerminal::Program => "program",
            NonTerminal::MainFunction => "mainFunction",
            NonTerminal::OtherFunctions => "otherFunctions",
            NonTerminal::Function => "function",
            NonTerminal::InputPar => "input_par",
            NonTerminal::OutputPar => "output_par",
            NonTerminal::ParameterList => "parameter_list",
            NonTerminal::DataType => "dataType",
            NonTerminal::PrimitiveDatatype => "primitiveDatatype",
            NonTerminal::ConstructedDatatype => "constructedDatatype",
            NonTerminal::RemainingList => "remaining_list",
            NonTerminal::Stmts => "stmts",
            NonTerminal::TypeDefinitions => "typeDefinitions",
            NonTerminal::ActualOrRedefined => "actualOrRedefined",
            NonTerminal::TypeDefinition => "typeDefinition",
            NonTerminal::FieldDefinitions => "fieldDefinitions",
            NonTerminal::FieldType => "fieldType",
            NonTerminal::FieldDefinition => "fieldDefinition",
            NonTerminal::MoreFields => "moreFields",
            NonTerminal::Declarations => "declarations",
            NonTerminal::Declaration => "declaration",
            NonTerminal::GlobalOrNot => "global_or_not",
            NonTerminal::OtherStmts => "otherStmts",
            NonTerminal::Stmt => "stmt",
            NonTerminal::AssignmentStmt => "assignmentStmt",
            NonTerminal::SingleOrRecId => "singleOrRecId",
            NonTerminal::OptionExpansion => "optionExpansion",
            NonTerminal::OneExpansion => "oneExpansion",
            NonTerminal::MoreExpansions => "moreExpansions",
            NonTerminal::FunCallStmt => "funCallStmt",
            NonTerminal::OutputParameters => "outputParameters",
            NonTerminal::InputParameters => "inputParameters",
            NonTerminal::IterativeStmt => "iterativeStmt",
            NonTerminal::ConditionalStmt => "conditionalStmt",
            NonTerminal::ElsePart => "elsePart",
            NonTerminal::IoStmt => "ioStmt",
            NonTerminal::ArithmeticExpression => "arithmeticExpression",
            NonTerminal::ExpPrime => "expPrime",
            NonTerminal::Term => "term",
            NonTerminal::TermPrime => "termPrime",
            NonTerminal::Factor => "factor",
            NonTerminal::HighPrecedenceOp => "highPrecedenceOp",
            NonTerminal::LowPrecedenceOp => "lowPrecedenceOp",
            NonTerminal::BooleanExpression => "booleanExpression",
            NonTerminal::Var => "var",
            NonTerminal::LogicalOp => "logicalOp",
            NonTerminal::RelationalOp => "relationalOp",
            NonTerminal::ReturnStmt => "returnStmt",
            NonTerminal::OptionalReturn => "optionalReturn",
            NonTerminal::IdList => "idList",
            NonTerminal::MoreIds => "more_ids",
            NonTerminal::DefinetypeStmt => "definetypestmt",
            NonTerminal::RecordOrUnion => "recordOrUnion",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A grammar symbol: either a terminal (token kind) or a non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Terminal(TokenKind),
    NonTerminal(NonTerminal),
}

impl Symbol {
    /// The symbol's printable name.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Terminal(t) => t.name(),
            Symbol::NonTerminal(nt) => nt.name(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One production rule: `lhs -> rhs`, with its stable 1-based number.
#[derive(Debug, Clone)]
pub struct Production {
    pub lhs: NonTerminal,
    pub rhs: Vec<Symbol>,
    pub number: usize,
}

impl Production {
    /// Whether this is the empty production `lhs -> epsilon`.
    pub fn is_epsilon(&self) -> bool {
        self.rhs.len() == 1 && self.rhs[0] == Symbol::Terminal(TokenKind::Epsilon)
    }
}

/// The grammar: an immutable list of productions plus the start symbol.
///
/// Built once per run through a local builder and never mutated after.
pub struct Grammar {
    productions: Vec<Production>,
    start: NonTerminal,
}

impl Grammar {
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn start(&self) -> NonTerminal {
        self.start
    }

    /// The Quill language grammar.
    pub fn quill() -> Grammar {
        use self::NonTerminal::*;
        use quill_common::token::TokenKind::{
            And, As, Assignop, Call, Cl, Colon, Comma, Definetype, Div, Dot, Else, End, Endif,
            Endrecord, Endunion, Endwhile, Eq, FieldId, FunId, Ge, Global, Gt, Id, If, Input, Int,
            Le, List, Lt, Main, Minus, Mul, Ne, Not, Num, Op, Or, Output, Parameter, Parameters,
            Plus, Read, Real, Record, Return, Rnum, Ruid, Sem, Sql, Sqr, Then, Type, Union, While,
            With, Write,
        };

        let t = Symbol::Terminal;
        let n = Symbol::NonTerminal;
        let mut g = GrammarBuilder::new(Program);

        g.rule(Program, vec![n(OtherFunctions), n(MainFunction)]);
        g.rule(MainFunction, vec![t(Main), n(Stmts), t(End)]);
        g.rule(OtherFunctions, vec![n(Function), n(OtherFunctions)]);
        g.empty(OtherFunctions);
        g.rule(
            Function,
            vec![t(FunId), n(InputPar), n(OutputPar), t(Sem), n(Stmts), t(End)],
        );
        g.rule(
            InputPar,
            vec![t(Input), t(Parameter), t(List), t(Sql), n(ParameterList), t(Sqr)],
        );
        g.rule(
            OutputPar,
            vec![t(Output), t(Parameter), t(List), t(Sql), n(ParameterList), t(Sqr)],
        );
        g.empty(OutputPar);
        g.rule(ParameterList, vec![n(DataType), t(Id), n(RemainingList)]);
        g.rule(DataType, vec![n(PrimitiveDatatype)]);
        g.rule(DataType, vec![n(ConstructedDatatype)]);
        g.rule(PrimitiveDatatype, vec![t(Int)]);
        g.rule(PrimitiveDatatype, vec![t(Real)]);
        g.rule(ConstructedDatatype, vec![t(Record), t(Ruid)]);
        g.rule(ConstructedDatatype, vec![t(Union), t(Ruid)]);
        g.rule(ConstructedDatatype, vec![t(Ruid)]);
        g.rule(RemainingList, vec![t(Comma), n(ParameterList)]);
        g.empty(RemainingList);
        g.rule(
            Stmts,
            vec![n(TypeDefinitions), n(Declarations), n(OtherStmts), n(ReturnStmt)],
        );
        g.rule(TypeDefinitions, vec![n(ActualOrRedefined), n(TypeDefinitions)]);
        g.empty(TypeDefinitions);
        g.rule(ActualOrRedefined, vec![n(TypeDefinition)]);
        g.rule(ActualOrRedefined, vec![n(DefinetypeStmt)]);
        g.rule(
            TypeDefinition,
            vec![t(Record), t(Ruid), n(FieldDefinitions), t(Endrecord)],
        );
        g.rule(
            TypeDefinition,
            vec![t(Union), t(Ruid), n(FieldDefinitions), t(Endunion)],
        );
        g.rule(
            FieldDefinitions,
            vec![n(FieldDefinition), n(FieldDefinition), n(MoreFields)],
        );
        g.rule(
            FieldDefinition,
            vec![t(Type), n(FieldType), t(Colon), t(FieldId), t(Sem)],
        );
        g.rule(FieldType, vec![n(PrimitiveDatatype)]);
        g.rule(FieldType, vec![t(Ruid)]);
        g.rule(MoreFields, vec![n(FieldDefinition), n(MoreFields)]);
        g.empty(MoreFields);
        g.rule(Declarations, vec![n(Declaration), n(Declarations)]);
        g.empty(Declarations);
        g.rule(
            Declaration,
            vec![t(Type), n(DataType), t(Colon), t(Id), n(GlobalOrNot), t(Sem)],
        );
        g.rule(GlobalOrNot, vec![t(Colon), t(Global)]);
        g.empty(GlobalOrNot);
        g.rule(OtherStmts, vec![n(Stmt), n(OtherStmts)]);
        g.empty(OtherStmts);
        g.rule(Stmt, vec![n(AssignmentStmt)]);
        g.rule(Stmt, vec![n(IterativeStmt)]);
        g.rule(Stmt, vec![n(ConditionalStmt)]);
        g.rule(Stmt, vec![n(IoStmt)]);
        g.rule(Stmt, vec![n(FunCallStmt)]);
        g.rule(
            AssignmentStmt,
            vec![n(SingleOrRecId), t(Assignop), n(ArithmeticExpression), t(Sem)],
        );
        g.rule(SingleOrRecId, vec![t(Id), n(OptionExpansion)]);
        g.empty(OptionExpansion);
        g.rule(OptionExpansion, vec![n(OneExpansion), n(MoreExpansions)]);
        g.rule(OneExpansion, vec![t(Dot), t(FieldId)]);
        g.rule(MoreExpansions, vec![n(OneExpansion), n(MoreExpansions)]);
        g.empty(MoreExpansions);
        g.rule(
            FunCallStmt,
            vec![
                n(OutputParameters),
                t(Call),
                t(FunId),
                t(With),
                t(Parameters),
                n(InputParameters),
                t(Sem),
            ],
        );
        g.rule(OutputParameters, vec![t(Sql), n(IdList), t(Sqr), t(Assignop)]);
        g.empty(OutputParameters);
        g.rule(InputParameters, vec![t(Sql), n(IdList), t(Sqr)]);
        g.rule(
            IterativeStmt,
            vec![
                t(While),
                t(Op),
                n(BooleanExpression),
                t(Cl),
                n(Stmt),
                n(OtherStmts),
                t(Endwhile),
            ],
        );
        g.rule(
            ConditionalStmt,
            vec![
                t(If),
                t(Op),
                n(BooleanExpression),
                t(Cl),
                t(Then),
                n(Stmt),
                n(OtherStmts),
                n(ElsePart),
            ],
        );
        g.rule(ElsePart, vec![t(Else), n(Stmt), n(OtherStmts), t(Endif)]);
        g.rule(ElsePart, vec![t(Endif)]);
        g.rule(
            IoStmt,
            vec![t(Read), t(Op), n(SingleOrRecId), t(Cl), t(Sem)],
        );
        g.rule(IoStmt, vec![t(Write), t(Op), n(Var), t(Cl), t(Sem)]);
        g.rule(ArithmeticExpression, vec![n(Term), n(ExpPrime)]);
        g.rule(ExpPrime, vec![n(LowPrecedenceOp), n(Term), n(ExpPrime)]);
        g.empty(ExpPrime);
        g.rule(Term, vec![n(Factor), n(TermPrime)]);
        g.rule(TermPrime, vec![n(HighPrecedenceOp), n(Factor), n(TermPrime)]);
        g.empty(TermPrime);
        g.rule(Factor, vec![t(Op), n(ArithmeticExpression), t(Cl)]);
        g.rule(Factor, vec![n(Var)]);
        g.rule(HighPrecedenceOp, vec![t(Mul)]);
        g.rule(HighPrecedenceOp, vec![t(Div)]);
        g.rule(LowPrecedenceOp, vec![t(Plus)]);
        g.rule(LowPrecedenceOp, vec![t(Minus)]);
        g.rule(
            BooleanExpression,
            vec![
                t(Op),
                n(BooleanExpression),
                t(Cl),
                n(LogicalOp),
                t(Op),
                n(BooleanExpression),
                t(Cl),
            ],
        );
        g.rule(BooleanExpression, vec![n(Var), n(RelationalOp), n(Var)]);
        g.rule(BooleanExpression, vec![t(Not), t(Op), n(BooleanExpression), t(Cl)]);
        g.rule(Var, vec![n(SingleOrRecId)]);
        g.rule(Var, vec![t(Num)]);
        g.rule(Var, vec![t(Rnum)]);
        g.rule(LogicalOp, vec![t(And)]);
        g.rule(LogicalOp, vec![t(Or)]);
        g.rule(RelationalOp, vec![t(Lt)]);
        g.rule(RelationalOp, vec![t(Le)]);
        g.rule(RelationalOp, vec![t(Eq)]);
        g.rule(RelationalOp, vec![t(Gt)]);
        g.rule(RelationalOp, vec![t(Ge)]);
        g.rule(RelationalOp, vec![t(Ne)]);
        g.rule(ReturnStmt, vec![t(Return), n(OptionalReturn), t(Sem)]);
        g.rule(OptionalReturn, vec![t(Sql), n(IdList), t(Sqr)]);
        g.empty(OptionalReturn);
        g.rule(IdList, vec![t(Id), n(MoreIds)]);
        g.rule(MoreIds, vec![t(Comma), n(IdList)]);
        g.empty(MoreIds);
        g.rule(
            DefinetypeStmt,
            vec![t(Definetype), n(RecordOrUnion), t(Ruid), t(As), t(Ruid)],
        );
        g.rule(RecordOrUnion, vec![t(Record)]);
        g.rule(RecordOrUnion, vec![t(Union)]);

        g.build()
    }
}

/// Incremental grammar construction. Local to a single build and discarded;
/// the resulting [`Grammar`] is immutable.
pub(crate) struct GrammarBuilder {
    productions: Vec<Production>,
    start: NonTerminal,
}

impl GrammarBuilder {
    pub(crate) fn new(start: NonTerminal) -> Self {
        Self {
            productions: Vec::new(),
            start,
        }
    }

    /// Append a production; rule numbers follow declaration order.
    pub(crate) fn rule(&mut self, lhs: NonTerminal, rhs: Vec<Symbol>) {
        let number = self.productions.len() + 1;
        self.productions.push(Production { lhs, rhs, number });
    }

    /// Append the empty production `lhs -> epsilon`.
    pub(crate) fn empty(&mut self, lhs: NonTerminal) {
        self.rule(lhs, vec![Symbol::Terminal(TokenKind::Epsilon)]);
    }

    pub(crate) fn build(self) -> Grammar {
        Grammar {
            productions: self.productions,
            start: self.start,
        }
    }
}
