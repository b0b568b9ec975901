//! The parse tree and its inorder listing.
//!
//! Nodes live in a flat arena; parent links are indices, so the tree owns
//! no cycles. A node's children are exactly the right-hand side of the
//! production that expanded it, in source order. Terminal leaves are
//! created unbound when a rule is applied and bound to their token when
//! the parser matches it; a leaf that never gets a token is either an
//! epsilon leaf or an error-recovery placeholder, and the listing renders
//! both as `EPS` rows.

use std::io::{self, Write};

use quill_common::token::{Token, TokenValue};

use crate::grammar::{NonTerminal, Symbol};

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

struct Node {
    symbol: Symbol,
    token: Option<Token>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Parse tree for one run. Node 0 is the root.
pub struct ParseTree {
    nodes: Vec<Node>,
}

impl ParseTree {
    /// Create a tree whose root is the start symbol.
    pub fn new(start: NonTerminal) -> ParseTree {
        ParseTree {
            nodes: vec![Node {
                symbol: Symbol::NonTerminal(start),
                token: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn symbol(&self, id: NodeId) -> Symbol {
        self.nodes[id.0 as usize].symbol
    }

    /// The bound token, for terminal leaves that matched input.
    pub fn token(&self, id: NodeId) -> Option<&Token> {
        self.nodes[id.0 as usize].token.as_ref()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0 as usize].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0 as usize].parent
    }

    /// Append a child for one right-hand-side symbol of a production.
    pub(crate) fn add_child(&mut self, parent: NodeId, symbol: Symbol) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            symbol,
            token: None,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Bind the matched token into a terminal leaf.
    pub(crate) fn bind_token(&mut self, id: NodeId, token: Token) {
        self.nodes[id.0 as usize].token = Some(token);
    }

    /// Write the column-aligned inorder listing of the tree.
    ///
    /// For each non-leaf: the leftmost subtree, then the node itself, then
    /// the remaining subtrees. One row per node.
    pub fn write_listing<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(
            w,
            "{:<20}  {:<30}  {:<6}  {:<22}  {:<12}  {:<30}  {:<18}  {}",
            "lexeme",
            "CurrentNode",
            "lineno",
            "tokenName",
            "valueIfNumber",
            "parentNodeSymbol",
            "isLeafNode(yes/no)",
            "NodeSymbol"
        )?;
        writeln!(w, "{}", "-".repeat(150))?;
        self.write_inorder(w, self.root())
    }

    fn write_inorder<W: Write>(&self, w: &mut W, id: NodeId) -> io::Result<()> {
        let node = &self.nodes[id.0 as usize];
        let parent_name = match node.parent {
            None => "ROOT",
            Some(p) => self.symbol(p).name(),
        };

        if node.children.is_empty() {
            return match &node.token {
                Some(tok) => {
                    let value = match tok.value {
                        Some(TokenValue::Int(v)) => v.to_string(),
                        Some(TokenValue::Real(v)) => format!("{v:.2}"),
                        None => "----".to_string(),
                    };
                    writeln!(
                        w,
                        "{:<20}  {:<30}  {:<6}  {:<22}  {:<12}  {:<30}  {:<18}  {}",
                        tok.lexeme,
                        tok.kind.name(),
                        tok.line,
                        tok.kind.name(),
                        value,
                        parent_name,
                        "yes",
                        "----"
                    )
                }
                // Epsilon leaf or recovery placeholder: no token ever bound.
                None => writeln!(
                    w,
                    "{:<20}  {:<30}  {:<6}  {:<22}  {:<12}  {:<30}  {:<18}  {}",
                    "----", "EPS", "----", "EPS", "----", parent_name, "yes", "----"
                ),
            };
        }

        let name = node.symbol.name();
        self.write_inorder(w, node.children[0])?;
        writeln!(
            w,
            "{:<20}  {:<30}  {:<6}  {:<22}  {:<12}  {:<30}  {:<18}  {}",
            "----", name, "----", "----", "----", parent_name, "no", name
        )?;
        for &child in &node.children[1..] {
            self.write_inorder(w, child)?;
        }
        Ok(())
    }
}
