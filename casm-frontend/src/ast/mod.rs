//! Abstract Syntax Tree for CASM
//!
//! The tree is stored as an arena of nodes addressed by `NodeId`. Each node
//! owns up to two children and the next node of its sibling chain; the
//! `prev` link is a plain index filled in by [`Ast::link_siblings`] once the
//! chains are built, so the code generator can walk a statement list
//! backwards without any shared ownership.

use casm_common::SourceSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in the [`Ast`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node kinds: the statement and operand kinds of the token set, plus the
/// structural `Function` and `Block` nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Function,
    Block,

    Move,
    Add,
    Sub,
    Compare,
    Jump,
    JumpEqual,
    JumpNotEqual,
    Return,
    Call,
    Syscall,

    Register,
    Number,
    Str,
    Strlen,
    Label,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Literal value, register name, label name or structural marker
    pub text: String,
    pub first_child: Option<NodeId>,
    /// Right-hand operand of a binary statement, or the head of a call's
    /// argument chain
    pub second_child: Option<NodeId>,
    pub next: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub span: SourceSpan,
}

/// The parsed program: a chain of `Function` nodes starting at `head`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    nodes: Vec<Node>,
    head: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a detached node
    pub fn push(&mut self, kind: NodeKind, text: impl Into<String>, span: SourceSpan) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            text: text.into(),
            first_child: None,
            second_child: None,
            next: None,
            prev: None,
            span,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn set_head(&mut self, head: Option<NodeId>) {
        self.head = head;
    }

    /// Link `items` into a sibling chain through `next` and return its head
    pub fn chain(&mut self, items: &[NodeId]) -> Option<NodeId> {
        for pair in items.windows(2) {
            self.node_mut(pair[0]).next = Some(pair[1]);
        }
        if let Some(&last) = items.last() {
            self.node_mut(last).next = None;
        }
        items.first().copied()
    }

    /// Iterate a sibling chain forwards from `head`
    pub fn siblings(&self, head: Option<NodeId>) -> Siblings<'_> {
        Siblings {
            ast: self,
            cursor: head,
            backward: false,
        }
    }

    /// Iterate the siblings before `id`, nearest first
    pub fn preceding(&self, id: NodeId) -> Siblings<'_> {
        Siblings {
            ast: self,
            cursor: self.node(id).prev,
            backward: true,
        }
    }

    pub fn functions(&self) -> Siblings<'_> {
        self.siblings(self.head)
    }

    /// Find a function by name
    pub fn function(&self, name: &str) -> Option<NodeId> {
        self.functions().find(|&f| self.node(f).text == name)
    }

    /// Head of a function's statement chain (function -> block -> first statement)
    pub fn body(&self, function: NodeId) -> Option<NodeId> {
        let block = self.node(function).first_child?;
        if self.node(block).kind != NodeKind::Block {
            return None;
        }
        self.node(block).first_child
    }

    /// Establish `prev` back-references along every sibling chain reachable
    /// from the head: functions, statements and operand lists.
    pub fn link_siblings(&mut self) {
        let mut pending: Vec<Option<NodeId>> = vec![self.head];

        while let Some(chain_head) = pending.pop() {
            let mut prev = None;
            let mut cursor = chain_head;

            while let Some(id) = cursor {
                let node = self.node_mut(id);
                node.prev = prev;
                pending.push(node.first_child);
                pending.push(node.second_child);
                prev = Some(id);
                cursor = node.next;
            }
        }
    }

    /// Indented tree dump for verbose output
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.pretty_chain(self.head, 0, &mut out);
        out
    }

    fn pretty_chain(&self, head: Option<NodeId>, depth: usize, out: &mut String) {
        for id in self.siblings(head) {
            let node = self.node(id);
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{} {:?}\n", node.kind, node.text));
            self.pretty_chain(node.first_child, depth + 1, out);
            self.pretty_chain(node.second_child, depth + 1, out);
        }
    }
}

/// Iterator over a sibling chain in either direction
pub struct Siblings<'a> {
    ast: &'a Ast,
    cursor: Option<NodeId>,
    backward: bool,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor?;
        let node = self.ast.node(id);
        self.cursor = if self.backward { node.prev } else { node.next };
        Some(id)
    }
}
