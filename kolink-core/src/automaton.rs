//! Trie nodes and the immutable automaton
//!
//! The automaton is a flat vector of nodes. Node 0 is the root; every other
//! node is reachable from it by exactly one character path. Fail links always
//! point to a strictly shallower node, so fail chains terminate at the root.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{CodecError, Result};
use crate::matcher::{self, MatchSpan};

/// Index of a node inside an [`Automaton`]
pub type NodeId = u32;

/// Index of the root node
pub const ROOT: NodeId = 0;

/// Identifiers sharing one expression, in insertion order
pub type Identifiers = SmallVec<[String; 2]>;

/// A single trie node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieNode {
    pub(crate) children: BTreeMap<char, NodeId>,
    pub(crate) fail: NodeId,
    pub(crate) output: Option<Identifiers>,
    pub(crate) expression: Option<String>,
    /// Length of the character path from the root
    pub(crate) depth: u32,
}

impl TrieNode {
    pub(crate) fn new(depth: u32) -> Self {
        Self {
            children: BTreeMap::new(),
            fail: ROOT,
            output: None,
            expression: None,
            depth,
        }
    }

    /// Outgoing edges, ordered by code point
    pub fn children(&self) -> &BTreeMap<char, NodeId> {
        &self.children
    }

    /// Child reached by `ch`, if any
    #[inline]
    pub fn child(&self, ch: char) -> Option<NodeId> {
        self.children.get(&ch).copied()
    }

    /// Fail link
    #[inline]
    pub fn fail(&self) -> NodeId {
        self.fail
    }

    /// Identifiers whose expression ends at this node
    pub fn output(&self) -> Option<&[String]> {
        self.output.as_deref()
    }

    /// Canonical expression ending at this node
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Number of characters between the root and this node
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    /// Output and expression together, present only on terminal nodes
    #[inline]
    pub(crate) fn terminal(&self) -> Option<(&[String], &str)> {
        match (&self.output, &self.expression) {
            (Some(ids), Some(expression)) => Some((ids.as_slice(), expression.as_str())),
            _ => None,
        }
    }
}

/// Size figures reported after a build or a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonStats {
    /// Number of trie nodes, root included
    pub node_count: usize,
    /// Number of distinct expressions
    pub expression_count: usize,
    /// Number of identifiers across all expressions
    pub identifier_count: usize,
}

/// Aho-Corasick automaton over Unicode scalar values
///
/// Read-only once built. Share it between threads behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Automaton {
    nodes: Vec<TrieNode>,
}

impl Automaton {
    /// An automaton with zero nodes; scanning it always yields nothing
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn from_built(nodes: Vec<TrieNode>) -> Self {
        Self { nodes }
    }

    /// All nodes; index 0 is the root
    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    /// Node by index
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id as usize]
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for an automaton with zero nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node, expression and identifier counts
    pub fn stats(&self) -> AutomatonStats {
        let mut stats = AutomatonStats {
            node_count: self.nodes.len(),
            ..AutomatonStats::default()
        };
        for ids in self.nodes.iter().filter_map(|node| node.output.as_ref()) {
            stats.expression_count += 1;
            stats.identifier_count += ids.len();
        }
        stats
    }

    /// Find every linkable expression in `text`
    ///
    /// See [`matcher::scan`].
    pub fn scan(&self, text: &str, exclude: Option<&str>) -> Vec<MatchSpan> {
        matcher::scan(self, text, exclude)
    }

    /// Transition from `state` on `ch`, following fail links on a miss
    #[inline]
    pub(crate) fn next_state(&self, mut state: NodeId, ch: char) -> NodeId {
        loop {
            let node = &self.nodes[state as usize];
            if let Some(child) = node.child(ch) {
                return child;
            }
            if state == ROOT {
                return ROOT;
            }
            state = node.fail;
        }
    }

    /// Accept nodes coming from an untrusted payload
    ///
    /// Depths are recomputed here. Every structural invariant is checked so
    /// that scanning a decoded automaton can neither index out of range nor
    /// loop on a fail chain.
    pub(crate) fn from_decoded(mut nodes: Vec<TrieNode>) -> Result<Self> {
        if nodes.is_empty() {
            return Ok(Self::empty());
        }

        let count = nodes.len();
        if nodes[0].fail != ROOT {
            return Err(CodecError::invariant("root fail link must point to the root"));
        }
        if nodes[0].output.is_some() || nodes[0].expression.is_some() {
            return Err(CodecError::invariant("root node cannot carry an output"));
        }

        // (parent, edge character) for every non-root node
        let mut parents: Vec<Option<(NodeId, char)>> = vec![None; count];
        let mut depths = vec![0u32; count];
        let mut seen = vec![false; count];
        seen[0] = true;

        let mut queue = VecDeque::from([ROOT]);
        while let Some(current) = queue.pop_front() {
            for (&ch, &child) in &nodes[current as usize].children {
                let index = child as usize;
                if index >= count {
                    return Err(CodecError::invariant(format!(
                        "node {current}: child {child} out of range"
                    )));
                }
                if seen[index] {
                    return Err(CodecError::invariant(format!(
                        "node {child} is reachable by more than one path"
                    )));
                }
                seen[index] = true;
                depths[index] = depths[current as usize] + 1;
                parents[index] = Some((current, ch));
                queue.push_back(child);
            }
        }

        if let Some(orphan) = seen.iter().position(|&reached| !reached) {
            return Err(CodecError::invariant(format!(
                "node {orphan} is not reachable from the root"
            )));
        }

        for (index, node) in nodes.iter().enumerate().skip(1) {
            let fail = node.fail as usize;
            if fail >= count {
                return Err(CodecError::invariant(format!(
                    "node {index}: fail link {fail} out of range"
                )));
            }
            if depths[fail] >= depths[index] {
                return Err(CodecError::invariant(format!(
                    "node {index}: fail link {fail} is not shallower than the node"
                )));
            }

            match (&node.output, &node.expression) {
                (None, None) => {}
                (Some(ids), Some(expression)) => {
                    if ids.is_empty() {
                        return Err(CodecError::invariant(format!(
                            "node {index}: output list is empty"
                        )));
                    }
                    if !path_spells(&parents, index, expression, depths[index]) {
                        return Err(CodecError::invariant(format!(
                            "node {index}: expression {expression:?} does not match its trie path"
                        )));
                    }
                }
                _ => {
                    return Err(CodecError::invariant(format!(
                        "node {index}: output and expression must be present together"
                    )));
                }
            }
        }

        for (node, depth) in nodes.iter_mut().zip(depths) {
            node.depth = depth;
        }

        Ok(Self { nodes })
    }
}

/// Whether the path from the root to `index` spells `expression`
fn path_spells(
    parents: &[Option<(NodeId, char)>],
    index: usize,
    expression: &str,
    depth: u32,
) -> bool {
    if expression.chars().count() != depth as usize {
        return false;
    }
    let mut current = index;
    for expected in expression.chars().rev() {
        match parents[current] {
            Some((parent, ch)) if ch == expected => current = parent as usize,
            _ => return false,
        }
    }
    current == ROOT as usize
}
