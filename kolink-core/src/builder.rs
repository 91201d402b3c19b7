//! Compile-time construction of the automaton
//!
//! Patterns are inserted one code point at a time, then fail links are
//! computed breadth-first from the root. Outputs are never merged down the
//! fail chain; the matcher walks the chain explicitly.

use std::collections::VecDeque;

use smallvec::smallvec;

use crate::automaton::{Automaton, NodeId, TrieNode, ROOT};
use crate::error::BuildError;

/// Incremental trie builder
#[derive(Debug, Clone)]
pub struct AutomatonBuilder {
    nodes: Vec<TrieNode>,
    patterns: usize,
}

impl Default for AutomatonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomatonBuilder {
    /// Create a builder holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new(0)],
            patterns: 0,
        }
    }

    /// Number of patterns accepted so far, duplicates included
    pub fn pattern_count(&self) -> usize {
        self.patterns
    }

    /// Insert one (identifier, expression) pair
    ///
    /// Identifiers sharing an expression accumulate on the same node in
    /// insertion order. Re-inserting an identical pair has no effect.
    pub fn insert(
        &mut self,
        identifier: impl Into<String>,
        expression: &str,
    ) -> Result<&mut Self, BuildError> {
        let identifier = identifier.into();
        if expression.is_empty() {
            return Err(BuildError::EmptyExpression {
                identifier,
                position: self.patterns,
            });
        }
        self.patterns += 1;

        let mut current = ROOT;
        for ch in expression.chars() {
            current = match self.nodes[current as usize].child(ch) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len() as NodeId;
                    let depth = self.nodes[current as usize].depth + 1;
                    self.nodes.push(TrieNode::new(depth));
                    self.nodes[current as usize].children.insert(ch, next);
                    next
                }
            };
        }

        let terminal = &mut self.nodes[current as usize];
        match terminal.output.as_mut() {
            Some(ids) => {
                if !ids.contains(&identifier) {
                    ids.push(identifier);
                }
            }
            None => {
                terminal.output = Some(smallvec![identifier]);
                terminal.expression = Some(expression.to_string());
            }
        }

        Ok(self)
    }

    /// Compute fail links and freeze the trie
    pub fn build(mut self) -> Automaton {
        self.link_failures();
        let automaton = Automaton::from_built(self.nodes);
        let stats = automaton.stats();
        log::debug!(
            "built automaton: {} patterns, {} nodes, {} expressions",
            self.patterns,
            stats.node_count,
            stats.expression_count
        );
        automaton
    }

    fn link_failures(&mut self) {
        let mut queue = VecDeque::new();

        for &child in self.nodes[ROOT as usize].children.values() {
            queue.push_back(child);
        }
        for &child in &queue {
            self.nodes[child as usize].fail = ROOT;
        }

        while let Some(current) = queue.pop_front() {
            // The fail chain of any child of `current` only visits nodes
            // shallower than `current`, so its edges can be taken out meanwhile.
            let children = std::mem::take(&mut self.nodes[current as usize].children);

            for (&ch, &child) in &children {
                queue.push_back(child);

                let mut fallback = self.nodes[current as usize].fail;
                let fail = loop {
                    let candidate = &self.nodes[fallback as usize];
                    if let Some(next) = candidate.child(ch) {
                        break next;
                    }
                    if fallback == ROOT {
                        break ROOT;
                    }
                    fallback = candidate.fail;
                };
                self.nodes[child as usize].fail = fail;
            }

            self.nodes[current as usize].children = children;
        }
    }
}

/// Build an automaton from (identifier, expression) pairs
///
/// An empty expression anywhere aborts the whole build.
///
/// # Example
///
/// ```rust
/// use kolink_core::build;
///
/// let automaton = build([("id1", "안녕"), ("id2", "안녕하세요")]).unwrap();
/// let spans = automaton.scan("안녕하세요!", None);
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].ids.as_slice(), ["id2"]);
/// ```
pub fn build<I, S, E>(patterns: I) -> Result<Automaton, BuildError>
where
    I: IntoIterator<Item = (S, E)>,
    S: Into<String>,
    E: AsRef<str>,
{
    let mut builder = AutomatonBuilder::new();
    for (identifier, expression) in patterns {
        builder.insert(identifier, expression.as_ref())?;
    }
    Ok(builder.build())
}
